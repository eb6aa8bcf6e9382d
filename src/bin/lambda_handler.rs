//! AWS Lambda handler for running calculators
//!
//! Accepts `{"calculator": "...", "params": {...}}` and returns the serialized
//! result. Missing parameter fields take their defaults. Failures come back in
//! the `error` field of the response rather than failing the invocation.

use std::path::PathBuf;

use financial_projections::{
    Assumptions, PortfolioParams, RetirementParams, SavingsParams, ScenarioRunner, TaxParams,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input for one calculation
#[derive(Debug, Deserialize)]
pub struct CalculationRequest {
    /// `retirement`, `savings`, `tax` or `portfolio`
    pub calculator: String,

    #[serde(default)]
    pub params: Value,
}

/// Output from one calculation
#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub calculator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct Output {
    result: Value,
    summary: Option<Value>,
}

/// Tables from `ASSUMPTIONS_PATH` when set, built-in tables otherwise
fn load_runner() -> Result<ScenarioRunner, Error> {
    match std::env::var_os("ASSUMPTIONS_PATH") {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            log::info!("Loading assumptions from {}", dir.display());
            Ok(ScenarioRunner::from_csv_path(&dir)?)
        }
        None => Ok(ScenarioRunner::with_assumptions(Assumptions::default_tables())),
    }
}

/// Null or absent params mean "all defaults"
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, String> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| format!("Invalid params: {}", e))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

fn calculate(runner: &ScenarioRunner, calculator: &str, params: Value) -> Result<Output, String> {
    match calculator {
        "retirement" => {
            let params: RetirementParams = parse_params(params)?;
            let projection = runner.run_retirement(&params).map_err(|e| e.to_string())?;
            Ok(Output {
                result: to_value(&projection)?,
                summary: Some(to_value(&projection.summary())?),
            })
        }
        "savings" => {
            let params: SavingsParams = parse_params(params)?;
            let projection = runner.run_savings(&params).map_err(|e| e.to_string())?;
            Ok(Output {
                result: to_value(&projection)?,
                summary: None,
            })
        }
        "tax" => {
            let params: TaxParams = parse_params(params)?;
            let result = runner.run_tax(&params).map_err(|e| e.to_string())?;
            Ok(Output {
                result: to_value(&result)?,
                summary: Some(to_value(&result.summary_lines())?),
            })
        }
        "portfolio" => {
            let params: PortfolioParams = parse_params(params)?;
            let projection = runner.run_portfolio(&params).map_err(|e| e.to_string())?;
            Ok(Output {
                result: to_value(&projection)?,
                summary: None,
            })
        }
        other => Err(format!("Unknown calculator: {}", other)),
    }
}

/// Run one request against the loaded tables
fn respond(runner: &ScenarioRunner, request: CalculationRequest) -> CalculationResponse {
    let start = std::time::Instant::now();
    let calculator = request.calculator.trim().to_lowercase();

    let outcome = calculate(runner, &calculator, request.params);
    let execution_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(output) => CalculationResponse {
            calculator,
            result: Some(output.result),
            summary: output.summary,
            execution_time_ms,
            error: None,
        },
        Err(message) => {
            log::warn!("{} request rejected: {}", calculator, message);
            CalculationResponse {
                calculator,
                result: None,
                summary: None,
                execution_time_ms,
                error: Some(message),
            }
        }
    }
}

/// Lambda handler function
async fn handler(
    runner: &ScenarioRunner,
    event: LambdaEvent<Value>,
) -> Result<CalculationResponse, Error> {
    let (payload, _context) = event.into_parts();

    let request: CalculationRequest = match serde_json::from_value(payload) {
        Ok(r) => r,
        Err(e) => {
            return Ok(CalculationResponse {
                calculator: String::new(),
                result: None,
                summary: None,
                execution_time_ms: 0,
                error: Some(format!("Invalid JSON: {}", e)),
            });
        }
    };

    Ok(respond(runner, request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let runner = load_runner()?;
    let runner = &runner;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(runner, event).await
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> CalculationRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tax_request() {
        let runner = ScenarioRunner::new();
        let response = respond(
            &runner,
            request(json!({
                "calculator": "tax",
                "params": { "income": 75000, "state": "texas" }
            })),
        );

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["taxable_income"], json!(56050.0));
        assert_eq!(result["state_tax"], json!(0.0));
        assert_eq!(response.summary.unwrap().as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_missing_params_use_defaults() {
        let runner = ScenarioRunner::new();
        let response = respond(&runner, request(json!({ "calculator": "Retirement" })));

        assert_eq!(response.calculator, "retirement");
        let rows = response.result.unwrap()["rows"].as_array().unwrap().len();
        assert_eq!(rows, 36);
    }

    #[test]
    fn test_validation_failure_is_reported() {
        let runner = ScenarioRunner::new();
        let response = respond(
            &runner,
            request(json!({
                "calculator": "savings",
                "params": { "years": 0 }
            })),
        );
        assert!(response.result.is_none());
        assert!(response.error.is_some());

        let unknown = respond(&runner, request(json!({ "calculator": "mortgage" })));
        assert_eq!(unknown.error.as_deref(), Some("Unknown calculator: mortgage"));

        let bad_params = respond(
            &runner,
            request(json!({
                "calculator": "portfolio",
                "params": { "risk_profile": "reckless" }
            })),
        );
        assert!(bad_params.error.unwrap().starts_with("Invalid params"));
    }

    #[test]
    fn test_long_horizon_is_an_error_not_null() {
        let runner = ScenarioRunner::new();
        let response = respond(
            &runner,
            request(json!({
                "calculator": "portfolio",
                "params": { "investment_amount": 0, "horizon_years": 20000 }
            })),
        );
        assert!(response.result.is_none());
        assert!(response.error.unwrap().contains("maximum horizon"));
    }
}
