//! Tax liability: progressive federal brackets, flat state rate, payroll taxes

mod engine;
mod result;

pub use engine::{calculate_taxes, federal_tax, payroll_taxes, TaxParams};
pub use result::{BracketSlice, LineKind, TaxLine, TaxResult};
