//! Mapping of declaration boxes to tax codes or fixed values.
//!
//! A company configures, for each box of the form, either a set of tax
//! codes whose balances are summed over the declared period or a constant.
//! Mappings are usually created from chart templates and kept in sync with
//! them through [`update_chart`].
//!
//! ```
//! use aeat303::*;
//! use aeat303::mapping::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let fy = FiscalYear::monthly(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
//! let window = TaxPeriodWindow::resolve(PeriodCode::SecondQuarter, &fy).unwrap();
//!
//! let ledger = InMemoryLedger::new()
//!     .with("IVA21", PeriodId(4), dec!(1000))
//!     .with("IVA21", PeriodId(5), dec!(500));
//! let mappings = [
//!     FieldMapping::codes(DeclarationField::AccruedVatBase3, ["IVA21"]),
//!     FieldMapping::fixed(DeclarationField::AccruedVatPercent3, dec!(21)),
//! ];
//!
//! let resolved = resolve(&window, &mappings, &ledger).unwrap();
//! assert_eq!(resolved.get(DeclarationField::AccruedVatBase3), Some(dec!(1500)));
//! ```

mod ledger;
mod model;
mod resolver;
mod sync;

pub use ledger::*;
pub use model::*;
pub use resolver::*;
pub use sync::*;

use crate::core::AeatError;

/// Read mapping templates from a JSON array.
pub fn templates_from_json(json: &str) -> Result<Vec<TemplateMapping>, AeatError> {
    serde_json::from_str(json).map_err(|e| AeatError::Json(e.to_string()))
}

/// Read entity mappings from a JSON array.
pub fn mappings_from_json(json: &str) -> Result<Vec<EntityMapping>, AeatError> {
    serde_json::from_str(json).map_err(|e| AeatError::Json(e.to_string()))
}
