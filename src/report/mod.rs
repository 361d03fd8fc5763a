//! End-to-end handling of a model 303 return: calculation from the ledger,
//! file generation and the report lifecycle.
//!
//! ```
//! use aeat303::*;
//! use aeat303::mapping::{FieldMapping, InMemoryLedger};
//! use aeat303::report::{calculate, process};
//! use chrono::{NaiveDate, Utc};
//! use rust_decimal_macros::dec;
//!
//! let fy = FiscalYear::monthly(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
//! let company = Company {
//!     name: "Celler Vidal".into(),
//!     vat_code: Some("ESB43000000".into()),
//!     currency: "EUR".into(),
//! };
//! let mut report = Declaration303Builder::new(&company, PeriodCode::SecondQuarter)
//!     .fiscal_year(&fy)
//!     .build();
//!
//! let mappings = [
//!     FieldMapping::codes(DeclarationField::AccruedVatTax3, ["IVA21"]),
//!     FieldMapping::fixed(DeclarationField::AccruedVatPercent3, dec!(21)),
//! ];
//! let ledger = InMemoryLedger::new().with("IVA21", PeriodId(5), dec!(420));
//! let config = AeatConfig::default();
//!
//! let totals = calculate(&mut report, &fy, &mappings, &ledger, &config, Utc::now()).unwrap();
//! assert_eq!(totals.liquidation_result, dec!(420));
//!
//! process(&mut report, &config).unwrap();
//! assert_eq!(report.state, ReportState::Done);
//! assert_eq!(report.filename(&config.model), "aeat303-2021-2T.txt");
//! ```

mod store;
mod workflow;

pub use store::*;
pub use workflow::*;
