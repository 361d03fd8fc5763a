//! # aeat303
//!
//! Spanish AEAT model 303 (periodic VAT self-assessment): box resolution
//! from tax code balances, the liquidation arithmetic, and the fixed-width
//! file filed with the tax agency.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use aeat303::*;
//! use rust_decimal_macros::dec;
//!
//! let company = Company {
//!     name: "Forn Sabaté SL".into(),
//!     vat_code: Some("ESB25000000".into()),
//!     currency: "EUR".into(),
//! };
//! let report = Declaration303Builder::new(&company, PeriodCode::FirstQuarter)
//!     .fiscalyear_code(2021)
//!     .amount(DeclarationField::AccruedVatTax1, dec!(400))
//!     .amount(DeclarationField::DeductibleCurrentDomesticOperationsTax, dec!(150))
//!     .amount(DeclarationField::ToDeduce, dec!(50))
//!     .build();
//!
//! let totals = report.totals().unwrap();
//! assert_eq!(totals.general_regime_result, dec!(250));
//! assert_eq!(totals.liquidation_result, dec!(200));
//! assert!(validate_declaration(&report).is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Declaration types, liquidation, validation, configuration |
//! | `mapping` | Tax code mappings, resolution and template sync |
//! | `record` | Fixed-width records, normalization, ISO-8859-1 encoding |
//! | `all` (default) | Everything, plus the `report` workflow |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "mapping")]
pub mod mapping;

#[cfg(feature = "record")]
pub mod record;

#[cfg(all(feature = "mapping", feature = "record"))]
pub mod report;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
