//! Fixed-width model 303 file.
//!
//! The file is the concatenation of four records (header, detail page,
//! additional page and footer) without separators, accent-stripped,
//! uppercased and encoded in ISO-8859-1.
//!
//! ```
//! use aeat303::*;
//! use aeat303::record::{decode, encode, FieldValue, RecordKey};
//! use rust_decimal_macros::dec;
//!
//! let company = Company {
//!     name: "Librería Núñez".into(),
//!     vat_code: Some("ES12345678Z".into()),
//!     currency: "EUR".into(),
//! };
//! let report = Declaration303Builder::new(&company, PeriodCode::FourthQuarter)
//!     .fiscalyear_code(2021)
//!     .amount(DeclarationField::Exports, dec!(1520.40))
//!     .build();
//!
//! let bytes = encode(&report, &AeatConfig::default()).unwrap();
//! let file = decode(&bytes).unwrap();
//! assert_eq!(
//!     file.detail.value(RecordKey::CompanyName).unwrap(),
//!     Some(FieldValue::Text("LIBRERIA NUÑEZ".into()))
//! );
//! ```

mod encoder;
mod layout;
pub mod model303;
mod normalize;

pub use encoder::*;
pub use layout::*;
pub use normalize::normalize;
