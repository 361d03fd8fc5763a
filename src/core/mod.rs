//! Core model 303 types, liquidation arithmetic, and validation.
//!
//! This module provides the declaration snapshot, the closed set of
//! declaration boxes, the report lifecycle and the tax period window.

mod builder;
pub mod calculator;
mod config;
mod declaration;
mod error;
mod fields;
mod period;
mod state;
mod types;
mod validation;

pub use builder::*;
pub use calculator::{DerivedTotals, compute_totals};
pub use config::*;
pub use declaration::*;
pub use error::*;
pub use fields::*;
pub use period::*;
pub use state::*;
pub use types::*;
pub use validation::*;
