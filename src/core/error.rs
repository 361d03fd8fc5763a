use thiserror::Error;

use super::state::ReportState;

/// Errors that can occur while calculating or encoding a model 303 return.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AeatError {
    /// No fixed-value mappings are configured, so the fixed boxes of the
    /// declaration cannot be determined.
    #[error("no configuration found for AEAT 303: {0}")]
    Configuration(String),

    /// The company's accounting currency is not the euro.
    #[error("currency in AEAT 303 report \"{report}\" must be {expected}, found {found}")]
    Currency {
        /// Report identifier (fiscal year and period).
        report: String,
        /// Required currency code.
        expected: String,
        /// Currency code of the company.
        found: String,
    },

    /// A character cannot be represented in the output charset.
    #[error("cannot encode character {character:?} at offset {offset} of the AEAT 303 file")]
    Encoding {
        /// The offending character.
        character: char,
        /// Character offset within the file buffer.
        offset: usize,
    },

    /// Mapping configuration is inconsistent (duplicate field or tax code).
    #[error("mapping error: {0}")]
    Mapping(String),

    /// The accounting ledger could not provide a tax code balance.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Invalid period code or a period window outside the fiscal year.
    #[error("period error: {0}")]
    Period(String),

    /// Requested workflow transition is not in the transition table.
    #[error("invalid AEAT 303 transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: ReportState,
        /// Requested state.
        to: ReportState,
    },

    /// A value does not fit its fixed-width column.
    #[error("value {value} does not fit {width} columns of field {field}")]
    Overflow {
        /// Record field name.
        field: String,
        /// Rendered value.
        value: String,
        /// Column width.
        width: usize,
    },

    /// Decimal arithmetic left the representable range.
    #[error("arithmetic overflow computing {0}")]
    Arithmetic(String),

    /// A record does not match its layout (kind mismatch or unparsable column).
    #[error("record layout error: {0}")]
    Layout(String),

    /// Encoded buffer does not have the width the layouts declare.
    #[error("encoded file is {actual} characters wide, layouts declare {expected}")]
    Width {
        /// Sum of the layout widths.
        expected: usize,
        /// Width after normalization.
        actual: usize,
    },

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No stored report has the requested id.
    #[error("AEAT 303 report {0} not found")]
    NotFound(u64),

    /// The report is done: its boxes and file can no longer change, it can
    /// only be cancelled.
    #[error("AEAT 303 report \"{0}\" is done and can only be cancelled")]
    Locked(String),

    /// JSON configuration could not be read.
    #[error("JSON error: {0}")]
    Json(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the invalid field (e.g. "previous_declaration_receipt").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join validation findings into a single [`AeatError::Validation`].
pub(crate) fn validation_failure(errors: &[ValidationError]) -> AeatError {
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    AeatError::Validation(joined)
}
