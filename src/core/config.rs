use serde::{Deserialize, Serialize};

use super::error::AeatError;

/// Combining cedilla (U+0327), kept so that "ç" survives normalization.
pub const COMBINING_CEDILLA: char = '\u{0327}';
/// Combining tilde (U+0303), kept so that "ñ" survives normalization.
pub const COMBINING_TILDE: char = '\u{0303}';

/// The only model whose record layouts this crate carries.
pub const MODEL: &str = "303";

/// Configuration for model 303 calculation and file generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeatConfig {
    /// AEAT model number used in the filename. Must be [`MODEL`].
    pub model: String,
    /// Currency the company must keep its books in (ISO 4217).
    pub currency: String,
    /// Version of the generating software (header record, max 4 chars).
    pub software_version: String,
    /// NIF of the software developer (header record, max 9 chars).
    pub developer_nif: Option<String>,
    /// Combining marks preserved by text normalization. Every other
    /// combining mark is stripped from its base letter.
    pub preserved_marks: Vec<char>,
}

impl Default for AeatConfig {
    fn default() -> Self {
        Self {
            model: MODEL.into(),
            currency: "EUR".into(),
            software_version: "1.0".into(),
            developer_nif: None,
            preserved_marks: vec![COMBINING_CEDILLA, COMBINING_TILDE],
        }
    }
}

impl AeatConfig {
    /// Read a configuration from JSON. Missing keys take their defaults.
    #[cfg(feature = "mapping")]
    pub fn from_json(json: &str) -> Result<Self, AeatError> {
        serde_json::from_str(json).map_err(|e| AeatError::Json(e.to_string()))
    }

    /// Check the configuration values fit their record columns.
    pub fn validate(&self) -> Result<(), AeatError> {
        if self.model != MODEL {
            return Err(AeatError::Validation(format!(
                "model must be {MODEL}, got '{}'",
                self.model
            )));
        }
        if self.software_version.chars().count() > 4 {
            return Err(AeatError::Validation(format!(
                "software version '{}' exceeds 4 characters",
                self.software_version
            )));
        }
        if let Some(nif) = &self.developer_nif {
            if nif.chars().count() > 9 {
                return Err(AeatError::Validation(format!(
                    "developer NIF '{nif}' exceeds 9 characters"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`AeatConfig`].
///
/// # Example
///
/// ```
/// use aeat303::AeatConfigBuilder;
///
/// let config = AeatConfigBuilder::new()
///     .software_version("2.1")
///     .developer_nif("B12345678")
///     .build();
/// assert_eq!(config.model, "303");
/// ```
#[derive(Debug, Default)]
pub struct AeatConfigBuilder {
    config: AeatConfig,
}

impl AeatConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.config.currency = code.into();
        self
    }

    pub fn software_version(mut self, version: impl Into<String>) -> Self {
        self.config.software_version = version.into();
        self
    }

    pub fn developer_nif(mut self, nif: impl Into<String>) -> Self {
        self.config.developer_nif = Some(nif.into());
        self
    }

    /// Add a combining mark to the normalization allow-list.
    pub fn preserve_mark(mut self, mark: char) -> Self {
        if !self.config.preserved_marks.contains(&mark) {
            self.config.preserved_marks.push(mark);
        }
        self
    }

    pub fn build(self) -> AeatConfig {
        self.config
    }
}
