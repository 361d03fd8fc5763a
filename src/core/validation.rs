use super::config::AeatConfig;
use super::declaration::Declaration303;
use super::error::{AeatError, ValidationError, validation_failure};
use super::types::DeclarationType;

/// Length of an AEAT declaration receipt number.
pub const RECEIPT_LENGTH: usize = 13;

/// Fail unless the company keeps its books in the configured currency.
pub fn check_euro(report: &Declaration303, config: &AeatConfig) -> Result<(), AeatError> {
    if report.currency != config.currency {
        return Err(AeatError::Currency {
            report: report.rec_name(),
            expected: config.currency.clone(),
            found: report.currency.clone(),
        });
    }
    Ok(())
}

/// Check the field rules of a return.
/// Returns all validation errors found (not just the first).
pub fn validate_declaration(report: &Declaration303) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if report.declaration_type == DeclarationType::DirectDebit && report.bank_account.is_none() {
        errors.push(ValidationError::new(
            "bank_account",
            "a bank account is required for direct debit (type U) returns",
        ));
    }

    if report.complementary_declaration {
        match report.previous_declaration_receipt.as_deref().map(str::trim) {
            None | Some("") => errors.push(ValidationError::new(
                "previous_declaration_receipt",
                "complementary declarations require the previous declaration receipt",
            )),
            Some(receipt) if receipt.chars().count() != RECEIPT_LENGTH => {
                errors.push(ValidationError::new(
                    "previous_declaration_receipt",
                    format!("receipt must have {RECEIPT_LENGTH} characters, got '{receipt}'"),
                ))
            }
            Some(_) => {}
        }
    }

    if let Some(vat) = &report.company_vat {
        if vat.chars().count() > 9 {
            errors.push(ValidationError::new(
                "company_vat",
                format!("NIF '{vat}' exceeds 9 characters"),
            ));
        }
    }

    errors
}

/// Full check run before a return is persisted: currency first, then the
/// field rules.
pub fn validate(report: &Declaration303, config: &AeatConfig) -> Result<(), AeatError> {
    check_euro(report, config)?;
    let errors = validate_declaration(report);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_failure(&errors))
    }
}
