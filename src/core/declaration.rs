use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{self, DerivedTotals};
use super::error::AeatError;
use super::fields::DeclarationField;
use super::state::ReportState;
use super::types::*;

/// Decimal values of the declaration boxes, keyed by field.
///
/// Boxes that were never set read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amounts(BTreeMap<DeclarationField, Decimal>);

impl Amounts {
    pub fn get(&self, field: DeclarationField) -> Decimal {
        self.0.get(&field).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn set(&mut self, field: DeclarationField, value: Decimal) {
        self.0.insert(field, value);
    }

    /// Add `value` to the current value of `field`.
    pub fn add(&mut self, field: DeclarationField, value: Decimal) -> Result<(), AeatError> {
        let total = self
            .get(field)
            .checked_add(value)
            .ok_or_else(|| AeatError::Arithmetic(field.to_string()))?;
        self.set(field, total);
        Ok(())
    }

    /// Sum of the given fields, `None` on overflow.
    pub fn sum(&self, fields: &[DeclarationField]) -> Option<Decimal> {
        fields
            .iter()
            .try_fold(Decimal::ZERO, |acc, f| acc.checked_add(self.get(*f)))
    }

    /// Explicitly set fields, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclarationField, Decimal)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }
}

/// A model 303 return: every declaration box plus lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration303 {
    pub company_name: String,
    /// Declarant NIF, without country prefix.
    pub company_vat: Option<String>,
    /// Accounting currency of the company (must be the euro).
    pub currency: String,
    pub fiscalyear_code: i32,
    pub period: PeriodCode,
    pub declaration_type: DeclarationType,
    pub regime_type: RegimeType,
    pub monthly_return_subscription: bool,
    pub joint_liquidation: bool,
    /// Special cash criteria.
    pub recc: bool,
    pub recc_receiver: bool,
    pub special_prorate: bool,
    pub special_prorate_revocation: bool,
    pub without_activity: bool,
    pub complementary_declaration: bool,
    /// Receipt number of the declaration being complemented (13 chars).
    pub previous_declaration_receipt: Option<String>,
    /// Exempt from filing the annual model 390 (last period only).
    pub exonerated_mod390: FormAnswer,
    pub passive_subject_foral_administration: FormAnswer,
    pub taken_vat_book_to_aeat: FormAnswer,
    pub auto_bankruptcy_declaration: AutoBankruptcy,
    pub auto_bankruptcy_date: Option<NaiveDate>,
    pub bank_account: Option<BankAccount>,
    pub amounts: Amounts,
    pub calculation_date: Option<DateTime<Utc>>,
    pub state: ReportState,
    /// Generated AEAT file, present once the return is done.
    pub file: Option<Vec<u8>>,
}

impl Declaration303 {
    pub fn amount(&self, field: DeclarationField) -> Decimal {
        self.amounts.get(field)
    }

    pub fn set_amount(&mut self, field: DeclarationField, value: Decimal) {
        self.amounts.set(field, value);
    }

    /// Derived boxes computed from the current amounts.
    pub fn totals(&self) -> Result<DerivedTotals, AeatError> {
        calculator::compute_totals(&self.amounts)
    }

    /// Whether the bankruptcy flag of the main record is set.
    pub fn bankruptcy(&self) -> bool {
        self.auto_bankruptcy_declaration.is_declared()
    }

    /// Name of the generated file: `aeat<model>-<year>-<period>.txt`.
    pub fn filename(&self, model: &str) -> String {
        format!("aeat{model}-{}-{}.txt", self.fiscalyear_code, self.period.code())
    }

    /// Short human identifier used in messages, e.g. "2021-2T".
    pub fn rec_name(&self) -> String {
        format!("{}-{}", self.fiscalyear_code, self.period.code())
    }
}
