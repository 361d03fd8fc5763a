//! Liquidation arithmetic of the model 303 return.
//!
//! All derived boxes are exact decimal arithmetic over the input boxes;
//! unset inputs count as zero. Rounding to two decimals happens only when
//! a value is written to the AEAT file.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::AeatConfig;
use super::declaration::{Amounts, Declaration303};
use super::error::AeatError;
use super::fields::{DeclarationField, DerivedField};
use super::state::ReportState;
use super::validation;

use DeclarationField::*;

/// Boxes summed into [`DerivedField::AccruedTotalTax`].
pub const ACCRUED_TAX_FIELDS: &[DeclarationField] = &[
    AccruedVatTax1,
    AccruedVatTax2,
    AccruedVatTax3,
    IntracommunityAdquisitionsTax,
    OtherPassiveSubjectTax,
    AccruedVatTaxModification,
    AccruedReTax1,
    AccruedReTax2,
    AccruedReTax3,
    AccruedReTaxModification,
];

/// Boxes summed into [`DerivedField::DeductibleTotal`].
pub const DEDUCTIBLE_FIELDS: &[DeclarationField] = &[
    DeductibleCurrentDomesticOperationsTax,
    DeductibleInvestmentDomesticOperationsTax,
    DeductibleCurrentImportOperationsTax,
    DeductibleInvestmentImportOperationsTax,
    DeductibleCurrentIntracommunityOperationsTax,
    DeductibleInvestmentIntracommunityOperationsTax,
    DeductibleRegularizationTax,
    DeductibleCompensations,
    DeductibleInvestmentRegularization,
    DeductibleProRataRegularization,
];

/// Derived boxes of the return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedTotals {
    pub accrued_total_tax: Decimal,
    pub deductible_total: Decimal,
    /// accrued_total_tax - deductible_total.
    pub general_regime_result: Decimal,
    /// general_regime_result + result_tax_regularitzation.
    pub sum_results: Decimal,
    /// sum_results * state_administration_percent / 100.
    pub state_administration_amount: Decimal,
    pub result: Decimal,
    /// result - to_deduce.
    pub liquidation_result: Decimal,
}

impl DerivedTotals {
    pub fn get(&self, field: DerivedField) -> Decimal {
        match field {
            DerivedField::AccruedTotalTax => self.accrued_total_tax,
            DerivedField::DeductibleTotal => self.deductible_total,
            DerivedField::GeneralRegimeResult => self.general_regime_result,
            DerivedField::SumResults => self.sum_results,
            DerivedField::StateAdministrationAmount => self.state_administration_amount,
            DerivedField::Result => self.result,
            DerivedField::LiquidationResult => self.liquidation_result,
        }
    }
}

/// Compute every derived box from the input boxes.
///
/// Fails with [`AeatError::Arithmetic`] naming the first derived box that
/// leaves the decimal range.
pub fn compute_totals(amounts: &Amounts) -> Result<DerivedTotals, AeatError> {
    let overflow = |field: DerivedField| AeatError::Arithmetic(field.to_string());

    let accrued_total_tax = amounts
        .sum(ACCRUED_TAX_FIELDS)
        .ok_or_else(|| overflow(DerivedField::AccruedTotalTax))?;
    let deductible_total = amounts
        .sum(DEDUCTIBLE_FIELDS)
        .ok_or_else(|| overflow(DerivedField::DeductibleTotal))?;
    let general_regime_result = accrued_total_tax
        .checked_sub(deductible_total)
        .ok_or_else(|| overflow(DerivedField::GeneralRegimeResult))?;
    // Box 64 = 46 + 58 + 76; the simplified regime (58) is not supported.
    let sum_results = general_regime_result
        .checked_add(amounts.get(ResultTaxRegularitzation))
        .ok_or_else(|| overflow(DerivedField::SumResults))?;
    // Box 66 = 64 * 65 / 100
    let state_administration_amount = sum_results
        .checked_mul(amounts.get(StateAdministrationPercent))
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow(DerivedField::StateAdministrationAmount))?;
    let result = state_administration_amount
        .checked_add(amounts.get(AduanaTaxPending))
        .and_then(|v| v.checked_sub(amounts.get(PreviousPeriodAmountToCompensate)))
        .and_then(|v| v.checked_add(amounts.get(JointTaxationStateProvincialCouncils)))
        .ok_or_else(|| overflow(DerivedField::Result))?;
    let liquidation_result = result
        .checked_sub(amounts.get(ToDeduce))
        .ok_or_else(|| overflow(DerivedField::LiquidationResult))?;

    Ok(DerivedTotals {
        accrued_total_tax,
        deductible_total,
        general_regime_result,
        sum_results,
        state_administration_amount,
        result,
        liquidation_result,
    })
}

/// Finish the calculation of a return whose boxes have been resolved:
/// validates the return, stamps the calculation date and moves it from
/// draft to calculated.
///
/// Nothing is modified when an error is returned.
pub fn calculate(
    report: &mut Declaration303,
    config: &AeatConfig,
    now: DateTime<Utc>,
) -> Result<DerivedTotals, AeatError> {
    let next = report.state.transition(ReportState::Calculated)?;
    validation::check_euro(report, config)?;

    let totals = report.totals()?;
    report.calculation_date = Some(now);
    report.state = next;

    tracing::info!(
        report = %report.rec_name(),
        liquidation_result = %totals.liquidation_result,
        "AEAT 303 calculated"
    );
    Ok(totals)
}
