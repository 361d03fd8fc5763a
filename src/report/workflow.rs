use chrono::{DateTime, Utc};

use crate::core::{
    AeatConfig, AeatError, Declaration303, DerivedTotals, FiscalYear, ReportState, TaxPeriodWindow,
    calculator, validate,
};
use crate::mapping::{FieldMapping, TaxCodeLedger, resolve};
use crate::record::encode;

/// Resolve the mapped boxes of `report` for its period and run the
/// calculation, moving the report from draft to calculated.
///
/// Every code-mapped box is recomputed from the ledger; boxes without a
/// mapping keep their current value. On error the report is left as it
/// was.
pub fn calculate<'a, I, L>(
    report: &mut Declaration303,
    fiscal_year: &FiscalYear,
    mappings: I,
    ledger: &L,
    config: &AeatConfig,
    now: DateTime<Utc>,
) -> Result<DerivedTotals, AeatError>
where
    I: IntoIterator<Item = &'a FieldMapping>,
    L: TaxCodeLedger + ?Sized,
{
    report.state.transition(ReportState::Calculated)?;
    if report.fiscalyear_code != fiscal_year.code() {
        return Err(AeatError::Period(format!(
            "report {} does not belong to fiscal year {}",
            report.rec_name(),
            fiscal_year.code()
        )));
    }

    let window = TaxPeriodWindow::resolve(report.period, fiscal_year)?;
    let resolved = resolve(&window, mappings, ledger)?;

    let mut next = report.clone();
    resolved.apply_to(&mut next.amounts);
    let totals = calculator::calculate(&mut next, config, now)?;
    *report = next;
    Ok(totals)
}

/// Validate a calculated report, generate its file and mark it done.
pub fn process(report: &mut Declaration303, config: &AeatConfig) -> Result<(), AeatError> {
    let next = report.state.transition(ReportState::Done)?;
    validate(report, config)?;
    let file = encode(report, config)?;

    tracing::info!(
        report = %report.rec_name(),
        filename = %report.filename(&config.model),
        bytes = file.len(),
        "AEAT 303 processed"
    );
    report.file = Some(file);
    report.state = next;
    Ok(())
}

pub fn cancel(report: &mut Declaration303) -> Result<(), AeatError> {
    report.state = report.state.transition(ReportState::Cancelled)?;
    tracing::info!(report = %report.rec_name(), "AEAT 303 cancelled");
    Ok(())
}

/// Reopen a calculated or cancelled report.
pub fn draft(report: &mut Declaration303) -> Result<(), AeatError> {
    report.state = report.state.transition(ReportState::Draft)?;
    tracing::info!(report = %report.rec_name(), "AEAT 303 back to draft");
    Ok(())
}
