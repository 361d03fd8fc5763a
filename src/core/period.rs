use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::AeatError;
use super::types::PeriodCode;

/// Identifier of an accounting sub-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub u32);

/// An accounting sub-period (usually a month) of a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    pub id: PeriodId,
    pub start: NaiveDate,
    /// Inclusive end date.
    pub end: NaiveDate,
}

/// Fiscal year with its accounting sub-periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub periods: Vec<AccountingPeriod>,
}

impl FiscalYear {
    /// Twelve monthly periods starting at `start`, numbered from 1.
    pub fn monthly(start: NaiveDate) -> Result<Self, AeatError> {
        let mut periods = Vec::with_capacity(12);
        let mut period_start = start;
        for i in 1..=12u32 {
            let next = period_start
                .checked_add_months(Months::new(1))
                .ok_or_else(|| AeatError::Period(format!("date overflow after {period_start}")))?;
            let period_end = next
                .pred_opt()
                .ok_or_else(|| AeatError::Period(format!("date underflow before {next}")))?;
            periods.push(AccountingPeriod {
                id: PeriodId(i),
                start: period_start,
                end: period_end,
            });
            period_start = next;
        }
        let end = periods.last().map(|p| p.end).unwrap_or(start);
        Ok(Self { start, end, periods })
    }

    /// Fiscal year code as declared: the calendar year it starts in.
    pub fn code(&self) -> i32 {
        self.start.year()
    }
}

/// The concrete date range and accounting sub-periods a declared period
/// covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPeriodWindow {
    pub period: PeriodCode,
    pub year: i32,
    pub start_month: u32,
    pub end_month: u32,
    /// First day of `start_month`.
    pub start: NaiveDate,
    /// Last day of `end_month`.
    pub end: NaiveDate,
    /// Sub-periods fully contained in `[start, end]`.
    pub periods: Vec<PeriodId>,
}

impl TaxPeriodWindow {
    /// Resolve a declared period against a fiscal year.
    ///
    /// Months are taken in the calendar year the fiscal year starts in.
    /// Only sub-periods whose whole date range falls inside the window are
    /// selected, so balances never leak across declared periods.
    pub fn resolve(period: PeriodCode, fiscal_year: &FiscalYear) -> Result<Self, AeatError> {
        let (start_month, end_month) = period.months();
        let year = fiscal_year.start.year();

        let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(|| {
            AeatError::Period(format!("invalid start of period {period} in {year}"))
        })?;
        let end = last_day_of_month(year, end_month).ok_or_else(|| {
            AeatError::Period(format!("invalid end of period {period} in {year}"))
        })?;

        let periods: Vec<PeriodId> = fiscal_year
            .periods
            .iter()
            .filter(|p| p.start >= start && p.end <= end)
            .map(|p| p.id)
            .collect();

        tracing::debug!(
            period = %period,
            %start,
            %end,
            sub_periods = periods.len(),
            "resolved tax period window"
        );

        Ok(Self {
            period,
            year,
            start_month,
            end_month,
            start,
            end,
            periods,
        })
    }

    /// Day of month of the window end.
    pub fn end_day(&self) -> u32 {
        self.end.day()
    }

    pub fn contains(&self, period: PeriodId) -> bool {
        self.periods.contains(&period)
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
