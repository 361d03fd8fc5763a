//! Seam to the accounting subsystem: tax codes and their balances.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AeatError, PeriodId};

/// Identifier of a tax code (or of a tax code template).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxCodeId(pub String);

impl TaxCodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TaxCodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaxCodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Source of tax code balances.
pub trait TaxCodeLedger {
    /// Accumulated balance of `code` over the given accounting sub-periods.
    fn balance(&self, code: &TaxCodeId, periods: &[PeriodId]) -> Result<Decimal, AeatError>;
}

/// Ledger kept in memory, as the movements booked per (tax code, sub-period).
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    entries: BTreeMap<(TaxCodeId, PeriodId), Vec<Decimal>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book `amount` on `code` in `period`.
    pub fn record(&mut self, code: impl Into<TaxCodeId>, period: PeriodId, amount: Decimal) {
        self.entries
            .entry((code.into(), period))
            .or_default()
            .push(amount);
    }

    /// Builder-style [`record`](Self::record).
    pub fn with(mut self, code: impl Into<TaxCodeId>, period: PeriodId, amount: Decimal) -> Self {
        self.record(code, period, amount);
        self
    }
}

impl TaxCodeLedger for InMemoryLedger {
    fn balance(&self, code: &TaxCodeId, periods: &[PeriodId]) -> Result<Decimal, AeatError> {
        periods
            .iter()
            .filter_map(|p| self.entries.get(&(code.clone(), *p)))
            .flatten()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
            .ok_or_else(|| AeatError::Arithmetic(format!("balance of tax code {code}")))
    }
}

/// A tax code of a company's chart, with the template it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTaxCode {
    pub id: TaxCodeId,
    pub template: Option<TaxCodeId>,
}

impl ChartTaxCode {
    pub fn new(id: impl Into<TaxCodeId>, template: impl Into<TaxCodeId>) -> Self {
        Self {
            id: id.into(),
            template: Some(template.into()),
        }
    }
}

/// A company chart of tax codes, searchable by template.
pub trait TaxCodeChart {
    /// Company tax codes created from any of the given templates.
    fn codes_for_templates(&self, templates: &BTreeSet<TaxCodeId>) -> BTreeSet<TaxCodeId>;
}

impl TaxCodeChart for [ChartTaxCode] {
    fn codes_for_templates(&self, templates: &BTreeSet<TaxCodeId>) -> BTreeSet<TaxCodeId> {
        self.iter()
            .filter(|c| c.template.as_ref().is_some_and(|t| templates.contains(t)))
            .map(|c| c.id.clone())
            .collect()
    }
}

impl TaxCodeChart for Vec<ChartTaxCode> {
    fn codes_for_templates(&self, templates: &BTreeSet<TaxCodeId>) -> BTreeSet<TaxCodeId> {
        self.as_slice().codes_for_templates(templates)
    }
}
