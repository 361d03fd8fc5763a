use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{AeatConfig, AeatError, Declaration303, ReportState, validate};

/// Identifier of a stored return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub u64);

/// In-memory store of returns.
///
/// Every write validates the return first (currency and field rules), so
/// the store never holds a return that would fail validation. A done return
/// keeps its boxes and file; the only write it accepts is its cancellation.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    config: AeatConfig,
    reports: BTreeMap<ReportId, Declaration303>,
    next_id: u64,
}

impl ReportStore {
    pub fn new(config: AeatConfig) -> Self {
        Self {
            config,
            reports: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &AeatConfig {
        &self.config
    }

    /// Validate and store a new return.
    pub fn insert(&mut self, report: Declaration303) -> Result<ReportId, AeatError> {
        validate(&report, &self.config)?;
        let id = ReportId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.reports.insert(id, report);
        Ok(id)
    }

    pub fn get(&self, id: ReportId) -> Option<&Declaration303> {
        self.reports.get(&id)
    }

    pub fn list(&self) -> impl Iterator<Item = (ReportId, &Declaration303)> {
        self.reports.iter().map(|(id, r)| (*id, r))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Run `f` on a copy of the stored return and keep the copy only if `f`
    /// succeeds and the result validates.
    ///
    /// Fails with [`AeatError::Locked`] when `f` changes a done return in any
    /// way other than cancelling it.
    pub fn try_update<R>(
        &mut self,
        id: ReportId,
        f: impl FnOnce(&mut Declaration303, &AeatConfig) -> Result<R, AeatError>,
    ) -> Result<R, AeatError> {
        let current = self.reports.get(&id).ok_or(AeatError::NotFound(id.0))?;
        let mut next = current.clone();
        let out = f(&mut next, &self.config)?;
        if current.state == ReportState::Done && !is_cancellation_of(&next, current) {
            return Err(AeatError::Locked(current.rec_name()));
        }
        validate(&next, &self.config)?;
        self.reports.insert(id, next);
        Ok(out)
    }
}

/// `next` is `current` unchanged, or `current` with only its state moved to
/// cancelled.
fn is_cancellation_of(next: &Declaration303, current: &Declaration303) -> bool {
    if next == current {
        return true;
    }
    let mut cancelled = current.clone();
    cancelled.state = ReportState::Cancelled;
    *next == cancelled
}
