//! Report lifecycle.
//!
//! ```text
//! Draft ──▶ Calculated ──▶ Done
//!   ▲  ◀──────┘  │           │
//!   │            ▼           │
//!   └──────── Cancelled ◀────┘
//! ```
//!
//! Every requested transition is checked against [`TRANSITIONS`].

use serde::{Deserialize, Serialize};

use super::error::AeatError;

/// Lifecycle state of a model 303 return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    #[default]
    Draft,
    Calculated,
    Done,
    Cancelled,
}

impl ReportState {
    /// Whether the state can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        self.can_transition(ReportState::Cancelled)
    }

    /// Whether `self -> to` is in the transition table.
    pub fn can_transition(&self, to: ReportState) -> bool {
        TRANSITIONS.contains(&(*self, to))
    }

    /// Validate `self -> to`, returning the target state.
    pub fn transition(&self, to: ReportState) -> Result<ReportState, AeatError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(AeatError::InvalidTransition { from: *self, to })
        }
    }
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Calculated => "calculated",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Allowed `(from, to)` pairs.
pub const TRANSITIONS: &[(ReportState, ReportState)] = &[
    (ReportState::Draft, ReportState::Calculated),
    (ReportState::Draft, ReportState::Cancelled),
    (ReportState::Calculated, ReportState::Draft),
    (ReportState::Calculated, ReportState::Done),
    (ReportState::Calculated, ReportState::Cancelled),
    (ReportState::Done, ReportState::Cancelled),
    (ReportState::Cancelled, ReportState::Draft),
];
