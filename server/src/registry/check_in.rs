//! Pending → checked-in transition for a single guest.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Guest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInState {
    Pending,
    CheckedIn { at: DateTime<Utc> },
}

impl CheckInState {
    pub fn of(guest: &Guest) -> Self {
        match guest.checked_in_at {
            Some(at) if guest.checked_in => CheckInState::CheckedIn { at },
            _ => CheckInState::Pending,
        }
    }
}

/// What the registry should do with a check-in request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Write `checked_in = true, checked_in_at = at`.
    Apply { at: DateTime<Utc> },
    /// Terminal state; leave the record alone.
    AlreadyDone { at: DateTime<Utc> },
}

pub fn transition(state: CheckInState, now: DateTime<Utc>) -> Transition {
    match state {
        CheckInState::Pending => Transition::Apply { at: now },
        CheckInState::CheckedIn { at } => Transition::AlreadyDone { at },
    }
}

/// Result of a check-in request. Both variants are successes: scanning the
/// same code twice at a busy door is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "guest", rename_all = "snake_case")]
pub enum CheckInOutcome {
    CheckedIn(Guest),
    AlreadyCheckedIn(Guest),
}

impl CheckInOutcome {
    pub fn guest(&self) -> &Guest {
        match self {
            CheckInOutcome::CheckedIn(guest) | CheckInOutcome::AlreadyCheckedIn(guest) => guest,
        }
    }

    pub fn into_guest(self) -> Guest {
        match self {
            CheckInOutcome::CheckedIn(guest) | CheckInOutcome::AlreadyCheckedIn(guest) => guest,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, CheckInOutcome::CheckedIn(_))
    }

    pub fn message(&self) -> String {
        match self {
            CheckInOutcome::CheckedIn(guest) => format!("{} checked in successfully", guest.name),
            CheckInOutcome::AlreadyCheckedIn(guest) => {
                format!("{} has already checked in", guest.name)
            }
        }
    }
}
