//! Order status transitions.
//!
//! The lifecycle is `pending -> confirmed -> processing -> shipped ->
//! delivered`, with `cancelled` reachable from any state that is not
//! terminal. [`check_transition`] is the only place that decides whether a
//! change is allowed.

use std::str::FromStr;

use crate::entities::order::Status;
use crate::error::{StoreError, StoreResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may be set.
    #[default]
    Permissive,
    /// Only the forward steps of the lifecycle, or cancellation.
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("Invalid transition policy: {}", other)),
        }
    }
}

/// Statuses reachable in one step under the strict lifecycle.
pub fn next_statuses(from: Status) -> &'static [Status] {
    match from {
        Status::Pending => &[Status::Confirmed, Status::Cancelled],
        Status::Confirmed => &[Status::Processing, Status::Cancelled],
        Status::Processing => &[Status::Shipped, Status::Cancelled],
        Status::Shipped => &[Status::Delivered, Status::Cancelled],
        Status::Delivered | Status::Cancelled => &[],
    }
}

pub fn can_transition(policy: TransitionPolicy, from: Status, to: Status) -> bool {
    // Re-applying the current status is a no-op under either policy.
    if from == to {
        return true;
    }
    match policy {
        TransitionPolicy::Permissive => true,
        TransitionPolicy::Strict => next_statuses(from).contains(&to),
    }
}

pub fn check_transition(policy: TransitionPolicy, from: Status, to: Status) -> StoreResult<()> {
    if can_transition(policy, from, to) {
        Ok(())
    } else {
        Err(StoreError::InvalidTransition { from, to })
    }
}
