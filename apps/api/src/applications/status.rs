//! Application status workflow.
//!
//! ```text
//! SUBMITTED ──► UNDER_REVIEW ──► INTERVIEW ──► ACCEPTED
//!     │               │              │
//!     └───────────────┴──────────────┴──────► REJECTED
//! ```
//!
//! ACCEPTED, REJECTED and WITHDRAWN are terminal. Withdrawal is not an edge of
//! the table above: it is reachable from any non-terminal status and only
//! through `plan_withdrawal`.

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    /// Statuses reachable through a general status update.
    pub fn allowed_targets(self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Submitted => &[UnderReview, Rejected],
            UnderReview => &[Interview, Rejected],
            Interview => &[Accepted, Rejected],
            Accepted | Rejected | Withdrawn => &[],
        }
    }

    pub fn can_transition_to(self, target: ApplicationStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

/// Outcome of a permitted status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Already in the requested status; nothing to write.
    Unchanged,
    Changed {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}

impl StatusChange {
    /// The status to persist, if any.
    pub fn target(self) -> Option<ApplicationStatus> {
        match self {
            StatusChange::Unchanged => None,
            StatusChange::Changed { to, .. } => Some(to),
        }
    }
}

/// Checks a general status update against the transition table.
pub fn plan_transition(
    current: ApplicationStatus,
    target: ApplicationStatus,
) -> Result<StatusChange, AppError> {
    if current == target {
        return Ok(StatusChange::Unchanged);
    }
    if current.can_transition_to(target) {
        Ok(StatusChange::Changed {
            from: current,
            to: target,
        })
    } else {
        Err(AppError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

/// Checks a withdrawal. Idempotent on WITHDRAWN; refused from ACCEPTED/REJECTED.
pub fn plan_withdrawal(current: ApplicationStatus) -> Result<StatusChange, AppError> {
    match current {
        ApplicationStatus::Withdrawn => Ok(StatusChange::Unchanged),
        status if status.is_terminal() => Err(AppError::InvalidTransition {
            from: status,
            to: ApplicationStatus::Withdrawn,
        }),
        status => Ok(StatusChange::Changed {
            from: status,
            to: ApplicationStatus::Withdrawn,
        }),
    }
}
