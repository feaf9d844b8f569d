//! Lifecycle transitions and their guards.
//!
//! Reported -> PendingApproval -> Approved -> Closed. Guards block illegal
//! transitions; nothing here deletes an incident. Safety review has no
//! independent gate on Close: the approval gate is the only close guard,
//! review is informational.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::types::{Incident, IncidentStatus};

/// Approve a pending incident. Legal only when approval is required and the
/// incident is currently PendingApproval.
pub fn approve(
  incident: &mut Incident,
  approver: &str,
  now: DateTime<Utc>,
) -> Result<(), DomainError> {
  if !incident.requires_manager_approval {
    return Err(DomainError::ApprovalNotRequired);
  }
  if incident.status != IncidentStatus::PendingApproval {
    return Err(DomainError::NotPendingApproval);
  }

  incident.status = IncidentStatus::Approved;
  incident.manager_approval_date = Some(now);
  incident.manager_approved_by = Some(approver.to_string());
  Ok(())
}

/// Close an incident. Legal only when not already resolved and, if approval
/// is required, already Approved.
pub fn close(incident: &mut Incident, now: DateTime<Utc>) -> Result<(), DomainError> {
  if incident.is_resolved {
    return Err(DomainError::AlreadyResolved);
  }
  if incident.requires_manager_approval && incident.status != IncidentStatus::Approved {
    return Err(DomainError::ApprovalRequiredBeforeClose);
  }

  incident.is_resolved = true;
  incident.resolved_date = Some(now);
  incident.status = IncidentStatus::Closed;
  Ok(())
}

/// Guard for update: a resolved incident is immutable except for its
/// resolution metadata.
pub fn ensure_mutable(incident: &Incident) -> Result<(), DomainError> {
  if incident.is_resolved {
    return Err(DomainError::ResolvedIncidentImmutable);
  }
  Ok(())
}
