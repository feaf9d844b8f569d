//! Structured error types for the rules engine.
//!
//! Domain rejections and infrastructure failures are distinct kinds so the
//! boundary layer can map them to different response semantics. None are
//! fatal; every domain error is a rejected operation, not a crash.

use thiserror::Error;

/// A rejected operation. Each variant carries a stable machine code
/// (`code()`) and a human-readable message (`Display`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
  #[error("Incident date cannot be in the future.")]
  FutureDate,

  #[error("Incident date cannot be more than {months} months in the past.")]
  DateTooOld { months: u32 },

  #[error("{field} is required and cannot be empty.")]
  EmptyField { field: &'static str },

  #[error("{field} cannot exceed {max} characters.")]
  FieldTooLong { field: &'static str, max: usize },

  #[error("Reported by employee not found.")]
  UnknownReporter,

  #[error("Cannot report incident with inactive employee.")]
  InactiveReporter,

  #[error("Involved employee not found.")]
  UnknownInvolvedEmployee,

  #[error("Cannot involve inactive employee in incident.")]
  InactiveInvolvedEmployee,

  #[error("Safety inspection not found.")]
  UnknownInspection,

  #[error("Duplicate incident detected: same location, description, and date.")]
  DuplicateIncident,

  #[error("High severity fall incidents require corrective action.")]
  MissingCorrectiveAction,

  #[error("Electric shock incidents require investigation notes.")]
  MissingInvestigationNotes,

  #[error("Employee involved in PPE incident must have recent safety training.")]
  StaleSafetyTraining,

  #[error("Incident not found.")]
  IncidentNotFound,

  #[error("Incident is already resolved.")]
  AlreadyResolved,

  #[error("This incident does not require approval.")]
  ApprovalNotRequired,

  #[error("Incident is not pending approval.")]
  NotPendingApproval,

  #[error("Incident requires manager approval before closing.")]
  ApprovalRequiredBeforeClose,

  #[error("Cannot update a resolved incident.")]
  ResolvedIncidentImmutable,
}

impl DomainError {
  /// Stable machine-distinguishable code for the boundary layer.
  pub fn code(&self) -> &'static str {
    match self {
      Self::FutureDate | Self::DateTooOld { .. } => "invalid_date",
      Self::EmptyField { .. } => "empty_field",
      Self::FieldTooLong { .. } => "field_too_long",
      Self::UnknownReporter => "unknown_reporter",
      Self::InactiveReporter => "inactive_reporter",
      Self::UnknownInvolvedEmployee => "unknown_involved_employee",
      Self::InactiveInvolvedEmployee => "inactive_involved_employee",
      Self::UnknownInspection => "unknown_inspection",
      Self::DuplicateIncident => "duplicate_incident",
      Self::MissingCorrectiveAction => "missing_corrective_action",
      Self::MissingInvestigationNotes => "missing_investigation_notes",
      Self::StaleSafetyTraining => "stale_safety_training",
      Self::IncidentNotFound => "incident_not_found",
      Self::AlreadyResolved => "already_resolved",
      Self::ApprovalNotRequired => "approval_not_required",
      Self::NotPendingApproval => "not_pending_approval",
      Self::ApprovalRequiredBeforeClose => "approval_required_before_close",
      Self::ResolvedIncidentImmutable => "resolved_incident_immutable",
    }
  }
}

/// Infrastructure failure from a collaborator (directory or store
/// unreachable, caller-imposed timeout expired). Never a domain rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(String),
}

/// Top-level error for every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
  #[error("{0}")]
  Domain(#[from] DomainError),

  #[error("infrastructure: {0}")]
  Store(#[from] StoreError),
}

impl EngineError {
  /// Machine code: the domain code, or "infrastructure" for store failures.
  pub fn code(&self) -> &'static str {
    match self {
      Self::Domain(e) => e.code(),
      Self::Store(_) => "infrastructure",
    }
  }
}
