//! Core types for the incident rules engine (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
  Fall,
  ElectricShock,
  ImproperUseOfPpe,
  Collision,
  Other,
}

/// Ordinal risk classification driving approval/review requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
}

/// Lifecycle states. UnderInvestigation and RequiresFollowUp exist in the
/// model but are not reachable by any modeled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
  Reported,
  PendingApproval,
  Approved,
  Closed,
  UnderInvestigation,
  RequiresFollowUp,
}

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// A full incident report submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncidentRequest {
  pub date: DateTime<Utc>,
  pub location: String,
  pub description: String,
  pub incident_type: IncidentType,
  pub severity: Severity,
  pub reported_by: Uuid,
  #[serde(default)]
  pub involved_employee: Option<Uuid>,
  #[serde(default)]
  pub safety_inspection: Option<Uuid>,
  #[serde(default)]
  pub corrective_action: Option<String>,
  #[serde(default)]
  pub investigation_notes: Option<String>,
  #[serde(default)]
  pub witnesses: Option<String>,
  #[serde(default)]
  pub estimated_cost: u32,
  #[serde(default)]
  pub is_near_miss: bool,
}

/// Partial update: only supplied fields change. Managed fields (status,
/// flags, resolution metadata) are never caller-settable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIncidentRequest {
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub incident_type: Option<IncidentType>,
  #[serde(default)]
  pub severity: Option<Severity>,
  #[serde(default)]
  pub involved_employee: Option<Uuid>,
  #[serde(default)]
  pub safety_inspection: Option<Uuid>,
  #[serde(default)]
  pub corrective_action: Option<String>,
  #[serde(default)]
  pub investigation_notes: Option<String>,
  #[serde(default)]
  pub witnesses: Option<String>,
  #[serde(default)]
  pub estimated_cost: Option<u32>,
  #[serde(default)]
  pub is_near_miss: Option<bool>,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// The incident aggregate. Relationships are plain foreign-key ids; the
/// employee directory resolves them to full records on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
  pub id: Uuid,
  pub date: DateTime<Utc>,
  pub location: String,
  pub description: String,
  pub incident_type: IncidentType,
  pub severity: Severity,
  pub reported_by: Uuid,
  pub involved_employee: Option<Uuid>,
  pub safety_inspection: Option<Uuid>,
  pub corrective_action: Option<String>,
  pub investigation_notes: Option<String>,
  pub witnesses: Option<String>,
  pub estimated_cost: u32,
  pub is_near_miss: bool,
  pub status: IncidentStatus,
  pub requires_manager_approval: bool,
  pub requires_safety_review: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manager_approval_date: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manager_approved_by: Option<String>,
  pub is_resolved: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resolved_date: Option<DateTime<Utc>>,
}

impl Incident {
  /// Build a fresh aggregate from a validated request. Flags and status
  /// carry placeholder values until classification runs.
  pub fn from_request(request: &CreateIncidentRequest) -> Self {
    Self {
      id: Uuid::new_v4(),
      date: request.date,
      location: request.location.clone(),
      description: request.description.clone(),
      incident_type: request.incident_type,
      severity: request.severity,
      reported_by: request.reported_by,
      involved_employee: request.involved_employee,
      safety_inspection: request.safety_inspection,
      corrective_action: request.corrective_action.clone(),
      investigation_notes: request.investigation_notes.clone(),
      witnesses: request.witnesses.clone(),
      estimated_cost: request.estimated_cost,
      is_near_miss: request.is_near_miss,
      status: IncidentStatus::Reported,
      requires_manager_approval: false,
      requires_safety_review: false,
      manager_approval_date: None,
      manager_approved_by: None,
      is_resolved: false,
      resolved_date: None,
    }
  }
}

// ---------------------------------------------------------------------------
// Employee (external, read-only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
  pub id: Uuid,
  pub name: String,
  pub is_active: bool,
  #[serde(default)]
  pub last_safety_training: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Duplicate probe
// ---------------------------------------------------------------------------

/// Key for the duplicate-submission guard: same reporter, location,
/// description, and calendar date (UTC, time-of-day ignored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateProbe {
  pub reported_by: Uuid,
  pub location: String,
  pub description: String,
  pub date: chrono::NaiveDate,
}

impl DuplicateProbe {
  pub fn from_request(request: &CreateIncidentRequest) -> Self {
    Self {
      reported_by: request.reported_by,
      location: request.location.clone(),
      description: request.description.clone(),
      date: request.date.date_naive(),
    }
  }

  /// Whether a stored incident collides with this probe.
  pub fn matches(&self, incident: &Incident) -> bool {
    incident.reported_by == self.reported_by
      && incident.location == self.location
      && incident.description == self.description
      && incident.date.date_naive() == self.date
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

/// Incident with its employee relationships resolved through the directory.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentDetail {
  #[serde(flatten)]
  pub incident: Incident,
  pub reported_by_employee: Employee,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub involved_employee_record: Option<Employee>,
}

/// Structured error output for rejected CLI commands.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub code: String,
  pub message: String,
}

impl ErrorOutput {
  pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      error: true,
      code: code.into(),
      message: message.into(),
    }
  }
}
