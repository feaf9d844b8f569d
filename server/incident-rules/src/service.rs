//! Service orchestrating the rule engine, lifecycle guards, and stores.
//!
//! Synchronous, single-request logic: each operation reads current state,
//! applies guards, computes new state, writes it back. Serializing
//! concurrent mutations of one incident id is the store's responsibility.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::classify;
use crate::config::Config;
use crate::error::{DomainError, EngineError};
use crate::lifecycle;
use crate::store::{EmployeeDirectory, IncidentStore};
use crate::types::{
  CreateIncidentRequest, Incident, IncidentDetail, Severity, UpdateIncidentRequest,
};
use crate::validate;

pub struct IncidentService {
  directory: Arc<dyn EmployeeDirectory>,
  store: Arc<dyn IncidentStore>,
  config: Config,
}

impl IncidentService {
  pub fn new(
    directory: Arc<dyn EmployeeDirectory>,
    store: Arc<dyn IncidentStore>,
    config: Config,
  ) -> Self {
    Self { directory, store, config }
  }

  pub fn with_default_config(
    directory: Arc<dyn EmployeeDirectory>,
    store: Arc<dyn IncidentStore>,
  ) -> Self {
    Self::new(directory, store, Config::default())
  }

  /// Validate a creation request, build the aggregate, classify it, and
  /// persist it.
  pub fn create(&self, request: &CreateIncidentRequest) -> Result<Incident, EngineError> {
    let now = Utc::now();
    validate::validate_creation(request, &*self.directory, &*self.store, &self.config, now)?;

    let mut incident = Incident::from_request(request);
    classify::apply(&mut incident, &self.config);

    self.store.insert(incident.clone())?;
    info!(
      incident = %incident.id,
      status = ?incident.status,
      approval = incident.requires_manager_approval,
      review = incident.requires_safety_review,
      "incident created"
    );
    Ok(incident)
  }

  /// Apply a partial update to a non-resolved incident. Classification
  /// re-runs only when severity is part of the change set.
  pub fn update(
    &self,
    id: Uuid,
    request: &UpdateIncidentRequest,
  ) -> Result<Incident, EngineError> {
    let mut incident = self.load(id)?;
    lifecycle::ensure_mutable(&incident)?;
    validate::validate_update(request, &*self.directory, &*self.store, &self.config)?;

    let severity_changed = apply_update(&mut incident, request);
    if severity_changed {
      classify::apply(&mut incident, &self.config);
    }

    self.store.update(&incident)?;
    info!(incident = %incident.id, reclassified = severity_changed, "incident updated");
    Ok(incident)
  }

  /// Record manager approval on a pending incident.
  pub fn approve(&self, id: Uuid, approver: &str) -> Result<Incident, EngineError> {
    let mut incident = self.load(id)?;
    lifecycle::approve(&mut incident, approver, Utc::now())?;
    self.store.update(&incident)?;
    info!(incident = %incident.id, approver, "incident approved");
    Ok(incident)
  }

  /// Resolve and close an incident once its gates are satisfied.
  pub fn close(&self, id: Uuid) -> Result<Incident, EngineError> {
    let mut incident = self.load(id)?;
    lifecycle::close(&mut incident, Utc::now())?;
    self.store.update(&incident)?;
    info!(incident = %incident.id, "incident closed");
    Ok(incident)
  }

  pub fn get(&self, id: Uuid) -> Result<Incident, EngineError> {
    self.load(id)
  }

  /// Incident with employee relationships resolved through the directory.
  pub fn get_detailed(&self, id: Uuid) -> Result<IncidentDetail, EngineError> {
    let incident = self.load(id)?;
    let reported_by_employee = self
      .directory
      .find(incident.reported_by)?
      .ok_or(DomainError::UnknownReporter)?;
    let involved_employee_record = match incident.involved_employee {
      Some(involved) => Some(
        self
          .directory
          .find(involved)?
          .ok_or(DomainError::UnknownInvolvedEmployee)?,
      ),
      None => None,
    };
    Ok(IncidentDetail {
      incident,
      reported_by_employee,
      involved_employee_record,
    })
  }

  pub fn by_severity(&self, severity: Severity) -> Result<Vec<Incident>, EngineError> {
    Ok(self.store.find_by_severity(severity)?)
  }

  pub fn pending_approval(&self) -> Result<Vec<Incident>, EngineError> {
    Ok(self.store.find_pending_approval()?)
  }

  /// Severity High, or estimated cost above the review threshold.
  pub fn high_risk(&self) -> Result<Vec<Incident>, EngineError> {
    Ok(self.store.find_high_risk(self.config.review_cost_threshold)?)
  }

  pub fn recent(&self, limit: usize) -> Result<Vec<Incident>, EngineError> {
    Ok(self.store.find_recent(limit)?)
  }

  pub fn by_employee(&self, employee_id: Uuid) -> Result<Vec<Incident>, EngineError> {
    Ok(self.store.find_by_employee(employee_id)?)
  }

  fn load(&self, id: Uuid) -> Result<Incident, EngineError> {
    self
      .store
      .find(id)?
      .ok_or_else(|| DomainError::IncidentNotFound.into())
  }
}

fn apply_update(incident: &mut Incident, request: &UpdateIncidentRequest) -> bool {
  let severity_changed = request.severity.is_some();

  if let Some(location) = &request.location {
    incident.location = location.clone();
  }
  if let Some(description) = &request.description {
    incident.description = description.clone();
  }
  if let Some(incident_type) = request.incident_type {
    incident.incident_type = incident_type;
  }
  if let Some(severity) = request.severity {
    incident.severity = severity;
  }
  if let Some(involved) = request.involved_employee {
    incident.involved_employee = Some(involved);
  }
  if let Some(inspection) = request.safety_inspection {
    incident.safety_inspection = Some(inspection);
  }
  if let Some(corrective_action) = &request.corrective_action {
    incident.corrective_action = Some(corrective_action.clone());
  }
  if let Some(notes) = &request.investigation_notes {
    incident.investigation_notes = Some(notes.clone());
  }
  if let Some(witnesses) = &request.witnesses {
    incident.witnesses = Some(witnesses.clone());
  }
  if let Some(cost) = request.estimated_cost {
    incident.estimated_cost = cost;
  }
  if let Some(near_miss) = request.is_near_miss {
    incident.is_near_miss = near_miss;
  }

  severity_changed
}
