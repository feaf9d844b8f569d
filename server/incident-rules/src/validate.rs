//! Admissibility checks for incident creation and update.
//!
//! Checks run in a fixed order and the first failure wins: date window,
//! field bounds, employee lookups, inspection link, duplicate guard, then
//! the type-specific gates.

use chrono::{DateTime, Months, Utc};

use crate::config::Config;
use crate::error::{DomainError, EngineError};
use crate::store::{EmployeeDirectory, IncidentStore};
use crate::types::{
  CreateIncidentRequest, DuplicateProbe, IncidentType, Severity, UpdateIncidentRequest,
};

/// Validate a creation request against the directory and store.
pub fn validate_creation(
  request: &CreateIncidentRequest,
  directory: &dyn EmployeeDirectory,
  store: &dyn IncidentStore,
  config: &Config,
  now: DateTime<Utc>,
) -> Result<(), EngineError> {
  check_date_window(request.date, config, now)?;

  require_non_empty("location", &request.location)?;
  check_len("location", &request.location, config.max_location_len)?;
  require_non_empty("description", &request.description)?;
  check_len("description", &request.description, config.max_description_len)?;
  check_opt_len("corrective_action", &request.corrective_action, config.max_note_len)?;
  check_opt_len(
    "investigation_notes",
    &request.investigation_notes,
    config.max_description_len,
  )?;
  check_opt_len("witnesses", &request.witnesses, config.max_note_len)?;

  let reporter = directory
    .find(request.reported_by)?
    .ok_or(DomainError::UnknownReporter)?;
  if !reporter.is_active {
    return Err(DomainError::InactiveReporter.into());
  }

  check_involved_employee(request.involved_employee, directory)?;
  check_inspection(request.safety_inspection, store)?;

  if store.exists_duplicate(&DuplicateProbe::from_request(request))? {
    return Err(DomainError::DuplicateIncident.into());
  }

  check_type_gates(request, directory, config, now)?;

  Ok(())
}

/// Validate a partial update: only supplied fields are re-checked. The date
/// and reporter are immutable after creation.
pub fn validate_update(
  request: &UpdateIncidentRequest,
  directory: &dyn EmployeeDirectory,
  store: &dyn IncidentStore,
  config: &Config,
) -> Result<(), EngineError> {
  if let Some(location) = &request.location {
    require_non_empty("location", location)?;
    check_len("location", location, config.max_location_len)?;
  }
  if let Some(description) = &request.description {
    require_non_empty("description", description)?;
    check_len("description", description, config.max_description_len)?;
  }
  check_opt_len("corrective_action", &request.corrective_action, config.max_note_len)?;
  check_opt_len(
    "investigation_notes",
    &request.investigation_notes,
    config.max_description_len,
  )?;
  check_opt_len("witnesses", &request.witnesses, config.max_note_len)?;

  check_involved_employee(request.involved_employee, directory)?;
  check_inspection(request.safety_inspection, store)?;

  Ok(())
}

fn check_date_window(
  date: DateTime<Utc>,
  config: &Config,
  now: DateTime<Utc>,
) -> Result<(), EngineError> {
  if date > now {
    return Err(DomainError::FutureDate.into());
  }
  let oldest = now - Months::new(config.look_back_months);
  if date < oldest {
    return Err(
      DomainError::DateTooOld {
        months: config.look_back_months,
      }
      .into(),
    );
  }
  Ok(())
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), EngineError> {
  if value.trim().is_empty() {
    return Err(DomainError::EmptyField { field }.into());
  }
  Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), EngineError> {
  if value.chars().count() > max {
    return Err(DomainError::FieldTooLong { field, max }.into());
  }
  Ok(())
}

fn check_opt_len(
  field: &'static str,
  value: &Option<String>,
  max: usize,
) -> Result<(), EngineError> {
  match value {
    Some(v) => check_len(field, v, max),
    None => Ok(()),
  }
}

fn check_involved_employee(
  involved: Option<uuid::Uuid>,
  directory: &dyn EmployeeDirectory,
) -> Result<(), EngineError> {
  if let Some(id) = involved {
    let employee = directory
      .find(id)?
      .ok_or(DomainError::UnknownInvolvedEmployee)?;
    if !employee.is_active {
      return Err(DomainError::InactiveInvolvedEmployee.into());
    }
  }
  Ok(())
}

fn check_inspection(
  inspection: Option<uuid::Uuid>,
  store: &dyn IncidentStore,
) -> Result<(), EngineError> {
  if let Some(id) = inspection {
    if !store.inspection_exists(id)? {
      return Err(DomainError::UnknownInspection.into());
    }
  }
  Ok(())
}

/// Type-specific gates, applied after the generic checks.
fn check_type_gates(
  request: &CreateIncidentRequest,
  directory: &dyn EmployeeDirectory,
  config: &Config,
  now: DateTime<Utc>,
) -> Result<(), EngineError> {
  match request.incident_type {
    IncidentType::Fall => {
      if request.severity == Severity::High && is_blank(&request.corrective_action) {
        return Err(DomainError::MissingCorrectiveAction.into());
      }
    }
    IncidentType::ElectricShock => {
      if request.severity != Severity::Low && is_blank(&request.investigation_notes) {
        return Err(DomainError::MissingInvestigationNotes.into());
      }
    }
    IncidentType::ImproperUseOfPpe => {
      // The involved employee must hold recent safety training.
      if let Some(id) = request.involved_employee {
        let employee = directory
          .find(id)?
          .ok_or(DomainError::UnknownInvolvedEmployee)?;
        let cutoff = now - Months::new(config.training_recency_months);
        let trained_recently = employee
          .last_safety_training
          .map(|t| t >= cutoff)
          .unwrap_or(false);
        if !trained_recently {
          return Err(DomainError::StaleSafetyTraining.into());
        }
      }
    }
    IncidentType::Collision | IncidentType::Other => {}
  }
  Ok(())
}

fn is_blank(value: &Option<String>) -> bool {
  value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::{InMemoryDirectory, InMemoryStore};
  use crate::types::Employee;
  use chrono::Duration;
  use uuid::Uuid;

  fn active_employee(directory: &InMemoryDirectory) -> Uuid {
    let id = Uuid::new_v4();
    directory.register(Employee {
      id,
      name: "Dana Reyes".into(),
      is_active: true,
      last_safety_training: Some(Utc::now() - Duration::days(30)),
    });
    id
  }

  fn base_request(reporter: Uuid) -> CreateIncidentRequest {
    CreateIncidentRequest {
      date: Utc::now() - Duration::days(1),
      location: "2nd Floor - North Wing".into(),
      description: "Slipped on wet floor".into(),
      incident_type: IncidentType::Fall,
      severity: Severity::Low,
      reported_by: reporter,
      involved_employee: None,
      safety_inspection: None,
      corrective_action: None,
      investigation_notes: None,
      witnesses: None,
      estimated_cost: 500,
      is_near_miss: false,
    }
  }

  fn domain(err: EngineError) -> DomainError {
    match err {
      EngineError::Domain(e) => e,
      other => panic!("expected domain error, got {:?}", other),
    }
  }

  #[test]
  fn accepts_a_well_formed_request() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let request = base_request(active_employee(&directory));
    let result =
      validate_creation(&request, &directory, &store, &Config::default(), Utc::now());
    assert!(result.is_ok());
  }

  #[test]
  fn rejects_future_date() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));
    request.date = Utc::now() + Duration::days(2);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::FutureDate);
  }

  #[test]
  fn rejects_date_beyond_look_back_window() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));
    request.date = Utc::now() - Duration::days(400);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::DateTooOld { months: 12 });
  }

  #[test]
  fn rejects_unknown_reporter_with_contract_message() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let request = base_request(Uuid::new_v4());
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err.clone()), DomainError::UnknownReporter);
    assert!(err.to_string().contains("Reported by employee not found"));
  }

  #[test]
  fn rejects_inactive_reporter() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let id = Uuid::new_v4();
    directory.register(Employee {
      id,
      name: "Former Staff".into(),
      is_active: false,
      last_safety_training: None,
    });
    let request = base_request(id);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::InactiveReporter);
  }

  #[test]
  fn rejects_unknown_and_inactive_involved_employee() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));

    request.involved_employee = Some(Uuid::new_v4());
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::UnknownInvolvedEmployee);

    let inactive = Uuid::new_v4();
    directory.register(Employee {
      id: inactive,
      name: "On Leave".into(),
      is_active: false,
      last_safety_training: None,
    });
    request.involved_employee = Some(inactive);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::InactiveInvolvedEmployee);
  }

  #[test]
  fn rejects_unknown_inspection_link() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));
    request.safety_inspection = Some(Uuid::new_v4());
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::UnknownInspection);

    let inspection = Uuid::new_v4();
    store.register_inspection(inspection);
    request.safety_inspection = Some(inspection);
    assert!(
      validate_creation(&request, &directory, &store, &Config::default(), Utc::now()).is_ok()
    );
  }

  #[test]
  fn rejects_duplicate_submission_same_calendar_date() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let request = base_request(active_employee(&directory));
    store
      .insert(crate::types::Incident::from_request(&request))
      .unwrap();

    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::DuplicateIncident);
  }

  #[test]
  fn high_fall_requires_corrective_action() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));
    request.severity = Severity::High;
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::MissingCorrectiveAction);

    request.corrective_action = Some("Cordon off, mop, signage".into());
    assert!(
      validate_creation(&request, &directory, &store, &Config::default(), Utc::now()).is_ok()
    );
  }

  #[test]
  fn electric_shock_above_low_requires_investigation_notes() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));
    request.incident_type = IncidentType::ElectricShock;
    request.severity = Severity::Medium;
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::MissingInvestigationNotes);

    // Low-severity shock passes without notes.
    request.severity = Severity::Low;
    assert!(
      validate_creation(&request, &directory, &store, &Config::default(), Utc::now()).is_ok()
    );
  }

  #[test]
  fn ppe_incident_requires_recent_training_for_involved_employee() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let stale = Uuid::new_v4();
    directory.register(Employee {
      id: stale,
      name: "Jordan Kim".into(),
      is_active: true,
      last_safety_training: Some(Utc::now() - Duration::days(300)),
    });

    let mut request = base_request(active_employee(&directory));
    request.incident_type = IncidentType::ImproperUseOfPpe;
    request.involved_employee = Some(stale);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::StaleSafetyTraining);

    // Without an involved employee the gate does not apply.
    request.involved_employee = None;
    assert!(
      validate_creation(&request, &directory, &store, &Config::default(), Utc::now()).is_ok()
    );
  }

  #[test]
  fn ppe_gate_rejects_never_trained_employee() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let untrained = Uuid::new_v4();
    directory.register(Employee {
      id: untrained,
      name: "New Hire".into(),
      is_active: true,
      last_safety_training: None,
    });

    let mut request = base_request(active_employee(&directory));
    request.incident_type = IncidentType::ImproperUseOfPpe;
    request.involved_employee = Some(untrained);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(domain(err), DomainError::StaleSafetyTraining);
  }

  #[test]
  fn rejects_overlong_fields() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();
    let mut request = base_request(active_employee(&directory));
    request.location = "x".repeat(201);
    let err = validate_creation(&request, &directory, &store, &Config::default(), Utc::now())
      .unwrap_err();
    assert_eq!(
      domain(err),
      DomainError::FieldTooLong { field: "location", max: 200 }
    );
  }

  #[test]
  fn update_checks_only_supplied_fields() {
    let directory = InMemoryDirectory::new();
    let store = InMemoryStore::new();

    // Empty update is fine.
    let update = UpdateIncidentRequest::default();
    assert!(validate_update(&update, &directory, &store, &Config::default()).is_ok());

    // A supplied empty description is rejected.
    let update = UpdateIncidentRequest {
      description: Some("   ".into()),
      ..Default::default()
    };
    let err = validate_update(&update, &directory, &store, &Config::default()).unwrap_err();
    assert_eq!(domain(err), DomainError::EmptyField { field: "description" });

    // A supplied unknown involved employee is rejected.
    let update = UpdateIncidentRequest {
      involved_employee: Some(Uuid::new_v4()),
      ..Default::default()
    };
    let err = validate_update(&update, &directory, &store, &Config::default()).unwrap_err();
    assert_eq!(domain(err), DomainError::UnknownInvolvedEmployee);
  }
}
