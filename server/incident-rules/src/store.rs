//! Collaborator contracts consumed by the core, plus in-memory
//! implementations for tests and the CLI.
//!
//! The core never holds a live object graph: relationships are plain ids,
//! resolved through these traits on demand. Serializing the
//! read-guard-write sequence for a single incident id is the store's job;
//! the core itself takes no locks.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{DuplicateProbe, Employee, Incident, IncidentStatus, Severity};

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Read-only lookup of employees by id.
pub trait EmployeeDirectory: Send + Sync {
  fn find(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;
}

/// Persistence contract for incidents. Query methods return incidents
/// sorted newest-first by incident date.
pub trait IncidentStore: Send + Sync {
  fn find(&self, id: Uuid) -> Result<Option<Incident>, StoreError>;
  fn insert(&self, incident: Incident) -> Result<(), StoreError>;
  fn update(&self, incident: &Incident) -> Result<(), StoreError>;
  /// Duplicate-submission guard: does any stored incident match the probe?
  fn exists_duplicate(&self, probe: &DuplicateProbe) -> Result<bool, StoreError>;
  fn find_by_severity(&self, severity: Severity) -> Result<Vec<Incident>, StoreError>;
  fn find_pending_approval(&self) -> Result<Vec<Incident>, StoreError>;
  /// Severity High, or estimated cost strictly above `cost_over`.
  fn find_high_risk(&self, cost_over: u32) -> Result<Vec<Incident>, StoreError>;
  fn find_recent(&self, limit: usize) -> Result<Vec<Incident>, StoreError>;
  fn find_by_employee(&self, employee_id: Uuid) -> Result<Vec<Incident>, StoreError>;
  /// Whether a linked safety-inspection id resolves.
  fn inspection_exists(&self, id: Uuid) -> Result<bool, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryDirectory {
  employees: Mutex<HashMap<Uuid, Employee>>,
}

impl InMemoryDirectory {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&self, employee: Employee) {
    self
      .employees
      .lock()
      .expect("directory lock poisoned")
      .insert(employee.id, employee);
  }
}

impl EmployeeDirectory for InMemoryDirectory {
  fn find(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
    Ok(
      self
        .employees
        .lock()
        .expect("directory lock poisoned")
        .get(&id)
        .cloned(),
    )
  }
}

#[derive(Default)]
pub struct InMemoryStore {
  incidents: Mutex<HashMap<Uuid, Incident>>,
  inspections: Mutex<HashMap<Uuid, ()>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register_inspection(&self, id: Uuid) {
    self
      .inspections
      .lock()
      .expect("store lock poisoned")
      .insert(id, ());
  }

  fn sorted_where(&self, keep: impl Fn(&Incident) -> bool) -> Vec<Incident> {
    let mut out: Vec<Incident> = self
      .incidents
      .lock()
      .expect("store lock poisoned")
      .values()
      .filter(|i| keep(i))
      .cloned()
      .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
  }
}

impl IncidentStore for InMemoryStore {
  fn find(&self, id: Uuid) -> Result<Option<Incident>, StoreError> {
    Ok(
      self
        .incidents
        .lock()
        .expect("store lock poisoned")
        .get(&id)
        .cloned(),
    )
  }

  fn insert(&self, incident: Incident) -> Result<(), StoreError> {
    self
      .incidents
      .lock()
      .expect("store lock poisoned")
      .insert(incident.id, incident);
    Ok(())
  }

  fn update(&self, incident: &Incident) -> Result<(), StoreError> {
    self
      .incidents
      .lock()
      .expect("store lock poisoned")
      .insert(incident.id, incident.clone());
    Ok(())
  }

  fn exists_duplicate(&self, probe: &DuplicateProbe) -> Result<bool, StoreError> {
    Ok(
      self
        .incidents
        .lock()
        .expect("store lock poisoned")
        .values()
        .any(|i| probe.matches(i)),
    )
  }

  fn find_by_severity(&self, severity: Severity) -> Result<Vec<Incident>, StoreError> {
    Ok(self.sorted_where(|i| i.severity == severity))
  }

  fn find_pending_approval(&self) -> Result<Vec<Incident>, StoreError> {
    Ok(self.sorted_where(|i| {
      i.requires_manager_approval && i.status == IncidentStatus::PendingApproval
    }))
  }

  fn find_high_risk(&self, cost_over: u32) -> Result<Vec<Incident>, StoreError> {
    Ok(self.sorted_where(|i| i.severity == Severity::High || i.estimated_cost > cost_over))
  }

  fn find_recent(&self, limit: usize) -> Result<Vec<Incident>, StoreError> {
    let mut out = self.sorted_where(|_| true);
    out.truncate(limit);
    Ok(out)
  }

  fn find_by_employee(&self, employee_id: Uuid) -> Result<Vec<Incident>, StoreError> {
    Ok(self.sorted_where(|i| {
      i.reported_by == employee_id || i.involved_employee == Some(employee_id)
    }))
  }

  fn inspection_exists(&self, id: Uuid) -> Result<bool, StoreError> {
    Ok(
      self
        .inspections
        .lock()
        .expect("store lock poisoned")
        .contains_key(&id),
    )
  }
}
