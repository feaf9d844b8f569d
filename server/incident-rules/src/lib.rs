//! Safety Incident Rules Engine — deterministic, rule-based.
//!
//! Validates incident reports, classifies approval/review requirements from
//! severity, type, and estimated cost, and enforces the
//! Reported -> PendingApproval -> Approved -> Closed lifecycle.
//!
//! No HTTP, no DB; collaborators sit behind traits and the core is pure
//! decision logic.

pub mod classify;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod service;
pub mod store;
pub mod types;
pub mod validate;

pub use config::Config;
pub use error::{DomainError, EngineError, StoreError};
pub use service::IncidentService;
pub use store::{EmployeeDirectory, InMemoryDirectory, InMemoryStore, IncidentStore};
pub use types::{CreateIncidentRequest, Incident, UpdateIncidentRequest};
