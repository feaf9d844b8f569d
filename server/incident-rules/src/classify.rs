//! Pure classification: derive approval/review gates and status from
//! severity, type, and estimated cost. No I/O.
//!
//! Rules are additive and monotonic: each rule can only upgrade a gate to
//! true, never downgrade one. Status is derived last from the approval gate,
//! so a cost or type rule that forces approval also moves a Low-severity
//! incident to PendingApproval.

use crate::config::Config;
use crate::types::{Incident, IncidentStatus, IncidentType, Severity};

/// One rule's contribution to the two gates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gates {
  pub approval: bool,
  pub review: bool,
}

impl Gates {
  /// Monotonic OR-composition.
  fn merge(self, other: Gates) -> Gates {
    Gates {
      approval: self.approval || other.approval,
      review: self.review || other.review,
    }
  }
}

type Rule = fn(Severity, IncidentType, u32, &Config) -> Gates;

/// Evaluation order: severity baseline, then type rules, then cost rules.
const RULES: &[Rule] = &[severity_baseline, electric_shock, high_fall, cost_thresholds];

fn severity_baseline(severity: Severity, _: IncidentType, _: u32, _: &Config) -> Gates {
  match severity {
    Severity::High => Gates { approval: true, review: true },
    Severity::Medium => Gates { approval: true, review: false },
    Severity::Low => Gates { approval: false, review: false },
  }
}

fn electric_shock(_: Severity, incident_type: IncidentType, _: u32, _: &Config) -> Gates {
  Gates {
    approval: false,
    review: incident_type == IncidentType::ElectricShock,
  }
}

fn high_fall(severity: Severity, incident_type: IncidentType, _: u32, _: &Config) -> Gates {
  let hit = incident_type == IncidentType::Fall && severity == Severity::High;
  Gates { approval: hit, review: hit }
}

fn cost_thresholds(_: Severity, _: IncidentType, cost: u32, config: &Config) -> Gates {
  Gates {
    approval: cost > config.approval_cost_threshold,
    review: cost > config.review_cost_threshold,
  }
}

/// Gates for a (severity, type, cost) triple.
pub fn gates(severity: Severity, incident_type: IncidentType, cost: u32, config: &Config) -> Gates {
  RULES
    .iter()
    .fold(Gates::default(), |acc, rule| acc.merge(rule(severity, incident_type, cost, config)))
}

/// Apply classification to an incident: set both gates and derive status.
/// Idempotent; safe to re-run after a severity change.
pub fn apply(incident: &mut Incident, config: &Config) {
  let gates = gates(incident.severity, incident.incident_type, incident.estimated_cost, config);
  incident.requires_manager_approval = gates.approval;
  incident.requires_safety_review = gates.review;
  incident.status = if gates.approval {
    IncidentStatus::PendingApproval
  } else {
    IncidentStatus::Reported
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cfg() -> Config {
    Config::default()
  }

  #[test]
  fn severity_baselines() {
    let g = gates(Severity::Low, IncidentType::Other, 0, &cfg());
    assert_eq!(g, Gates { approval: false, review: false });

    let g = gates(Severity::Medium, IncidentType::Other, 0, &cfg());
    assert_eq!(g, Gates { approval: true, review: false });

    let g = gates(Severity::High, IncidentType::Other, 0, &cfg());
    assert_eq!(g, Gates { approval: true, review: true });
  }

  #[test]
  fn electric_shock_forces_review_at_any_severity() {
    for severity in [Severity::Low, Severity::Medium, Severity::High] {
      let g = gates(severity, IncidentType::ElectricShock, 0, &cfg());
      assert!(g.review, "review must hold for {:?}", severity);
    }
    // Low-severity shock forces review but not approval.
    let g = gates(Severity::Low, IncidentType::ElectricShock, 0, &cfg());
    assert!(!g.approval);
  }

  #[test]
  fn cost_over_5000_forces_approval_regardless_of_severity() {
    let g = gates(Severity::Low, IncidentType::Other, 5_001, &cfg());
    assert!(g.approval);
    assert!(!g.review);

    // Exactly at the threshold does not trigger.
    let g = gates(Severity::Low, IncidentType::Other, 5_000, &cfg());
    assert!(!g.approval);
  }

  #[test]
  fn cost_over_10000_forces_review_regardless_of_severity() {
    let g = gates(Severity::Low, IncidentType::Other, 10_001, &cfg());
    assert!(g.approval);
    assert!(g.review);

    let g = gates(Severity::Low, IncidentType::Other, 10_000, &cfg());
    assert!(!g.review);
  }

  #[test]
  fn rules_never_downgrade() {
    // High severity sets both gates; no type/cost combination may clear them.
    for incident_type in [
      IncidentType::Fall,
      IncidentType::ElectricShock,
      IncidentType::ImproperUseOfPpe,
      IncidentType::Collision,
      IncidentType::Other,
    ] {
      for cost in [0, 5_001, 10_001] {
        let g = gates(Severity::High, incident_type, cost, &cfg());
        assert!(g.approval && g.review);
      }
    }
  }

  #[test]
  fn apply_derives_status_from_approval_gate() {
    let mut incident = test_incident(Severity::Low, IncidentType::Other, 500);
    apply(&mut incident, &cfg());
    assert_eq!(incident.status, IncidentStatus::Reported);
    assert!(!incident.requires_manager_approval);

    // Cost rule upgrades a Low-severity incident into PendingApproval.
    let mut incident = test_incident(Severity::Low, IncidentType::Other, 6_000);
    apply(&mut incident, &cfg());
    assert_eq!(incident.status, IncidentStatus::PendingApproval);
    assert!(incident.requires_manager_approval);
  }

  #[test]
  fn apply_is_idempotent() {
    let mut incident = test_incident(Severity::High, IncidentType::Fall, 15_000);
    apply(&mut incident, &cfg());
    let first = incident.clone();
    apply(&mut incident, &cfg());
    assert_eq!(incident.requires_manager_approval, first.requires_manager_approval);
    assert_eq!(incident.requires_safety_review, first.requires_safety_review);
    assert_eq!(incident.status, first.status);
  }

  fn test_incident(severity: Severity, incident_type: IncidentType, cost: u32) -> Incident {
    use crate::types::CreateIncidentRequest;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    Incident::from_request(&CreateIncidentRequest {
      date: Utc::now() - Duration::days(1),
      location: "Dock 3".into(),
      description: "Pallet tipped".into(),
      incident_type,
      severity,
      reported_by: Uuid::new_v4(),
      involved_employee: None,
      safety_inspection: None,
      corrective_action: None,
      investigation_notes: None,
      witnesses: None,
      estimated_cost: cost,
      is_near_miss: false,
    })
  }
}
