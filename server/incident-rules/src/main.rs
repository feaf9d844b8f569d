//! Binary entrypoint: read JSON-line commands from stdin, write JSON lines
//! to stdout, backed by the in-memory collaborators.
//!
//! Each input line is one tagged command ("op" field). Output lines are
//! either the affected incident (create/update/approve/close/get) or an
//! ErrorOutput when the operation is rejected.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use incident_rules::types::{Employee, ErrorOutput};
use incident_rules::{
  CreateIncidentRequest, EngineError, InMemoryDirectory, InMemoryStore, IncidentService,
  UpdateIncidentRequest,
};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command {
  RegisterEmployee { employee: Employee },
  CreateIncident(Box<CreateIncidentRequest>),
  UpdateIncident { id: Uuid, changes: UpdateIncidentRequest },
  ApproveIncident { id: Uuid, approver: String },
  CloseIncident { id: Uuid },
  GetIncident { id: Uuid },
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  let directory = Arc::new(InMemoryDirectory::new());
  let service = IncidentService::with_default_config(directory.clone(), Arc::new(InMemoryStore::new()));

  for line in stdin.lock().lines() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        let _ = writeln!(io::stderr(), "incident-rules: read error: {}", e);
        std::process::exit(1);
      }
    };

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let command: Command = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        emit(&mut out, &ErrorOutput::new("bad_command", format!("json parse: {}", e)));
        continue;
      }
    };

    match run(&service, &directory, command) {
      Ok(value) => {
        let _ = serde_json::to_writer(&mut out, &value);
        let _ = writeln!(out);
      }
      Err(e) => {
        emit(&mut out, &ErrorOutput::new(e.code(), e.to_string()));
      }
    }
  }

  let _ = out.flush();
}

fn run(
  service: &IncidentService,
  directory: &InMemoryDirectory,
  command: Command,
) -> Result<serde_json::Value, EngineError> {
  let value = match command {
    Command::RegisterEmployee { employee } => {
      let id = employee.id;
      directory.register(employee);
      serde_json::json!({ "ok": true, "employee": id })
    }
    Command::CreateIncident(request) => to_value(service.create(&request)?),
    Command::UpdateIncident { id, changes } => to_value(service.update(id, &changes)?),
    Command::ApproveIncident { id, approver } => to_value(service.approve(id, &approver)?),
    Command::CloseIncident { id } => to_value(service.close(id)?),
    Command::GetIncident { id } => to_value(service.get(id)?),
  };
  Ok(value)
}

fn to_value(incident: incident_rules::Incident) -> serde_json::Value {
  serde_json::to_value(incident).unwrap_or_else(|_| serde_json::json!({ "ok": false }))
}

fn emit(out: &mut impl Write, error: &ErrorOutput) {
  let _ = serde_json::to_writer(&mut *out, error);
  let _ = writeln!(out);
}
