//! One-shot state-changing commands: halt and mission assignment.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::client::{ConsoleTransport, TransportError};
use crate::fetcher::StateCache;
use crate::model::SystemStatus;

pub const HALT_PATH: &str = "/api/v1/halt";
pub const MISSION_ASSIGN_PATH: &str = "/api/v1/mission/assign";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Halt,
    AssignMission(MissionDraft),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Halt(HaltOutcome),
    Mission(MissionAck),
}

/// Operator input for a mission, validated before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionDraft {
    pub agent_id: String,
    pub territory_id: String,
    pub task: String,
}

impl MissionDraft {
    pub fn new(
        agent_id: impl Into<String>,
        territory_id: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            territory_id: territory_id.into(),
            task: task.into(),
        }
    }

    pub fn validate(&self) -> Result<MissionRequest, CommandError> {
        let mut missing = Vec::new();
        if self.agent_id.trim().is_empty() {
            missing.push("agent_id");
        }
        if self.territory_id.trim().is_empty() {
            missing.push("repo_id");
        }
        if self.task.trim().is_empty() {
            missing.push("task");
        }
        if !missing.is_empty() {
            return Err(CommandError::Validation { missing });
        }

        Ok(MissionRequest {
            agent_id: self.agent_id.trim().to_string(),
            repo_id: self.territory_id.trim().to_string(),
            task: self.task.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRequest {
    pub agent_id: String,
    pub repo_id: String,
    pub task: String,
}

impl MissionRequest {
    /// Body for `POST /api/v1/mission/assign`.
    pub fn to_json(&self) -> Value {
        json!({
            "agent_id": self.agent_id,
            "repo_id": self.repo_id,
            "task": self.task,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionAck {
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltOutcome {
    /// The backend answered; carries the status it reported.
    Confirmed(SystemStatus),
    /// No confirmation; the console treats the system as halted anyway.
    Unconfirmed(TransportError),
}

impl HaltOutcome {
    pub fn status(&self) -> SystemStatus {
        match self {
            HaltOutcome::Confirmed(status) => status.clone(),
            HaltOutcome::Unconfirmed(_) => SystemStatus::Halted,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, HaltOutcome::Confirmed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Validation { missing: Vec<&'static str> },
    Transport(TransportError),
}

impl CommandError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CommandError::Validation { .. })
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Validation { missing } => {
                write!(f, "missing required fields: {}", missing.join(", "))
            }
            CommandError::Transport(err) => write!(f, "command failed: {err}"),
        }
    }
}

impl Error for CommandError {}

#[derive(Debug, Deserialize)]
struct HaltResponse {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn ConsoleTransport>,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn ConsoleTransport>) -> Self {
        Self { transport }
    }

    pub fn send_command(&self, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Halt => Ok(CommandOutcome::Halt(self.halt())),
            Command::AssignMission(draft) => {
                self.assign_mission(&draft).map(CommandOutcome::Mission)
            }
        }
    }

    /// Never fails: an unconfirmed halt still resolves to `HALTED`.
    pub fn halt(&self) -> HaltOutcome {
        match self.transport.post(HALT_PATH, None) {
            Ok(body) => {
                let status = confirmed_halt_status(&body);
                info!("halt confirmed by backend: {status}");
                HaltOutcome::Confirmed(status)
            }
            Err(err) => {
                warn!("halt unconfirmed, holding local HALTED: {err}");
                HaltOutcome::Unconfirmed(err)
            }
        }
    }

    /// Sends a halt unless the cache is already halted, then applies the outcome.
    pub fn halt_and_apply(&self, cache: &mut StateCache) -> Option<HaltOutcome> {
        if cache.is_halted() {
            return None;
        }
        let outcome = self.halt();
        cache.set_status(outcome.status());
        Some(outcome)
    }

    pub fn assign_mission(&self, draft: &MissionDraft) -> Result<MissionAck, CommandError> {
        let request = draft.validate()?;
        let payload = request.to_json();
        let body = self
            .transport
            .post(MISSION_ASSIGN_PATH, Some(&payload))
            .map_err(CommandError::Transport)?;
        info!(
            "mission assigned agent={} repo={}",
            request.agent_id, request.repo_id
        );
        let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
        Ok(MissionAck { body })
    }
}

/// Known statuses from the halt response are applied; anything else reads as `HALTED`.
fn confirmed_halt_status(body: &str) -> SystemStatus {
    let status = serde_json::from_str::<HaltResponse>(body)
        .ok()
        .and_then(|response| response.status)
        .map(SystemStatus::from);
    match status {
        Some(SystemStatus::Unknown(_)) | None => SystemStatus::Halted,
        Some(status) => status,
    }
}
