//! Audit events for query attempts and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::agent::AgentId;

/// Kind of audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// An exploration query succeeded.
    ExplorationCompleted,
    /// An exploration query failed.
    ExplorationFailed,
    /// A pathfinding query succeeded.
    PathfindingCompleted,
    /// A pathfinding query failed.
    PathfindingFailed,
}

impl EventKind {
    /// Whether this kind records a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ExplorationFailed | Self::PathfindingFailed)
    }
}

/// Error details carried on failure events, mirroring the wire error form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationEvent {
    /// Event id.
    pub id: Uuid,
    /// What happened.
    pub kind: EventKind,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Agent that issued the query.
    pub agent_id: AgentId,
    /// The query as submitted.
    pub query: serde_json::Value,
    /// Result summary, present on completion events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error details, present on failure events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl ExplorationEvent {
    /// Record a completed query with a result summary.
    pub fn completed(
        kind: EventKind,
        agent_id: AgentId,
        query: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            agent_id,
            query,
            result: Some(result),
            error: None,
        }
    }

    /// Record a failed query with the original error attached.
    pub fn failed(
        kind: EventKind,
        agent_id: AgentId,
        query: serde_json::Value,
        error: ErrorDetails,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            agent_id,
            query,
            result: None,
            error: Some(error),
        }
    }
}
