//! Collaborator boundaries: graph snapshots and agent attestations.
//!
//! Both collaborators are opaque async calls and the only suspension points
//! in a request. Failures never cross the boundary raw: the facade and the
//! attestation authority downgrade them to the most conservative
//! interpretation (empty graph / no attestations found).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{AgentId, ContentGraph};

/// One entry of the agent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Agent identifier.
    pub id: AgentId,
    /// Attestation names held by the agent.
    pub attestations: Vec<String>,
}

impl AgentRecord {
    /// Create a record from an id and attestation names.
    pub fn new(id: impl Into<AgentId>, attestations: &[&str]) -> Self {
        Self {
            id: id.into(),
            attestations: attestations.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Supplier of immutable graph snapshots.
///
/// A snapshot is shared across concurrent requests without copying, hence
/// the `Arc` return. May fail or return an empty graph; callers downgrade
/// both to INVALID_QUERY.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    /// Error type for snapshot fetches.
    type Error: std::error::Error + Send + Sync;

    /// Fetch the current snapshot.
    async fn get_graph(&self) -> Result<Arc<ContentGraph>, Self::Error>;
}

/// Supplier of the agent attestation index.
///
/// Failure is treated as "no attestations found" by the authority.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// Error type for index fetches.
    type Error: std::error::Error + Send + Sync;

    /// Fetch all known agents with their attestation sets.
    async fn get_agent_index(&self) -> Result<Vec<AgentRecord>, Self::Error>;
}

pub mod memory;

pub use memory::{StaticAgentDirectory, StaticGraphProvider};
