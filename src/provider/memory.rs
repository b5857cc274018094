//! In-memory collaborators for embedding and tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{ContentGraph, ContentNode, ContentRelationship};
use super::{AgentDirectory, AgentRecord, GraphProvider};

/// Error type for the in-memory collaborators (infallible in practice).
#[derive(Debug, Clone, thiserror::Error)]
pub enum StaticProviderError {
    /// The provider was configured to fail (test hook).
    #[error("static provider unavailable")]
    Unavailable,
}

/// Graph provider backed by one pre-built snapshot.
#[derive(Debug, Clone)]
pub struct StaticGraphProvider {
    graph: Arc<ContentGraph>,
    fail: bool,
}

impl StaticGraphProvider {
    /// Wrap an existing snapshot.
    pub fn new(graph: ContentGraph) -> Self {
        Self {
            graph: Arc::new(graph),
            fail: false,
        }
    }

    /// Build a snapshot from raw nodes and relationships.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = ContentNode>,
        relationships: impl IntoIterator<Item = ContentRelationship>,
    ) -> Self {
        Self::new(ContentGraph::new(nodes, relationships))
    }

    /// A provider whose fetches always fail, for exercising the
    /// conservative-downgrade path.
    pub fn unavailable() -> Self {
        Self {
            graph: Arc::new(ContentGraph::default()),
            fail: true,
        }
    }
}

#[async_trait]
impl GraphProvider for StaticGraphProvider {
    type Error = StaticProviderError;

    async fn get_graph(&self) -> Result<Arc<ContentGraph>, Self::Error> {
        if self.fail {
            return Err(StaticProviderError::Unavailable);
        }
        Ok(Arc::clone(&self.graph))
    }
}

/// Agent directory backed by a fixed record list.
#[derive(Debug, Clone, Default)]
pub struct StaticAgentDirectory {
    records: Vec<AgentRecord>,
    fail: bool,
}

impl StaticAgentDirectory {
    /// Build a directory from records.
    pub fn new(records: Vec<AgentRecord>) -> Self {
        Self {
            records,
            fail: false,
        }
    }

    /// A directory whose fetches always fail, for exercising fail-closed
    /// authorization.
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl AgentDirectory for StaticAgentDirectory {
    type Error = StaticProviderError;

    async fn get_agent_index(&self) -> Result<Vec<AgentRecord>, Self::Error> {
        if self.fail {
            return Err(StaticProviderError::Unavailable);
        }
        Ok(self.records.clone())
    }
}
