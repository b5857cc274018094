//! Content node types for the exploration engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node in the content graph.
///
/// Wraps the string id used by the content store and implements `Ord`
/// for deterministic iteration and tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (malformed queries carry empty ids).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A node in the content graph.
///
/// Immutable within a snapshot. `body` may be stripped (`None`) when a
/// caller asks for a lighter response; everything else always survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Node identifier.
    pub id: NodeId,
    /// Human-readable title.
    pub title: String,
    /// Content type (open vocabulary; the store defaults to "concept").
    pub content_type: String,
    /// Full content body, absent in stripped responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ContentNode {
    /// Create a new node with a body.
    pub fn new(
        id: impl Into<NodeId>,
        title: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content_type: content_type.into(),
            body: Some(body.into()),
        }
    }

    /// Return a copy with the body stripped.
    pub fn stripped(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            content_type: self.content_type.clone(),
            body: None,
        }
    }
}
