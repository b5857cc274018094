//! Query types for exploration and pathfinding.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::relationship::RelationshipType;

/// Operation kind for cost estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// BFS neighborhood exploration.
    Exploration,
    /// Shortest-path query.
    Pathfinding,
}

/// A breadth-first neighborhood query around a focus node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreQuery {
    /// Node to expand around.
    pub focus: NodeId,
    /// Number of relationship hops to include.
    pub depth: u32,
    /// Keep only edges whose relationship record carries one of these types.
    /// An edge with no record always passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_filter: Option<Vec<RelationshipType>>,
    /// Keep only nodes with one of these content types visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_filter: Option<Vec<String>>,
    /// Hide nodes with one of these content types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_content_types: Option<Vec<String>>,
    /// Stop expanding once this many nodes have been visited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
    /// Include node bodies in the result (default true).
    #[serde(default = "default_include_content")]
    pub include_content: bool,
}

fn default_include_content() -> bool {
    true
}

impl ExploreQuery {
    /// A plain query with no filters and full content.
    pub fn new(focus: impl Into<NodeId>, depth: u32) -> Self {
        Self {
            focus: focus.into(),
            depth,
            relationship_filter: None,
            content_type_filter: None,
            exclude_content_types: None,
            max_nodes: None,
            include_content: true,
        }
    }
}

/// Pathfinding algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAlgorithm {
    /// Uniform edge weights (hop count).
    Shortest,
    /// Relationship-type weighted edges with caller preferences.
    Semantic,
}

/// A shortest-path query between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathQuery {
    /// Start node.
    pub from: NodeId,
    /// Destination node.
    pub to: NodeId,
    /// Which weighting to use.
    pub algorithm: PathAlgorithm,
    /// Nodes whose distance has reached this bound are not expanded further.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<u32>,
    /// Relationship types whose edges are preferred (semantic variant only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_relationships: Option<Vec<RelationshipType>>,
}

impl PathQuery {
    /// A uniform-weight query between two nodes.
    pub fn shortest(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            algorithm: PathAlgorithm::Shortest,
            max_hops: None,
            preferred_relationships: None,
        }
    }

    /// A semantically-weighted query between two nodes.
    pub fn semantic(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            algorithm: PathAlgorithm::Semantic,
            max_hops: None,
            preferred_relationships: None,
        }
    }

    /// Builder: set preferred relationship types.
    #[must_use]
    pub fn prefer(mut self, types: Vec<RelationshipType>) -> Self {
        self.preferred_relationships = Some(types);
        self
    }

    /// Builder: set the expansion bound.
    #[must_use]
    pub fn max_hops(mut self, hops: u32) -> Self {
        self.max_hops = Some(hops);
        self
    }
}

/// Partial parameters for cost estimation.
///
/// Only the fields relevant to the estimated operation need to be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Requested traversal depth (exploration only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl CostParams {
    /// Parameters for an exploration estimate at the given depth.
    pub fn exploration(depth: u32) -> Self {
        Self { depth: Some(depth) }
    }
}
