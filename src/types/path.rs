//! Pathfinding results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::query::PathAlgorithm;
use super::view::GraphEdge;

/// Execution metadata attached to every path result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMetadata {
    /// Which weighting produced the path.
    pub algorithm: PathAlgorithm,
    /// Total weighted distance of the path.
    pub total_distance: f64,
    /// Wall time spent in the search.
    pub compute_time_ms: f64,
    /// Nodes settled by the search.
    pub nodes_traversed: usize,
    /// Adjacency entries examined during relaxation.
    pub edges_examined: usize,
    /// Credit cost charged for the query (flat rate).
    pub resource_credits: u64,
    /// When the query ran.
    pub queried_at: DateTime<Utc>,
    /// Fingerprint of the snapshot the path was computed against.
    pub snapshot: String,
}

/// A found path between two nodes.
///
/// Unreachable endpoints never produce a `PathResult`: absence of a result
/// is the only signal, a zero score is never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Node ids along the path, endpoints included.
    pub path: Vec<NodeId>,
    /// Edges between consecutive path nodes, re-resolved from the snapshot.
    pub edges: Vec<GraphEdge>,
    /// Hop count (`path.len() - 1`).
    pub length: usize,
    /// Inverse of the total weighted distance (semantic variant only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<f64>,
    /// Execution metadata.
    pub metadata: PathMetadata,
}
