//! Neighborhood query results.
//!
//! A [`GraphView`] keys neighbors by depth. In memory the depth keys are
//! integers in a `BTreeMap`; the ordered record form used for storage or
//! transport is the plain JSON object rendering, whose keys are strings but
//! round-trip back to integers through [`GraphView::from_ordered_record`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::{ContentNode, NodeId};
use super::relationship::RelationshipType;

/// A traversed edge as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Relationship type, `UNKNOWN` when no record exists for the edge.
    pub relationship_type: RelationshipType,
}

/// Execution metadata attached to every neighborhood result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphViewMetadata {
    /// Visible nodes in the result, focus included.
    pub nodes_returned: usize,
    /// Deepest populated level, capped at the requested depth.
    pub depth_traversed: u32,
    /// Wall time spent in the traversal.
    pub compute_time_ms: f64,
    /// Credit cost charged for the query.
    pub resource_credits: u64,
    /// Nodes visited during expansion (visible or not, focus excluded).
    pub nodes_traversed: usize,
    /// Adjacency entries examined.
    pub edges_examined: usize,
    /// When the query ran.
    pub queried_at: DateTime<Utc>,
    /// Fingerprint of the snapshot the view was computed against.
    pub snapshot: String,
}

/// Result of a breadth-first neighborhood query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// The focus node (body stripped when content was not requested).
    pub focus: ContentNode,
    /// Visible neighbors keyed by depth (1-based; the focus is not listed).
    pub neighbors: BTreeMap<u32, Vec<ContentNode>>,
    /// Every edge that passed the relationship filter.
    pub edges: Vec<GraphEdge>,
    /// Execution metadata.
    pub metadata: GraphViewMetadata,
}

/// Error decoding a graph view from its ordered record form.
#[derive(Debug, thiserror::Error)]
pub enum ViewCodecError {
    /// The record was not a valid graph view.
    #[error("malformed graph view record: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl GraphView {
    /// Total visible nodes, focus included.
    pub fn nodes_returned(&self) -> usize {
        self.metadata.nodes_returned
    }

    /// Visible neighbors at one depth.
    pub fn neighbors_at(&self, depth: u32) -> &[ContentNode] {
        self.neighbors
            .get(&depth)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Convert to the ordered record form for storage or transport.
    ///
    /// Depth keys render as JSON object keys; entries stay depth-ordered
    /// because the in-memory map is BTree-backed.
    pub fn to_ordered_record(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("graph view serialization failed")
    }

    /// Rebuild a view from its ordered record form.
    ///
    /// Depth keys parse back from object-key strings to integers.
    pub fn from_ordered_record(record: serde_json::Value) -> Result<Self, ViewCodecError> {
        Ok(serde_json::from_value(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> GraphView {
        let focus = ContentNode::new("manifesto", "Manifesto", "concept", "text");
        let mut neighbors = BTreeMap::new();
        neighbors.insert(
            1,
            vec![ContentNode::new("a", "A", "concept", "a-text")],
        );
        GraphView {
            focus,
            neighbors,
            edges: vec![GraphEdge {
                source: NodeId::from("manifesto"),
                target: NodeId::from("a"),
                relationship_type: RelationshipType::RelatesTo,
            }],
            metadata: GraphViewMetadata {
                nodes_returned: 2,
                depth_traversed: 1,
                compute_time_ms: 0.2,
                resource_credits: 7,
                nodes_traversed: 1,
                edges_examined: 1,
                queried_at: Utc::now(),
                snapshot: "deadbeefdeadbeef".to_string(),
            },
        }
    }

    #[test]
    fn test_ordered_record_round_trip() {
        let view = sample_view();
        let record = view.to_ordered_record();
        let decoded = GraphView::from_ordered_record(record).unwrap();

        assert_eq!(decoded.focus, view.focus);
        assert_eq!(decoded.edges, view.edges);
        assert_eq!(decoded.metadata, view.metadata);
        // Depth keys survive as integers
        assert_eq!(decoded.neighbors_at(1).len(), 1);
    }

    #[test]
    fn test_depth_keys_serialize_as_object_keys() {
        let record = sample_view().to_ordered_record();
        assert!(record["neighbors"]["1"].is_array());
    }

    #[test]
    fn test_malformed_record_rejected() {
        let result = GraphView::from_ordered_record(serde_json::json!({"focus": 42}));
        assert!(result.is_err());
    }
}
