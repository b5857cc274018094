//! Immutable content-graph snapshot with derived indices.
//!
//! A [`ContentGraph`] is built once from nodes and relationships and is
//! read-only for the lifetime of every query answered against it, so it can
//! be shared freely across concurrent requests behind an `Arc`.
//!
//! Derived indices:
//!
//! - `adjacency` / `reverse_adjacency`: id → set of neighbor ids, BTree-backed
//!   for deterministic iteration
//! - `edge_index`: `(source, target)` → relationship id, giving O(1) edge
//!   resolution during traversal and pathfinding
//!
//! An edge endpoint missing from `nodes` is tolerated: the indices still
//! carry it and consumers simply skip it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::fingerprint::snapshot_fingerprint;
use super::node::{ContentNode, NodeId};
use super::relationship::{ContentRelationship, RelationshipId, RelationshipType};

/// Aggregate counts over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Total nodes.
    pub node_count: usize,
    /// Total relationships.
    pub relationship_count: usize,
    /// Relationship counts by type.
    pub by_type: BTreeMap<RelationshipType, u64>,
}

/// Immutable snapshot of the content graph.
#[derive(Debug, Clone, Default)]
pub struct ContentGraph {
    nodes: BTreeMap<NodeId, ContentNode>,
    relationships: BTreeMap<RelationshipId, ContentRelationship>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    reverse_adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    edge_index: HashMap<(NodeId, NodeId), RelationshipId>,
    fingerprint: String,
}

impl ContentGraph {
    /// Build a snapshot from nodes and relationships.
    ///
    /// Indices and the fingerprint are computed here, once; nothing mutates
    /// the snapshot afterwards. When several relationship records share one
    /// (source, target) pair, the record with the smallest id wins the edge
    /// index slot.
    pub fn new(
        nodes: impl IntoIterator<Item = ContentNode>,
        relationships: impl IntoIterator<Item = ContentRelationship>,
    ) -> Self {
        let nodes: BTreeMap<NodeId, ContentNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let relationships: BTreeMap<RelationshipId, ContentRelationship> =
            relationships.into_iter().map(|r| (r.id.clone(), r)).collect();

        let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
        let mut reverse_adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
        let mut edge_index: HashMap<(NodeId, NodeId), RelationshipId> = HashMap::new();

        for rel in relationships.values() {
            adjacency
                .entry(rel.source.clone())
                .or_default()
                .insert(rel.target.clone());
            reverse_adjacency
                .entry(rel.target.clone())
                .or_default()
                .insert(rel.source.clone());
            edge_index
                .entry((rel.source.clone(), rel.target.clone()))
                .or_insert_with(|| rel.id.clone());
        }

        let fingerprint = {
            let node_ids: Vec<&NodeId> = nodes.keys().collect();
            let mut edge_triples: Vec<(&NodeId, &NodeId, RelationshipType)> = relationships
                .values()
                .map(|r| (&r.source, &r.target, r.relationship_type))
                .collect();
            edge_triples.sort();
            snapshot_fingerprint(&node_ids, &edge_triples)
        };

        Self {
            nodes,
            relationships,
            adjacency,
            reverse_adjacency,
            edge_index,
            fingerprint,
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    /// Whether a node exists in the snapshot.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a relationship record by id.
    pub fn relationship(&self, id: &RelationshipId) -> Option<&ContentRelationship> {
        self.relationships.get(id)
    }

    /// Resolve the relationship record between two nodes in O(1).
    ///
    /// Returns `None` when the adjacency carries an edge with no record.
    pub fn relationship_between(
        &self,
        source: &NodeId,
        target: &NodeId,
    ) -> Option<&ContentRelationship> {
        self.edge_index
            .get(&(source.clone(), target.clone()))
            .and_then(|id| self.relationships.get(id))
    }

    /// Outbound neighbor ids of a node, in deterministic order.
    pub fn neighbors_of(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.adjacency.get(id).into_iter().flatten()
    }

    /// Inbound neighbor ids of a node, in deterministic order.
    pub fn inbound_of(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.reverse_adjacency.get(id).into_iter().flatten()
    }

    /// All node ids in the snapshot, in deterministic order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationship records.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of out-degrees across all nodes (adjacency entries).
    pub fn out_degree_sum(&self) -> usize {
        self.adjacency.values().map(|targets| targets.len()).sum()
    }

    /// Snapshot fingerprint for provenance.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Aggregate counts, including per-type relationship counts.
    pub fn stats(&self) -> GraphStats {
        let mut by_type: BTreeMap<RelationshipType, u64> = BTreeMap::new();
        for rel in self.relationships.values() {
            *by_type.entry(rel.relationship_type).or_insert(0) += 1;
        }
        GraphStats {
            node_count: self.nodes.len(),
            relationship_count: self.relationships.len(),
            by_type,
        }
    }
}
