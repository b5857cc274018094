//! Breadth-first neighborhood expansion.
//!
//! ## Algorithm
//!
//! 1. Start with the focus visited and on the frontier
//! 2. For each level up to the requested depth, expand every frontier node
//!    through the adjacency index, resolving each edge's relationship
//!    record in O(1)
//! 3. Record every edge that passes the relationship filter, even toward
//!    nodes already visited (no re-traversal, but the edge is reported)
//! 4. On first visit, a node failing the content-type filters is excluded
//!    from the visible result but still advances the frontier (filters
//!    gate visibility, not reachability)
//! 5. Once the visited set reaches `max_nodes`, expansion stops
//!    immediately, keeping whatever was already collected

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::Utc;

use crate::estimator::exploration_credits;
use crate::types::{
    ContentGraph, ContentNode, ExploreQuery, GraphEdge, GraphView, GraphViewMetadata, NodeId,
    RelationshipType,
};

/// Whether a node passes the include/exclude content-type filters.
fn is_visible(node: &ContentNode, query: &ExploreQuery) -> bool {
    if let Some(include) = &query.content_type_filter {
        if !include.contains(&node.content_type) {
            return false;
        }
    }
    if let Some(exclude) = &query.exclude_content_types {
        if exclude.contains(&node.content_type) {
            return false;
        }
    }
    true
}

/// Expand the neighborhood around the query's focus node.
///
/// Returns `None` when the focus is not in the snapshot; the facade maps
/// that to RESOURCE_NOT_FOUND before any quota is consumed.
pub fn bfs_traversal(graph: &ContentGraph, query: &ExploreQuery) -> Option<GraphView> {
    let started = Instant::now();
    let focus_node = graph.node(&query.focus)?;

    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(query.focus.clone());
    let mut frontier: Vec<NodeId> = vec![query.focus.clone()];

    let mut neighbors: BTreeMap<u32, Vec<ContentNode>> = BTreeMap::new();
    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut nodes_traversed: usize = 0;
    let mut edges_examined: usize = 0;

    'expansion: for level in 1..=query.depth {
        if frontier.is_empty() {
            break;
        }
        let mut next_frontier: Vec<NodeId> = Vec::new();

        for current in &frontier {
            for target in graph.neighbors_of(current) {
                edges_examined += 1;

                let record = graph.relationship_between(current, target);

                // An edge is dropped only when a record exists and its type
                // is excluded; a missing record always passes.
                if let (Some(filter), Some(record)) = (&query.relationship_filter, record) {
                    if !filter.contains(&record.relationship_type) {
                        continue;
                    }
                }

                edges.push(GraphEdge {
                    source: current.clone(),
                    target: target.clone(),
                    relationship_type: record
                        .map(|r| r.relationship_type)
                        .unwrap_or(RelationshipType::Unknown),
                });

                if visited.contains(target) {
                    continue;
                }

                if let Some(max) = query.max_nodes {
                    if visited.len() >= max {
                        break 'expansion;
                    }
                }

                visited.insert(target.clone());
                nodes_traversed += 1;

                // Dangling endpoint: indexed but absent from the node set
                let Some(node) = graph.node(target) else {
                    continue;
                };

                if !is_visible(node, query) {
                    next_frontier.push(target.clone());
                    continue;
                }

                let node = if query.include_content {
                    node.clone()
                } else {
                    node.stripped()
                };
                neighbors.entry(level).or_default().push(node);
                next_frontier.push(target.clone());
            }
        }

        frontier = next_frontier;
    }

    let nodes_returned = 1 + neighbors.values().map(Vec::len).sum::<usize>();
    let depth_traversed = neighbors
        .keys()
        .next_back()
        .copied()
        .unwrap_or(0)
        .min(query.depth);

    let focus = if query.include_content {
        focus_node.clone()
    } else {
        focus_node.stripped()
    };

    let view = GraphView {
        focus,
        neighbors,
        edges,
        metadata: GraphViewMetadata {
            nodes_returned,
            depth_traversed,
            compute_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            resource_credits: exploration_credits(query.depth, nodes_returned as u64),
            nodes_traversed,
            edges_examined,
            queried_at: Utc::now(),
            snapshot: graph.fingerprint().to_string(),
        },
    };

    tracing::debug!(
        focus = %query.focus,
        depth = query.depth,
        nodes_returned = view.metadata.nodes_returned,
        edges_examined = view.metadata.edges_examined,
        "bfs traversal complete"
    );

    Some(view)
}
