//! Weighted shortest paths over the content graph.
//!
//! Both variants share one Dijkstra core parameterized by an edge-weight
//! function, run over a binary heap with lazy deletion. Ties on distance
//! break by `NodeId` so results are deterministic across runs.
//!
//! - **Uniform**: every edge weighs 1 (hop count)
//! - **Semantic**: base weight from the relationship-type rule table,
//!   halved for types in the caller's preferred set
//!
//! Unreachable endpoints return `None`, never a zero-score path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;

use chrono::Utc;

use crate::estimator::PATHFINDING_FLAT_CREDITS;
use crate::types::{
    ContentGraph, ContentRelationship, GraphEdge, NodeId, PathAlgorithm, PathMetadata,
    PathQuery, PathResult, RelationshipType, DEFAULT_SEMANTIC_WEIGHT, PREFERRED_WEIGHT_FACTOR,
};

/// Heap entry ordered so the max-heap pops the smallest distance first,
/// ties broken by ascending node id.
#[derive(Debug, Clone)]
struct HeapEntry {
    dist: f64,
    node: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[derive(Debug, Default)]
struct SearchStats {
    nodes_traversed: usize,
    edges_examined: usize,
}

/// Dijkstra core shared by both variants.
///
/// `max_hops`: a settled node whose distance has reached the bound is not
/// relaxed further (it still counts as processed).
fn dijkstra<W>(
    graph: &ContentGraph,
    from: &NodeId,
    to: &NodeId,
    max_hops: Option<u32>,
    weight: W,
) -> (Option<(Vec<NodeId>, f64)>, SearchStats)
where
    W: Fn(Option<&ContentRelationship>) -> f64,
{
    let mut stats = SearchStats::default();

    if !graph.contains_node(from) || !graph.contains_node(to) {
        return (None, stats);
    }
    if from == to {
        return (Some((vec![from.clone()], 0.0)), stats);
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    dist.insert(from.clone(), 0.0);
    let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();

    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
    heap.push(HeapEntry {
        dist: 0.0,
        node: from.clone(),
    });

    let mut reached = false;

    while let Some(entry) = heap.pop() {
        if settled.contains(&entry.node) {
            continue;
        }
        settled.insert(entry.node.clone());
        stats.nodes_traversed += 1;

        if &entry.node == to {
            reached = true;
            break;
        }

        if let Some(bound) = max_hops {
            if entry.dist >= bound as f64 {
                continue;
            }
        }

        for target in graph.neighbors_of(&entry.node) {
            stats.edges_examined += 1;
            if settled.contains(target) {
                continue;
            }

            let record = graph.relationship_between(&entry.node, target);
            let candidate = entry.dist + weight(record);
            let best = dist.get(target).copied().unwrap_or(f64::INFINITY);
            if candidate < best {
                dist.insert(target.clone(), candidate);
                prev.insert(target.clone(), entry.node.clone());
                heap.push(HeapEntry {
                    dist: candidate,
                    node: target.clone(),
                });
            }
        }
    }

    if !reached {
        return (None, stats);
    }

    let mut path = vec![to.clone()];
    let mut cursor = to;
    while let Some(parent) = prev.get(cursor) {
        path.push(parent.clone());
        cursor = parent;
    }
    path.reverse();

    let total = dist.get(to).copied().unwrap_or(0.0);
    (Some((path, total)), stats)
}

/// Semantic edge weight: rule-table base, halved for preferred types.
///
/// A missing relationship record weighs the default.
fn semantic_weight(
    record: Option<&ContentRelationship>,
    preferred: Option<&Vec<RelationshipType>>,
) -> f64 {
    let Some(record) = record else {
        return DEFAULT_SEMANTIC_WEIGHT;
    };
    let base = record.relationship_type.base_weight();
    match preferred {
        Some(types) if types.contains(&record.relationship_type) => {
            base * PREFERRED_WEIGHT_FACTOR
        }
        _ => base,
    }
}

/// Find a path between the query's endpoints.
///
/// Returns `None` when either endpoint is absent or no route exists; the
/// facade maps absence to RESOURCE_NOT_FOUND / NO_PATH_EXISTS.
pub fn find_path(graph: &ContentGraph, query: &PathQuery) -> Option<PathResult> {
    let started = Instant::now();

    let (found, stats) = match query.algorithm {
        PathAlgorithm::Shortest => {
            dijkstra(graph, &query.from, &query.to, query.max_hops, |_| 1.0)
        }
        PathAlgorithm::Semantic => {
            dijkstra(graph, &query.from, &query.to, query.max_hops, |record| {
                semantic_weight(record, query.preferred_relationships.as_ref())
            })
        }
    };

    let (path, total_distance) = found?;

    let edges: Vec<GraphEdge> = path
        .windows(2)
        .map(|pair| GraphEdge {
            source: pair[0].clone(),
            target: pair[1].clone(),
            relationship_type: graph
                .relationship_between(&pair[0], &pair[1])
                .map(|r| r.relationship_type)
                .unwrap_or(RelationshipType::Unknown),
        })
        .collect();

    let semantic_score = match query.algorithm {
        PathAlgorithm::Semantic => Some(if total_distance > 0.0 {
            1.0 / total_distance
        } else {
            // from == to: distance is zero, score saturates instead of
            // dividing by zero
            1.0
        }),
        PathAlgorithm::Shortest => None,
    };

    let result = PathResult {
        length: path.len().saturating_sub(1),
        path,
        edges,
        semantic_score,
        metadata: PathMetadata {
            algorithm: query.algorithm,
            total_distance,
            compute_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            nodes_traversed: stats.nodes_traversed,
            edges_examined: stats.edges_examined,
            resource_credits: PATHFINDING_FLAT_CREDITS,
            queried_at: Utc::now(),
            snapshot: graph.fingerprint().to_string(),
        },
    };

    tracing::debug!(
        from = %query.from,
        to = %query.to,
        algorithm = ?query.algorithm,
        length = result.length,
        total_distance,
        "pathfinding complete"
    );

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentNode, ContentRelationship};

    fn node(id: &str) -> ContentNode {
        ContentNode::new(id, format!("Node {id}"), "concept", "text")
    }

    fn rel(id: &str, source: &str, target: &str, kind: RelationshipType) -> ContentRelationship {
        ContentRelationship::new(id, source, target, kind)
    }

    /// a -> b -> c -> d plus a slow direct edge a -> d via REFERENCES.
    fn sample_graph() -> ContentGraph {
        ContentGraph::new(
            vec![node("a"), node("b"), node("c"), node("d")],
            vec![
                rel("r1", "a", "b", RelationshipType::BelongsTo),
                rel("r2", "b", "c", RelationshipType::BelongsTo),
                rel("r3", "c", "d", RelationshipType::BelongsTo),
                rel("r4", "a", "d", RelationshipType::References),
            ],
        )
    }

    #[test]
    fn test_uniform_prefers_fewest_hops() {
        let graph = sample_graph();
        let result = find_path(&graph, &PathQuery::shortest("a", "d")).unwrap();

        // Direct edge wins under uniform weights
        assert_eq!(result.path, vec![NodeId::from("a"), NodeId::from("d")]);
        assert_eq!(result.length, 1);
        assert_eq!(result.metadata.total_distance, 1.0);
        assert!(result.semantic_score.is_none());
        assert_eq!(result.metadata.resource_credits, 10);
    }

    #[test]
    fn test_semantic_prefers_light_edges() {
        let graph = sample_graph();
        let result = find_path(&graph, &PathQuery::semantic("a", "d")).unwrap();

        // Three BELONGS_TO hops (3.0) beat one REFERENCES edge (default 2.0)?
        // No: 2.0 < 3.0, the direct edge still wins.
        assert_eq!(result.length, 1);
        assert_eq!(result.metadata.total_distance, 2.0);

        // Preferring BELONGS_TO halves the chain to 1.5, which now wins.
        let preferred = find_path(
            &graph,
            &PathQuery::semantic("a", "d").prefer(vec![RelationshipType::BelongsTo]),
        )
        .unwrap();
        assert_eq!(preferred.length, 3);
        assert_eq!(preferred.metadata.total_distance, 1.5);
        assert!(preferred.semantic_score.unwrap() > result.semantic_score.unwrap());
    }

    #[test]
    fn test_preference_never_lowers_score() {
        let graph = sample_graph();
        let plain = find_path(&graph, &PathQuery::semantic("a", "c")).unwrap();
        let preferred = find_path(
            &graph,
            &PathQuery::semantic("a", "c").prefer(vec![RelationshipType::BelongsTo]),
        )
        .unwrap();

        assert!(preferred.semantic_score.unwrap() >= plain.semantic_score.unwrap());
    }

    #[test]
    fn test_unreachable_returns_none() {
        let graph = ContentGraph::new(
            vec![node("a"), node("z")],
            vec![rel("r1", "z", "a", RelationshipType::RelatesTo)],
        );
        // Only z -> a exists; a -> z is unreachable
        assert!(find_path(&graph, &PathQuery::shortest("a", "z")).is_none());
    }

    #[test]
    fn test_missing_endpoint_returns_none() {
        let graph = sample_graph();
        assert!(find_path(&graph, &PathQuery::shortest("a", "ghost")).is_none());
        assert!(find_path(&graph, &PathQuery::shortest("ghost", "a")).is_none());
    }

    #[test]
    fn test_same_endpoint_guards_division() {
        let graph = sample_graph();
        let result = find_path(&graph, &PathQuery::semantic("a", "a")).unwrap();

        assert_eq!(result.path, vec![NodeId::from("a")]);
        assert_eq!(result.length, 0);
        assert_eq!(result.semantic_score, Some(1.0));
    }

    #[test]
    fn test_max_hops_bounds_expansion() {
        let chain = ContentGraph::new(
            vec![node("a"), node("b"), node("c"), node("d")],
            vec![
                rel("r1", "a", "b", RelationshipType::RelatesTo),
                rel("r2", "b", "c", RelationshipType::RelatesTo),
                rel("r3", "c", "d", RelationshipType::RelatesTo),
            ],
        );

        // d is 3 hops out; a bound of 2 stops relaxation before it
        let bounded = find_path(&chain, &PathQuery::shortest("a", "d").max_hops(2));
        assert!(bounded.is_none());

        let unbounded = find_path(&chain, &PathQuery::shortest("a", "d")).unwrap();
        assert_eq!(unbounded.length, 3);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        // Two equal-cost routes a -> {m, n} -> z; the m route must win
        // every time (smaller id settles first).
        let graph = ContentGraph::new(
            vec![node("a"), node("m"), node("n"), node("z")],
            vec![
                rel("r1", "a", "m", RelationshipType::RelatesTo),
                rel("r2", "a", "n", RelationshipType::RelatesTo),
                rel("r3", "m", "z", RelationshipType::RelatesTo),
                rel("r4", "n", "z", RelationshipType::RelatesTo),
            ],
        );

        for _ in 0..5 {
            let result = find_path(&graph, &PathQuery::shortest("a", "z")).unwrap();
            assert_eq!(
                result.path,
                vec![NodeId::from("a"), NodeId::from("m"), NodeId::from("z")]
            );
        }
    }

    #[test]
    fn test_edges_re_resolved_along_path() {
        let graph = sample_graph();
        let result = find_path(&graph, &PathQuery::shortest("a", "c")).unwrap();

        assert_eq!(result.edges.len(), 2);
        assert!(result
            .edges
            .iter()
            .all(|e| e.relationship_type == RelationshipType::BelongsTo));
    }
}
