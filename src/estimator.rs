//! Cost estimation: predict node count, time, and credits before committing.
//!
//! Estimates are pure functions of the snapshot, the attestation decision,
//! and the rate-limit status. They never mutate limiter state and never
//! fail; an empty graph yields the zero estimate.

use crate::types::{AttestationCheck, BlockedReason, ContentGraph, QueryCost, Tier};
use crate::ratelimit::RateLimitStatus;

/// Flat credit cost of every pathfinding query, regardless of path length.
pub const PATHFINDING_FLAT_CREDITS: u64 = 10;

/// Credit formula shared by the estimator and the traversal engine.
///
/// `ceil((depth + 1)^2 * log2(nodes + 1))`
pub fn exploration_credits(depth: u32, nodes: u64) -> u64 {
    let depth_factor = ((depth + 1) as f64).powi(2);
    let size_factor = ((nodes + 1) as f64).log2();
    (depth_factor * size_factor).ceil() as u64
}

/// Estimate an exploration query at the given depth.
pub fn estimate_exploration(
    graph: &ContentGraph,
    depth: u32,
    check: &AttestationCheck,
    status: &RateLimitStatus,
) -> QueryCost {
    if graph.is_empty() {
        return QueryCost::zero();
    }

    let graph_size = graph.node_count() as f64;
    let avg_degree = graph.out_degree_sum() as f64 / graph_size;
    let estimated = avg_degree.powi(depth as i32).min(graph_size);
    let estimated_nodes = estimated.round() as u64;

    let depth_ok = depth <= check.max_allowed_depth;
    let quota_ok = status.exploration.remaining > 0;

    QueryCost {
        estimated_nodes,
        estimated_time_ms: estimated * 0.5,
        resource_credits: exploration_credits(depth, estimated_nodes),
        can_execute: depth_ok && quota_ok,
        blocked_reason: if depth_ok && quota_ok {
            None
        } else if !depth_ok {
            Some(BlockedReason::InsufficientAttestation)
        } else {
            Some(BlockedReason::RateLimitExceeded)
        },
    }
}

/// Estimate a pathfinding query.
///
/// Worst case is the whole graph, and billing is the flat rate. The tier
/// gate here is `path-creator` only, stricter than the facade (which also
/// admits advanced researchers); the discrepancy is inherited behavior.
pub fn estimate_pathfinding(
    graph: &ContentGraph,
    check: &AttestationCheck,
    status: &RateLimitStatus,
) -> QueryCost {
    if graph.is_empty() {
        return QueryCost::zero();
    }

    let graph_size = graph.node_count() as u64;
    let tier_ok = check.tier == Tier::PathCreator;
    let quota_ok = status.pathfinding.remaining > 0;

    QueryCost {
        estimated_nodes: graph_size,
        estimated_time_ms: graph_size as f64 * 0.1,
        resource_credits: PATHFINDING_FLAT_CREDITS,
        can_execute: tier_ok && quota_ok,
        blocked_reason: if tier_ok && quota_ok {
            None
        } else if !tier_ok {
            Some(BlockedReason::InsufficientAttestation)
        } else {
            Some(BlockedReason::RateLimitExceeded)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::RateLimiter;
    use crate::types::{AgentId, ContentNode, ContentRelationship, RelationshipType};

    fn chain_graph(n: usize) -> ContentGraph {
        let nodes = (0..n).map(|i| {
            ContentNode::new(format!("n{i}"), format!("N{i}"), "concept", "text")
        });
        let rels = (1..n).map(|i| {
            ContentRelationship::new(
                format!("r{i}"),
                format!("n{}", i - 1),
                format!("n{i}"),
                RelationshipType::RelatesTo,
            )
        });
        ContentGraph::new(nodes, rels)
    }

    fn fresh_status(tier: Tier) -> RateLimitStatus {
        let limiter = RateLimiter::new();
        let id = AgentId::from("estimator-test");
        limiter.update_tier(&id, tier);
        limiter.status(&id)
    }

    #[test]
    fn test_empty_graph_zero_estimate() {
        let graph = ContentGraph::default();
        let check = AttestationCheck::allowed(Tier::PathCreator);
        let status = fresh_status(Tier::PathCreator);

        let cost = estimate_exploration(&graph, 2, &check, &status);
        assert_eq!(cost.estimated_nodes, 0);
        assert!(!cost.can_execute);

        let cost = estimate_pathfinding(&graph, &check, &status);
        assert!(!cost.can_execute);
    }

    #[test]
    fn test_exploration_estimate_capped_at_graph_size() {
        let graph = chain_graph(10);
        let check = AttestationCheck::allowed(Tier::PathCreator);
        let status = fresh_status(Tier::PathCreator);

        let cost = estimate_exploration(&graph, 3, &check, &status);
        assert!(cost.estimated_nodes <= 10);
        assert!(cost.can_execute);
        assert_eq!(
            cost.resource_credits,
            exploration_credits(3, cost.estimated_nodes)
        );
    }

    #[test]
    fn test_exploration_blocked_by_depth() {
        let graph = chain_graph(10);
        let mut check = AttestationCheck::allowed(Tier::Authenticated);
        check.allowed = false;
        let status = fresh_status(Tier::Authenticated);

        let cost = estimate_exploration(&graph, 2, &check, &status);
        assert!(!cost.can_execute);
        assert_eq!(
            cost.blocked_reason,
            Some(BlockedReason::InsufficientAttestation)
        );
    }

    #[test]
    fn test_pathfinding_requires_path_creator_exactly() {
        let graph = chain_graph(10);
        let status = fresh_status(Tier::AdvancedResearcher);

        // Advanced researchers pass the facade gate but not the estimator's
        let check = AttestationCheck::allowed(Tier::AdvancedResearcher);
        let cost = estimate_pathfinding(&graph, &check, &status);
        assert!(!cost.can_execute);
        assert_eq!(
            cost.blocked_reason,
            Some(BlockedReason::InsufficientAttestation)
        );

        let check = AttestationCheck::allowed(Tier::PathCreator);
        let status = fresh_status(Tier::PathCreator);
        let cost = estimate_pathfinding(&graph, &check, &status);
        assert!(cost.can_execute);
        assert_eq!(cost.resource_credits, PATHFINDING_FLAT_CREDITS);
    }

    #[test]
    fn test_estimate_is_repeatable() {
        let graph = chain_graph(25);
        let check = AttestationCheck::allowed(Tier::GraphResearcher);
        let status = fresh_status(Tier::GraphResearcher);

        let first = estimate_exploration(&graph, 2, &check, &status);
        let second = estimate_exploration(&graph, 2, &check, &status);
        assert_eq!(first, second);
    }
}
