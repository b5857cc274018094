//! # exploration-kernel
//!
//! Attestation-gated graph exploration and pathfinding over immutable
//! content-graph snapshots.
//!
//! The engine answers two questions:
//!
//! > Which nodes sit within N hops of a focus node, for an agent allowed
//! > to look that far?
//!
//! > What is the best route between two nodes, by hop count or by
//! > relationship semantics?
//!
//! ## Pipeline
//!
//! ```text
//! Request → AttestationAuthority → RateLimiter → BFS / Dijkstra → EventLog
//!                 ↓                                    ↓
//!           AgentDirectory                      GraphProvider (snapshot)
//! ```
//!
//! Every query runs the same strict pipeline: authorize, rate-check,
//! execute, consume quota (success only), log. Cost estimation runs the
//! same inputs without committing anything.
//!
//! ## Guarantees
//!
//! - Snapshots are immutable and shared across requests without copying
//! - Attestation decisions are recomputed per request, never cached
//! - Quota is never consumed on failure or for aborted requests
//! - Collaborator failures downgrade conservatively (unauthenticated /
//!   empty graph) instead of propagating raw
//! - Traversal and pathfinding results are deterministic for a given
//!   snapshot: BTree-ordered adjacency, NodeId tie-breaks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attestation;
pub mod audit;
pub mod error;
pub mod estimator;
pub mod facade;
mod fingerprint;
pub mod pathfind;
pub mod provider;
pub mod ratelimit;
pub mod traversal;
pub mod types;

// Re-exports
pub use types::{
    AgentId, AttestationCheck, BlockedReason, ContentGraph, ContentNode, ContentRelationship,
    CostParams, ErrorDetails, EventKind, ExplorationEvent, ExploreQuery, GraphEdge, GraphStats,
    GraphView, GraphViewMetadata, NodeId, Operation, PathAlgorithm, PathMetadata, PathQuery,
    PathResult, QueryCost, RelationshipCategory, RelationshipId, RelationshipType, Tier,
    TierLimits, ViewCodecError,
};

pub use attestation::{
    required_attestation_for_depth, tier_for_attestations, AttestationAuthority,
    PATHFINDING_PROBE_DEPTH,
};
pub use audit::{EventLog, EVENT_LOG_CAPACITY};
pub use error::{ExploreError, WireError};
pub use estimator::{
    estimate_exploration, estimate_pathfinding, exploration_credits, PATHFINDING_FLAT_CREDITS,
};
pub use facade::{ExplorationService, RequestContext};
pub use pathfind::find_path;
pub use provider::{
    AgentDirectory, AgentRecord, GraphProvider, StaticAgentDirectory, StaticGraphProvider,
};
pub use ratelimit::{QuotaKind, QuotaStatus, RateLimitStatus, RateLimiter};
pub use traversal::bfs_traversal;

/// Schema version for all engine types.
/// Increment on breaking changes to any wire type.
pub const ENGINE_SCHEMA_VERSION: &str = "1.0.0";
