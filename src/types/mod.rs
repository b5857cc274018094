//! Core types for the exploration engine.

pub mod agent;
pub mod cost;
pub mod event;
pub mod graph;
pub mod node;
pub mod path;
pub mod query;
pub mod relationship;
pub mod view;

pub use agent::{AgentId, AttestationCheck, Tier, TierLimits};
pub use cost::{BlockedReason, QueryCost};
pub use event::{ErrorDetails, EventKind, ExplorationEvent};
pub use graph::{ContentGraph, GraphStats};
pub use node::{ContentNode, NodeId};
pub use path::{PathMetadata, PathResult};
pub use query::{CostParams, ExploreQuery, Operation, PathAlgorithm, PathQuery};
pub use relationship::{
    ContentRelationship, RelationshipCategory, RelationshipId, RelationshipType,
    DEFAULT_SEMANTIC_WEIGHT, PREFERRED_WEIGHT_FACTOR,
};
pub use view::{GraphEdge, GraphView, GraphViewMetadata, ViewCodecError};
