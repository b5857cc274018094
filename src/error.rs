//! Typed errors and their wire form.
//!
//! Every failure is terminal: it is appended to the audit log as a failure
//! event and re-propagated unchanged, never swallowed or retried.

use serde::{Deserialize, Serialize};

use crate::ratelimit::{QuotaKind, RateLimitStatus};
use crate::types::{ErrorDetails, NodeId, Tier};

/// Error value returned by every facade operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExploreError {
    /// A focus/from/to id is absent from the graph.
    #[error("node not found: {0}")]
    ResourceNotFound(NodeId),

    /// The requested depth exceeds the agent's tier.
    #[error("depth {requested} unauthorized (tier allows up to {max_allowed})")]
    DepthUnauthorized {
        /// Depth the agent asked for.
        requested: u32,
        /// Depth the tier permits.
        max_allowed: u32,
        /// Attestation that would unlock the depth, if one exists.
        required_attestation: Option<String>,
        /// Formatted denial reason from the authority.
        reason: Option<String>,
    },

    /// The agent's per-window quota is exhausted.
    #[error("{kind} rate limit exceeded, resets in {}ms", status.resets_in_ms)]
    RateLimitExceeded {
        /// Which quota ran out.
        kind: QuotaKind,
        /// Current window status for the agent.
        status: RateLimitStatus,
    },

    /// The agent's tier may not issue pathfinding queries.
    #[error("tier {tier} is not authorized for pathfinding")]
    PathfindingUnauthorized {
        /// Resolved tier of the agent.
        tier: Tier,
    },

    /// The search terminated without reaching the target.
    #[error("no path exists from {from} to {to}")]
    NoPathExists {
        /// Start node.
        from: NodeId,
        /// Destination node.
        to: NodeId,
    },

    /// Reserved for the cost veto; estimation currently surfaces this
    /// through `QueryCost::blocked_reason` instead.
    #[error("query too expensive: {reason}")]
    QueryTooExpensive {
        /// Why the query was vetoed.
        reason: String,
    },

    /// Malformed query, or the graph snapshot is empty/unavailable.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The request's deadline elapsed before work was committed.
    #[error("deadline exceeded before {stage}")]
    DeadlineExceeded {
        /// Pipeline stage the request was aborted at.
        stage: &'static str,
    },
}

impl ExploreError {
    /// Stable wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "RESOURCE_NOT_FOUND",
            Self::DepthUnauthorized { .. } => "DEPTH_UNAUTHORIZED",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::PathfindingUnauthorized { .. } => "PATHFINDING_UNAUTHORIZED",
            Self::NoPathExists { .. } => "NO_PATH_EXISTS",
            Self::QueryTooExpensive { .. } => "QUERY_TOO_EXPENSIVE",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
        }
    }

    /// Convert to the `{code, message, details}` wire form.
    pub fn to_wire(&self) -> WireError {
        let details = match self {
            Self::DepthUnauthorized {
                requested,
                max_allowed,
                required_attestation,
                ..
            } => serde_json::json!({
                "requested_depth": requested,
                "max_allowed_depth": max_allowed,
                "required_attestation": required_attestation,
            }),
            Self::RateLimitExceeded { kind, status } => serde_json::json!({
                "kind": kind,
                "status": status,
            }),
            Self::PathfindingUnauthorized { tier } => serde_json::json!({ "tier": tier }),
            Self::NoPathExists { from, to } => serde_json::json!({
                "from": from,
                "to": to,
            }),
            _ => serde_json::Value::Null,
        };

        WireError {
            code: self.code().to_string(),
            message: self.to_string(),
            details,
        }
    }

    /// The error details attached to failure audit events.
    pub fn details(&self) -> ErrorDetails {
        ErrorDetails {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Error as it crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Code-specific details, `null` when none apply.
    #[serde(default)]
    pub details: serde_json::Value,
}
