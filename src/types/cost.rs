//! Query cost estimates.

use serde::{Deserialize, Serialize};

/// Why an estimated query could not execute right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockedReason {
    /// Requested depth (or operation) exceeds the agent's tier.
    InsufficientAttestation,
    /// The relevant per-window quota is exhausted.
    RateLimitExceeded,
}

/// Predicted cost of a query, computed before committing any resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCost {
    /// Predicted node count the query would touch.
    pub estimated_nodes: u64,
    /// Predicted wall time in milliseconds.
    pub estimated_time_ms: f64,
    /// Abstract credit cost for budgeting.
    pub resource_credits: u64,
    /// Whether the query would be admitted right now.
    pub can_execute: bool,
    /// Set when `can_execute` is false for a policy reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<BlockedReason>,
}

impl QueryCost {
    /// The zero estimate: empty graph, nothing executable.
    pub fn zero() -> Self {
        Self {
            estimated_nodes: 0,
            estimated_time_ms: 0.0,
            resource_credits: 0,
            can_execute: false,
            blocked_reason: None,
        }
    }
}
