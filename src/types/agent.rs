//! Agent identity, capability tiers, and attestation decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an agent issuing queries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Create a new AgentId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An agent's verified capability level.
///
/// Tiers are ordered: a higher tier implies every capability of the tiers
/// below it. Tier resolution picks the highest tier granted by the agent's
/// attestation set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// No verified identity; depth-0 lookups only.
    Unauthenticated,
    /// Verified identity with no research attestations.
    Authenticated,
    /// Holds the graph-researcher attestation.
    GraphResearcher,
    /// Holds the advanced-researcher attestation.
    AdvancedResearcher,
    /// Holds a path-creator or curriculum-architect attestation.
    PathCreator,
}

/// Per-tier limits: depth cap and hourly quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Maximum traversal depth the tier may request.
    pub max_depth: u32,
    /// Exploration queries allowed per window.
    pub queries_per_hour: u32,
    /// Pathfinding queries allowed per window.
    pub pathfinding_per_hour: u32,
    /// Window length in milliseconds.
    pub reset_interval_ms: i64,
}

const HOUR_MS: i64 = 3_600_000;

impl Tier {
    /// Static limits table for this tier.
    pub fn limits(&self) -> TierLimits {
        match self {
            Self::Unauthenticated => TierLimits {
                max_depth: 0,
                queries_per_hour: 10,
                pathfinding_per_hour: 0,
                reset_interval_ms: HOUR_MS,
            },
            Self::Authenticated => TierLimits {
                max_depth: 1,
                queries_per_hour: 30,
                pathfinding_per_hour: 0,
                reset_interval_ms: HOUR_MS,
            },
            Self::GraphResearcher => TierLimits {
                max_depth: 2,
                queries_per_hour: 60,
                pathfinding_per_hour: 0,
                reset_interval_ms: HOUR_MS,
            },
            Self::AdvancedResearcher => TierLimits {
                max_depth: 3,
                queries_per_hour: 120,
                pathfinding_per_hour: 20,
                reset_interval_ms: HOUR_MS,
            },
            Self::PathCreator => TierLimits {
                max_depth: 3,
                queries_per_hour: 120,
                pathfinding_per_hour: 50,
                reset_interval_ms: HOUR_MS,
            },
        }
    }

    /// Whether this tier may issue pathfinding queries through the facade.
    pub fn can_pathfind(&self) -> bool {
        matches!(self, Self::PathCreator | Self::AdvancedResearcher)
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::Unauthenticated
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::GraphResearcher => "graph-researcher",
            Self::AdvancedResearcher => "advanced-researcher",
            Self::PathCreator => "path-creator",
        };
        write!(f, "{s}")
    }
}

/// Outcome of an attestation check for one request.
///
/// Recomputed fresh per request; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationCheck {
    /// Whether the requested depth is authorized.
    pub allowed: bool,
    /// Maximum depth the agent's tier permits.
    pub max_allowed_depth: u32,
    /// Resolved capability tier.
    pub tier: Tier,
    /// Attestation that would unlock the requested depth, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_attestation: Option<String>,
    /// Human-readable denial reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AttestationCheck {
    /// An allowed check at the given tier.
    pub fn allowed(tier: Tier) -> Self {
        Self {
            allowed: true,
            max_allowed_depth: tier.limits().max_depth,
            tier,
            required_attestation: None,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_highest_wins() {
        assert!(Tier::PathCreator > Tier::AdvancedResearcher);
        assert!(Tier::AdvancedResearcher > Tier::GraphResearcher);
        assert!(Tier::GraphResearcher > Tier::Authenticated);
        assert!(Tier::Authenticated > Tier::Unauthenticated);
    }

    #[test]
    fn test_depth_caps() {
        assert_eq!(Tier::Unauthenticated.limits().max_depth, 0);
        assert_eq!(Tier::Authenticated.limits().max_depth, 1);
        assert_eq!(Tier::GraphResearcher.limits().max_depth, 2);
        assert_eq!(Tier::AdvancedResearcher.limits().max_depth, 3);
        assert_eq!(Tier::PathCreator.limits().max_depth, 3);
    }

    #[test]
    fn test_pathfinding_tiers() {
        assert!(Tier::PathCreator.can_pathfind());
        assert!(Tier::AdvancedResearcher.can_pathfind());
        assert!(!Tier::GraphResearcher.can_pathfind());
        assert!(!Tier::Authenticated.can_pathfind());
        assert!(!Tier::Unauthenticated.can_pathfind());
    }

    #[test]
    fn test_tier_wire_form() {
        let json = serde_json::to_string(&Tier::PathCreator).unwrap();
        assert_eq!(json, "\"path-creator\"");
    }
}
