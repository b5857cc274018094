//! Attestation authority: authorization decisions per request.
//!
//! Every check fetches the agent index fresh; decisions are never cached
//! across requests, so a revoked attestation takes effect on the next call.
//! A directory failure fails closed: the agent is treated as unknown
//! (unauthenticated, depth-0 only).

use std::sync::Arc;

use crate::provider::AgentDirectory;
use crate::types::{AgentId, AttestationCheck, Tier};

/// Fixed probe depth used when authorizing pathfinding queries.
///
/// Pathfinding has no traversal depth of its own; the probe is the deepest
/// tier cap so the depth check never gates an eligible tier.
pub const PATHFINDING_PROBE_DEPTH: u32 = 3;

/// Tier resolution rules, highest tier first. First attestation match wins.
const TIER_RULES: &[(&str, Tier)] = &[
    ("path-creator", Tier::PathCreator),
    ("curriculum-architect", Tier::PathCreator),
    ("advanced-researcher", Tier::AdvancedResearcher),
    ("graph-researcher", Tier::GraphResearcher),
];

/// Attestation that unlocks each traversal depth.
const DEPTH_ATTESTATIONS: &[(u32, &str)] = &[
    (1, "authentication"),
    (2, "graph-researcher"),
    (3, "advanced-researcher"),
];

/// Resolve an agent's tier from its attestation set, highest wins.
///
/// An agent present in the directory but holding no research attestations
/// is `authenticated`.
pub fn tier_for_attestations(attestations: &[String]) -> Tier {
    for (name, tier) in TIER_RULES {
        if attestations.iter().any(|a| a == name) {
            return *tier;
        }
    }
    Tier::Authenticated
}

/// Attestation that would unlock the given depth, if one exists.
pub fn required_attestation_for_depth(depth: u32) -> Option<&'static str> {
    DEPTH_ATTESTATIONS
        .iter()
        .find(|(d, _)| *d == depth)
        .map(|(_, name)| *name)
}

/// Authorization gate in front of the traversal and pathfinding engines.
pub struct AttestationAuthority<D: AgentDirectory> {
    directory: Arc<D>,
}

impl<D: AgentDirectory> AttestationAuthority<D> {
    /// Create an authority over a directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Check whether an agent may traverse at the requested depth.
    pub async fn check_attestations(
        &self,
        agent_id: &AgentId,
        requested_depth: u32,
    ) -> AttestationCheck {
        let index = match self.directory.get_agent_index().await {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(
                    agent_id = %agent_id,
                    error = %e,
                    "agent directory unavailable, failing closed"
                );
                Vec::new()
            }
        };

        let record = index.iter().find(|r| &r.id == agent_id);

        let Some(record) = record else {
            return Self::unknown_agent(requested_depth);
        };

        let tier = tier_for_attestations(&record.attestations);
        let max_allowed_depth = tier.limits().max_depth;

        if requested_depth <= max_allowed_depth {
            return AttestationCheck::allowed(tier);
        }

        let required = required_attestation_for_depth(requested_depth);
        AttestationCheck {
            allowed: false,
            max_allowed_depth,
            tier,
            required_attestation: required.map(str::to_string),
            reason: Some(match required {
                Some(name) => format!(
                    "depth {requested_depth} requires the {name} attestation \
                     (tier {tier} allows up to depth {max_allowed_depth})"
                ),
                None => format!(
                    "depth {requested_depth} exceeds the maximum supported depth"
                ),
            }),
        }
    }

    fn unknown_agent(requested_depth: u32) -> AttestationCheck {
        let allowed = requested_depth == 0;
        AttestationCheck {
            allowed,
            max_allowed_depth: 0,
            tier: Tier::Unauthenticated,
            required_attestation: (!allowed).then(|| "authentication".to_string()),
            reason: (!allowed).then(|| {
                format!("depth {requested_depth} requires an authenticated agent")
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{AgentRecord, StaticAgentDirectory};

    fn authority_with(records: Vec<AgentRecord>) -> AttestationAuthority<StaticAgentDirectory> {
        AttestationAuthority::new(Arc::new(StaticAgentDirectory::new(records)))
    }

    #[test]
    fn test_tier_resolution_highest_wins() {
        let both = vec![
            "graph-researcher".to_string(),
            "path-creator".to_string(),
        ];
        assert_eq!(tier_for_attestations(&both), Tier::PathCreator);

        let architect = vec!["curriculum-architect".to_string()];
        assert_eq!(tier_for_attestations(&architect), Tier::PathCreator);

        let none: Vec<String> = vec![];
        assert_eq!(tier_for_attestations(&none), Tier::Authenticated);
    }

    #[tokio::test]
    async fn test_unknown_agent_depth_zero_only() {
        let authority = authority_with(vec![]);
        let agent = AgentId::from("ghost");

        let at_zero = authority.check_attestations(&agent, 0).await;
        assert!(at_zero.allowed);
        assert_eq!(at_zero.tier, Tier::Unauthenticated);

        let at_one = authority.check_attestations(&agent, 1).await;
        assert!(!at_one.allowed);
        assert_eq!(
            at_one.required_attestation.as_deref(),
            Some("authentication")
        );
    }

    #[tokio::test]
    async fn test_depth_gate_names_required_attestation() {
        let authority = authority_with(vec![AgentRecord::new("casey", &[])]);
        let agent = AgentId::from("casey");

        let check = authority.check_attestations(&agent, 2).await;
        assert!(!check.allowed);
        assert_eq!(check.tier, Tier::Authenticated);
        assert_eq!(check.max_allowed_depth, 1);
        assert_eq!(
            check.required_attestation.as_deref(),
            Some("graph-researcher")
        );
        assert!(check.reason.unwrap().contains("graph-researcher"));
    }

    #[tokio::test]
    async fn test_depth_beyond_table_has_no_attestation() {
        let authority =
            authority_with(vec![AgentRecord::new("casey", &["path-creator"])]);
        let check = authority
            .check_attestations(&AgentId::from("casey"), 4)
            .await;

        assert!(!check.allowed);
        assert!(check.required_attestation.is_none());
    }

    #[tokio::test]
    async fn test_directory_failure_fails_closed() {
        let authority =
            AttestationAuthority::new(Arc::new(StaticAgentDirectory::unavailable()));
        let check = authority
            .check_attestations(&AgentId::from("casey"), 1)
            .await;

        assert!(!check.allowed);
        assert_eq!(check.tier, Tier::Unauthenticated);
    }

    #[tokio::test]
    async fn test_fresh_lookup_per_call() {
        // Two calls against the same authority both hit the directory; a
        // tier derived from the first call must not leak into the second
        // agent's decision.
        let authority = authority_with(vec![
            AgentRecord::new("strong", &["advanced-researcher"]),
            AgentRecord::new("weak", &[]),
        ]);

        let strong = authority
            .check_attestations(&AgentId::from("strong"), 3)
            .await;
        assert!(strong.allowed);

        let weak = authority
            .check_attestations(&AgentId::from("weak"), 3)
            .await;
        assert!(!weak.allowed);
        assert_eq!(weak.tier, Tier::Authenticated);
    }
}
