//! Exploration facade: authorize → rate-check → execute → consume → log.
//!
//! The pipeline is strict and short-circuiting. Quota is consumed only
//! after the algorithm succeeds; any failure appends a failure event and
//! propagates the original error unchanged. Collaborator failures are
//! downgraded at the boundary (unauthenticated / empty graph) so the rest
//! of the pipeline stays deterministic.
//!
//! Agent identity travels in an explicit [`RequestContext`] on every call;
//! the service holds no per-request state and is safely shareable across
//! concurrent callers.

use std::sync::Arc;
use std::time::Instant;

use crate::attestation::{AttestationAuthority, PATHFINDING_PROBE_DEPTH};
use crate::audit::EventLog;
use crate::error::ExploreError;
use crate::estimator::{estimate_exploration, estimate_pathfinding};
use crate::pathfind::find_path;
use crate::provider::{AgentDirectory, GraphProvider};
use crate::ratelimit::{QuotaKind, RateLimitStatus, RateLimiter};
use crate::traversal::bfs_traversal;
use crate::types::{
    AgentId, ContentGraph, CostParams, EventKind, ExplorationEvent, ExploreQuery, GraphView,
    Operation, PathQuery, PathResult, QueryCost,
};

/// Identity and lifetime of one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Agent issuing the request.
    pub agent_id: AgentId,
    /// Optional deadline; checked before snapshot load and before the
    /// algorithm runs. An aborted request consumes no quota.
    pub deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline.
    pub fn new(agent_id: impl Into<AgentId>) -> Self {
        Self {
            agent_id: agent_id.into(),
            deadline: None,
        }
    }

    /// A context that aborts at `deadline`.
    pub fn with_deadline(agent_id: impl Into<AgentId>, deadline: Instant) -> Self {
        Self {
            agent_id: agent_id.into(),
            deadline: Some(deadline),
        }
    }

    fn ensure_live(&self, stage: &'static str) -> Result<(), ExploreError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(ExploreError::DeadlineExceeded { stage })
            }
            _ => Ok(()),
        }
    }
}

/// Orchestrator over the traversal and pathfinding engines.
pub struct ExplorationService<G: GraphProvider, D: AgentDirectory> {
    provider: Arc<G>,
    authority: AttestationAuthority<D>,
    limiter: RateLimiter,
    audit: EventLog,
}

impl<G: GraphProvider, D: AgentDirectory> ExplorationService<G, D> {
    /// Create a service over the two collaborators.
    pub fn new(provider: Arc<G>, directory: Arc<D>) -> Self {
        Self {
            provider,
            authority: AttestationAuthority::new(directory),
            limiter: RateLimiter::new(),
            audit: EventLog::new(),
        }
    }

    /// Create a service with a custom audit capacity.
    pub fn with_event_capacity(provider: Arc<G>, directory: Arc<D>, capacity: usize) -> Self {
        Self {
            provider,
            authority: AttestationAuthority::new(directory),
            limiter: RateLimiter::new(),
            audit: EventLog::with_capacity(capacity),
        }
    }

    /// Expand the neighborhood around a focus node.
    pub async fn explore_neighborhood(
        &self,
        ctx: &RequestContext,
        query: ExploreQuery,
    ) -> Result<GraphView, ExploreError> {
        let query_json = serde_json::to_value(&query).unwrap_or_default();

        match self.explore_inner(ctx, &query).await {
            Ok(view) => {
                self.audit.append(ExplorationEvent::completed(
                    EventKind::ExplorationCompleted,
                    ctx.agent_id.clone(),
                    query_json,
                    serde_json::json!({
                        "nodes_returned": view.metadata.nodes_returned,
                        "depth_traversed": view.metadata.depth_traversed,
                        "resource_credits": view.metadata.resource_credits,
                    }),
                ));
                Ok(view)
            }
            Err(err) => {
                self.audit.append(ExplorationEvent::failed(
                    EventKind::ExplorationFailed,
                    ctx.agent_id.clone(),
                    query_json,
                    err.details(),
                ));
                Err(err)
            }
        }
    }

    async fn explore_inner(
        &self,
        ctx: &RequestContext,
        query: &ExploreQuery,
    ) -> Result<GraphView, ExploreError> {
        if query.focus.is_empty() {
            return Err(ExploreError::InvalidQuery("focus id is empty".to_string()));
        }

        let check = self
            .authority
            .check_attestations(&ctx.agent_id, query.depth)
            .await;
        if !check.allowed {
            return Err(ExploreError::DepthUnauthorized {
                requested: query.depth,
                max_allowed: check.max_allowed_depth,
                required_attestation: check.required_attestation,
                reason: check.reason,
            });
        }

        self.limiter.update_tier(&ctx.agent_id, check.tier);
        if !self.limiter.check(&ctx.agent_id, QuotaKind::Exploration) {
            return Err(ExploreError::RateLimitExceeded {
                kind: QuotaKind::Exploration,
                status: self.limiter.status(&ctx.agent_id),
            });
        }

        ctx.ensure_live("snapshot load")?;
        let graph = self.load_graph().await?;

        if !graph.contains_node(&query.focus) {
            return Err(ExploreError::ResourceNotFound(query.focus.clone()));
        }

        ctx.ensure_live("traversal")?;
        let view = bfs_traversal(&graph, query)
            .ok_or_else(|| ExploreError::ResourceNotFound(query.focus.clone()))?;

        self.limiter.consume(&ctx.agent_id, QuotaKind::Exploration);
        Ok(view)
    }

    /// Find a path between two nodes.
    pub async fn find_path(
        &self,
        ctx: &RequestContext,
        query: PathQuery,
    ) -> Result<PathResult, ExploreError> {
        let query_json = serde_json::to_value(&query).unwrap_or_default();

        match self.find_path_inner(ctx, &query).await {
            Ok(result) => {
                self.audit.append(ExplorationEvent::completed(
                    EventKind::PathfindingCompleted,
                    ctx.agent_id.clone(),
                    query_json,
                    serde_json::json!({
                        "length": result.length,
                        "semantic_score": result.semantic_score,
                        "resource_credits": result.metadata.resource_credits,
                    }),
                ));
                Ok(result)
            }
            Err(err) => {
                self.audit.append(ExplorationEvent::failed(
                    EventKind::PathfindingFailed,
                    ctx.agent_id.clone(),
                    query_json,
                    err.details(),
                ));
                Err(err)
            }
        }
    }

    async fn find_path_inner(
        &self,
        ctx: &RequestContext,
        query: &PathQuery,
    ) -> Result<PathResult, ExploreError> {
        if query.from.is_empty() || query.to.is_empty() {
            return Err(ExploreError::InvalidQuery(
                "path endpoints must be non-empty".to_string(),
            ));
        }

        let check = self
            .authority
            .check_attestations(&ctx.agent_id, PATHFINDING_PROBE_DEPTH)
            .await;
        if !check.tier.can_pathfind() {
            return Err(ExploreError::PathfindingUnauthorized { tier: check.tier });
        }
        if !check.allowed {
            return Err(ExploreError::DepthUnauthorized {
                requested: PATHFINDING_PROBE_DEPTH,
                max_allowed: check.max_allowed_depth,
                required_attestation: check.required_attestation,
                reason: check.reason,
            });
        }

        self.limiter.update_tier(&ctx.agent_id, check.tier);
        if !self.limiter.check(&ctx.agent_id, QuotaKind::Pathfinding) {
            return Err(ExploreError::RateLimitExceeded {
                kind: QuotaKind::Pathfinding,
                status: self.limiter.status(&ctx.agent_id),
            });
        }

        ctx.ensure_live("snapshot load")?;
        let graph = self.load_graph().await?;

        for endpoint in [&query.from, &query.to] {
            if !graph.contains_node(endpoint) {
                return Err(ExploreError::ResourceNotFound(endpoint.clone()));
            }
        }

        ctx.ensure_live("pathfinding")?;
        let result = find_path(&graph, query).ok_or_else(|| ExploreError::NoPathExists {
            from: query.from.clone(),
            to: query.to.clone(),
        })?;

        self.limiter.consume(&ctx.agent_id, QuotaKind::Pathfinding);
        Ok(result)
    }

    /// Predict the cost of a query without committing any resources.
    ///
    /// Never fails: a snapshot failure reads as an empty graph, an
    /// authorization failure as the conservative tier. Never mutates
    /// rate-limit state.
    pub async fn estimate_cost(
        &self,
        ctx: &RequestContext,
        operation: Operation,
        params: CostParams,
    ) -> QueryCost {
        let graph = match self.provider.get_graph().await {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot unavailable, estimating against empty graph");
                Arc::new(ContentGraph::default())
            }
        };

        let status = self.limiter.status(&ctx.agent_id);
        match operation {
            Operation::Exploration => {
                let depth = params.depth.unwrap_or(0);
                let check = self
                    .authority
                    .check_attestations(&ctx.agent_id, depth)
                    .await;
                estimate_exploration(&graph, depth, &check, &status)
            }
            Operation::Pathfinding => {
                let check = self
                    .authority
                    .check_attestations(&ctx.agent_id, PATHFINDING_PROBE_DEPTH)
                    .await;
                estimate_pathfinding(&graph, &check, &status)
            }
        }
    }

    /// Current rate-limit status for an agent (pure).
    pub fn rate_limit_status(&self, agent_id: &AgentId) -> RateLimitStatus {
        self.limiter.status(agent_id)
    }

    /// The most recent audit events, newest first.
    pub fn recent_events(&self, limit: usize) -> Vec<ExplorationEvent> {
        self.audit.recent(limit)
    }

    /// The most recent audit events for one agent, newest first.
    pub fn agent_events(&self, agent_id: &AgentId, limit: usize) -> Vec<ExplorationEvent> {
        self.audit.for_agent(agent_id, limit)
    }

    async fn load_graph(&self) -> Result<Arc<ContentGraph>, ExploreError> {
        let graph = match self.provider.get_graph().await {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!(error = %e, "graph snapshot unavailable");
                return Err(ExploreError::InvalidQuery(
                    "graph snapshot unavailable".to_string(),
                ));
            }
        };
        if graph.is_empty() {
            return Err(ExploreError::InvalidQuery(
                "graph snapshot is empty".to_string(),
            ));
        }
        Ok(graph)
    }

    #[cfg(test)]
    pub(crate) fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::provider::{AgentRecord, StaticAgentDirectory, StaticGraphProvider};
    use crate::types::{ContentNode, ContentRelationship, RelationshipType, Tier};

    type Service = ExplorationService<StaticGraphProvider, StaticAgentDirectory>;

    fn node(id: &str) -> ContentNode {
        ContentNode::new(id, format!("Node {id}"), "concept", "text")
    }

    fn sample_service(records: Vec<AgentRecord>) -> Service {
        let provider = StaticGraphProvider::from_parts(
            vec![node("manifesto"), node("a"), node("b")],
            vec![
                ContentRelationship::new("r1", "manifesto", "a", RelationshipType::RelatesTo),
                ContentRelationship::new("r2", "manifesto", "b", RelationshipType::RelatesTo),
            ],
        );
        ExplorationService::new(
            Arc::new(provider),
            Arc::new(StaticAgentDirectory::new(records)),
        )
    }

    fn authenticated() -> Vec<AgentRecord> {
        vec![AgentRecord::new("casey", &[])]
    }

    #[tokio::test]
    async fn test_quota_consumed_only_on_success() {
        let service = sample_service(authenticated());
        let ctx = RequestContext::new("casey");

        // Failure: focus missing
        let err = service
            .explore_neighborhood(&ctx, ExploreQuery::new("ghost", 1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
        assert_eq!(
            service.rate_limit_status(&ctx.agent_id).exploration.used,
            0
        );

        // Success consumes exactly one
        service
            .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 1))
            .await
            .unwrap();
        assert_eq!(
            service.rate_limit_status(&ctx.agent_id).exploration.used,
            1
        );
    }

    #[tokio::test]
    async fn test_window_reset_restores_quota() {
        let service = sample_service(authenticated());
        let ctx = RequestContext::new("casey");
        let limits = Tier::Authenticated.limits();

        for _ in 0..limits.queries_per_hour {
            service
                .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 1))
                .await
                .unwrap();
        }

        let err = service
            .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "RATE_LIMIT_EXCEEDED");

        service
            .limiter()
            .rewind_window(&ctx.agent_id, limits.reset_interval_ms);
        service
            .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 1))
            .await
            .unwrap();
        assert_eq!(
            service.rate_limit_status(&ctx.agent_id).exploration.used,
            1
        );
    }

    #[tokio::test]
    async fn test_provider_failure_downgrades_to_invalid_query() {
        let service: Service = ExplorationService::new(
            Arc::new(StaticGraphProvider::unavailable()),
            Arc::new(StaticAgentDirectory::new(authenticated())),
        );
        let ctx = RequestContext::new("casey");

        let err = service
            .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_expired_deadline_aborts_without_consuming() {
        let service = sample_service(authenticated());
        let deadline = Instant::now() - Duration::from_millis(1);
        let ctx = RequestContext::with_deadline("casey", deadline);

        let err = service
            .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DEADLINE_EXCEEDED");
        assert_eq!(
            service.rate_limit_status(&ctx.agent_id).exploration.used,
            0
        );
    }

    #[tokio::test]
    async fn test_failure_logged_and_propagated() {
        let service = sample_service(authenticated());
        let ctx = RequestContext::new("casey");

        let err = service
            .explore_neighborhood(&ctx, ExploreQuery::new("manifesto", 3))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DEPTH_UNAUTHORIZED");

        let events = service.agent_events(&ctx.agent_id, 10);
        assert_eq!(events.len(), 1);
        assert!(events[0].kind.is_failure());
        assert_eq!(
            events[0].error.as_ref().unwrap().code,
            "DEPTH_UNAUTHORIZED"
        );
    }

    #[tokio::test]
    async fn test_estimate_never_mutates() {
        let service = sample_service(authenticated());
        let ctx = RequestContext::new("casey");

        let first = service
            .estimate_cost(&ctx, Operation::Exploration, CostParams::exploration(1))
            .await;
        let second = service
            .estimate_cost(&ctx, Operation::Exploration, CostParams::exploration(1))
            .await;

        assert_eq!(first, second);
        assert_eq!(
            service.rate_limit_status(&ctx.agent_id).exploration.used,
            0
        );
    }

    #[tokio::test]
    async fn test_empty_focus_is_invalid_query() {
        let service = sample_service(authenticated());
        let ctx = RequestContext::new("casey");

        let err = service
            .explore_neighborhood(&ctx, ExploreQuery::new("", 0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_QUERY");
    }
}
