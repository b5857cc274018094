//! Per-agent sliding-window rate limiting.
//!
//! State is process-local and lives behind a single mutex, so the
//! check-then-count invariant holds under concurrent requests. Windows reset
//! lazily: any mutating access past the reset interval zeroes both counters
//! and restarts the window. `status` is a pure projection and reports an
//! expired window as if it had already reset, without touching state.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::{AgentId, Tier};

/// Which per-agent quota a request draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotaKind {
    /// Neighborhood exploration queries.
    Exploration,
    /// Pathfinding queries.
    Pathfinding,
}

impl fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exploration => write!(f, "exploration"),
            Self::Pathfinding => write!(f, "pathfinding"),
        }
    }
}

/// Usage of one quota within the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    /// Queries consumed this window.
    pub used: u32,
    /// Window limit for the agent's tier.
    pub limit: u32,
    /// Queries left this window.
    pub remaining: u32,
}

impl QuotaStatus {
    fn new(used: u32, limit: u32) -> Self {
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
        }
    }
}

/// Snapshot of an agent's rate-limit state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Agent the status describes.
    pub agent_id: AgentId,
    /// Tier the limits were drawn from.
    pub tier: Tier,
    /// Exploration quota usage.
    pub exploration: QuotaStatus,
    /// Pathfinding quota usage.
    pub pathfinding: QuotaStatus,
    /// When the current window resets.
    pub resets_at: DateTime<Utc>,
    /// Milliseconds until the reset.
    pub resets_in_ms: i64,
}

/// Per-agent window state. Created lazily, never persisted.
#[derive(Debug, Clone)]
struct AgentWindow {
    tier: Tier,
    window_start: DateTime<Utc>,
    exploration_count: u32,
    pathfinding_count: u32,
}

impl AgentWindow {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            tier: Tier::Authenticated,
            window_start: now,
            exploration_count: 0,
            pathfinding_count: 0,
        }
    }

    fn maybe_reset(&mut self, now: DateTime<Utc>) {
        let interval = self.tier.limits().reset_interval_ms;
        if (now - self.window_start) >= Duration::milliseconds(interval) {
            self.window_start = now;
            self.exploration_count = 0;
            self.pathfinding_count = 0;
        }
    }

    fn count(&self, kind: QuotaKind) -> u32 {
        match kind {
            QuotaKind::Exploration => self.exploration_count,
            QuotaKind::Pathfinding => self.pathfinding_count,
        }
    }

    fn limit(&self, kind: QuotaKind) -> u32 {
        let limits = self.tier.limits();
        match kind {
            QuotaKind::Exploration => limits.queries_per_hour,
            QuotaKind::Pathfinding => limits.pathfinding_per_hour,
        }
    }
}

/// Sliding-window rate limiter keyed by agent id.
#[derive(Debug, Default)]
pub struct RateLimiter {
    agents: Mutex<HashMap<AgentId, AgentWindow>>,
}

impl RateLimiter {
    /// Create an empty limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync an agent's tier to a freshly computed attestation decision.
    ///
    /// Mutates only on change; counts already used this window carry over
    /// so a tier upgrade never refunds consumed quota.
    pub fn update_tier(&self, agent_id: &AgentId, tier: Tier) {
        let now = Utc::now();
        let mut agents = self.agents.lock();
        let window = agents
            .entry(agent_id.clone())
            .or_insert_with(|| AgentWindow::new(now));
        window.maybe_reset(now);
        if window.tier != tier {
            window.tier = tier;
        }
    }

    /// Whether the agent has quota left for one more query of `kind`.
    pub fn check(&self, agent_id: &AgentId, kind: QuotaKind) -> bool {
        let now = Utc::now();
        let mut agents = self.agents.lock();
        let window = agents
            .entry(agent_id.clone())
            .or_insert_with(|| AgentWindow::new(now));
        window.maybe_reset(now);
        window.count(kind) < window.limit(kind)
    }

    /// Record one consumed query of `kind`.
    ///
    /// Call only after the operation succeeded; failures never consume.
    pub fn consume(&self, agent_id: &AgentId, kind: QuotaKind) {
        let now = Utc::now();
        let mut agents = self.agents.lock();
        let window = agents
            .entry(agent_id.clone())
            .or_insert_with(|| AgentWindow::new(now));
        window.maybe_reset(now);
        match kind {
            QuotaKind::Exploration => window.exploration_count += 1,
            QuotaKind::Pathfinding => window.pathfinding_count += 1,
        }
    }

    /// Pure status projection. Never mutates and never creates state; an
    /// expired window reads as already reset.
    pub fn status(&self, agent_id: &AgentId) -> RateLimitStatus {
        let now = Utc::now();
        let agents = self.agents.lock();

        let (tier, window_start, exploration, pathfinding) = match agents.get(agent_id) {
            Some(window) => {
                let interval = window.tier.limits().reset_interval_ms;
                let expired =
                    (now - window.window_start) >= Duration::milliseconds(interval);
                if expired {
                    (window.tier, now, 0, 0)
                } else {
                    (
                        window.tier,
                        window.window_start,
                        window.exploration_count,
                        window.pathfinding_count,
                    )
                }
            }
            None => (Tier::Authenticated, now, 0, 0),
        };

        let limits = tier.limits();
        let resets_at = window_start + Duration::milliseconds(limits.reset_interval_ms);
        let resets_in_ms = (resets_at - now).num_milliseconds().max(0);

        RateLimitStatus {
            agent_id: agent_id.clone(),
            tier,
            exploration: QuotaStatus::new(exploration, limits.queries_per_hour),
            pathfinding: QuotaStatus::new(pathfinding, limits.pathfinding_per_hour),
            resets_at,
            resets_in_ms,
        }
    }

    /// Rewind an agent's window start, simulating an elapsed interval.
    #[cfg(test)]
    pub(crate) fn rewind_window(&self, agent_id: &AgentId, by_ms: i64) {
        let mut agents = self.agents.lock();
        if let Some(window) = agents.get_mut(agent_id) {
            window.window_start = window.window_start - Duration::milliseconds(by_ms);
        }
    }
}
