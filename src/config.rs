//! Solver configuration, loaded from JSON via `serde`. Controls the
//! reversible-state strategy and optional search limits; none of this
//! affects propagation or search semantics, only resource usage.

use serde::{Deserialize, Serialize};

/// Which [`crate::state::StateManager`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateStrategy {
    /// [`crate::state::Trailer`]: lazy per-frame undo logging.
    Trail,
    /// [`crate::state::Copier`]: snapshot every cell on every save.
    Copy,
}

impl Default for StateStrategy {
    fn default() -> Self {
        StateStrategy::Trail
    }
}

/// Search cut-offs, checked once per explored node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub max_failures: Option<u64>,
    pub max_solutions: Option<u64>,
}

impl SearchLimits {
    pub fn is_exceeded(&self, stats: &crate::search::SearchStatistics) -> bool {
        self.max_nodes.is_some_and(|m| stats.nodes() >= m)
            || self.max_failures.is_some_and(|m| stats.failures() >= m)
            || self.max_solutions.is_some_and(|m| stats.solutions() >= m)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub state_strategy: StateStrategy,
    #[serde(default)]
    pub search_limits: SearchLimits,
}

impl SolverConfig {
    pub fn build_solver(&self) -> crate::solver::Solver {
        crate::solver::Solver::new(self.state_strategy == StateStrategy::Copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_trail_strategy_and_no_limits() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.state_strategy, StateStrategy::Trail);
        assert_eq!(cfg.search_limits, SearchLimits::default());
    }

    #[test]
    fn deserializes_partial_json() {
        let cfg: SolverConfig = serde_json::from_str(r#"{"state_strategy": "copy"}"#).unwrap();
        assert_eq!(cfg.state_strategy, StateStrategy::Copy);
        assert_eq!(cfg.search_limits.max_nodes, None);
    }

    #[test]
    fn limit_triggers_on_node_count() {
        let limits = SearchLimits {
            max_nodes: Some(5),
            ..Default::default()
        };
        let stats = crate::search::SearchStatistics::default();
        assert!(!limits.is_exceeded(&stats));
    }
}
