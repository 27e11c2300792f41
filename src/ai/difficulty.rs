//! Difficulty presets and per-call AI configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Search limits for one move selection.
///
/// `max_depth` bounds the lookahead; `max_nodes` and `time_limit` cap the
/// work done regardless of depth. Exhausting a cap degrades move quality
/// but never produces an illegal move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDifficulty {
    pub name: String,
    pub max_depth: u32,
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl AiDifficulty {
    #[must_use]
    pub fn new(name: impl Into<String>, max_depth: u32) -> Self {
        Self {
            name: name.into(),
            max_depth,
            max_nodes: None,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Quick lookahead with simple tactics.
    #[must_use]
    pub fn easy() -> Self {
        Self::new("Easy", 1).with_max_nodes(400)
    }

    /// Balanced lookahead and evaluations.
    #[must_use]
    pub fn intermediate() -> Self {
        Self::new("Intermediate", 2).with_max_nodes(1200)
    }

    /// Deeper lookahead with tighter pruning.
    #[must_use]
    pub fn challenging() -> Self {
        Self::new("Challenging", 3).with_max_nodes(4000)
    }
}

impl Default for AiDifficulty {
    fn default() -> Self {
        Self::intermediate()
    }
}

/// Per-call AI configuration.
///
/// A `Some` seed makes the whole selection deterministic: jitter and
/// tie-breaking draw from a generator created fresh for the call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: AiDifficulty,
    pub seed: Option<u64>,
}

impl AiConfig {
    #[must_use]
    pub fn new(difficulty: AiDifficulty) -> Self {
        Self {
            difficulty,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
