//! Selection Strategies
//!
//! Load-balancing policies used to pick one member of a consumer group when
//! no local handler is available:
//! - Round robin: rotates through candidates
//! - Random: uniform pick

pub mod random;
pub mod round_robin;

pub use random::*;
pub use round_robin::*;

use crate::domain::Strategy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Built-in strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RoundRobin,
    Random,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::RoundRobin => write!(f, "round_robin"),
            StrategyKind::Random => write!(f, "random"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "round_robin" | "roundrobin" => Ok(StrategyKind::RoundRobin),
            "random" => Ok(StrategyKind::Random),
            _ => Err(Error::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Factory for creating selection strategies
pub struct StrategyFactory;

impl StrategyFactory {
    /// Create a strategy of the given kind
    pub fn create(kind: StrategyKind) -> Arc<dyn Strategy> {
        match kind {
            StrategyKind::RoundRobin => Arc::new(RoundRobinStrategy::new()),
            StrategyKind::Random => Arc::new(RandomStrategy::new()),
        }
    }

    /// Create a strategy by name
    pub fn by_name(name: &str) -> Result<Arc<dyn Strategy>> {
        Ok(Self::create(name.parse()?))
    }
}
