//! Registry Configuration

use crate::domain::NodeId;
use crate::error::{Error, Result};
use crate::registry::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};

/// Configuration of the event registry on one node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// ID of the node holding this registry
    pub node_id: NodeId,
    /// Load-balancing policy within a group
    pub strategy: StrategyKind,
    /// Buffered change events per subscriber
    pub event_channel_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            node_id: NodeId::new("local"),
            strategy: StrategyKind::default(),
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Reject configurations the registry cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.node_id.as_str().trim().is_empty() {
            return Err(Error::Configuration("node_id must not be empty".into()));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::Configuration(
                "event_channel_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
