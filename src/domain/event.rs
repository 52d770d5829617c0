//! Event Definitions
//!
//! Identity of cluster nodes and the metadata a service publishes for each
//! event it listens to.

use super::ports::EventHandler;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Node ID
// =============================================================================

/// Unique identifier for a cluster node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&String> for NodeId {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

// =============================================================================
// Event Definition
// =============================================================================

/// Handler metadata registered by a service for one event name
#[derive(Clone)]
pub struct EventDefinition {
    name: String,
    service_name: String,
    group: String,
    handler: Arc<dyn EventHandler>,
}

impl EventDefinition {
    /// Create a definition whose group is the owning service name
    pub fn new(
        service_name: impl Into<String>,
        name: impl Into<String>,
        handler: impl EventHandler + 'static,
    ) -> Self {
        let service_name = service_name.into();
        Self {
            name: name.into(),
            group: service_name.clone(),
            service_name,
            handler: Arc::new(handler),
        }
    }

    /// Override the consumer group label
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Event name this handler listens to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the service owning the handler
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Consumer group label (may be empty)
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn handler(&self) -> Arc<dyn EventHandler> {
        Arc::clone(&self.handler)
    }
}

impl std::fmt::Debug for EventDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDefinition")
            .field("name", &self.name)
            .field("service_name", &self.service_name)
            .field("group", &self.group)
            .finish()
    }
}
