//! Cluster Topology
//!
//! A static description of which node's services listen to which events.
//! Used by the inspection binary to seed a catalog the way discovery would.

use crate::domain::{EventContext, EventDefinition, NodeId};
use crate::error::Result;
use crate::registry::EventCatalog;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One service subscription on one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub node: NodeId,
    pub service: String,
    pub event: String,
    /// Consumer group; the service name when absent
    #[serde(default)]
    pub group: Option<String>,
}

/// All subscriptions known in the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl Topology {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a topology file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Register every subscription in `catalog`
    ///
    /// Subscriptions of `local_node` become local entries whose handler logs
    /// the delivery. Returns the number of entries registered.
    pub fn apply(&self, catalog: &EventCatalog, local_node: &NodeId) -> usize {
        for sub in &self.subscriptions {
            let service = sub.service.clone();
            let handler = move |ctx: &EventContext| -> anyhow::Result<()> {
                info!(
                    service = %service,
                    event = %ctx.event_name(),
                    payload = %ctx.payload(),
                    "Event delivered"
                );
                Ok(())
            };

            let mut event = EventDefinition::new(&sub.service, &sub.event, handler);
            if let Some(group) = &sub.group {
                event = event.with_group(group);
            }
            catalog.register(&sub.node, event, &sub.node == local_node);
        }
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::strategy::RoundRobinStrategy;
    use assert_matches::assert_matches;

    const TOPOLOGY: &str = r#"{
        "subscriptions": [
            { "node": "node-a", "service": "billing", "event": "order.created" },
            { "node": "node-b", "service": "shipping", "event": "order.created" },
            { "node": "node-c", "service": "ledger", "event": "order.created", "group": "billing" }
        ]
    }"#;

    #[test]
    fn test_parse() {
        let topology = Topology::from_json(TOPOLOGY).unwrap();
        assert_eq!(topology.subscriptions.len(), 3);
        assert_eq!(topology.subscriptions[0].group, None);
        assert_eq!(topology.subscriptions[2].group.as_deref(), Some("billing"));
    }

    #[test]
    fn test_parse_error() {
        assert_matches!(Topology::from_json("{ not json"), Err(Error::JsonParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        assert_matches!(
            Topology::load("/nonexistent/topology.json"),
            Err(Error::Io(_))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, TOPOLOGY.as_bytes()).unwrap();

        let topology = Topology::load(file.path()).unwrap();
        assert_eq!(topology, Topology::from_json(TOPOLOGY).unwrap());
    }

    #[test]
    fn test_apply_marks_local_node() {
        let topology = Topology::from_json(TOPOLOGY).unwrap();
        let catalog = EventCatalog::new();

        assert_eq!(topology.apply(&catalog, &NodeId::from("node-c")), 3);

        let picked = catalog.next("order.created", &RoundRobinStrategy::new(), &[], false);
        assert_eq!(picked.len(), 2);
        let billing = picked.iter().find(|e| e.group() == "billing").unwrap();
        assert_eq!(billing.target_node().as_str(), "node-c");
        assert!(billing.is_local());
    }
}
