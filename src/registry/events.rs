//! Catalog Events
//!
//! Events emitted by the event catalog so external consumers can follow
//! registration changes.

use serde::{Deserialize, Serialize};

/// Events emitted by the event catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    /// A handler registration was added
    EntryRegistered {
        node_id: String,
        event_name: String,
        service_name: String,
        group: String,
        local: bool,
    },

    /// Registrations of a node were removed for one event name
    EntriesUnregistered {
        node_id: String,
        event_name: String,
        removed: usize,
    },
}

impl CatalogEvent {
    /// Get the node ID associated with this event
    pub fn node_id(&self) -> &str {
        match self {
            CatalogEvent::EntryRegistered { node_id, .. } => node_id,
            CatalogEvent::EntriesUnregistered { node_id, .. } => node_id,
        }
    }

    /// Get the event name associated with this event
    pub fn event_name(&self) -> &str {
        match self {
            CatalogEvent::EntryRegistered { event_name, .. } => event_name,
            CatalogEvent::EntriesUnregistered { event_name, .. } => event_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let event = CatalogEvent::EntriesUnregistered {
            node_id: "node-b".to_string(),
            event_name: "order.created".to_string(),
            removed: 2,
        };
        assert_eq!(event.node_id(), "node-b");
        assert_eq!(event.event_name(), "order.created");
    }

    #[test]
    fn test_event_serializes_with_variant_tag() {
        let event = CatalogEvent::EntryRegistered {
            node_id: "node-a".to_string(),
            event_name: "order.created".to_string(),
            service_name: "billing".to_string(),
            group: "billing".to_string(),
            local: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["EntryRegistered"]["node_id"], "node-a");
        assert_eq!(json["EntryRegistered"]["local"], true);
    }
}
