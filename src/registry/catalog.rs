//! Event Catalog
//!
//! Maps event names to the handler registrations known across the cluster
//! and selects, per emission, which registrations receive the event.
//!
//! Storage is a DashMap keyed by event name, so every mutation and every
//! read snapshot of one name's list happens under that key's shard lock.
//! Selection works on a cloned list of `Arc` handles and never holds a lock
//! while grouping, calling the strategy or running handlers.

use super::entry::EventEntry;
use super::events::CatalogEvent;
use crate::config::RegistryConfig;
use crate::domain::{Candidate, EventDefinition, NodeId, Strategy};
use dashmap::DashMap;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

// =============================================================================
// Constants
// =============================================================================

/// Default capacity of the change feed channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

// =============================================================================
// Catalog Statistics
// =============================================================================

/// Counters maintained by the catalog
#[derive(Debug, Default)]
pub struct CatalogStats {
    /// Register calls
    pub registrations: AtomicU64,
    /// Entries removed by unregister calls
    pub unregistrations: AtomicU64,
    /// Calls to `next`
    pub selections: AtomicU64,
}

/// Snapshot of catalog statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStatsSnapshot {
    pub registrations: u64,
    pub unregistrations: u64,
    pub selections: u64,
    pub event_names: usize,
    pub entries: usize,
}

// =============================================================================
// Event Catalog
// =============================================================================

/// Registry of event handlers across the cluster
pub struct EventCatalog {
    /// Entries per event name
    events: DashMap<String, Vec<Arc<EventEntry>>>,
    /// Counters
    stats: CatalogStats,
    /// Change feed
    event_sender: broadcast::Sender<CatalogEvent>,
}

impl std::fmt::Debug for EventCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCatalog")
            .field("event_names", &self.events.len())
            .finish()
    }
}

impl EventCatalog {
    /// Create a new, empty catalog
    pub fn new() -> Arc<Self> {
        Self::with_channel_capacity(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// Create a catalog from registry configuration
    pub fn from_config(config: &RegistryConfig) -> Arc<Self> {
        Self::with_channel_capacity(config.event_channel_capacity)
    }

    /// Create a catalog whose change feed buffers `capacity` events
    pub fn with_channel_capacity(capacity: usize) -> Arc<Self> {
        let (event_sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self {
            events: DashMap::new(),
            stats: CatalogStats::default(),
            event_sender,
        })
    }

    /// Get a receiver for catalog change events
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.event_sender.subscribe()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Register a handler of `node` for the event named by `event`
    ///
    /// Registrations accumulate: registering the same handler twice yields
    /// two entries.
    pub fn register(&self, node: impl Into<NodeId>, event: EventDefinition, is_local: bool) {
        let node = node.into();
        let name = event.name().to_string();
        debug!(
            name = %name,
            service = %event.service_name(),
            node = %node,
            local = is_local,
            "Registering event handler"
        );

        let notice = CatalogEvent::EntryRegistered {
            node_id: node.to_string(),
            event_name: name.clone(),
            service_name: event.service_name().to_string(),
            group: event.group().to_string(),
            local: is_local,
        };

        let entry = Arc::new(EventEntry::new(node, Arc::new(event), is_local));
        self.events.entry(name).or_default().push(entry);
        self.stats.registrations.fetch_add(1, Ordering::Relaxed);

        let _ = self.event_sender.send(notice);
    }

    /// Remove every entry of `node` registered under `name`
    ///
    /// Entries of other nodes keep their relative order. Returns the number
    /// of entries removed.
    pub fn unregister(&self, node: impl Into<NodeId>, name: &str) -> usize {
        let node = node.into();

        let removed = match self.events.get_mut(name) {
            Some(mut entries) => {
                let before = entries.len();
                entries.retain(|entry| entry.target_node() != &node);
                before - entries.len()
            }
            None => 0,
        };
        self.events.remove_if(name, |_, entries| entries.is_empty());

        if removed > 0 {
            debug!(name = %name, node = %node, removed, "Unregistered event handlers");
            self.stats
                .unregistrations
                .fetch_add(removed as u64, Ordering::Relaxed);
            let _ = self.event_sender.send(CatalogEvent::EntriesUnregistered {
                node_id: node.to_string(),
                event_name: name.to_string(),
                removed,
            });
        }

        removed
    }

    /// Reserved for payload schema metadata; currently leaves the catalog unchanged
    pub fn update_metadata(
        &self,
        node: impl Into<NodeId>,
        name: &str,
        updates: &HashMap<String, Value>,
    ) {
        let node = node.into();
        trace!(name = %name, node = %node, keys = updates.len(), "Ignoring event metadata update");
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select the entries that receive one emission of `name`
    ///
    /// Returns one entry per group: a local entry when the group has one, the
    /// sole entry of a single-member group, otherwise the strategy's pick.
    /// `groups` restricts the groups considered (empty = all); `local_only`
    /// drops remote entries before grouping.
    pub fn next(
        &self,
        name: &str,
        strategy: &dyn Strategy,
        groups: &[String],
        local_only: bool,
    ) -> Vec<Arc<EventEntry>> {
        self.stats.selections.fetch_add(1, Ordering::Relaxed);

        let mut buckets: BTreeMap<String, Vec<Arc<EventEntry>>> = BTreeMap::new();
        for entry in self.entries(name) {
            if local_only && !entry.is_local() {
                continue;
            }
            if !matches_group(&entry, groups) {
                continue;
            }
            buckets
                .entry(entry.group().to_string())
                .or_default()
                .push(entry);
        }

        let mut selected = Vec::with_capacity(buckets.len());
        for (group, bucket) in buckets {
            let local = bucket.iter().position(|entry| entry.is_local());
            if let Some(index) = local {
                selected.push(Arc::clone(&bucket[index]));
            } else if bucket.len() == 1 {
                selected.extend(bucket);
            } else {
                let candidates: Vec<&dyn Candidate> =
                    bucket.iter().map(|entry| &**entry as &dyn Candidate).collect();
                match strategy.select(&candidates) {
                    Some(index) if index < bucket.len() => {
                        selected.push(Arc::clone(&bucket[index]));
                    }
                    Some(index) => {
                        warn!(
                            name = %name,
                            group = %group,
                            index,
                            strategy = strategy.name(),
                            "Strategy selected an index outside the candidate set"
                        );
                    }
                    None => {
                        trace!(
                            name = %name,
                            group = %group,
                            strategy = strategy.name(),
                            "Strategy declined all candidates"
                        );
                    }
                }
            }
        }

        trace!(name = %name, picks = selected.len(), "Selected event entries");
        selected
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of the entries registered under `name`
    pub fn entries(&self, name: &str) -> Vec<Arc<EventEntry>> {
        self.events
            .get(name)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }

    /// Names that currently hold at least one entry, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.iter().map(|item| item.key().clone()).collect();
        names.sort();
        names
    }

    /// Check whether a local handler is registered for `name`
    pub fn has_local(&self, name: &str) -> bool {
        self.events
            .get(name)
            .map(|entries| entries.iter().any(|entry| entry.is_local()))
            .unwrap_or(false)
    }

    /// Total number of entries across all names
    pub fn len(&self) -> usize {
        self.events.iter().map(|item| item.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get catalog statistics
    pub fn stats(&self) -> CatalogStatsSnapshot {
        CatalogStatsSnapshot {
            registrations: self.stats.registrations.load(Ordering::Relaxed),
            unregistrations: self.stats.unregistrations.load(Ordering::Relaxed),
            selections: self.stats.selections.load(Ordering::Relaxed),
            event_names: self.events.len(),
            entries: self.len(),
        }
    }
}

fn matches_group(entry: &EventEntry, groups: &[String]) -> bool {
    groups.is_empty() || groups.iter().any(|group| group == entry.group())
}
