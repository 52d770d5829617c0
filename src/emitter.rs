//! Event Emitter
//!
//! Thin emission pipeline over the catalog: asks the dispatch selector for
//! the entries of an event, runs local picks in-process and hands remote
//! picks to the transport. A failing delivery never stops its siblings.

use crate::config::RegistryConfig;
use crate::domain::{EventContext, NodeId, Strategy, Transport};
use crate::registry::{EventCatalog, EventEntry, InvokeOutcome};
use crate::strategy::StrategyFactory;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Delivery counts for one emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub local_delivered: usize,
    pub local_failed: usize,
    pub remote_sent: usize,
    pub remote_failed: usize,
}

impl EmitReport {
    /// Total number of entries the emission was routed to
    pub fn targets(&self) -> usize {
        self.local_delivered + self.local_failed + self.remote_sent + self.remote_failed
    }
}

/// Routes emitted events to local handlers and remote nodes
pub struct EventEmitter {
    node_id: NodeId,
    catalog: Arc<EventCatalog>,
    strategy: Arc<dyn Strategy>,
    transport: Arc<dyn Transport>,
}

impl EventEmitter {
    /// Create an emitter using the configured strategy
    pub fn new(
        config: &RegistryConfig,
        catalog: Arc<EventCatalog>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::with_strategy(
            config.node_id.clone(),
            catalog,
            StrategyFactory::create(config.strategy),
            transport,
        )
    }

    pub fn with_strategy(
        node_id: NodeId,
        catalog: Arc<EventCatalog>,
        strategy: Arc<dyn Strategy>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            node_id,
            catalog,
            strategy,
            transport,
        }
    }

    pub fn catalog(&self) -> &Arc<EventCatalog> {
        &self.catalog
    }

    /// Emit `name` to one member of every matching group across the cluster
    pub async fn emit(&self, name: &str, payload: Value, groups: &[String]) -> EmitReport {
        self.dispatch(name, payload, groups, false).await
    }

    /// Emit `name` to local handlers only
    ///
    /// Used when an event arrives from another node that already made the
    /// cluster-wide selection.
    pub async fn emit_local(&self, name: &str, payload: Value, groups: &[String]) -> EmitReport {
        self.dispatch(name, payload, groups, true).await
    }

    async fn dispatch(
        &self,
        name: &str,
        payload: Value,
        groups: &[String],
        local_only: bool,
    ) -> EmitReport {
        let ctx = EventContext::new(name, payload)
            .with_caller(&self.node_id)
            .with_groups(groups);

        let picks = self
            .catalog
            .next(name, self.strategy.as_ref(), groups, local_only);
        debug!(name = %name, picks = picks.len(), local_only, "Dispatching event");

        let (local, remote): (Vec<Arc<EventEntry>>, Vec<Arc<EventEntry>>) =
            picks.into_iter().partition(|entry| entry.is_local());

        let mut report = EmitReport::default();

        for entry in &local {
            match entry.invoke_local(&ctx) {
                Ok(InvokeOutcome::Completed) => report.local_delivered += 1,
                Ok(InvokeOutcome::Failed(_)) => report.local_failed += 1,
                Err(e) => {
                    error!(name = %name, error = %e, "Local dispatch rejected");
                    report.local_failed += 1;
                }
            }
        }

        let sends = remote.iter().map(|entry| {
            let ctx = &ctx;
            async move {
                let result = self.transport.send_event(entry.target_node(), ctx).await;
                (entry, result)
            }
        });

        for (entry, result) in join_all(sends).await {
            match result {
                Ok(()) => report.remote_sent += 1,
                Err(e) => {
                    warn!(
                        name = %name,
                        node = %entry.target_node(),
                        error = %e,
                        "Remote event delivery failed"
                    );
                    report.remote_failed += 1;
                }
            }
        }

        report
    }
}
