//! Domain Ports - Core trait definitions for the event registry
//!
//! These traits define the boundaries between the dispatch registry and the
//! systems around it: user handlers, load-balancing policies and the network
//! transport. Adapters implement these traits to provide concrete behavior.

use super::event::NodeId;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::Span;

// =============================================================================
// Event Context
// =============================================================================

/// Context handed to every handler invocation
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Name of the emitted event
    pub event_name: String,
    /// Arbitrary event payload
    pub payload: Value,
    /// Node that emitted the event, if known
    pub caller: Option<NodeId>,
    /// Groups the emitter targeted (empty = all)
    pub groups: Vec<String>,
    /// Cancellation state owned by the broker
    pub cancellation: CancellationToken,
    /// Structured logger scope for the handler call
    pub span: Span,
}

impl EventContext {
    pub fn new(event_name: impl Into<String>, payload: Value) -> Self {
        let event_name = event_name.into();
        let span = tracing::debug_span!("event", name = %event_name);
        Self {
            event_name,
            payload,
            caller: None,
            groups: Vec::new(),
            cancellation: CancellationToken::new(),
            span,
        }
    }

    pub fn with_caller(mut self, caller: impl Into<NodeId>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn with_groups(mut self, groups: &[String]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Event name
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Event payload
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// A synchronous event handler registered by a local service
pub trait EventHandler: Send + Sync {
    /// Handle one event delivery
    fn handle(&self, ctx: &EventContext) -> anyhow::Result<()>;
}

impl<F> EventHandler for F
where
    F: Fn(&EventContext) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, ctx: &EventContext) -> anyhow::Result<()> {
        self(ctx)
    }
}

// =============================================================================
// Selection Strategy
// =============================================================================

/// An opaque candidate offered to a [`Strategy`]
pub trait Candidate {
    /// Node owning the candidate
    fn node_id(&self) -> &NodeId;

    /// Whether the candidate runs in this process
    fn is_local(&self) -> bool;
}

/// Load-balancing policy picking one of several equally eligible candidates
///
/// Implementations return an index into `candidates`, or `None` to decline.
pub trait Strategy: Send + Sync {
    fn select(&self, candidates: &[&dyn Candidate]) -> Option<usize>;

    /// Policy name for logs
    fn name(&self) -> &str {
        "custom"
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Delivers an event to a handler living on another node
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the event to `node`
    async fn send_event(&self, node: &NodeId, ctx: &EventContext) -> Result<()>;
}
