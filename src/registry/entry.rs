//! Event Registration Entry
//!
//! One (node, event definition, locality) triple, plus the guarded
//! in-process invocation used for local deliveries.

use crate::domain::{Candidate, EventContext, EventDefinition, NodeId};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

// =============================================================================
// Invoke Outcome
// =============================================================================

/// Result of a contained local handler call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// Handler returned normally
    Completed,
    /// Handler returned an error or panicked; the detail was logged
    Failed(String),
}

impl InvokeOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, InvokeOutcome::Completed)
    }
}

// =============================================================================
// Event Entry
// =============================================================================

/// A handler registration for one event on one node
#[derive(Debug, Clone)]
pub struct EventEntry {
    /// Node owning the handler
    target_node: NodeId,
    /// Registered handler metadata
    event: Arc<EventDefinition>,
    /// Handler runs in this process
    is_local: bool,
    /// Registration timestamp
    registered_at: DateTime<Utc>,
}

impl EventEntry {
    pub fn new(target_node: NodeId, event: Arc<EventDefinition>, is_local: bool) -> Self {
        Self {
            target_node,
            event,
            is_local,
            registered_at: Utc::now(),
        }
    }

    pub fn target_node(&self) -> &NodeId {
        &self.target_node
    }

    pub fn event(&self) -> &EventDefinition {
        &self.event
    }

    /// Event name, shorthand for `event().name()`
    pub fn name(&self) -> &str {
        self.event.name()
    }

    pub fn group(&self) -> &str {
        self.event.group()
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Invoke the handler in-process
    ///
    /// Errors and panics raised by the handler are logged and reported as
    /// [`InvokeOutcome::Failed`]; they never propagate to the caller. The only
    /// error returned is [`Error::NotLocal`] for a remote entry.
    pub fn invoke_local(&self, ctx: &EventContext) -> Result<InvokeOutcome> {
        if !self.is_local {
            return Err(Error::NotLocal {
                event: self.name().to_string(),
                node: self.target_node.to_string(),
            });
        }

        let _enter = ctx.span.enter();
        debug!(
            event = %ctx.event_name(),
            service = %self.event.service_name(),
            "Before invoking local event"
        );

        let handler = self.event.handler();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(ctx))) {
            Ok(Ok(())) => InvokeOutcome::Completed,
            Ok(Err(e)) => InvokeOutcome::Failed(format!("{:#}", e)),
            Err(payload) => InvokeOutcome::Failed(panic_message(&*payload)),
        };

        match &outcome {
            InvokeOutcome::Completed => {
                debug!(event = %ctx.event_name(), "After invoking local event");
            }
            InvokeOutcome::Failed(reason) => {
                error!(
                    event = %ctx.event_name(),
                    error = %reason,
                    "Local event handler failed"
                );
            }
        }

        Ok(outcome)
    }
}

impl Candidate for EventEntry {
    fn node_id(&self) -> &NodeId {
        &self.target_node
    }

    fn is_local(&self) -> bool {
        self.is_local
    }
}

impl std::fmt::Display for EventEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EventEntry node -> {} - service: {} - event: {} - group: {}",
            self.target_node,
            self.event.service_name(),
            self.event.name(),
            self.event.group()
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic: <non-string payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry_with(
        handler: impl crate::domain::EventHandler + 'static,
        is_local: bool,
    ) -> EventEntry {
        let event = EventDefinition::new("billing", "order.created", handler);
        EventEntry::new(NodeId::from("node-a"), Arc::new(event), is_local)
    }

    #[test]
    fn test_invoke_local_runs_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let entry = entry_with(
            move |ctx: &EventContext| -> anyhow::Result<()> {
                assert_eq!(ctx.payload()["id"], 42);
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            true,
        );

        let ctx = EventContext::new("order.created", json!({"id": 42}));
        let outcome = entry.invoke_local(&ctx).unwrap();

        assert_eq!(outcome, InvokeOutcome::Completed);
        assert!(outcome.is_completed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invoke_local_contains_panic() {
        let entry = entry_with(
            |_: &EventContext| -> anyhow::Result<()> { panic!("handler exploded") },
            true,
        );

        let ctx = EventContext::new("order.created", json!(null));
        let outcome = entry.invoke_local(&ctx).unwrap();

        assert!(!outcome.is_completed());
        assert_matches!(
            outcome,
            InvokeOutcome::Failed(reason) if reason.contains("handler exploded")
        );
    }

    /// Shared buffer collecting formatted log output
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_invoke_local_logs_contained_panic() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        let entry = entry_with(
            |_: &EventContext| -> anyhow::Result<()> { panic!("ledger offline") },
            true,
        );

        let outcome = tracing::subscriber::with_default(subscriber, || {
            entry.invoke_local(&EventContext::new("order.created", json!(null)))
        });

        assert_matches!(outcome, Ok(InvokeOutcome::Failed(_)));
        let output = logs.contents();
        assert!(output.contains("ERROR"), "captured: {output}");
        assert!(output.contains("order.created"), "captured: {output}");
        assert!(output.contains("panic: ledger offline"), "captured: {output}");
    }

    #[test]
    fn test_invoke_local_contains_error() {
        let entry = entry_with(
            |_: &EventContext| -> anyhow::Result<()> { anyhow::bail!("db unavailable") },
            true,
        );

        let outcome = entry
            .invoke_local(&EventContext::new("order.created", json!(null)))
            .unwrap();

        assert_eq!(outcome, InvokeOutcome::Failed("db unavailable".to_string()));
    }

    #[test]
    fn test_invoke_local_rejects_remote_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let entry = entry_with(
            move |_: &EventContext| -> anyhow::Result<()> {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            false,
        );

        let result = entry.invoke_local(&EventContext::new("order.created", json!(null)));

        assert_matches!(result, Err(Error::NotLocal { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_entry_display() {
        let entry = entry_with(|_: &EventContext| -> anyhow::Result<()> { Ok(()) }, false);
        assert_eq!(
            entry.to_string(),
            "EventEntry node -> node-a - service: billing - event: order.created - group: billing"
        );
    }
}
