//! Event Registry Inspector
//!
//! Seeds an event catalog from a cluster topology file and shows how events
//! would be dispatched from the point of view of one node.

use async_trait::async_trait;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cluster_event_registry::{
    EventCatalog, EventContext, EventEmitter, NodeId, RegistryConfig, Result, StrategyFactory,
    StrategyKind, Topology, Transport,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Event Registry Inspector - dispatch plans for a cluster topology
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ID of the node whose registry is simulated
    #[arg(long, env = "NODE_ID", default_value = "local")]
    node_id: String,

    /// Load-balancing strategy (round_robin, random)
    #[arg(long, env = "STRATEGY", default_value = "round_robin")]
    strategy: StrategyKind,

    /// Topology file (JSON)
    #[arg(long, env = "TOPOLOGY")]
    topology: Option<String>,

    /// Event names to plan (repeatable)
    #[arg(long = "event")]
    events: Vec<String>,

    /// Restrict dispatch to these groups (repeatable)
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Only consider handlers on this node
    #[arg(long)]
    local_only: bool,

    /// Deliver the events instead of printing the plan
    #[arg(long)]
    emit: bool,

    /// JSON payload used with --emit
    #[arg(long, default_value = "null")]
    payload: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = RegistryConfig {
        node_id: NodeId::new(args.node_id.clone()),
        strategy: args.strategy,
        ..Default::default()
    };
    config.validate()?;

    info!("Starting event registry inspector");
    info!("  Version: {}", cluster_event_registry::VERSION);
    info!("  Node: {}", config.node_id);
    info!("  Strategy: {}", config.strategy);

    let catalog = EventCatalog::from_config(&config);

    if let Some(path) = &args.topology {
        let topology = Topology::load(path)?;
        let count = topology.apply(&catalog, &config.node_id);
        info!("Loaded {} subscriptions from {}", count, path);
    }

    let events = if args.events.is_empty() {
        catalog.event_names()
    } else {
        args.events.clone()
    };

    if args.emit {
        let payload: serde_json::Value = serde_json::from_str(&args.payload)?;
        let emitter = EventEmitter::new(&config, Arc::clone(&catalog), Arc::new(LoggingTransport));
        for name in &events {
            let report = if args.local_only {
                emitter.emit_local(name, payload.clone(), &args.groups).await
            } else {
                emitter.emit(name, payload.clone(), &args.groups).await
            };
            println!(
                "{}: local {} ok / {} failed, remote {} sent / {} failed",
                name,
                report.local_delivered,
                report.local_failed,
                report.remote_sent,
                report.remote_failed
            );
        }
    } else {
        let strategy = StrategyFactory::create(config.strategy);
        for name in &events {
            let picks = catalog.next(name, strategy.as_ref(), &args.groups, args.local_only);
            println!("{} ({} targets)", name, picks.len());
            for entry in picks {
                let locality = if entry.is_local() { "local" } else { "remote" };
                println!(
                    "  [{}] {} (registered {})",
                    locality,
                    entry,
                    entry.registered_at().to_rfc3339()
                );
            }
        }
    }

    let stats = catalog.stats();
    info!(
        "Catalog: {} event names, {} entries, {} selections",
        stats.event_names, stats.entries, stats.selections
    );

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Stand-in transport that only logs remote deliveries
struct LoggingTransport;

#[async_trait]
impl Transport for LoggingTransport {
    async fn send_event(&self, node: &NodeId, ctx: &EventContext) -> Result<()> {
        info!(node = %node, event = %ctx.event_name(), "Would send event to remote node");
        Ok(())
    }
}
