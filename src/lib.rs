//! Cluster Event Registry
//!
//! The event dispatch registry of a distributed publish/subscribe layer.
//! Tracks which nodes registered handlers for which named events and, on
//! every emission, decides which handler instances receive the event.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │   Service lifecycle        Cluster discovery        Emission path    │
//! │   (local start/stop)       (remote join/leave)      (emit / receive) │
//! │          │                        │                        │         │
//! │          └──── register / unregister ──────┐               │ next    │
//! │                                            ▼               ▼         │
//! │                           ┌─────────────────────────────────────┐    │
//! │                           │   Event Catalog (DashMap by name)   │    │
//! │                           │   group buckets → local first →     │    │
//! │                           │   single candidate → Strategy       │    │
//! │                           └──────────────────┬──────────────────┘    │
//! │                                              │                       │
//! │                      ┌───────────────────────┴──────────────┐        │
//! │                      ▼                                      ▼        │
//! │              invoke_local (guarded)                 Transport        │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Event catalog, registration entries and change events
//! - [`strategy`]: Load-balancing policies within a consumer group
//! - [`emitter`]: Emission pipeline over the catalog
//! - [`domain`]: Core types and traits
//! - [`topology`]: Static cluster subscription files
//! - [`config`]: Registry configuration
//! - [`error`]: Error types and handling

pub mod config;
pub mod domain;
pub mod emitter;
pub mod error;
pub mod registry;
pub mod strategy;
pub mod topology;

// Re-export commonly used types
pub use config::RegistryConfig;

pub use domain::{
    Candidate, EventContext, EventDefinition, EventHandler, NodeId, Strategy, Transport,
};

pub use emitter::{EmitReport, EventEmitter};

pub use error::{Error, Result};

pub use registry::{
    CatalogEvent, CatalogStatsSnapshot, EventCatalog, EventEntry, InvokeOutcome,
};

pub use strategy::{RandomStrategy, RoundRobinStrategy, StrategyFactory, StrategyKind};

pub use topology::{Subscription, Topology};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
