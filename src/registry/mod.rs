//! Event Registry Module
//!
//! The event catalog, its registration entries, and the change events it
//! publishes for node lifecycle consumers.

pub mod catalog;
pub mod entry;
pub mod events;

pub use catalog::*;
pub use entry::*;
pub use events::*;
