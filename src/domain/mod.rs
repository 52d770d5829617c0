//! Domain layer - Core types and port definitions
//!
//! This module defines the event metadata types and the traits (ports) that
//! handlers, strategies and transports implement.

pub mod event;
pub mod ports;

pub use event::*;
pub use ports::*;
