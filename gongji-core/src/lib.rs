//! Core types and service wiring for the gongji notice aggregator.

/// Domain models shared by all notice sources.
pub mod model;
/// Traits and helpers for plugging source-specific adapters into the service.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Clock abstraction and the daily acceptance window.
pub mod window;

pub use model::*;
pub use ports::*;
pub use service::*;
pub use window::*;
