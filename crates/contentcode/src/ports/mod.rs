//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the scoring pipeline
//! interacts with external systems (the model, tabular files).
//!
//! Implementations of these traits live in the CLI's adapters.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
