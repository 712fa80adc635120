//! Service Ports
//!
//! Abstract interfaces for external services.

mod completion;

pub use completion::*;
