//! Repository Ports
//!
//! Abstract interfaces for data access.

mod corpus_store;

pub use corpus_store::*;
