//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod essay_type;
mod hallmarks;

pub use essay_type::*;
pub use hallmarks::*;
