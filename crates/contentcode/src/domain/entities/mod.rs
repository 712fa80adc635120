//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - EssayRecord: One participant's four responses
//! - EssayScore: A coded score for one essay
//! - Chat: A correlated request/response exchange with the model

mod chat;
mod essay;
mod score;

pub use chat::*;
pub use essay::*;
pub use score::*;
