//! Configuration components
//!
//! One focused struct per concern; [`crate::ClientConfig`] aggregates them.

pub mod backend;
pub mod chat;
pub mod defaults;
pub mod indexing;

pub use backend::*;
pub use chat::*;
pub use indexing::*;
