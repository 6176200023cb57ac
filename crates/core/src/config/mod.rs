//! Configuration loading and schema definitions
//!
//! Shared configuration types used across all commands.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
