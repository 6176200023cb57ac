//! Core utilities for Skylark development tools
//!
//! This crate provides shared functionality used across the Android tooling:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Properties files**: The flat `key=value` format Gradle projects use
//!   for credentials and SDK paths
//! - **Process execution**: Safe command execution with output capture
//! - **Configuration**: TOML-based configuration with validation
//! - **Validation**: Fluent checks for credentials, paths, and identifiers
//!
//! # Example
//!
//! ```rust,no_run
//! use skylark_core::properties::Properties;
//!
//! // An absent file is an empty mapping, not an error
//! let props = Properties::load(std::path::Path::new("android/key.properties"))
//!     .expect("unreadable properties file");
//!
//! if let Some(alias) = props.get("keyAlias") {
//!     println!("signing as {}", alias);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod properties;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::properties::Properties;
    pub use crate::validation::{ValidationResult, Validator};
}
