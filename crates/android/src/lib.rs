//! Android-specific tools for Skylark
//!
//! This crate provides the Android side of the Skylark tooling:
//! - Release signing configuration loading and validation
//! - Build variant configuration
//! - Flutter project layout and pubspec versions
//! - Gradle wrapper integration
//! - Environment readiness checks
//!
//! # Example
//!
//! ```rust,no_run
//! use skylark_android::{project::FlutterProject, signing};
//!
//! let project = FlutterProject::discover(std::path::Path::new(".")).unwrap();
//! let credentials = signing::load_credentials(&project.properties_path("key.properties"));
//!
//! match credentials {
//!     Ok(Some(creds)) => println!("release signs as {}", creds.key_alias),
//!     Ok(None) => println!("unsigned; release builds will be rejected"),
//!     Err(err) => eprintln!("{}", err),
//! }
//! ```

#![warn(missing_docs)]

pub mod doctor;
pub mod gradle;
pub mod project;
pub mod signing;
pub mod variants;

/// The entries a complete credentials file must define, in resolution order
pub const REQUIRED_KEYS: [&str; 4] = ["keyAlias", "keyPassword", "storeFile", "storePassword"];
