//! CLI utilities for Skylark development tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Status messages
//! - Secret masking for display

#![warn(missing_docs)]

pub mod output;
