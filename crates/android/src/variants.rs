//! Build variant configuration
//!
//! Mirrors the three variants of a Flutter Android build. Release builds
//! shrink and obfuscate by default and must be signed; debug and profile
//! builds fall back to the debug keystore the SDK provides.

use crate::signing::SigningCredentials;
use skylark_core::config::BuildConfig;
use skylark_core::error::{Error, Result};

/// The variants Gradle has tasks for
pub const VARIANTS: [&str; 3] = ["debug", "profile", "release"];

/// Configuration for a single build variant
#[derive(Debug, Clone)]
pub struct BuildVariantConfig {
    /// Variant name as Gradle knows it
    pub name: String,
    /// Release credentials, when configured
    pub signing: Option<SigningCredentials>,
    /// Enable code shrinking and obfuscation
    pub minify_enabled: bool,
    /// Enable resource shrinking
    pub shrink_resources: bool,
}

impl BuildVariantConfig {
    /// Release variant with shrinking enabled
    pub fn release(signing: Option<SigningCredentials>) -> Self {
        Self {
            name: "release".to_string(),
            signing,
            minify_enabled: true,
            shrink_resources: true,
        }
    }

    /// Debug variant, never shrunk, signed with the SDK debug keystore
    pub fn debug() -> Self {
        Self {
            name: "debug".to_string(),
            signing: None,
            minify_enabled: false,
            shrink_resources: false,
        }
    }

    /// Profile variant for performance measurement
    pub fn profile(signing: Option<SigningCredentials>) -> Self {
        Self {
            name: "profile".to_string(),
            signing,
            minify_enabled: false,
            shrink_resources: false,
        }
    }

    /// Build a variant by name, applying configured shrink flags to release
    pub fn from_config(
        name: &str,
        signing: Option<SigningCredentials>,
        build: &BuildConfig,
    ) -> Result<Self> {
        match name {
            "release" => Ok(Self {
                minify_enabled: build.minify,
                shrink_resources: build.shrink_resources,
                ..Self::release(signing)
            }),
            "profile" => Ok(Self::profile(signing)),
            "debug" => Ok(Self::debug()),
            other => Err(
                Error::validation(format!("Unknown build variant: {}", other))
                    .with_suggestion("Use debug, profile or release"),
            ),
        }
    }

    /// Whether this variant refuses to build without release credentials
    pub fn requires_signing(&self) -> bool {
        self.name == "release"
    }

    /// Whether release credentials are attached
    pub fn is_signed(&self) -> bool {
        self.signing.is_some()
    }

    /// Check the signing requirement
    ///
    /// An unsigned release is rejected here rather than left for Gradle,
    /// which would otherwise produce an APK signed with the debug key that
    /// the Play console rejects much later.
    pub fn validate(&self) -> Result<()> {
        if self.requires_signing() && !self.is_signed() {
            return Err(Error::unsigned_release(&self.name));
        }
        Ok(())
    }

    /// Gradle task that assembles this variant's APK
    pub fn assemble_task(&self) -> String {
        format!("assemble{}", capitalize(&self.name))
    }

    /// Gradle task that builds this variant's app bundle
    pub fn bundle_task(&self) -> String {
        format!("bundle{}", capitalize(&self.name))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
