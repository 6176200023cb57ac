//! Configuration schema definitions

use crate::validation::{validate_application_id, ValidationResult, Validator};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub android: AndroidConfig,
}

impl ConfigSchema {
    /// Validate configuration values
    ///
    /// Catches mistakes that parse fine but break commands later, like a
    /// default variant Gradle has no task for.
    pub fn validate(&self) -> ValidationResult {
        let mut result = Validator::new()
            .pattern(
                "signing.properties_file",
                &self.signing.properties_file,
                r"\.properties$",
                "a .properties file name",
            )
            .one_of(
                "build.default_variant",
                &self.build.default_variant,
                &["debug", "profile", "release"],
            )
            .validate();

        if let Some(id) = &self.android.application_id {
            result.merge(validate_application_id(id));
        }

        result
    }
}

/// General project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Project name
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Project root directory
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            project_dir: default_project_dir(),
        }
    }
}

fn default_project_name() -> String {
    "Skylark".to_string()
}

fn default_project_dir() -> String {
    ".".to_string()
}

/// Signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Name of the credentials file inside the android/ directory
    #[serde(default = "default_properties_file")]
    pub properties_file: String,

    /// Require the keystore file referenced by storeFile to exist
    #[serde(default = "default_true")]
    pub require_keystore: bool,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            properties_file: default_properties_file(),
            require_keystore: true,
        }
    }
}

fn default_properties_file() -> String {
    "key.properties".to_string()
}

fn default_true() -> bool {
    true
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Variant to build when none is given on the command line
    #[serde(default = "default_variant")]
    pub default_variant: String,

    /// Enable code shrinking and obfuscation for release builds
    #[serde(default = "default_true")]
    pub minify: bool,

    /// Enable resource shrinking for release builds
    #[serde(default = "default_true")]
    pub shrink_resources: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_variant: default_variant(),
            minify: true,
            shrink_resources: true,
        }
    }
}

fn default_variant() -> String {
    "release".to_string()
}

/// Android-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AndroidConfig {
    /// Expected application id, checked against the project when set
    #[serde(default)]
    pub application_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.signing.properties_file, "key.properties");
        assert!(schema.signing.require_keystore);
        assert_eq!(schema.build.default_variant, "release");
        assert!(schema.build.minify);
        assert!(schema.build.shrink_resources);
        assert!(schema.android.application_id.is_none());
    }

    #[test]
    fn test_default_schema_validates() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_valid());
    }

    #[test]
    fn test_validate_rejects_unknown_variant() {
        let mut schema = ConfigSchema::default();
        schema.build.default_variant = "staging".to_string();

        let result = schema.validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "build.default_variant");
    }

    #[test]
    fn test_validate_rejects_bad_properties_file_name() {
        let mut schema = ConfigSchema::default();
        schema.signing.properties_file = "key.props".to_string();

        assert!(!schema.validate().is_valid());
    }

    #[test]
    fn test_validate_checks_application_id() {
        let mut schema = ConfigSchema::default();
        schema.android.application_id = Some("not-an-id".to_string());

        assert!(!schema.validate().is_valid());
    }
}
