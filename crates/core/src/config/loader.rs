//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicitly given path must exist; discovered paths are optional
    /// and fall back to defaults when no config file is present.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
            return Ok(Self {
                schema: load_config_file(p)?,
                path: Some(p.to_string()),
            });
        }

        let config_path = find_config_file();
        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".skylark-tools.toml",
        "skylark-tools.toml",
        ".config/skylark-tools.toml",
    ];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path, e),
        )
        .with_suggestion("Check the TOML syntax; the parse error above names the offending line")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.build.default_variant, "release");
    }

    #[test]
    fn test_config_load_without_file_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.schema.signing.properties_file, "key.properties");
    }

    #[test]
    fn test_config_load_explicit_missing_path_fails() {
        let err = Config::load(Some("/nonexistent/skylark-tools.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_parses_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skylark-tools.toml");
        std::fs::write(
            &path,
            "[signing]\nproperties_file = \"upload.properties\"\nrequire_keystore = false\n\n[build]\ndefault_variant = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.schema.signing.properties_file, "upload.properties");
        assert!(!config.schema.signing.require_keystore);
        assert_eq!(config.schema.build.default_variant, "debug");
        // Unset sections keep their defaults
        assert!(config.schema.build.minify);
    }

    #[test]
    fn test_config_load_invalid_toml_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skylark-tools.toml");
        std::fs::write(&path, "[signing\nbroken").unwrap();

        let err = Config::load(path.to_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }
}
