//! Flutter project model
//!
//! Locates the files the Android tooling cares about inside a Flutter
//! project: the Gradle build under `android/`, the app module under
//! `android/app/`, the credentials and SDK properties files, and the
//! version declared in `pubspec.yaml`.

use once_cell::sync::Lazy;
use regex::Regex;
use skylark_core::error::{Error, Result};
use skylark_core::properties::Properties;
use skylark_core::validation::{ValidationError, ValidationResult, Validator};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Highest versionCode the Play console accepts
const MAX_VERSION_CODE: u32 = 2_100_000_000;

/// Top-level `version:` line in pubspec.yaml
static VERSION_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^version:\s*(\S+)\s*$").expect("valid regex"));

/// Directories never scanned for keystores
const SKIPPED_DIRS: &[&str] = &["build", ".gradle", ".dart_tool", ".git", ".idea"];

/// A Flutter project rooted at the directory containing pubspec.yaml
#[derive(Debug, Clone)]
pub struct FlutterProject {
    root: PathBuf,
}

impl FlutterProject {
    /// Open a project at the given root
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.join("pubspec.yaml").is_file() {
            return Err(Error::project_not_found(&root));
        }
        Ok(Self { root })
    }

    /// Walk up from a directory to find the enclosing project
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            if dir.join("pubspec.yaml").is_file() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
        }
        Err(Error::project_not_found(start))
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The Gradle build directory
    pub fn android_dir(&self) -> PathBuf {
        self.root.join("android")
    }

    /// The app module directory, which relative keystore paths resolve against
    pub fn app_dir(&self) -> PathBuf {
        self.android_dir().join("app")
    }

    /// Whether the project has an Android build at all
    pub fn has_android(&self) -> bool {
        self.app_dir().is_dir()
    }

    /// Path to a properties file inside the android/ directory
    pub fn properties_path(&self, file_name: &str) -> PathBuf {
        self.android_dir().join(file_name)
    }

    /// Path to local.properties
    pub fn local_properties_path(&self) -> PathBuf {
        self.properties_path("local.properties")
    }

    /// Load local.properties, empty when absent
    pub fn local_properties(&self) -> Result<Properties> {
        Properties::load(&self.local_properties_path())
    }

    /// Android SDK location from local.properties
    pub fn sdk_dir(&self) -> Result<Option<PathBuf>> {
        Ok(self.local_properties()?.get("sdk.dir").map(PathBuf::from))
    }

    /// Flutter SDK location from local.properties
    pub fn flutter_sdk(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .local_properties()?
            .get("flutter.sdk")
            .map(PathBuf::from))
    }

    /// Version declared in pubspec.yaml
    pub fn version(&self) -> Result<FlutterVersion> {
        let pubspec = self.root.join("pubspec.yaml");
        let content = std::fs::read_to_string(&pubspec).map_err(|e| {
            Error::pubspec(format!("Failed to read {}: {}", pubspec.display(), e))
        })?;

        let captured = VERSION_LINE_RE
            .captures(&content)
            .and_then(|c| c.get(1))
            .ok_or_else(|| {
                Error::pubspec("pubspec.yaml has no version field").with_suggestion(
                    "Add a line like: version: 1.0.0+1 (build number after the +)",
                )
            })?;

        FlutterVersion::parse(captured.as_str())
    }

    /// Basic layout checks shared by check and doctor
    pub fn validate_layout(&self) -> ValidationResult {
        Validator::new()
            .is_file("pubspec.yaml", &self.root.join("pubspec.yaml"))
            .is_directory("android", &self.android_dir())
            .is_directory("android/app", &self.app_dir())
            .validate()
    }

    /// Find keystore files anywhere in the project tree
    ///
    /// Build output and VCS directories are skipped. Used to warn about
    /// keystores sitting where they might get committed.
    pub fn find_keystores(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root).into_iter().filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
        });

        for entry in walker.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let is_keystore = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("jks") || e.eq_ignore_ascii_case("keystore"));
            if is_keystore {
                found.push(entry.into_path());
            }
        }

        found.sort();
        found
    }

    /// Keystores in the tree other than the configured one
    ///
    /// The keystore `storeFile` points at is expected to be present;
    /// anything else is a stray worth flagging before it gets committed.
    pub fn stray_keystores(&self, configured: Option<&Path>) -> Vec<PathBuf> {
        self.find_keystores()
            .into_iter()
            .filter(|path| configured != Some(path.as_path()))
            .collect()
    }
}

/// Version from pubspec.yaml: a semver name plus an optional build number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterVersion {
    /// The user-visible version name, e.g. "1.2.3"
    pub name: String,
    /// The monotonically increasing versionCode after the '+'
    pub code: Option<u32>,
}

impl FlutterVersion {
    /// Parse a `name+code` version string
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once('+') {
            None => Ok(Self {
                name: raw.to_string(),
                code: None,
            }),
            Some((name, code)) => {
                let code = code.parse::<u32>().map_err(|_| {
                    Error::pubspec(format!("Invalid build number in version '{}'", raw))
                        .with_suggestion("The part after '+' must be a positive integer")
                })?;
                Ok(Self {
                    name: name.to_string(),
                    code: Some(code),
                })
            }
        }
    }

    /// The version name as a semantic version
    pub fn semver(&self) -> Result<semver::Version> {
        semver::Version::parse(&self.name).map_err(|e| {
            Error::pubspec(format!("Version '{}' is not semantic: {}", self.name, e))
                .with_suggestion("Use major.minor.patch, e.g. 1.2.3")
        })
    }

    /// Check the version is something the Play console will accept
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.semver().is_err() {
            result.add_error(ValidationError {
                field: "version".to_string(),
                message: format!("'{}' is not a semantic version", self.name),
                code: "SEMVER".to_string(),
                expected: Some("major.minor.patch".to_string()),
                actual: Some(self.name.clone()),
            });
        }

        if let Some(code) = self.code {
            result.merge(
                Validator::new()
                    .range("versionCode", code, 1, MAX_VERSION_CODE)
                    .validate(),
            );
        }

        result
    }
}

impl std::fmt::Display for FlutterVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}+{}", self.name, code),
            None => write!(f, "{}", self.name),
        }
    }
}
