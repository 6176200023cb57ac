//! Environment and project readiness checks
//!
//! The doctor answers one question: will a release build work on this
//! machine? It verifies the toolchain (JVM, Flutter, keytool), the project
//! layout, the SDK paths in local.properties, the pubspec version, and the
//! signing configuration, and aggregates everything into a report that can
//! render as text or JSON.

use crate::signing;
use crate::{gradle, project::FlutterProject};
use serde::{Deserialize, Serialize};
use skylark_core::config::ConfigSchema;
use skylark_core::process::{command_exists, run_command, which_command};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check passed
    Pass,
    /// Something is off but builds can proceed
    Warn,
    /// Builds will not work until this is fixed
    Fail,
}

impl CheckStatus {
    /// Returns true if the check passed outright
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckStatus::Pass)
    }

    /// Returns true unless the check failed hard
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, CheckStatus::Pass | CheckStatus::Warn)
    }
}

/// Individual check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Status of the check
    pub status: CheckStatus,
    /// Optional message with details
    pub message: Option<String>,
    /// Duration of the check in milliseconds
    pub duration_ms: u64,
    /// Additional details as key-value pairs
    pub details: HashMap<String, String>,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            message: None,
            duration_ms: 0,
            details: HashMap::new(),
        }
    }

    /// Create a warning check result with a message
    pub fn warn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warn,
            message: Some(message.into()),
            duration_ms: 0,
            details: HashMap::new(),
        }
    }

    /// Create a failing check result with a message
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            message: Some(message.into()),
            duration_ms: 0,
            details: HashMap::new(),
        }
    }

    /// Set the duration of the check
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Add a detail key-value pair
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Aggregated report over all checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    /// Overall status, the worst of all checks
    pub status: CheckStatus,
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Total duration of all checks in milliseconds
    pub total_duration_ms: u64,
    /// Timestamp when the report was generated
    pub timestamp: String,
    /// Version of the tool
    pub version: String,
}

impl DoctorReport {
    /// Create a new report from check results
    #[must_use]
    pub fn new(checks: Vec<CheckResult>, duration: Duration) -> Self {
        let status = if checks.iter().any(|c| c.status == CheckStatus::Fail) {
            CheckStatus::Fail
        } else if checks.iter().any(|c| c.status == CheckStatus::Warn) {
            CheckStatus::Warn
        } else {
            CheckStatus::Pass
        };

        Self {
            status,
            checks,
            total_duration_ms: duration.as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Returns true when release builds can be attempted
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.is_operational()
    }

    /// Get all checks that did not pass
    #[must_use]
    pub fn flagged_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.status.is_pass()).collect()
    }
}

/// Trait for implementing doctor checks
pub trait DoctorCheck: Send + Sync {
    /// Perform the check and return a result
    fn check(&self) -> CheckResult;
}

/// Doctor with configurable checks
pub struct Doctor {
    checks: Vec<Box<dyn DoctorCheck>>,
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new()
    }
}

impl Doctor {
    /// Create a doctor with no checks
    #[must_use]
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a check
    pub fn add_check(mut self, check: impl DoctorCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// The standard check set for a Flutter Android project
    #[must_use]
    pub fn standard(project: &FlutterProject, schema: &ConfigSchema) -> Self {
        Self::new()
            .add_check(ToolCheck::required("java", Some("-version")))
            .add_check(ToolCheck::optional("flutter", Some("--version")))
            .add_check(ToolCheck::optional("keytool", None))
            .add_check(EnvVarCheck::optional("ANDROID_HOME"))
            .add_check(LayoutCheck::new(project))
            .add_check(WrapperCheck::new(project))
            .add_check(SdkCheck::new(project))
            .add_check(VersionCheck::new(project))
            .add_check(SigningCheck::new(project, schema))
            .add_check(KeystoreHygieneCheck::new(project, schema))
    }

    /// Run all checks
    #[must_use]
    pub fn run(&self) -> DoctorReport {
        let start = Instant::now();
        let mut results = Vec::new();

        for check in &self.checks {
            let check_start = Instant::now();
            let mut result = check.check();
            result.duration_ms = check_start.elapsed().as_millis() as u64;
            results.push(result);
        }

        DoctorReport::new(results, start.elapsed())
    }
}

/// Check that a command line tool is installed
pub struct ToolCheck {
    command: String,
    version_arg: Option<String>,
    required: bool,
}

impl ToolCheck {
    /// A tool builds cannot run without
    pub fn required(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            command: command.into(),
            version_arg: version_arg.map(String::from),
            required: true,
        }
    }

    /// A tool that is useful but not strictly needed
    pub fn optional(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            command: command.into(),
            version_arg: version_arg.map(String::from),
            required: false,
        }
    }
}

impl DoctorCheck for ToolCheck {
    fn check(&self) -> CheckResult {
        if !command_exists(&self.command) {
            return if self.required {
                CheckResult::fail(
                    &self.command,
                    format!("{} is not installed", self.command),
                )
            } else {
                CheckResult::warn(
                    &self.command,
                    format!("{} is not installed (optional)", self.command),
                )
            };
        }

        let mut result = CheckResult::pass(&self.command);
        if let Some(path) = which_command(&self.command) {
            result = result.with_detail("path", path.display().to_string());
        }

        if let Some(ref arg) = self.version_arg {
            if let Ok(output) = run_command(&self.command, &[arg]) {
                if output.success {
                    // JVM tools print the version banner to stderr
                    let banner = output.combined_output();
                    let version = banner.lines().next().unwrap_or("").trim().to_string();
                    result = result.with_detail("version", version);
                }
            }
        }

        result
    }
}

/// Check that an environment variable is set
pub struct EnvVarCheck {
    var_name: String,
    required: bool,
}

impl EnvVarCheck {
    /// A variable the build requires
    pub fn required(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            required: true,
        }
    }

    /// A variable with a fallback elsewhere
    pub fn optional(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            required: false,
        }
    }
}

impl DoctorCheck for EnvVarCheck {
    fn check(&self) -> CheckResult {
        match std::env::var(&self.var_name) {
            Ok(value) => CheckResult::pass(&self.var_name).with_detail(
                "value",
                if value.len() > 50 {
                    format!("{}...", &value[..50])
                } else {
                    value
                },
            ),
            Err(_) => {
                if self.required {
                    CheckResult::fail(&self.var_name, format!("{} is not set", self.var_name))
                } else {
                    CheckResult::warn(
                        &self.var_name,
                        format!("{} is not set (optional)", self.var_name),
                    )
                }
            }
        }
    }
}

/// Check the expected project directories exist
pub struct LayoutCheck {
    project: FlutterProject,
}

impl LayoutCheck {
    /// Check the layout of the given project
    pub fn new(project: &FlutterProject) -> Self {
        Self {
            project: project.clone(),
        }
    }
}

impl DoctorCheck for LayoutCheck {
    fn check(&self) -> CheckResult {
        let result = self.project.validate_layout();
        if result.is_valid() {
            CheckResult::pass("layout")
        } else {
            let detail = result
                .errors()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            CheckResult::fail("layout", detail)
        }
    }
}

/// Check the Gradle wrapper is committed
pub struct WrapperCheck {
    project: FlutterProject,
}

impl WrapperCheck {
    /// Check the wrapper of the given project
    pub fn new(project: &FlutterProject) -> Self {
        Self {
            project: project.clone(),
        }
    }
}

impl DoctorCheck for WrapperCheck {
    fn check(&self) -> CheckResult {
        if gradle::has_wrapper(&self.project.android_dir()) {
            CheckResult::pass("gradle-wrapper")
        } else {
            CheckResult::fail(
                "gradle-wrapper",
                "gradlew is missing from the android/ directory",
            )
        }
    }
}

/// Check SDK locations recorded in local.properties
pub struct SdkCheck {
    project: FlutterProject,
}

impl SdkCheck {
    /// Check the SDK paths of the given project
    pub fn new(project: &FlutterProject) -> Self {
        Self {
            project: project.clone(),
        }
    }
}

impl DoctorCheck for SdkCheck {
    fn check(&self) -> CheckResult {
        match self.project.sdk_dir() {
            Err(e) => CheckResult::fail("android-sdk", e.message),
            Ok(None) => CheckResult::warn(
                "android-sdk",
                "sdk.dir is not set in local.properties; Flutter regenerates it on the next build",
            ),
            Ok(Some(path)) if !path.is_dir() => CheckResult::fail(
                "android-sdk",
                format!("sdk.dir points at a missing directory: {}", path.display()),
            ),
            Ok(Some(path)) => {
                CheckResult::pass("android-sdk").with_detail("sdk.dir", path.display().to_string())
            }
        }
    }
}

/// Check the version declared in pubspec.yaml
pub struct VersionCheck {
    project: FlutterProject,
}

impl VersionCheck {
    /// Check the version of the given project
    pub fn new(project: &FlutterProject) -> Self {
        Self {
            project: project.clone(),
        }
    }
}

impl DoctorCheck for VersionCheck {
    fn check(&self) -> CheckResult {
        match self.project.version() {
            Err(e) => CheckResult::fail("version", e.message),
            Ok(version) => {
                let result = version.validate();
                if result.is_valid() {
                    CheckResult::pass("version").with_detail("version", version.to_string())
                } else {
                    CheckResult::fail("version", result.errors()[0].to_string())
                }
            }
        }
    }
}

/// Check the release signing configuration
pub struct SigningCheck {
    project: FlutterProject,
    properties_file: String,
    require_keystore: bool,
}

impl SigningCheck {
    /// Check the signing setup of the given project
    pub fn new(project: &FlutterProject, schema: &ConfigSchema) -> Self {
        Self {
            project: project.clone(),
            properties_file: schema.signing.properties_file.clone(),
            require_keystore: schema.signing.require_keystore,
        }
    }
}

impl DoctorCheck for SigningCheck {
    fn check(&self) -> CheckResult {
        let path = self.project.properties_path(&self.properties_file);

        match signing::load_credentials(&path) {
            Err(e) => CheckResult::fail("signing", e.message),
            Ok(None) => CheckResult::warn(
                "signing",
                format!(
                    "{} not found; release builds will be rejected",
                    self.properties_file
                ),
            ),
            Ok(Some(credentials)) => {
                let result = signing::validate(
                    &credentials,
                    &self.project.app_dir(),
                    self.require_keystore,
                );

                if !result.is_valid() {
                    CheckResult::fail("signing", result.errors()[0].to_string())
                } else if let Some(warning) = result.warnings().first() {
                    CheckResult::warn("signing", warning.to_string())
                        .with_detail("keyAlias", &credentials.key_alias)
                } else {
                    CheckResult::pass("signing")
                        .with_detail("keyAlias", &credentials.key_alias)
                        .with_detail(
                            "storeFile",
                            credentials.store_file.display().to_string(),
                        )
                }
            }
        }
    }
}

/// Flag keystores lying around the project tree
pub struct KeystoreHygieneCheck {
    project: FlutterProject,
    properties_file: String,
}

impl KeystoreHygieneCheck {
    /// Scan the given project for stray keystores
    pub fn new(project: &FlutterProject, schema: &ConfigSchema) -> Self {
        Self {
            project: project.clone(),
            properties_file: schema.signing.properties_file.clone(),
        }
    }
}

impl DoctorCheck for KeystoreHygieneCheck {
    fn check(&self) -> CheckResult {
        let path = self.project.properties_path(&self.properties_file);
        let configured = signing::load_credentials(&path)
            .ok()
            .flatten()
            .map(|c| c.store_file_path(&self.project.app_dir()));

        let strays = self.project.stray_keystores(configured.as_deref());
        if strays.is_empty() {
            CheckResult::pass("keystore-hygiene")
        } else {
            CheckResult::warn(
                "keystore-hygiene",
                format!(
                    "found {} keystore file(s) not referenced by {}; make sure they are gitignored",
                    strays.len(),
                    self.properties_file
                ),
            )
            .with_detail("first", strays[0].display().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture_project() -> (TempDir, FlutterProject) {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pubspec.yaml"),
            "name: skylark_app\nversion: 1.2.3+45\n",
        )
        .unwrap();
        std::fs::create_dir_all(temp.path().join("android/app")).unwrap();
        let project = FlutterProject::open(temp.path()).unwrap();
        (temp, project)
    }

    #[test]
    fn test_report_aggregates_worst_status() {
        let checks = vec![
            CheckResult::pass("a"),
            CheckResult::warn("b", "meh"),
            CheckResult::fail("c", "broken"),
        ];
        let report = DoctorReport::new(checks, Duration::from_millis(5));

        assert_eq!(report.status, CheckStatus::Fail);
        assert!(!report.is_ready());
        assert_eq!(report.flagged_checks().len(), 2);
    }

    #[test]
    fn test_warnings_do_not_block_readiness() {
        let checks = vec![CheckResult::pass("a"), CheckResult::warn("b", "meh")];
        let report = DoctorReport::new(checks, Duration::from_millis(5));

        assert_eq!(report.status, CheckStatus::Warn);
        assert!(report.is_ready());
    }

    #[test]
    fn test_optional_tool_missing_is_a_warning() {
        let result = ToolCheck::optional("nonexistent_command_12345", None).check();
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[test]
    fn test_required_tool_missing_fails() {
        let result = ToolCheck::required("nonexistent_command_12345", None).check();
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn test_env_var_check_optional_missing() {
        let result = EnvVarCheck::optional("SKYLARK_SURELY_UNSET_12345").check();
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[test]
    fn test_layout_check_passes_on_fixture() {
        let (_temp, project) = fixture_project();
        assert_eq!(LayoutCheck::new(&project).check().status, CheckStatus::Pass);
    }

    #[test]
    fn test_wrapper_check_fails_without_gradlew() {
        let (_temp, project) = fixture_project();
        assert_eq!(WrapperCheck::new(&project).check().status, CheckStatus::Fail);
    }

    #[test]
    fn test_signing_check_unsigned_is_a_warning() {
        let (_temp, project) = fixture_project();
        let result = SigningCheck::new(&project, &ConfigSchema::default()).check();

        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[test]
    fn test_signing_check_passes_with_full_setup() {
        let (temp, project) = fixture_project();
        std::fs::write(
            temp.path().join("android/key.properties"),
            "keyAlias=upload\nkeyPassword=s3cret-key\nstoreFile=release.jks\nstorePassword=s3cret-store\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("android/app/release.jks"), b"ks").unwrap();

        let result = SigningCheck::new(&project, &ConfigSchema::default()).check();
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.details.get("keyAlias").unwrap(), "upload");
    }

    #[test]
    fn test_signing_check_partial_credentials_fail() {
        let (temp, project) = fixture_project();
        std::fs::write(
            temp.path().join("android/key.properties"),
            "keyAlias=upload\n",
        )
        .unwrap();

        let result = SigningCheck::new(&project, &ConfigSchema::default()).check();
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn test_version_check_reports_version() {
        let (_temp, project) = fixture_project();
        let result = VersionCheck::new(&project).check();

        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.details.get("version").unwrap(), "1.2.3+45");
    }

    #[test]
    fn test_keystore_hygiene_ignores_configured_store() {
        let (temp, project) = fixture_project();
        std::fs::write(
            temp.path().join("android/key.properties"),
            "keyAlias=upload\nkeyPassword=a\nstoreFile=release.jks\nstorePassword=b\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("android/app/release.jks"), b"ks").unwrap();

        let result = KeystoreHygieneCheck::new(&project, &ConfigSchema::default()).check();
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_keystore_hygiene_flags_strays() {
        let (temp, project) = fixture_project();
        std::fs::write(temp.path().join("old-release.jks"), b"ks").unwrap();

        let result = KeystoreHygieneCheck::new(&project, &ConfigSchema::default()).check();
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.details.contains_key("first"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = DoctorReport::new(vec![CheckResult::pass("signing")], Duration::ZERO);
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"status\":\"pass\""));
        assert!(json.contains("signing"));
    }
}
