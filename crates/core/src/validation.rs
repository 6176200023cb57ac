//! Configuration and input validation
//!
//! Provides validation for:
//! - Signing credentials and keystore paths
//! - Project layout
//! - Application identifiers
//! - Configuration values
//!
//! # Example
//!
//! ```rust,ignore
//! use skylark_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("keyAlias", &credentials.key_alias)
//!     .is_file("storeFile", &keystore_path)
//!     .validate();
//!
//! if !result.is_valid() {
//!     for error in result.errors() {
//!         eprintln!("Validation error: {}", error);
//!     }
//! }
//! ```

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not empty
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate against a regex pattern
    pub fn pattern(mut self, field: &str, value: &str, pattern: &str, description: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(value) {
                    self.result.add_error(ValidationError {
                        field: field.to_string(),
                        message: format!("Must match {}", description),
                        code: "PATTERN".to_string(),
                        expected: Some(description.to_string()),
                        actual: Some(value.to_string()),
                    });
                }
            }
            Err(_) => {
                self.result.add_error(ValidationError {
                    field: field.to_string(),
                    message: "Invalid validation pattern".to_string(),
                    code: "INTERNAL".to_string(),
                    expected: None,
                    actual: None,
                });
            }
        }
        self
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of(mut self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if !allowed.contains(&value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be one of: {}", allowed.join(", ")),
                code: "ONE_OF".to_string(),
                expected: Some(allowed.join(", ")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate a numeric range
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min || value > max {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {} and {}", min, max),
                code: "RANGE".to_string(),
                expected: Some(format!("{} - {}", min, max)),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate that a path is a file
    pub fn is_file(mut self, field: &str, path: &Path) -> Self {
        if !path.is_file() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Not a file: {}", path.display()),
                code: "NOT_A_FILE".to_string(),
                expected: Some("file".to_string()),
                actual: Some(if path.is_dir() {
                    "directory".to_string()
                } else {
                    "not found".to_string()
                }),
            });
        }
        self
    }

    /// Validate that a path is a directory
    pub fn is_directory(mut self, field: &str, path: &Path) -> Self {
        if !path.is_dir() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Not a directory: {}", path.display()),
                code: "NOT_A_DIRECTORY".to_string(),
                expected: Some("directory".to_string()),
                actual: Some(if path.is_file() {
                    "file".to_string()
                } else {
                    "not found".to_string()
                }),
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

static APPLICATION_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*(\.[a-zA-Z][a-zA-Z0-9_]*)+$").expect("valid regex")
});

/// Java keywords are not valid application id segments; Gradle rejects them
/// when generating the package structure.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

/// Validate an Android application id
///
/// Requires at least two dot-separated segments, each starting with a
/// letter, and none of them a Java keyword.
pub fn validate_application_id(id: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !APPLICATION_ID_RE.is_match(id) {
        result.add_error(ValidationError {
            field: "applicationId".to_string(),
            message: "Must be a reverse-DNS identifier with at least two segments".to_string(),
            code: "PATTERN".to_string(),
            expected: Some("e.g. com.example.app".to_string()),
            actual: Some(id.to_string()),
        });
        return result;
    }

    for segment in id.split('.') {
        if JAVA_KEYWORDS.contains(&segment) {
            result.add_error(ValidationError {
                field: "applicationId".to_string(),
                message: format!("Segment '{}' is a Java keyword", segment),
                code: "RESERVED_WORD".to_string(),
                expected: None,
                actual: Some(segment.to_string()),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("keyAlias", "").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_pattern_validation() {
        let result = Validator::new()
            .pattern(
                "properties_file",
                "key.props",
                r"\.properties$",
                "a .properties file name",
            )
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "PATTERN");
    }

    #[test]
    fn test_one_of_validation() {
        let result = Validator::new()
            .one_of("variant", "staging", &["debug", "profile", "release"])
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "ONE_OF");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new()
            .range("versionCode", 2_200_000_000u32, 1, 2_100_000_000)
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_is_file_reports_missing() {
        let result = Validator::new()
            .is_file("storeFile", Path::new("/nonexistent/release.jks"))
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "NOT_A_FILE");
    }

    #[test]
    fn test_warn_if_does_not_block() {
        let result = Validator::new()
            .warn_if("storeFile", true, "storeFile is an absolute path")
            .validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_valid_application_id() {
        let result = validate_application_id("club.skylark.app");
        assert!(result.is_valid());
    }

    #[test]
    fn test_application_id_needs_two_segments() {
        let result = validate_application_id("skylark");
        assert!(!result.is_valid());
    }

    #[test]
    fn test_application_id_segment_must_start_with_letter() {
        let result = validate_application_id("com.4example.app");
        assert!(!result.is_valid());
    }

    #[test]
    fn test_application_id_rejects_java_keyword_segment() {
        let result = validate_application_id("com.new.app");
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RESERVED_WORD");
    }

    #[test]
    fn test_merge_combines_errors_and_warnings() {
        let mut first = Validator::new().required("keyAlias", "").validate();
        let second = Validator::new()
            .warn_if("storeFile", true, "absolute path")
            .validate();

        first.merge(second);
        assert_eq!(first.errors().len(), 1);
        assert_eq!(first.warnings().len(), 1);
    }

    #[test]
    fn test_chained_validation_passes() {
        let result = Validator::new()
            .required("keyAlias", "upload")
            .one_of("variant", "release", &["debug", "profile", "release"])
            .validate();
        assert!(result.is_valid());
    }
}
