//! Flat `key=value` properties files
//!
//! Android projects keep small pieces of build configuration in properties
//! files next to the Gradle scripts: release credentials in
//! `key.properties`, SDK locations in `local.properties`. This module
//! parses that format into a string map with explicit errors for anything
//! malformed.
//!
//! Format notes:
//! - One entry per line, split on the first `=` or `:`.
//! - Keys and values are trimmed of surrounding whitespace.
//! - Blank lines and lines starting with `#` or `!` are skipped.
//! - Later occurrences of a key overwrite earlier ones, matching the
//!   properties reader used by the Gradle toolchain.
//! - A non-comment line without a separator is a parse error; a broken
//!   credentials file must fail the build, not shrink it.

use crate::error::{Error, Result, ResultExt};
use std::collections::BTreeMap;
use std::path::Path;

/// An ordered mapping of string keys to string values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties from source text
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (idx, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let separator = line
                .char_indices()
                .find(|(_, c)| *c == '=' || *c == ':')
                .map(|(i, _)| i);

            let Some(pos) = separator else {
                return Err(Error::properties_parse(idx + 1, "missing '=' separator"));
            };

            let key = line[..pos].trim();
            let value = line[pos + 1..].trim();

            if key.is_empty() {
                return Err(Error::properties_parse(idx + 1, "entry has no key"));
            }

            entries.insert(key.to_string(), value.to_string());
        }

        Ok(Self { entries })
    }

    /// Load properties from a file
    ///
    /// An absent file yields an empty mapping; resolution of required keys
    /// is the caller's concern and fails there with a named key. Any other
    /// read error propagates. The not-found case is detected on the read
    /// itself rather than via a separate existence check, so there is no
    /// window between checking and reading.
    pub fn load(path: &Path) -> Result<Self> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::new());
            }
            Err(err) => {
                return Err(Error::from(err)
                    .with_context(format!("While reading {}", path.display())));
            }
        };

        Self::parse(&source).context(format!("While parsing {}", path.display()))
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert an entry, returning any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_basic_entries() {
        let props = Properties::parse("keyAlias=upload\nstoreFile=keys/release.jks\n").unwrap();

        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storeFile"), Some("keys/release.jks"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let props = Properties::parse("  keyAlias =  upload  \n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let source = "# release credentials\n\n! legacy comment style\nkeyAlias=upload\n";
        let props = Properties::parse(source).unwrap();

        assert_eq!(props.len(), 1);
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_colon_separator() {
        let props = Properties::parse("sdk.dir: /opt/android-sdk\n").unwrap();
        assert_eq!(props.get("sdk.dir"), Some("/opt/android-sdk"));
    }

    #[test]
    fn test_parse_value_may_contain_separators() {
        let props = Properties::parse("storePassword=a=b:c\n").unwrap();
        assert_eq!(props.get("storePassword"), Some("a=b:c"));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let props = Properties::parse("keyAlias=old\nkeyAlias=new\n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("new"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_parse_tolerates_crlf() {
        let props = Properties::parse("keyAlias=upload\r\nstorePassword=s3cret\r\n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("s3cret"));
    }

    #[test]
    fn test_parse_empty_value_is_kept() {
        let props = Properties::parse("keyPassword=\n").unwrap();
        assert_eq!(props.get("keyPassword"), Some(""));
    }

    #[test]
    fn test_parse_missing_separator_names_line() {
        let err = Properties::parse("keyAlias=upload\nnot a property\n").unwrap_err();

        assert_eq!(err.code, ErrorCode::PropertiesParseError);
        assert!(err.message.contains("line 2"));
    }

    #[test]
    fn test_parse_entry_without_key_fails() {
        let err = Properties::parse("=value\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertiesParseError);
    }

    #[test]
    fn test_load_absent_file_yields_empty_mapping() {
        let temp = TempDir::new().unwrap();
        let props = Properties::load(&temp.path().join("key.properties")).unwrap();

        assert!(props.is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.properties");
        std::fs::write(&path, "keyAlias=upload\nstorePassword=s3cret\n").unwrap();

        let props = Properties::load(&path).unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("s3cret"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.properties");
        std::fs::write(&path, "keyAlias=upload\nstoreFile=release.jks\n").unwrap();

        let first = Properties::load(&path).unwrap();
        let second = Properties::load(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_parse_error_carries_path_context() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.properties");
        std::fs::write(&path, "broken line\n").unwrap();

        let err = Properties::load(&path).unwrap_err();
        assert!(err.context.unwrap().contains("key.properties"));
    }

    proptest! {
        #[test]
        fn prop_parse_round_trips_rendered_entries(
            entries in proptest::collection::btree_map(
                "[A-Za-z][A-Za-z0-9_.]{0,16}",
                "[A-Za-z0-9_./@+-]{1,24}( [A-Za-z0-9_./@+-]{1,8}){0,2}",
                0..8,
            )
        ) {
            let rendered: String = entries
                .iter()
                .map(|(k, v)| format!("{}={}\n", k, v))
                .collect();

            let parsed = Properties::parse(&rendered).unwrap();
            let expected: Properties = entries.into_iter().collect();
            prop_assert_eq!(parsed, expected);
        }
    }
}
