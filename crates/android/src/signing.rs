//! Release signing configuration
//!
//! Flutter Android projects keep release credentials out of source control
//! in `android/key.properties`. This module loads that file, resolves the
//! four required entries into [`SigningCredentials`], and validates the
//! keystore they point at.
//!
//! An absent or entry-less credentials file is the *unsigned* state, not an
//! error; commands that require signing report it when a release variant is
//! requested. A file that names some keys but not all is always an error,
//! reported against the first missing key.

use crate::REQUIRED_KEYS;
use skylark_core::error::{Error, Result};
use skylark_core::properties::Properties;
use skylark_core::validation::{ValidationResult, Validator};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default name of the credentials file inside the android/ directory
pub const PROPERTIES_FILE: &str = "key.properties";

/// Starting point written by the init command
pub const PROPERTIES_TEMPLATE: &str = "\
# Release signing credentials. Keep this file out of source control.
# storeFile is resolved relative to the android/app directory.
keyAlias=upload
keyPassword=CHANGE_ME
storeFile=upload-keystore.jks
storePassword=CHANGE_ME
";

/// Keystore extensions that do not trigger a validation warning
const KEYSTORE_EXTENSIONS: &[&str] = &["jks", "keystore", "p12"];

/// Resolved release signing credentials
///
/// Passwords are zeroized on drop and masked in debug output. The struct
/// deliberately implements neither `Serialize` nor `Display`; anything that
/// prints credentials goes through explicit masking.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningCredentials {
    /// Alias of the key inside the keystore
    #[zeroize(skip)]
    pub key_alias: String,
    /// Password for the key
    pub key_password: String,
    /// Keystore path as written in the properties file
    #[zeroize(skip)]
    pub store_file: PathBuf,
    /// Password for the keystore
    pub store_password: String,
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"********")
            .field("store_file", &self.store_file)
            .field("store_password", &"********")
            .finish()
    }
}

impl SigningCredentials {
    /// Resolve the keystore path against the app module directory
    ///
    /// Gradle resolves a relative `storeFile` against the module that
    /// declares the signing config, which for Flutter is `android/app`.
    pub fn store_file_path(&self, app_dir: &Path) -> PathBuf {
        if self.store_file.is_absolute() {
            self.store_file.clone()
        } else {
            app_dir.join(&self.store_file)
        }
    }
}

/// Check whether the credentials file is present
///
/// Only used for diagnostics. Loading never branches on this; [`load`]
/// treats an absent file as an empty mapping on the read itself, so a file
/// appearing or vanishing between probe and read cannot change behavior.
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

/// Load the credentials file into a properties mapping
///
/// An absent file yields an empty mapping.
pub fn load(path: &Path) -> Result<Properties> {
    debug!(path = %path.display(), "signing properties file");
    debug!(exists = exists(path), "signing properties file presence");

    Properties::load(path)
}

/// Resolve a properties mapping into credentials
///
/// Checks the required keys in a fixed order and reports the first problem:
/// a key that is absent from the mapping, or present with an empty value.
pub fn resolve(props: &Properties) -> Result<SigningCredentials> {
    for key in REQUIRED_KEYS {
        match props.get(key) {
            None => return Err(Error::missing_signing_key(key)),
            Some(value) if value.is_empty() => return Err(Error::empty_signing_value(key)),
            Some(_) => {}
        }
    }

    let value = |key: &str| props.get(key).unwrap_or_default().to_string();

    Ok(SigningCredentials {
        key_alias: value("keyAlias"),
        key_password: value("keyPassword"),
        store_file: PathBuf::from(value("storeFile")),
        store_password: value("storePassword"),
    })
}

/// Load and resolve credentials from a file
///
/// Returns `Ok(None)` when the file is absent or contains no entries, the
/// unsigned state. A mapping with some but not all required keys is an
/// error.
pub fn load_credentials(path: &Path) -> Result<Option<SigningCredentials>> {
    let props = load(path)?;

    if props.is_empty() {
        debug!("no signing credentials configured");
        return Ok(None);
    }

    resolve(&props).map(Some)
}

/// Validate credentials against the filesystem
///
/// `app_dir` is the directory relative keystore paths resolve against.
/// When `require_keystore` is false a missing keystore file downgrades to a
/// warning, which suits CI machines that inject the keystore later.
pub fn validate(
    credentials: &SigningCredentials,
    app_dir: &Path,
    require_keystore: bool,
) -> ValidationResult {
    let store_path = credentials.store_file_path(app_dir);
    let store_str = credentials.store_file.display().to_string();

    let extension_ok = store_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| KEYSTORE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));

    let mut validator = Validator::new()
        .required("keyAlias", &credentials.key_alias)
        .required("keyPassword", &credentials.key_password)
        .required("storePassword", &credentials.store_password)
        .warn_if(
            "storeFile",
            credentials.store_file.is_absolute(),
            "storeFile is an absolute path; prefer a path relative to android/app so builds work across machines",
        )
        .warn_if(
            "storeFile",
            store_str.starts_with('~'),
            "storeFile starts with '~', which Gradle does not expand",
        )
        .warn_if(
            "storeFile",
            !extension_ok,
            "storeFile has an unusual extension; expected .jks, .keystore or .p12",
        )
        .warn_if(
            "storePassword",
            credentials.store_password.len() < 6,
            "store password is shorter than the 6 character keytool minimum",
        );

    if require_keystore {
        validator = validator.is_file("storeFile", &store_path);
    } else {
        validator = validator.warn_if(
            "storeFile",
            !store_path.is_file(),
            "keystore file not found; the build will fail unless it is provisioned",
        );
    }

    validator.validate()
}

/// SHA-256 fingerprint of the keystore file
///
/// Formatted the way keytool prints certificate fingerprints, as uppercase
/// colon-separated byte pairs. Lets a developer compare the local keystore
/// against the upload key registered in the Play console without touching
/// keytool.
pub fn keystore_fingerprint(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::keystore_not_found(path));
    }

    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    let hex = hex::encode_upper(digest);

    let mut out = String::with_capacity(hex.len() + hex.len() / 2);
    for (i, ch) in hex.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(':');
        }
        out.push(ch);
    }

    Ok(out)
}
