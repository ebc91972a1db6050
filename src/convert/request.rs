//! Conversion request and tool configuration types.

use std::path::PathBuf;

use crate::convert::error::{ConvertError, Result};
use crate::prefs::{KEY_BUNDLE_TOOL, KEY_JAVA_EXECUTABLE, PreferenceStore};

/// One request to convert an .aab bundle into a signed APK.
///
/// Ephemeral - constructed per invocation and discarded after producing a
/// result. All five fields must be non-blank; the pipeline re-validates
/// independent of any caller-side check since it is the actual contract
/// boundary.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Path to the input .aab bundle.
    pub bundle_path: String,
    /// Path to the keystore used for signing.
    pub keystore_path: String,
    /// Keystore password, passed to bundletool as `pass:<password>`.
    pub keystore_password: String,
    /// Key password, passed to bundletool as `pass:<password>`.
    pub key_password: String,
    /// Alias of the signing key inside the keystore.
    pub key_alias: String,
}

impl ConversionRequest {
    /// Fails fast with a configuration error if any field is blank.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("bundle path", &self.bundle_path),
            ("keystore path", &self.keystore_path),
            ("keystore password", &self.keystore_password),
            ("key password", &self.key_password),
            ("key alias", &self.key_alias),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConvertError::Configuration(format!(
                    "{} must not be blank",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Locations of the two external tools the pipeline drives.
///
/// Read fresh from the preference store at the start of every conversion;
/// never cached across conversions.
#[derive(Debug, Clone)]
pub struct ToolConfiguration {
    /// Java executable used to launch bundletool.
    pub java_executable: PathBuf,
    /// The bundletool jar archive.
    pub bundletool_jar: PathBuf,
}

impl ToolConfiguration {
    /// Loads the tool paths from the store.
    ///
    /// A missing Java path falls back to `java` on PATH; the bundletool jar
    /// has no sensible fallback and must be configured explicitly.
    pub fn load(prefs: &PreferenceStore) -> Result<Self> {
        let java_executable = match stored_path(prefs, KEY_JAVA_EXECUTABLE) {
            Some(path) => path,
            None => which::which("java").map_err(|_| {
                ConvertError::Configuration(
                    "no Java executable configured and none found on PATH; \
                     run `aab2apk config set-java <path>`"
                        .to_string(),
                )
            })?,
        };

        let bundletool_jar = stored_path(prefs, KEY_BUNDLE_TOOL).ok_or_else(|| {
            ConvertError::Configuration(
                "no bundletool jar configured; run `aab2apk config set-bundletool <path>`"
                    .to_string(),
            )
        })?;

        Ok(Self {
            java_executable,
            bundletool_jar,
        })
    }
}

/// Treats a blank stored value the same as an unset key.
fn stored_path(prefs: &PreferenceStore, key: &str) -> Option<PathBuf> {
    prefs
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
