#![doc = include_str!("../README.md")]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, io};
use thiserror::Error;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

/// Name of the configuration file looked up in the manifest directory.
pub const CONFIG_FILE_NAME: &str = "lproj.toml";

/// The language-neutral localization, accepted without being a valid tag.
const BASE_LOCALIZATION: &str = "Base";

const LPROJ_SUFFIX: &str = ".lproj";

#[derive(Debug, Error)]
pub enum BundleConfigError {
    /// Configuration file not found.
    #[error("lproj.toml configuration file not found")]
    NotFound,
    /// Failed to read configuration file or bundle directory.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Encountered an invalid language identifier while reading the bundle directory.
    #[error("Invalid language identifier '{name}' found in bundle directory")]
    InvalidLanguageIdentifier {
        /// The invalid identifier.
        name: String,
        /// The parsing error produced by `unic-langid`.
        #[source]
        source: LanguageIdentifierError,
    },
    /// Encountered an invalid development language identifier.
    #[error("Invalid development language identifier '{name}'")]
    InvalidDevelopmentLanguageIdentifier {
        /// The invalid identifier.
        name: String,
        /// The parsing error produced by `unic-langid`.
        #[source]
        source: LanguageIdentifierError,
    },
    /// Encountered an invalid entry in `preferred_localizations`.
    #[error("Invalid preferred localization '{name}'")]
    InvalidPreferredLocalization {
        /// The invalid identifier.
        name: String,
        /// The parsing error produced by `unic-langid`.
        #[source]
        source: LanguageIdentifierError,
    },
}

/// The configuration of a localized bundle.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BundleConfig {
    /// Path to the directory containing the `<tag>.lproj` directories.
    /// Expected structure: {bundle_dir}/{language}.lproj/{table}.strings
    pub bundle_dir: PathBuf,
    /// The language the resources were authored in (e.g., "en").
    ///
    /// When absent, the bundle's `Info.plist` is consulted instead.
    #[serde(default)]
    pub development_language: Option<String>,
    /// Optional fixed localization preferences.
    ///
    /// When absent, preferences are derived from the user's system languages.
    ///
    /// # Examples
    ///
    /// ```toml
    /// preferred_localizations = ["en-GB", "en"]
    /// ```
    #[serde(default)]
    pub preferred_localizations: Option<Vec<String>>,
}

impl BundleConfig {
    /// Reads the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, BundleConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BundleConfigError::NotFound);
        }

        let content = fs_err::read_to_string(path)?;

        let config: BundleConfig = toml::from_str(&content)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Read bundle configuration");
        Ok(config)
    }

    /// Reads the configuration from the manifest directory.
    pub fn read_from_manifest_dir() -> Result<Self, BundleConfigError> {
        let manifest_dir =
            env::var("CARGO_MANIFEST_DIR").map_err(|_| BundleConfigError::NotFound)?;

        Self::from_manifest_dir(Path::new(&manifest_dir))
    }

    /// Reads `lproj.toml` from `manifest_dir`.
    pub fn from_manifest_dir(manifest_dir: &Path) -> Result<Self, BundleConfigError> {
        Self::read_from_path(manifest_dir.join(CONFIG_FILE_NAME))
    }

    /// Returns the path to the bundle directory from a base directory.
    /// If `base_dir` is `None`, uses `CARGO_MANIFEST_DIR` environment variable.
    pub fn bundle_dir_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<PathBuf, BundleConfigError> {
        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let manifest_dir =
                    env::var("CARGO_MANIFEST_DIR").map_err(|_| BundleConfigError::NotFound)?;
                PathBuf::from(manifest_dir)
            },
        };

        Ok(base.join(&self.bundle_dir))
    }

    /// Returns the configured development language.
    pub fn development_language(&self) -> Option<&str> {
        self.development_language.as_deref()
    }

    /// Checks that every configured language tag parses.
    pub fn validate(&self) -> Result<(), BundleConfigError> {
        if let Some(name) = &self.development_language {
            validate_localization(name).map_err(|source| {
                BundleConfigError::InvalidDevelopmentLanguageIdentifier {
                    name: name.clone(),
                    source,
                }
            })?;
        }

        for name in self.preferred_localizations.iter().flatten() {
            validate_localization(name).map_err(|source| {
                BundleConfigError::InvalidPreferredLocalization {
                    name: name.clone(),
                    source,
                }
            })?;
        }

        Ok(())
    }

    /// Returns the localizations available under the bundle directory.
    pub fn available_localizations_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Vec<String>, BundleConfigError> {
        let bundle_path = self.bundle_dir_from_base(base_dir)?;

        let mut localizations = Vec::new();
        for entry in fs_err::read_dir(&bundle_path)? {
            if let Some(localization) = parse_localization_entry(entry?)? {
                localizations.push(localization);
            }
        }

        localizations.sort();
        localizations.dedup();

        Ok(localizations)
    }

    /// Validates the bundle directory.
    pub fn validate_bundle_dir(&self, base_dir: Option<&Path>) -> Result<(), BundleConfigError> {
        let bundle_path = self.bundle_dir_from_base(base_dir)?;

        if !bundle_path.exists() {
            return Err(BundleConfigError::ReadError(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "Bundle directory '{}' does not exist",
                    bundle_path.display()
                ),
            )));
        }

        if !bundle_path.is_dir() {
            return Err(BundleConfigError::ReadError(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Bundle path '{}' is not a directory",
                    bundle_path.display()
                ),
            )));
        }

        Ok(())
    }
}

/// Parse a directory entry as a localization directory.
///
/// Returns `Ok(None)` if the entry is not a `.lproj` directory.
fn parse_localization_entry(
    entry: fs_err::DirEntry,
) -> Result<Option<String>, BundleConfigError> {
    if !entry.file_type()?.is_dir() {
        return Ok(None);
    }

    let raw_name = entry.file_name();
    let name = raw_name.into_string().map_err(|raw| {
        BundleConfigError::ReadError(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Bundle directory contains a non UTF-8 entry: {:?}", raw),
        ))
    })?;

    let Some(localization) = name.strip_suffix(LPROJ_SUFFIX) else {
        return Ok(None);
    };

    validate_localization(localization).map_err(|source| {
        BundleConfigError::InvalidLanguageIdentifier {
            name: localization.to_string(),
            source,
        }
    })?;

    Ok(Some(localization.to_string()))
}

fn validate_localization(name: &str) -> Result<(), LanguageIdentifierError> {
    if name == BASE_LOCALIZATION {
        return Ok(());
    }

    name.parse::<LanguageIdentifier>().map(|_| ())
}
