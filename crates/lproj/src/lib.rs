#![doc = include_str!("../README.md")]

mod string_resource;

pub use string_resource::{DEFAULT_TABLE, StringResource};

pub use lproj_bundle::{
    BASE_LOCALIZATION, Bundle, BundleError, FsBundle, LocalizedBundle, MemoryBundle,
    ResolvedLocale, Table, candidate_localizations, locale_bundle,
};

pub use lproj_toml::{BundleConfig, BundleConfigError};

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenBundleError {
    #[error(transparent)]
    Config(#[from] BundleConfigError),
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Opens the bundle described by `config`.
///
/// The bundle directory is resolved against `base_dir`, or
/// `CARGO_MANIFEST_DIR` when `None`. Every `<tag>.lproj` directory in it must
/// be named after a valid language tag or `Base`. Configured development
/// language and preferred localizations override what the bundle itself
/// declares.
pub fn open_bundle(
    config: &BundleConfig,
    base_dir: Option<&Path>,
) -> Result<FsBundle, OpenBundleError> {
    config.validate_bundle_dir(base_dir)?;
    let localizations = config.available_localizations_from_base(base_dir)?;
    let mut bundle = FsBundle::new(config.bundle_dir_from_base(base_dir)?, localizations)?;

    if let Some(development) = config.development_language() {
        bundle = bundle.with_development_localization(development);
    }
    if let Some(preferred) = &config.preferred_localizations {
        bundle = bundle.with_preferred_localizations(preferred.iter().cloned());
    }

    tracing::debug!(root = %bundle.root().display(), "Opened configured bundle");
    Ok(bundle)
}
