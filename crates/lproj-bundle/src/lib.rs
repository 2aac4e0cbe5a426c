#![doc = include_str!("../README.md")]

pub mod bundle;
pub mod error;
pub mod fs;
pub mod locale;
pub mod lookup;
pub mod memory;
pub mod resolve;
pub mod table;

pub use bundle::{BASE_LOCALIZATION, Bundle, LPROJ_EXTENSION, localization_dir_name};
pub use error::BundleError;
pub use fs::FsBundle;
pub use locale::{
    DEFAULT_LOCALE, LocaleIdentifier, normalize_locale_tag, preferred_localizations_from,
    system_languages, system_locale,
};
pub use lookup::LocalizedBundle;
pub use memory::MemoryBundle;
pub use resolve::{ResolvedLocale, application_locale, candidate_localizations, locale_bundle};
pub use table::{PluralCategory, PluralEntry, PluralVariable, Table, TableFormat};
