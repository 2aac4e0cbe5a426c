use crate::error::BundleError;
use crate::locale::system_locale;
use crate::table::Table;
use std::fmt;
use std::sync::Arc;

/// Language-neutral localization used between an exact match and the
/// development language.
pub const BASE_LOCALIZATION: &str = "Base";

/// Extension of localization directories.
pub const LPROJ_EXTENSION: &str = "lproj";

/// Directory name holding the resources of `localization`, e.g. `en.lproj`.
pub fn localization_dir_name(localization: &str) -> String {
    format!("{}.{}", localization, LPROJ_EXTENSION)
}

/// Read-only access to a bundle of localized string tables.
///
/// A bundle holds one `<tag>.lproj` directory per localization. Tables may
/// also live at the bundle root, outside any localization. Passing `None` as
/// localization addresses the root.
pub trait Bundle: fmt::Debug + Send + Sync {
    /// Tags of the localization directories in this bundle.
    fn localizations(&self) -> &[String];

    /// The language the bundle was authored in.
    fn development_localization(&self) -> Option<&str>;

    /// Localizations ordered by the user's preferences.
    fn preferred_localizations(&self) -> Vec<String>;

    /// The process-wide current locale.
    fn current_locale(&self) -> String {
        system_locale()
    }

    /// Returns `true` if a `<tag>.lproj` directory exists.
    fn has_localization(&self, localization: &str) -> bool;

    /// Returns `true` if `table` exists as a `.strings` or `.stringsdict`
    /// file for the localization.
    fn table_exists(&self, table: &str, localization: Option<&str>) -> bool;

    /// Loads `table`, or `Ok(None)` if neither of its files exists.
    fn load_table(
        &self,
        table: &str,
        localization: Option<&str>,
    ) -> Result<Option<Arc<Table>>, BundleError>;
}
