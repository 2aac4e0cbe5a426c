use crate::bundle::{Bundle, localization_dir_name};
use crate::error::BundleError;
use crate::locale::DEFAULT_LOCALE;
use crate::table::{Table, TableFormat};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TableKey {
    localization: Option<String>,
    table: String,
}

#[derive(Clone, Debug, Default)]
struct MemoryTable {
    strings: Option<String>,
    stringsdict: Option<String>,
}

/// A bundle held entirely in memory.
///
/// Tables are kept as source text and parsed on every load, the same way a
/// filesystem bundle reads its files. Adding a table to a localization also
/// adds that localization.
///
/// ```rust
/// use lproj_bundle::{MemoryBundle, locale_bundle};
///
/// let bundle = MemoryBundle::new()
///     .with_development_localization("en")
///     .with_strings(Some("en"), "Localizable", r#""title" = "Welcome";"#);
///
/// let resolved = locale_bundle("Localizable", &["en-GB"], &bundle).unwrap();
/// assert_eq!(resolved.locale, "en");
/// assert_eq!(
///     resolved.bundle.localized_string("title", "Localizable", ""),
///     "Welcome"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct MemoryBundle {
    localizations: Vec<String>,
    development_localization: Option<String>,
    preferred_localizations: Vec<String>,
    current_locale: String,
    tables: FxHashMap<TableKey, MemoryTable>,
}

impl Default for MemoryBundle {
    fn default() -> Self {
        Self {
            localizations: Vec::new(),
            development_localization: None,
            preferred_localizations: Vec::new(),
            current_locale: DEFAULT_LOCALE.to_string(),
            tables: FxHashMap::default(),
        }
    }
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty localization directory.
    pub fn with_localization(mut self, localization: impl Into<String>) -> Self {
        let localization = localization.into();
        if !self.localizations.contains(&localization) {
            self.localizations.push(localization);
        }
        self
    }

    pub fn with_localizations<I, S>(self, localizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        localizations
            .into_iter()
            .fold(self, |bundle, localization| bundle.with_localization(localization))
    }

    pub fn with_development_localization(mut self, localization: impl Into<String>) -> Self {
        self.development_localization = Some(localization.into());
        self
    }

    pub fn with_preferred_localizations<I, S>(mut self, localizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_localizations = localizations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_current_locale(mut self, locale: impl Into<String>) -> Self {
        self.current_locale = locale.into();
        self
    }

    /// Adds a `.strings` file with the given source.
    pub fn with_strings(
        self,
        localization: Option<&str>,
        table: &str,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        self.with_table(localization, table, |files| files.strings = Some(source))
    }

    /// Adds a `.stringsdict` file with the given property list source.
    pub fn with_stringsdict(
        self,
        localization: Option<&str>,
        table: &str,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        self.with_table(localization, table, |files| {
            files.stringsdict = Some(source)
        })
    }

    fn with_table(
        mut self,
        localization: Option<&str>,
        table: &str,
        update: impl FnOnce(&mut MemoryTable),
    ) -> Self {
        if let Some(localization) = localization {
            self = self.with_localization(localization);
        }

        let key = TableKey {
            localization: localization.map(str::to_string),
            table: table.to_string(),
        };
        update(self.tables.entry(key).or_default());
        self
    }

    fn files(&self, table: &str, localization: Option<&str>) -> Option<&MemoryTable> {
        if let Some(localization) = localization
            && !self.has_localization(localization)
        {
            return None;
        }

        self.tables.get(&TableKey {
            localization: localization.map(str::to_string),
            table: table.to_string(),
        })
    }
}

fn virtual_path(localization: Option<&str>, file_name: String) -> PathBuf {
    match localization {
        Some(localization) => PathBuf::from(localization_dir_name(localization)).join(file_name),
        None => PathBuf::from(file_name),
    }
}

impl Bundle for MemoryBundle {
    fn localizations(&self) -> &[String] {
        &self.localizations
    }

    fn development_localization(&self) -> Option<&str> {
        self.development_localization.as_deref()
    }

    fn preferred_localizations(&self) -> Vec<String> {
        self.preferred_localizations.clone()
    }

    fn current_locale(&self) -> String {
        self.current_locale.clone()
    }

    fn has_localization(&self, localization: &str) -> bool {
        self.localizations.iter().any(|lang| lang == localization)
    }

    fn table_exists(&self, table: &str, localization: Option<&str>) -> bool {
        self.files(table, localization)
            .is_some_and(|files| files.strings.is_some() || files.stringsdict.is_some())
    }

    fn load_table(
        &self,
        table: &str,
        localization: Option<&str>,
    ) -> Result<Option<Arc<Table>>, BundleError> {
        let Some(files) = self.files(table, localization) else {
            return Ok(None);
        };
        if files.strings.is_none() && files.stringsdict.is_none() {
            return Ok(None);
        }

        let strings_path = virtual_path(localization, TableFormat::Strings.file_name(table));
        let stringsdict_path =
            virtual_path(localization, TableFormat::Stringsdict.file_name(table));

        let loaded = Table::from_sources(
            files
                .strings
                .as_deref()
                .map(|source| (strings_path.as_path(), source.as_bytes())),
            files
                .stringsdict
                .as_deref()
                .map(|source| (stringsdict_path.as_path(), source.as_bytes())),
        )?;

        Ok(Some(Arc::new(loaded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_register_their_localization() {
        let bundle = MemoryBundle::new()
            .with_localization("fr")
            .with_strings(Some("en"), "Localizable", r#""a" = "b";"#)
            .with_strings(None, "Root", r#""a" = "b";"#);

        assert_eq!(bundle.localizations(), ["fr", "en"]);
        assert!(bundle.has_localization("en"));
        assert!(!bundle.has_localization("Base"));
        assert!(bundle.table_exists("Localizable", Some("en")));
        assert!(!bundle.table_exists("Localizable", Some("fr")));
        assert!(!bundle.table_exists("Localizable", None));
        assert!(bundle.table_exists("Root", None));
    }

    #[test]
    fn load_table_parses_sources() {
        let bundle = MemoryBundle::new().with_strings(Some("en"), "Localizable", r#""a" = "b";"#);

        let table = bundle.load_table("Localizable", Some("en")).unwrap().unwrap();
        assert_eq!(table.get("a"), Some("b"));
        assert!(bundle.load_table("Missing", Some("en")).unwrap().is_none());
    }

    #[test]
    fn load_table_reports_virtual_path() {
        let bundle = MemoryBundle::new().with_stringsdict(Some("en"), "Broken", "<plist");

        let err = bundle.load_table("Broken", Some("en")).unwrap_err();
        match err {
            BundleError::Plist { path, .. } => {
                assert_eq!(path, PathBuf::from("en.lproj").join("Broken.stringsdict"));
            },
            other => panic!("unexpected error: {}", other),
        }
    }
}
