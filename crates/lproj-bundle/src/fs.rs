use crate::bundle::{Bundle, LPROJ_EXTENSION, localization_dir_name};
use crate::error::BundleError;
use crate::locale::{preferred_localizations_from, system_languages};
use crate::table::{Table, TableFormat};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const INFO_PLIST: &str = "Info.plist";
const DEVELOPMENT_REGION_KEY: &str = "CFBundleDevelopmentRegion";

type TableKey = (Option<String>, String);

/// A bundle backed by a resources directory on disk.
///
/// Localizations are the `<tag>.lproj` subdirectories of the root. The
/// development localization is read from `CFBundleDevelopmentRegion` in the
/// root's `Info.plist` unless set explicitly. Directory checks and parsed
/// tables are cached; the directory is assumed not to change while the
/// bundle is alive.
#[derive(Debug)]
pub struct FsBundle {
    root: PathBuf,
    localizations: Vec<String>,
    development_localization: Option<String>,
    preferred_localizations: Option<Vec<String>>,
    directories: RwLock<FxHashMap<String, bool>>,
    tables: RwLock<FxHashMap<TableKey, Arc<Table>>>,
}

impl FsBundle {
    /// Opens the bundle rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BundleError> {
        let root = root.into();
        let localizations = scan_localizations(&root)?;
        Self::new(root, localizations)
    }

    /// Opens the bundle rooted at `root` with an already known list of
    /// localization directories.
    pub fn new(root: impl Into<PathBuf>, localizations: Vec<String>) -> Result<Self, BundleError> {
        let root = root.into();
        let development_localization = read_development_region(&root)?;

        tracing::debug!(
            root = %root.display(),
            ?localizations,
            development = ?development_localization,
            "Opened bundle"
        );

        Ok(Self {
            root,
            localizations,
            development_localization,
            preferred_localizations: None,
            directories: RwLock::new(FxHashMap::default()),
            tables: RwLock::new(FxHashMap::default()),
        })
    }

    /// Overrides the development localization from `Info.plist`.
    pub fn with_development_localization(mut self, localization: impl Into<String>) -> Self {
        self.development_localization = Some(localization.into());
        self
    }

    /// Fixes the preferred localizations instead of deriving them from the
    /// user's system languages.
    pub fn with_preferred_localizations<I, S>(mut self, localizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_localizations = Some(localizations.into_iter().map(Into::into).collect());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn directory(&self, localization: Option<&str>) -> Option<PathBuf> {
        match localization {
            Some(localization) => self
                .has_localization(localization)
                .then(|| self.root.join(localization_dir_name(localization))),
            None => Some(self.root.clone()),
        }
    }
}

impl Bundle for FsBundle {
    fn localizations(&self) -> &[String] {
        &self.localizations
    }

    fn development_localization(&self) -> Option<&str> {
        self.development_localization.as_deref()
    }

    fn preferred_localizations(&self) -> Vec<String> {
        match &self.preferred_localizations {
            Some(preferred) => preferred.clone(),
            None => preferred_localizations_from(
                system_languages(),
                &self.localizations,
                self.development_localization.as_deref(),
            ),
        }
    }

    fn has_localization(&self, localization: &str) -> bool {
        let cached = self.directories.read().get(localization).copied();
        if let Some(exists) = cached {
            return exists;
        }

        let exists = self.root.join(localization_dir_name(localization)).is_dir();
        self.directories
            .write()
            .insert(localization.to_string(), exists);
        exists
    }

    fn table_exists(&self, table: &str, localization: Option<&str>) -> bool {
        let Some(directory) = self.directory(localization) else {
            return false;
        };

        TableFormat::ALL
            .iter()
            .any(|format| directory.join(format.file_name(table)).is_file())
    }

    fn load_table(
        &self,
        table: &str,
        localization: Option<&str>,
    ) -> Result<Option<Arc<Table>>, BundleError> {
        let key = (localization.map(str::to_string), table.to_string());
        let cached = self.tables.read().get(&key).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        let Some(directory) = self.directory(localization) else {
            return Ok(None);
        };

        let strings_path = directory.join(TableFormat::Strings.file_name(table));
        let stringsdict_path = directory.join(TableFormat::Stringsdict.file_name(table));
        let strings = read_if_exists(&strings_path)?;
        let stringsdict = read_if_exists(&stringsdict_path)?;
        if strings.is_none() && stringsdict.is_none() {
            return Ok(None);
        }

        let loaded = Arc::new(Table::from_sources(
            strings
                .as_deref()
                .map(|bytes| (strings_path.as_path(), bytes)),
            stringsdict
                .as_deref()
                .map(|bytes| (stringsdict_path.as_path(), bytes)),
        )?);

        tracing::debug!(
            table,
            localization,
            entries = loaded.len(),
            "Loaded string table"
        );
        self.tables.write().insert(key, loaded.clone());
        Ok(Some(loaded))
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, BundleError> {
    if path.is_file() {
        Ok(Some(fs_err::read(path)?))
    } else {
        Ok(None)
    }
}

fn scan_localizations(root: &Path) -> Result<Vec<String>, BundleError> {
    let mut localizations = Vec::new();

    for entry in fs_err::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(LPROJ_EXTENSION) {
            continue;
        }

        match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(localization) => localizations.push(localization.to_string()),
            None => tracing::warn!(
                path = %path.display(),
                "Skipping localization directory with a non UTF-8 name"
            ),
        }
    }

    localizations.sort();
    Ok(localizations)
}

fn read_development_region(root: &Path) -> Result<Option<String>, BundleError> {
    let path = root.join(INFO_PLIST);
    if !path.is_file() {
        return Ok(None);
    }

    let info = plist::Value::from_file(&path).map_err(|source| BundleError::Plist {
        path: path.clone(),
        source,
    })?;

    Ok(info
        .as_dictionary()
        .and_then(|info| info.get(DEVELOPMENT_REGION_KEY))
        .and_then(plist::Value::as_string)
        .map(str::to_string))
}
