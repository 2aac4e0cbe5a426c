use crate::bundle::Bundle;
use crate::table::Table;
use std::sync::Arc;

/// A bundle scoped to one localization directory, or to the bundle root.
#[derive(Debug)]
pub struct LocalizedBundle<'b, B: ?Sized> {
    bundle: &'b B,
    localization: Option<String>,
}

impl<B: ?Sized> Clone for LocalizedBundle<'_, B> {
    fn clone(&self) -> Self {
        Self {
            bundle: self.bundle,
            localization: self.localization.clone(),
        }
    }
}

impl<'b, B: Bundle + ?Sized> LocalizedBundle<'b, B> {
    /// The bundle root, outside any localization directory.
    pub fn main(bundle: &'b B) -> Self {
        Self {
            bundle,
            localization: None,
        }
    }

    /// The `<localization>.lproj` directory of `bundle`.
    pub fn localized(bundle: &'b B, localization: impl Into<String>) -> Self {
        Self {
            bundle,
            localization: Some(localization.into()),
        }
    }

    pub fn bundle(&self) -> &'b B {
        self.bundle
    }

    /// `None` for the bundle root.
    pub fn localization(&self) -> Option<&str> {
        self.localization.as_deref()
    }

    /// Loads `table`, logging and swallowing read errors.
    pub fn table(&self, table: &str) -> Option<Arc<Table>> {
        match self.bundle.load_table(table, self.localization()) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(
                    table,
                    localization = ?self.localization,
                    "Failed to load string table: {}",
                    err
                );
                None
            },
        }
    }

    /// Returns the translation of `key` in `table`.
    ///
    /// A key missing from the table yields `value`, or the key itself when
    /// `value` is empty.
    pub fn localized_string(&self, key: &str, table: &str, value: &str) -> String {
        if let Some(loaded) = self.table(table)
            && let Some(translation) = loaded.get(key)
        {
            return translation.to_string();
        }

        tracing::trace!(key, table, localization = ?self.localization, "Key not found in table");
        if value.is_empty() {
            key.to_string()
        } else {
            value.to_string()
        }
    }
}
