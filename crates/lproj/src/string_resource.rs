use lproj_bundle::{Bundle, LocalizedBundle, ResolvedLocale, locale_bundle};
use std::sync::Arc;

/// Table used when a resource does not name one.
pub const DEFAULT_TABLE: &str = "Localizable";

/// A localized string in a bundle's string tables.
///
/// This is what generated accessors hand out: the key, where to look for it,
/// and what to show when no table has it.
///
/// ```rust
/// use lproj::{MemoryBundle, StringResource};
/// use std::sync::Arc;
///
/// let bundle = MemoryBundle::new()
///     .with_development_localization("en")
///     .with_strings(Some("en"), "Localizable", r#""title" = "Welcome";"#)
///     .with_strings(Some("fr"), "Localizable", r#""title" = "Bienvenue";"#);
///
/// let title = StringResource::builder()
///     .key("title")
///     .bundle(Arc::new(bundle))
///     .locales(vec!["en".to_string(), "fr".to_string()])
///     .value("Welcome")
///     .comment("Title of the main screen")
///     .build();
///
/// assert_eq!(title.localized_for(&["fr-CA"]), "Bienvenue");
/// assert_eq!(title.localized_for(&["de"]), "Welcome");
/// ```
#[derive(Clone, Debug, bon::Builder)]
pub struct StringResource {
    /// Key for the string.
    #[builder(into)]
    key: String,

    /// Table containing the string. Defaults to `Localizable`.
    #[builder(into, default = DEFAULT_TABLE.to_string())]
    table_name: String,

    /// Bundle this string is in.
    bundle: Arc<dyn Bundle>,

    /// Localizations that translate this string.
    #[builder(default)]
    locales: Vec<String>,

    /// Shown when no table exists for the requested languages.
    #[builder(into)]
    value: Option<String>,

    /// Note for translators. Never shown.
    #[builder(into)]
    comment: Option<String>,
}

impl StringResource {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn bundle(&self) -> &dyn Bundle {
        self.bundle.as_ref()
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns `true` if `localization` is known to translate this string.
    pub fn is_localized_in(&self, localization: &str) -> bool {
        self.locales.iter().any(|locale| locale == localization)
    }

    /// Resolves which localization supplies this string's table.
    pub fn locale_bundle<S: AsRef<str>>(
        &self,
        preferred_languages: &[S],
    ) -> Option<ResolvedLocale<'_, dyn Bundle>> {
        locale_bundle(&self.table_name, preferred_languages, self.bundle.as_ref())
    }

    /// Looks the string up with the bundle's own localization preferences.
    ///
    /// When nothing supplies the table, or the table lacks the key, the
    /// default value is returned, or the key when there is no default value.
    pub fn localized(&self) -> String {
        let preferred = self.bundle.preferred_localizations();
        let value = self.value.as_deref().unwrap_or_default();

        match self.locale_bundle(preferred.as_slice()) {
            Some(resolved) => resolved
                .bundle
                .localized_string(&self.key, &self.table_name, value),
            None => LocalizedBundle::main(self.bundle.as_ref()).localized_string(
                &self.key,
                &self.table_name,
                value,
            ),
        }
    }

    /// Looks the string up for an explicit list of preferred languages.
    ///
    /// Only the first language is considered. When no localization supplies
    /// the table, the default value is returned verbatim (empty when there is
    /// none). When a table is found but lacks the key, the key is returned.
    pub fn localized_for<S: AsRef<str>>(&self, preferred_languages: &[S]) -> String {
        match self.locale_bundle(preferred_languages) {
            Some(resolved) => resolved
                .bundle
                .localized_string(&self.key, &self.table_name, ""),
            None => {
                tracing::debug!(
                    key = %self.key,
                    table = %self.table_name,
                    "No localization supplies the table, using the default value"
                );
                self.value.clone().unwrap_or_default()
            },
        }
    }
}
