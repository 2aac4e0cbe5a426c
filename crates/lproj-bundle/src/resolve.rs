//! Picks the localization directory that supplies a string table.

use crate::bundle::{BASE_LOCALIZATION, Bundle};
use crate::locale::LocaleIdentifier;
use crate::lookup::LocalizedBundle;

/// The outcome of a successful resolution.
#[derive(Debug)]
pub struct ResolvedLocale<'b, B: ?Sized> {
    /// The localization whose directory holds the table, or the application
    /// locale when the table was found at the bundle root.
    pub locale: String,
    /// Where the table was found.
    pub bundle: LocalizedBundle<'b, B>,
}

/// Returns the localizations tried, in order, for `preferred_languages`.
///
/// Only the first preferred language is considered. Its full tag is tried
/// first when the bundle has it, followed by its language code when the bundle
/// has that too; otherwise only the language code, if present. A non-empty
/// list gets `Base` as its second entry and the development localization at
/// its end, even when that duplicates an earlier entry. An empty list falls
/// back to just the development localization.
pub fn candidate_localizations<B, S>(preferred_languages: &[S], bundle: &B) -> Vec<String>
where
    B: Bundle + ?Sized,
    S: AsRef<str>,
{
    let available = bundle.localizations();
    let is_available = |tag: &str| available.iter().any(|lang| lang == tag);

    let mut languages: Vec<String> = preferred_languages
        .iter()
        .take(1)
        .flat_map(|language| {
            let locale = LocaleIdentifier::new(language.as_ref());
            let code = locale.language_code().filter(|&code| is_available(code));

            if is_available(locale.identifier()) {
                match code {
                    Some(code) => vec![locale.identifier().to_string(), code.to_string()],
                    None => vec![locale.identifier().to_string()],
                }
            } else if let Some(code) = code {
                vec![code.to_string()]
            } else {
                Vec::new()
            }
        })
        .collect();

    if languages.is_empty() {
        if let Some(development) = bundle.development_localization() {
            languages.push(development.to_string());
        }
    } else {
        languages.insert(1, BASE_LOCALIZATION.to_string());

        if let Some(development) = bundle.development_localization() {
            languages.push(development.to_string());
        }
    }

    languages
}

/// The locale reported for tables found at the bundle root.
///
/// This is the bundle's most preferred localization, or the process locale
/// when the bundle has no preference.
pub fn application_locale<B: Bundle + ?Sized>(bundle: &B) -> String {
    bundle
        .preferred_localizations()
        .into_iter()
        .next()
        .unwrap_or_else(|| bundle.current_locale())
}

/// Finds the localization that supplies `table_name` for `preferred_languages`.
///
/// Returns `None` when the table exists neither in a candidate localization
/// nor at the bundle root. Callers should then show the key or their default
/// value, never a translation.
///
/// A table counts as present when either its `.strings` or its `.stringsdict`
/// file exists. Whether the requested key is in it is not checked.
pub fn locale_bundle<'b, B, S>(
    table_name: &str,
    preferred_languages: &[S],
    bundle: &'b B,
) -> Option<ResolvedLocale<'b, B>>
where
    B: Bundle + ?Sized,
    S: AsRef<str>,
{
    let languages = candidate_localizations(preferred_languages, bundle);
    tracing::debug!(table = table_name, candidates = ?languages, "Resolving string table");

    for language in languages {
        if !bundle.has_localization(&language) {
            tracing::trace!(localization = %language, "No localization directory");
            continue;
        }

        if bundle.table_exists(table_name, Some(&language)) {
            return Some(ResolvedLocale {
                bundle: LocalizedBundle::localized(bundle, language.clone()),
                locale: language,
            });
        }

        tracing::trace!(table = table_name, localization = %language, "Table not in localization");
    }

    if bundle.table_exists(table_name, None) {
        return Some(ResolvedLocale {
            locale: application_locale(bundle),
            bundle: LocalizedBundle::main(bundle),
        });
    }

    tracing::debug!(table = table_name, "String table not found in any localization");
    None
}
