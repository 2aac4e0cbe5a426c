use unic_langid::LanguageIdentifier;

/// Locale reported when the process locale cannot be determined.
pub const DEFAULT_LOCALE: &str = "en-US";

/// A requested locale: the identifier exactly as given plus its language code.
///
/// `"en-US"` has the language code `"en"`. Identifiers that are not valid
/// BCP 47 tags keep everything before the first `-` or `_` as language code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleIdentifier {
    identifier: String,
    language_code: Option<String>,
}

impl LocaleIdentifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let language_code = match identifier.parse::<LanguageIdentifier>() {
            Ok(lang) if lang.language.as_str() == "und" => None,
            Ok(lang) => Some(lang.language.as_str().to_string()),
            Err(_) => identifier
                .split(['-', '_'])
                .next()
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        };

        Self {
            identifier,
            language_code,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}

/// Normalize a raw locale string into a BCP 47 language tag.
///
/// Strips encoding and modifier suffixes (`.UTF-8`, `@euro`) and replaces
/// underscores with hyphens. Returns `None` for values such as `C` or `POSIX`.
///
/// ```rust
/// use lproj_bundle::normalize_locale_tag;
///
/// assert_eq!(normalize_locale_tag("en_US.UTF-8"), Some("en-US".to_string()));
/// assert_eq!(normalize_locale_tag("POSIX"), None);
/// ```
#[must_use]
pub fn normalize_locale_tag(raw: &str) -> Option<String> {
    let stripped = raw.trim().split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty()
        || stripped.eq_ignore_ascii_case("C")
        || stripped.eq_ignore_ascii_case("POSIX")
    {
        return None;
    }

    stripped
        .replace('_', "-")
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|lang| lang.to_string())
}

/// The process-wide current locale.
pub fn system_locale() -> String {
    sys_locale::get_locale()
        .as_deref()
        .and_then(normalize_locale_tag)
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// The user's preferred languages, most preferred first.
pub fn system_languages() -> Vec<String> {
    sys_locale::get_locales()
        .filter_map(|raw| normalize_locale_tag(&raw))
        .collect()
}

/// Orders the bundle's localizations by the user's language preferences.
///
/// Each user language picks the localization with the same tag, or failing
/// that the one named after its language code. When nothing matches, the
/// development localization is the only preference.
pub fn preferred_localizations_from<I, S>(
    user_languages: I,
    available: &[String],
    development: Option<&str>,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let is_available = |tag: &str| available.iter().any(|lang| lang == tag);
    let mut preferred: Vec<String> = Vec::new();

    for language in user_languages {
        let requested = LocaleIdentifier::new(language.as_ref());
        let matched = if is_available(requested.identifier()) {
            Some(requested.identifier())
        } else {
            requested.language_code().filter(|&code| is_available(code))
        };

        if let Some(tag) = matched
            && !preferred.iter().any(|lang| lang == tag)
        {
            preferred.push(tag.to_string());
        }
    }

    if preferred.is_empty()
        && let Some(development) = development
    {
        preferred.push(development.to_string());
    }

    preferred
}
