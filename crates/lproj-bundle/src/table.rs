//! Parsed contents of a string table.
//!
//! A table named `Localizable` is stored as `Localizable.strings`, as
//! `Localizable.stringsdict`, or both. The `.strings` file is a flat list of
//! `"key" = "value";` pairs; the `.stringsdict` file is a property list whose
//! entries carry a format key and the plural rules it references.

use crate::error::BundleError;
use langcodec::formats::strings::Format as StringsFormat;
use langcodec::traits::Parser as _;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

const FORMAT_KEY: &str = "NSStringLocalizedFormatKey";
const SPEC_TYPE_KEY: &str = "NSStringFormatSpecTypeKey";
const VALUE_TYPE_KEY: &str = "NSStringFormatValueTypeKey";

/// On-disk representation of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TableFormat {
    /// Flat key/value mapping.
    Strings,
    /// Plural-rule aware property list.
    Stringsdict,
}

impl TableFormat {
    /// Both formats, in the order a table is read.
    pub const ALL: [TableFormat; 2] = [TableFormat::Strings, TableFormat::Stringsdict];

    /// File name of `table` stored in this format.
    pub fn file_name(self, table: &str) -> String {
        format!("{}.{}", table, self)
    }
}

/// CLDR plural category used as a key inside a stringsdict rule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

/// One variable (`%#@name@`) of a stringsdict entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluralVariable {
    /// Usually `NSStringPluralRuleType`.
    pub spec_type: Option<String>,
    /// printf-style conversion of the argument, e.g. `d`.
    pub value_type: Option<String>,
    pub forms: BTreeMap<PluralCategory, String>,
}

impl PluralVariable {
    /// Text for `category`, falling back to the `other` form.
    pub fn form(&self, category: PluralCategory) -> Option<&str> {
        self.forms
            .get(&category)
            .or_else(|| self.forms.get(&PluralCategory::Other))
            .map(String::as_str)
    }

    fn from_dictionary(rule: &plist::Dictionary) -> Self {
        let mut variable = Self::default();
        for (name, value) in rule {
            match name.as_str() {
                SPEC_TYPE_KEY => variable.spec_type = value.as_string().map(str::to_owned),
                VALUE_TYPE_KEY => variable.value_type = value.as_string().map(str::to_owned),
                other => match (other.parse::<PluralCategory>(), value.as_string()) {
                    (Ok(category), Some(text)) => {
                        variable.forms.insert(category, text.to_owned());
                    },
                    _ => tracing::trace!(key = other, "Ignoring unknown stringsdict rule key"),
                },
            }
        }
        variable
    }
}

/// A stringsdict entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluralEntry {
    /// Value of `NSStringLocalizedFormatKey`, e.g. `%#@files@`.
    pub format: String,
    pub variables: BTreeMap<String, PluralVariable>,
}

impl PluralEntry {
    pub fn variable(&self, name: &str) -> Option<&PluralVariable> {
        self.variables.get(name)
    }
}

/// The merged contents of a table's `.strings` and `.stringsdict` files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    strings: FxHashMap<String, String>,
    plurals: FxHashMap<String, PluralEntry>,
}

impl Table {
    /// Builds a table from the raw bytes of whichever files exist.
    ///
    /// The paths are only used for error reporting.
    pub fn from_sources(
        strings: Option<(&Path, &[u8])>,
        stringsdict: Option<(&Path, &[u8])>,
    ) -> Result<Self, BundleError> {
        let strings = match strings {
            Some((path, bytes)) => parse_strings(path, bytes)?,
            None => FxHashMap::default(),
        };
        let plurals = match stringsdict {
            Some((path, bytes)) => parse_stringsdict(path, bytes)?,
            None => FxHashMap::default(),
        };

        Ok(Self { strings, plurals })
    }

    /// Looks up `key`.
    ///
    /// A stringsdict entry shadows a `.strings` entry with the same key and
    /// yields its format key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.plurals
            .get(key)
            .map(|entry| entry.format.as_str())
            .or_else(|| self.strings.get(key).map(String::as_str))
    }

    pub fn plural(&self, key: &str) -> Option<&PluralEntry> {
        self.plurals.get(key)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
            + self
                .plurals
                .keys()
                .filter(|key| !self.strings.contains_key(*key))
                .count()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.plurals.is_empty()
    }
}

/// Parses the contents of a `.strings` file.
///
/// UTF-16 files must start with a byte order mark; anything else is read as
/// UTF-8.
pub fn parse_strings(path: &Path, bytes: &[u8]) -> Result<FxHashMap<String, String>, BundleError> {
    let text = decode_strings(path, bytes)?;
    let format = StringsFormat::from_reader(text.as_bytes()).map_err(|source| {
        BundleError::Strings {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(format
        .pairs
        .into_iter()
        .map(|pair| (pair.key, pair.value))
        .collect())
}

/// Parses the contents of a `.stringsdict` file.
pub fn parse_stringsdict(
    path: &Path,
    bytes: &[u8],
) -> Result<FxHashMap<String, PluralEntry>, BundleError> {
    let invalid = |reason: String| BundleError::Stringsdict {
        path: path.to_path_buf(),
        reason,
    };

    let value = plist::Value::from_reader(Cursor::new(bytes)).map_err(|source| {
        BundleError::Plist {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let root = value
        .into_dictionary()
        .ok_or_else(|| invalid("root object is not a dictionary".to_string()))?;

    let mut entries = FxHashMap::default();
    for (key, entry) in root {
        let dict = entry
            .into_dictionary()
            .ok_or_else(|| invalid(format!("entry '{}' is not a dictionary", key)))?;
        let format = dict
            .get(FORMAT_KEY)
            .and_then(plist::Value::as_string)
            .ok_or_else(|| invalid(format!("entry '{}' has no {}", key, FORMAT_KEY)))?
            .to_owned();

        let variables = dict
            .iter()
            .filter(|(name, _)| name.as_str() != FORMAT_KEY)
            .filter_map(|(name, rule)| {
                rule.as_dictionary()
                    .map(|rule| (name.clone(), PluralVariable::from_dictionary(rule)))
            })
            .collect();

        entries.insert(key, PluralEntry { format, variables });
    }

    Ok(entries)
}

fn decode_strings(path: &Path, bytes: &[u8]) -> Result<String, BundleError> {
    let invalid = |message: &str| BundleError::Encoding {
        path: path.to_path_buf(),
        message: message.to_string(),
    };
    let utf16 = |rest: &[u8], from_bytes: fn([u8; 2]) -> u16| {
        if rest.len() % 2 != 0 {
            return Err(invalid("invalid UTF-16: odd number of bytes"));
        }
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| from_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).map_err(|_| invalid("invalid UTF-16"))
    };

    match bytes {
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            String::from_utf8(rest.to_vec()).map_err(|_| invalid("invalid UTF-8"))
        },
        _ => String::from_utf8(bytes.to_vec()).map_err(|_| invalid("invalid UTF-8")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(source: &str) -> FxHashMap<String, String> {
        parse_strings(Path::new("en.lproj/Localizable.strings"), source.as_bytes()).unwrap()
    }

    const PLURALS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>files</key>
    <dict>
        <key>NSStringLocalizedFormatKey</key>
        <string>%#@files@</string>
        <key>files</key>
        <dict>
            <key>NSStringFormatSpecTypeKey</key>
            <string>NSStringPluralRuleType</string>
            <key>NSStringFormatValueTypeKey</key>
            <string>d</string>
            <key>one</key>
            <string>%d file</string>
            <key>other</key>
            <string>%d files</string>
        </dict>
    </dict>
</dict>
</plist>
"#;

    fn utf16(source: &str, bom: [u8; 2], to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
        let mut bytes = bom.to_vec();
        for unit in source.encode_utf16() {
            bytes.extend_from_slice(&to_bytes(unit));
        }
        bytes
    }

    #[test]
    fn parses_pairs_and_comments() {
        let entries = strings(
            r#"/* Title of the main screen */
"title" = "Welcome";

/* Shown below the title */
"subtitle" = "Hello, world";
"#,
        );

        assert_eq!(entries.len(), 2);
        assert_eq!(entries["title"], "Welcome");
        assert_eq!(entries["subtitle"], "Hello, world");
    }

    #[rstest]
    #[case::little_endian([0xFF, 0xFE], u16::to_le_bytes)]
    #[case::big_endian([0xFE, 0xFF], u16::to_be_bytes)]
    fn decodes_utf16_with_bom(#[case] bom: [u8; 2], #[case] to_bytes: fn(u16) -> [u8; 2]) {
        let bytes = utf16("\"k\" = \"v\";\n", bom, to_bytes);

        let entries = parse_strings(Path::new("Localizable.strings"), &bytes).unwrap();
        assert_eq!(entries["k"], "v");
    }

    #[test]
    fn skips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"\"k\" = \"v\";\n");

        let entries = parse_strings(Path::new("Localizable.strings"), &bytes).unwrap();
        assert_eq!(entries["k"], "v");
    }

    #[test]
    fn truncated_utf16_is_rejected() {
        let mut bytes = utf16("\"k\" = \"v\";\n", [0xFF, 0xFE], u16::to_le_bytes);
        bytes.push(0x41);

        let result = parse_strings(Path::new("en.lproj/Localizable.strings"), &bytes);
        assert!(matches!(result, Err(BundleError::Encoding { .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let result = parse_strings(Path::new("Localizable.strings"), b"\"k\" = \"\xFF\";\n");
        assert!(matches!(result, Err(BundleError::Encoding { .. })));
    }

    #[test]
    fn parses_stringsdict_entries() {
        let entries =
            parse_stringsdict(Path::new("en.lproj/Localizable.stringsdict"), PLURALS.as_bytes())
                .unwrap();

        let entry = &entries["files"];
        assert_eq!(entry.format, "%#@files@");

        let files = entry.variable("files").unwrap();
        assert_eq!(files.spec_type.as_deref(), Some("NSStringPluralRuleType"));
        assert_eq!(files.value_type.as_deref(), Some("d"));
        assert_eq!(files.form(PluralCategory::One), Some("%d file"));
        assert_eq!(files.form(PluralCategory::Few), Some("%d files"));
    }

    #[test]
    fn stringsdict_entry_without_format_key_is_rejected() {
        let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>files</key>
    <dict>
        <key>files</key>
        <dict/>
    </dict>
</dict>
</plist>
"#;

        let result = parse_stringsdict(Path::new("Localizable.stringsdict"), source.as_bytes());
        assert!(matches!(result, Err(BundleError::Stringsdict { .. })));
    }

    #[test]
    fn stringsdict_shadows_strings_entry() {
        let table = Table::from_sources(
            Some((
                Path::new("Localizable.strings"),
                b"\"files\" = \"Files\";\n\"title\" = \"Title\";\n",
            )),
            Some((Path::new("Localizable.stringsdict"), PLURALS.as_bytes())),
        )
        .unwrap();

        assert_eq!(table.get("files"), Some("%#@files@"));
        assert_eq!(table.get("title"), Some("Title"));
        assert!(table.plural("title").is_none());
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert!(Table::default().is_empty());
    }

    #[test]
    fn format_file_names() {
        assert_eq!(
            TableFormat::Strings.file_name("Localizable"),
            "Localizable.strings"
        );
        assert_eq!(
            TableFormat::Stringsdict.file_name("Localizable"),
            "Localizable.stringsdict"
        );
    }
}
