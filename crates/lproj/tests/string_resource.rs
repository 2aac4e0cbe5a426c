use lproj::{Bundle as _, BundleConfig, OpenBundleError, StringResource, open_bundle};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A crate directory with `lproj.toml` and a `Resources` bundle.
fn project(config: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(root, "lproj.toml", config);
    write(
        root,
        "Resources/en.lproj/Localizable.strings",
        "\"save\" = \"Save\";\n\"cancel\" = \"Cancel\";\n",
    );
    write(
        root,
        "Resources/fr.lproj/Localizable.strings",
        "\"save\" = \"Enregistrer\";\n",
    );
    write(
        root,
        "Resources/Base.lproj/Main.strings",
        "\"window.title\" = \"Editor\";\n",
    );

    temp_dir
}

#[test]
fn configured_bundle_resolves_strings() {
    let project = project(
        r#"
bundle_dir = "Resources"
development_language = "en"
preferred_localizations = ["fr"]
"#,
    );
    let config = BundleConfig::from_manifest_dir(project.path()).unwrap();
    let bundle = Arc::new(open_bundle(&config, Some(project.path())).unwrap());

    assert_eq!(bundle.localizations(), ["Base", "en", "fr"]);
    assert_eq!(bundle.development_localization(), Some("en"));

    let save = StringResource::builder()
        .key("save")
        .bundle(bundle.clone())
        .value("Save")
        .build();
    assert_eq!(save.localized(), "Enregistrer");
    assert_eq!(save.localized_for(&["en-US"]), "Save");
    assert_eq!(save.localized_for(&["fr-CA"]), "Enregistrer");

    // The French table is chosen even though it lacks the key.
    let cancel = StringResource::builder()
        .key("cancel")
        .bundle(bundle.clone())
        .build();
    assert_eq!(cancel.localized_for(&["fr"]), "cancel");
    assert_eq!(cancel.localized_for(&["de"]), "Cancel");

    let title = StringResource::builder()
        .key("window.title")
        .table_name("Main")
        .bundle(bundle)
        .value("Untitled")
        .build();
    assert_eq!(title.localized_for(&["fr"]), "Editor");
    assert_eq!(title.localized_for(&["de"]), "Untitled");
}

#[test]
fn development_language_comes_from_config_over_bundle() {
    let project = project("bundle_dir = \"Resources\"\ndevelopment_language = \"fr\"\n");
    write(
        project.path(),
        "Resources/Info.plist",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>CFBundleDevelopmentRegion</key>
    <string>en</string>
</dict>
</plist>
"#,
    );

    let config = BundleConfig::from_manifest_dir(project.path()).unwrap();
    let bundle = open_bundle(&config, Some(project.path())).unwrap();

    assert_eq!(bundle.development_localization(), Some("fr"));
}

#[test]
fn missing_bundle_dir_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "lproj.toml", "bundle_dir = \"Missing\"\n");

    let config = BundleConfig::from_manifest_dir(temp_dir.path()).unwrap();
    let result = open_bundle(&config, Some(temp_dir.path()));

    assert!(matches!(result, Err(OpenBundleError::Config(_))));
}

#[test]
fn misnamed_localization_directory_is_rejected() {
    let project = project("bundle_dir = \"Resources\"\n");
    fs::create_dir(project.path().join("Resources/not a tag.lproj")).unwrap();

    let config = BundleConfig::from_manifest_dir(project.path()).unwrap();
    let result = open_bundle(&config, Some(project.path()));

    assert!(matches!(
        result,
        Err(OpenBundleError::Config(
            lproj::BundleConfigError::InvalidLanguageIdentifier { name, .. }
        )) if name == "not a tag"
    ));
}
