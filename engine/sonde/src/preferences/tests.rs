use pretty_assertions::assert_eq;
use sonde_ir::{BytesEncoding, DisplayMode};

use super::{ConfigError, Preferences, BYTES_VAR, DISPLAY_VAR};

fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |var| {
        pairs
            .iter()
            .find(|(k, _)| *k == var)
            .map(|(_, v)| (*v).to_owned())
    }
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let prefs = Preferences::load(&dir.path().join("absent.json")).expect("defaults");
    assert_eq!(prefs, Preferences::default());
    assert_eq!(prefs.display, DisplayMode::Pretty);
    assert_eq!(prefs.bytes, BytesEncoding::Hex);
    assert!(prefs.timestamps);
}

#[test]
fn saved_preferences_load_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("prefs.json");
    let prefs = Preferences {
        display: DisplayMode::Canonical,
        bytes: BytesEncoding::Utf8,
        timestamps: false,
    };

    prefs.save(&path).expect("saved");
    assert_eq!(Preferences::load(&path).expect("loaded"), prefs);
}

#[test]
fn missing_keys_take_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{ "bytes": "base64" }"#).expect("written");

    let prefs = Preferences::load(&path).expect("loaded");
    assert_eq!(prefs.bytes, BytesEncoding::Base64);
    assert_eq!(prefs.display, DisplayMode::Pretty);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{ "display": "sparkly" }"#).expect("written");

    assert!(matches!(
        Preferences::load(&path),
        Err(ConfigError::Json { .. })
    ));
}

#[test]
fn overrides_replace_stored_choices() {
    let prefs = Preferences::default()
        .with_overrides(env(&[(DISPLAY_VAR, "JSON"), (BYTES_VAR, "utf-8")]))
        .expect("known names");
    assert_eq!(prefs.display, DisplayMode::Json);
    assert_eq!(prefs.bytes, BytesEncoding::Utf8);

    let untouched = Preferences::default()
        .with_overrides(env(&[(DISPLAY_VAR, "  ")]))
        .expect("blank is ignored");
    assert_eq!(untouched, Preferences::default());
}

#[test]
fn unknown_override_names_the_variable() {
    let err = Preferences::default()
        .with_overrides(env(&[(BYTES_VAR, "rot13")]))
        .expect_err("unknown encoding");
    assert_eq!(
        err.to_string(),
        "SONDE_BYTES: unknown byte encoding \"rot13\""
    );
}

#[test]
fn render_context_carries_choices() {
    let prefs = Preferences {
        display: DisplayMode::Raw,
        bytes: BytesEncoding::Array,
        timestamps: false,
    };
    let cx = prefs.render_context();
    assert_eq!(cx.display, DisplayMode::Raw);
    assert_eq!(cx.bytes, BytesEncoding::Array);
    assert!(!cx.timestamps);
}
