use rulebook_registry::{RulebookConfig, RulebookError, load_config};
use serial_test::serial;
use std::fs;

fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write config file");
    path
}

#[test]
#[serial]
fn loads_values_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "rulebook.toml",
        "default_namespace = \"strict\"\nmessage_separator = \" | \"\n",
    );

    let config = load_config(Some(&path)).unwrap();

    assert_eq!(config.default_namespace, "strict");
    assert_eq!(config.message_separator, " | ");
}

#[test]
#[serial]
fn missing_keys_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "partial.toml", "message_separator = \", \"\n");

    let config = load_config(Some(&path)).unwrap();

    assert_eq!(config.default_namespace, RulebookConfig::default().default_namespace);
    assert_eq!(config.message_separator, ", ");
}

#[test]
#[serial]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(Some(dir.path().join("absent.toml")));

    assert!(matches!(result, Err(RulebookError::Config { .. })));
}

#[test]
#[serial]
fn invalid_namespace_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "rulebook.toml", "default_namespace = \"a#b\"\n");

    let err = load_config(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("default_namespace"), "{err}");
}
