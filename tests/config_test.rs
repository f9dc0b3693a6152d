// tests/config_test.rs
use bumpkin::config::{find_config_file, load_config, Config};
use bumpkin::BumpkinError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Run `f` with the working directory set to `dir`
fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir).unwrap();
    let result = f();
    env::set_current_dir(previous).unwrap();
    result
}

#[test]
fn test_load_from_explicit_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
prefix = "app-v"
remote = "upstream"

[hooks]
pre-tag = ["cargo test", "cargo clippy"]
post-tag = ["echo tagged $BUMPKIN_TAG"]
post-push = ["./scripts/notify.sh"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.prefix, "app-v");
    assert_eq!(config.remote, "upstream");
    assert_eq!(config.hooks.pre_tag.len(), 2);
    assert_eq!(config.hooks.post_tag, vec!["echo tagged $BUMPKIN_TAG"]);
    assert_eq!(config.hooks.post_push, vec!["./scripts/notify.sh"]);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, BumpkinError::Config(_)));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[hooks]\npre-tag = \"not a list\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_find_config_file_prefers_plain_name() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".bumpkin.toml"), "prefix = \"hidden-\"").unwrap();
    assert_eq!(
        find_config_file(dir.path()),
        Some(dir.path().join(".bumpkin.toml"))
    );

    fs::write(dir.path().join("bumpkin.toml"), "prefix = \"plain-\"").unwrap();
    assert_eq!(
        find_config_file(dir.path()),
        Some(dir.path().join("bumpkin.toml"))
    );
}

#[test]
#[serial]
fn test_load_from_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bumpkin.toml"),
        "remote = \"mirror\"\n[hooks]\npost-push = [\"true\"]\n",
    )
    .unwrap();

    let config = in_dir(dir.path(), || load_config(None)).unwrap();
    assert_eq!(config.prefix, "v");
    assert_eq!(config.remote, "mirror");
    assert_eq!(config.hooks.post_push, vec!["true"]);
}

#[test]
#[serial]
fn test_hidden_file_in_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".bumpkin.toml"), "prefix = \"release-\"").unwrap();

    let config = in_dir(dir.path(), || load_config(None)).unwrap();
    assert_eq!(config.prefix, "release-");
    assert_eq!(config.remote, "origin");
}

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.prefix, "v");
    assert_eq!(config.remote, "origin");
    assert!(config.hooks.pre_tag.is_empty());
    assert!(config.hooks.post_tag.is_empty());
    assert!(config.hooks.post_push.is_empty());
}
