use super::*;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let config = BotConfig::default();
    assert_eq!(config.paths.scratch_dir, PathBuf::from("repos"));
    assert_eq!(config.paths.exclusion_file, PathBuf::from("exclusion.txt"));
    assert_eq!(config.search.query, "VBA");
    assert_eq!(config.search.per_page, 30);
    assert_eq!(config.search.page_delay(), Duration::from_secs(5));
    assert_eq!(config.issues.suppression_months, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let config: BotConfig = toml::from_str(
        r#"
[search]
query = "language:vbnet"
pages = 3

[issues]
suppression_months = 6
"#,
    )
    .unwrap();
    assert_eq!(config.search.query, "language:vbnet");
    assert_eq!(config.search.pages, 3);
    assert_eq!(config.search.sort, "updated");
    assert_eq!(config.issues.suppression_months, 6);
    assert_eq!(config.paths, PathsConfig::default());
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = load_bot_config(Some(&dir.path().join("vbascout.toml")));
    assert_eq!(config, BotConfig::default());
}

#[test]
fn test_invalid_file_falls_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vbascout.toml");

    std::fs::write(&path, "[search\nquery = ").unwrap();
    assert!(matches!(load_toml_config(&path), Err(ConfigError::Parse(_))));
    assert_eq!(load_bot_config(Some(&path)), BotConfig::default());

    std::fs::write(&path, "[search]\nper_page = 500\n").unwrap();
    assert!(matches!(load_toml_config(&path), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bot.toml");
    std::fs::write(&path, "[paths]\nscratch_dir = \"/tmp/checkouts\"\n").unwrap();

    let config = load_bot_config(Some(&path));
    assert_eq!(config.paths.scratch_dir, PathBuf::from("/tmp/checkouts"));
    assert_eq!(config.paths.exclusion_file, PathBuf::from("exclusion.txt"));
}
