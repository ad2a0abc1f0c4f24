use std::time::Duration;

use docseek_core::config::{load, Config};

#[test]
fn partial_toml_keeps_defaults_and_ignores_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "endpoint = \"https://search.example:9443\"\nmax_results = 50\ntheme = \"dark\"\n",
    )
    .unwrap();

    let config = load(Some(&path)).unwrap();
    assert_eq!(config.endpoint, "https://search.example:9443");
    assert_eq!(config.max_results, 50);
    assert_eq!(config.index, "test");
    assert_eq!(config.debounce(), Duration::from_millis(500));
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.config_path, path);
}

#[test]
fn query_options_follow_config() {
    let config = Config {
        max_results: 8,
        metadata_match: false,
        ..Config::default()
    };
    let options = config.query_options();
    assert_eq!(options.size, 8);
    assert!(!options.metadata_match);
}

#[test]
fn invalid_values_in_file_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "request_timeout_ms = 5\n").unwrap();
    assert!(load(Some(&path)).is_err());

    std::fs::write(&path, "index = \"a/b\"\n").unwrap();
    assert!(load(Some(&path)).is_err());
}
