use wordscope::LanguageRegistry;
use wordscope::config::Config;

// Env vars are process-wide, so every override is checked inside one test
#[test]
fn test_load_reads_toml_then_env_overrides() {
    let dir = std::env::temp_dir().join(format!("wordscope-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("wordscope.toml");
    std::fs::write(
        &path,
        r#"
        [scoring]
        rank_ceiling = 8000
        default_rank_boundary = 9000

        [fetch]
        default_timeout_secs = 20
        "#,
    )
    .unwrap();

    unsafe {
        std::env::set_var("WORDSCOPE_ENV_FILE", dir.join("missing.env"));
        std::env::set_var("WORDSCOPE_CONFIG", &path);
        std::env::set_var("WORDSCOPE_FETCH_TIMEOUT_SECS", "7");
        std::env::set_var("WORDSCOPE_LANGUAGES", "es, DE ,");
        std::env::set_var("WORDSCOPE_TRANSLATE_API_KEY", "secret");
    }

    let config = Config::load().unwrap();
    assert_eq!(config.scoring.rank_ceiling, 8000);
    // Boundary above the ceiling is clamped during validation
    assert_eq!(config.scoring.default_rank_boundary, 8000.0);
    assert_eq!(config.fetch.default_timeout_secs, 7);
    assert_eq!(config.languages.available, vec!["es", "de"]);
    assert_eq!(config.translate.api_key.as_deref(), Some("secret"));

    let registry = LanguageRegistry::from_config(&config);
    assert_eq!(registry.available(), vec!["es", "de"]);
    assert!(registry.resolve("fr").is_err());

    unsafe {
        std::env::remove_var("WORDSCOPE_ENV_FILE");
        std::env::remove_var("WORDSCOPE_CONFIG");
        std::env::remove_var("WORDSCOPE_FETCH_TIMEOUT_SECS");
        std::env::remove_var("WORDSCOPE_LANGUAGES");
        std::env::remove_var("WORDSCOPE_TRANSLATE_API_KEY");
    }
    let _ = std::fs::remove_dir_all(&dir);
}
