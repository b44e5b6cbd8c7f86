use areatrack::config::{Config, SeedArea};
use std::fs;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.database.url, "sqlite://areatrack.db?mode=rwc");
    assert_eq!(config.database.max_connections, 1);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
    assert!(config.dashboard.overdue_warning);
    assert_eq!(config.seed.areas.last().map(|a| a.code.as_str()), Some("ADM09"));
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    config.database.max_connections = 0;
    assert!(config.validate().is_err());
    config.database.max_connections = 64;
    assert!(config.validate().is_err());

    config.database.max_connections = 4;
    config.database.url = "  ".to_string();
    assert!(config.validate().is_err());

    config.database.url = "sqlite::memory:".to_string();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());

    config.logging.level = "debug".to_string();
    config.seed.areas.push(SeedArea::new("Sistemas", "SIS99"));
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Duplicate seed area name"));
}

#[test]
fn test_partial_config_deserialization() {
    // Test that partial TOML configs merge with defaults
    let partial_toml = r#"
[database]
url = "sqlite://custom.db?mode=rwc"

[dashboard]
overdue_warning = false
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    assert_eq!(config.database.url, "sqlite://custom.db?mode=rwc");
    assert!(!config.dashboard.overdue_warning);

    // Check that unspecified values use defaults
    assert_eq!(config.database.max_connections, 1);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.seed.areas.len(), 9);
}

#[test]
fn test_seed_areas_from_toml() {
    let toml_str = r#"
[[seed.areas]]
name = "Legal"
code = "LEG001"
"#;

    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.seed.areas, vec![SeedArea::new("Legal", "LEG001")]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_generate_and_load_default_config() {
    let dir = std::env::temp_dir().join(format!("areatrack-config-{}", uuid::Uuid::new_v4()));
    let path = dir.join("nested").join("config.toml");

    Config::generate_default_config(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Areatrack Configuration File"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, Config::default());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_invalid_file_is_reported() {
    let dir = std::env::temp_dir().join(format!("areatrack-config-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    fs::write(&path, "[database]\nmax_connections = 0\n").unwrap();

    assert!(Config::load_from_file(&path).is_err());

    let _ = fs::remove_dir_all(&dir);
}
