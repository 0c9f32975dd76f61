use std::io::Write;

use serial_test::serial;
use tabula_data::config::{
    ENV_DATASOURCE_MAX_CONNECTIONS, ENV_DATASOURCE_URL, ENV_SQL_DIALECT, ENV_SQL_IDENTIFIER_POLICY,
};
use tabula_data::{
    AnsiSqlGenerator, ConfigError, DataConfig, Dialect, IdentifierPolicy, SqlGenerator,
    TableDescription,
};

fn clear_env() {
    for key in [
        ENV_DATASOURCE_URL,
        ENV_DATASOURCE_MAX_CONNECTIONS,
        ENV_SQL_DIALECT,
        ENV_SQL_IDENTIFIER_POLICY,
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_defaults() {
    let config = DataConfig::from_yaml_str("").unwrap();
    assert_eq!(config.datasource.url, "sqlite::memory:");
    assert_eq!(config.datasource.max_connections, 1);
    assert_eq!(config.sql.dialect, Dialect::Generic);
    assert_eq!(config.sql.identifier_policy, IdentifierPolicy::Validate);
}

#[test]
fn test_yaml_values() {
    let yaml = r#"
datasource:
  url: "postgres://app@localhost/app"
  max_connections: 8
sql:
  dialect: postgres
  identifier_policy: quote
"#;
    let config = DataConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.datasource.url, "postgres://app@localhost/app");
    assert_eq!(config.datasource.max_connections, 8);
    assert_eq!(config.sql.dialect, Dialect::Postgres);
    assert_eq!(config.sql.identifier_policy, IdentifierPolicy::Quote);
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let config = DataConfig::from_yaml_str("sql:\n  dialect: mysql\n").unwrap();
    assert_eq!(config.sql.dialect, Dialect::MySql);
    assert_eq!(config.datasource.url, "sqlite::memory:");
}

#[test]
fn test_malformed_yaml_is_load_error() {
    let err = DataConfig::from_yaml_str("datasource: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_zero_max_connections_in_yaml_is_invalid() {
    let err = DataConfig::from_yaml_str("datasource:\n  max_connections: 0\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Invalid { ref key, .. } if key == "datasource.max_connections")
    );
}

#[test]
fn test_generator_from_config() {
    let config = DataConfig::from_yaml_str("sql:\n  dialect: postgres\n  identifier_policy: quote\n")
        .unwrap();
    let gen = AnsiSqlGenerator::from_config(&config.sql);
    let table = TableDescription::new("users", "id").unwrap();
    assert_eq!(
        gen.select_by_id(&table).unwrap(),
        "SELECT * FROM \"users\" WHERE \"id\" = $1"
    );
}

#[test]
#[serial]
fn test_load_file_with_env_overlay() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "datasource:\n  url: \"sqlite://from-file.db\"\nsql:\n  dialect: sqlite").unwrap();

    std::env::set_var(ENV_DATASOURCE_URL, "sqlite://from-env.db");
    std::env::set_var(ENV_DATASOURCE_MAX_CONNECTIONS, "4");
    let config = DataConfig::load(file.path()).unwrap();
    clear_env();

    assert_eq!(config.datasource.url, "sqlite://from-env.db");
    assert_eq!(config.datasource.max_connections, 4);
    assert_eq!(config.sql.dialect, Dialect::Sqlite);
}

#[test]
#[serial]
fn test_load_missing_file_uses_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = DataConfig::load(dir.path().join("absent.yaml")).unwrap();
    assert_eq!(config.sql.dialect, Dialect::Generic);
}

#[test]
#[serial]
fn test_invalid_env_value() {
    clear_env();
    std::env::set_var(ENV_SQL_DIALECT, "oracle");
    let mut config = DataConfig::default();
    let err = config.apply_env().unwrap_err();
    clear_env();

    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == ENV_SQL_DIALECT));
}

#[test]
#[serial]
fn test_zero_max_connections_env_is_invalid() {
    clear_env();
    std::env::set_var(ENV_DATASOURCE_MAX_CONNECTIONS, "0");
    let mut config = DataConfig::default();
    let err = config.apply_env().unwrap_err();
    clear_env();

    assert!(
        matches!(err, ConfigError::Invalid { ref key, .. } if key == ENV_DATASOURCE_MAX_CONNECTIONS)
    );
    assert_eq!(config.datasource.max_connections, 1);
}
