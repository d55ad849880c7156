use pretty_assertions::assert_eq;

use super::*;
use crate::errors::Entity;

#[test]
fn yaml_config() {
    let config = ConnectionConfig::from_yaml(
        "host: tarantool.local
port: 3302
username: guest
password: secret
type: tcp
options:
  connect_timeout: 5
  persistent: true
  ratio: 0.5
  label: primary
",
    )
    .unwrap();

    let expected = ConnectionConfig {
        conn_type: Some("tcp".into()),
        ..ConnectionConfig::with_host("tarantool.local", Some(3302))
            .credentials("guest", "secret")
            .option("connect_timeout", 5_i64)
            .option("persistent", true)
            .option("ratio", 0.5_f64)
            .option("label", "primary")
    };
    assert_eq!(expected, config);

    let keys: Vec<&str> = config.options.keys().map(String::as_str).collect();
    assert_eq!(vec!["connect_timeout", "persistent", "ratio", "label"], keys);
}

#[test]
fn yaml_config_defaults() {
    let config = ConnectionConfig::from_yaml("dsn: tcp://guest:@localhost:3301").unwrap();
    assert_eq!(Some("tcp://guest:@localhost:3301".to_string()), config.dsn);
    assert_eq!(None, config.host);
    assert!(config.options.is_empty());
}

#[test]
fn yaml_config_wrong_type() {
    let err = ConnectionConfig::from_yaml("port: not-a-number").unwrap_err();
    assert!(matches!(err, TarsqlError::Invalid(Entity::Config, Some(_))));
}

#[test]
fn yaml_config_string_port() {
    let config = ConnectionConfig::from_yaml("host: localhost\nport: \"3301\"").unwrap();
    assert_eq!(Some(3301), config.port);

    let config = ConnectionConfig::from_yaml("host: localhost\nport: \"\"").unwrap();
    assert_eq!(None, config.port);

    let config = ConnectionConfig::from_yaml("host: localhost\nport: ~").unwrap();
    assert_eq!(None, config.port);

    let err = ConnectionConfig::from_yaml("port: \"70000\"").unwrap_err();
    assert!(matches!(err, TarsqlError::Invalid(Entity::Config, Some(_))));
}

#[test]
fn option_rendering() {
    assert_eq!("1", OptionValue::from(true).to_string());
    assert_eq!("0", OptionValue::from(false).to_string());
    assert_eq!("42", OptionValue::from(42_i64).to_string());
    assert_eq!("0.25", OptionValue::from(0.25_f64).to_string());
}
