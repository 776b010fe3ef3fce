//! Config Loading
//!
//! Store configuration round-trips through serde and is validated on open.

use rotalog::{ConfigError, Error, LogDirectory, LogIdentity, RotatingLogStore, StoreConfig};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_from_json() {
    let json = r###"{
        "separator": "##",
        "handle_ttl": { "secs": 30, "nanos": 0 },
        "lock_poll_interval": { "secs": 0, "nanos": 5000000 }
    }"###;
    let config: StoreConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.separator, "##");
    assert_eq!(config.handle_ttl, Some(Duration::from_secs(30)));
    assert_eq!(config.lock_poll_interval, Duration::from_millis(5));
    assert!(config.validate().is_ok());
}

#[test]
fn open_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    let config = StoreConfig::new().with_separator("line\nbreak");
    let result = RotatingLogStore::open(
        LogDirectory::from_root(temp.path()),
        LogIdentity::new("cfg", 64).unwrap(),
        config,
    );
    assert!(matches!(
        result,
        Err(Error::InvalidConfig(ConfigError::SeparatorContainsNewline))
    ));
}

#[test]
fn open_in_validates_identity() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        RotatingLogStore::open_in(temp.path(), "app", 0),
        Err(Error::InvalidIdentity(_))
    ));
}

#[test]
fn identity_from_json_is_validated() {
    let identity: LogIdentity =
        serde_json::from_str(r#"{"name":"app","max_size_bytes":256}"#).unwrap();
    assert_eq!(identity, LogIdentity::new("app", 256).unwrap());

    let zero = serde_json::from_str::<LogIdentity>(r#"{"name":"app","max_size_bytes":0}"#);
    assert!(zero.is_err());
    let escape = serde_json::from_str::<LogIdentity>(r#"{"name":"../x","max_size_bytes":8}"#);
    assert!(escape.is_err());
}
