//! Integration tests for configuration and scenario parsing
//!
//! Tests watcher configuration parsing, including:
//! - Minimal and full config files
//! - Defaults for omitted sections
//! - Scenario file shape

mod watcher_config {

    const MINIMAL_CONFIG: &str = r#"
[watcher]
log_level = "info"
"#;

    const FULL_CONFIG: &str = r#"
[watcher]
log_level = "debug"
event_capacity = 512

[replay]
scenario = "/etc/usb-disk-monitor/demo.toml"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config: toml::Value = toml::from_str(MINIMAL_CONFIG).unwrap();

        let watcher = config.get("watcher").unwrap();
        assert_eq!(watcher.get("log_level").unwrap().as_str().unwrap(), "info");
        // Omitted sections fall back to defaults on deserialization.
        assert!(config.get("replay").is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: toml::Value = toml::from_str(FULL_CONFIG).unwrap();

        let watcher = config.get("watcher").unwrap();
        assert_eq!(watcher.get("log_level").unwrap().as_str().unwrap(), "debug");
        assert_eq!(
            watcher.get("event_capacity").unwrap().as_integer().unwrap(),
            512
        );

        let replay = config.get("replay").unwrap();
        assert_eq!(
            replay.get("scenario").unwrap().as_str().unwrap(),
            "/etc/usb-disk-monitor/demo.toml"
        );
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result: Result<toml::Value, _> = toml::from_str("[watcher\nlog_level=");
        assert!(result.is_err());
    }
}

mod scenario_files {
    use types::description::keys;
    use types::DiskDescription;

    const SCENARIO: &str = r#"
[[step]]
event = "appeared"
after_ms = 100

[step.description]
VolumeUUID = { uuid = "6ba7b810-9dad-11d1-80b4-00c04fd430c8" }
VolumeName = { str = "BACKUP" }
MediaSize = { int = 64000000000 }
MediaName = { str = "USB HDD" }
VolumePath = { path = "/Volumes/BACKUP" }
"#;

    #[test]
    fn test_scenario_description_deserializes_typed() {
        let value: toml::Value = toml::from_str(SCENARIO).unwrap();
        let steps = value.get("step").unwrap().as_array().unwrap();
        assert_eq!(steps.len(), 1);

        let desc_value = steps[0].get("description").unwrap().clone();
        let desc: DiskDescription = desc_value.try_into().unwrap();

        assert_eq!(desc.str_field(keys::VOLUME_NAME), Some("BACKUP"));
        assert_eq!(desc.int_field(keys::MEDIA_SIZE), Some(64_000_000_000));
        assert!(desc.uuid_field(keys::VOLUME_UUID).is_some());
    }
}
