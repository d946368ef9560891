// Configuration unit tests: YAML parsing, env substitution, validation

use std::io::Write;
use std::path::PathBuf;

use watermarkize::config::*;
use watermarkize::permissions::PermissionStatus;

#[test]
fn test_empty_document_gives_defaults() {
    let config = AppConfig::from_yaml_with_env("").expect("Failed to parse empty config");
    assert_eq!(config.storage.downloads_dir, PathBuf::from("Downloads"));
    assert_eq!(config.device.os_version, "14");
    assert_eq!(config.logging.level, "info");
    assert!(config.marker.cache_dir.is_none());
}

#[test]
fn test_can_deserialize_full_config() {
    let yaml = r#"
storage:
  downloads_dir: /sdcard/Download
device:
  os_version: "12"
permissions:
  camera: granted
  write_external_storage: denied
marker:
  cache_dir: /tmp/marks
logging:
  level: debug
  format: json
"#;
    let config = AppConfig::from_yaml_with_env(yaml).expect("Failed to parse config");
    assert_eq!(config.storage.downloads_dir, PathBuf::from("/sdcard/Download"));
    assert_eq!(config.device.os_version, "12");
    assert_eq!(config.permissions.camera, PermissionStatus::Granted);
    assert_eq!(
        config.permissions.write_external_storage,
        PermissionStatus::Denied
    );
    assert_eq!(config.marker.cache_dir(), PathBuf::from("/tmp/marks"));
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_sections_keep_field_defaults() {
    let yaml = r#"
permissions:
  camera: blocked
"#;
    let config = AppConfig::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.permissions.camera, PermissionStatus::Blocked);
    assert_eq!(
        config.permissions.write_external_storage,
        PermissionStatus::Granted
    );
}

#[test]
fn test_env_var_substitution() {
    std::env::set_var("WATERMARKIZE_TEST_DOWNLOADS", "/mnt/photos");
    let yaml = r#"
storage:
  downloads_dir: ${WATERMARKIZE_TEST_DOWNLOADS}
"#;
    let config = AppConfig::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.storage.downloads_dir, PathBuf::from("/mnt/photos"));
}

#[test]
fn test_missing_env_var_is_error() {
    let yaml = r#"
device:
  os_version: ${WATERMARKIZE_TEST_UNSET_VERSION}
"#;
    let err = AppConfig::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("WATERMARKIZE_TEST_UNSET_VERSION"));
}

#[test]
fn test_unknown_permission_answer_is_error() {
    let yaml = r#"
permissions:
  camera: maybe
"#;
    assert!(AppConfig::from_yaml_with_env(yaml).is_err());
}

#[test]
fn test_from_file_validates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "device:\n  os_version: \"  \"").unwrap();

    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(err.contains("os_version"));
}

#[test]
fn test_from_file_missing_file() {
    let err = AppConfig::from_file("/no/such/watermarkize.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}

#[test]
fn test_empty_downloads_dir_rejected() {
    let mut config = AppConfig::default();
    config.storage.downloads_dir = PathBuf::new();
    assert!(config.validate().is_err());
}
