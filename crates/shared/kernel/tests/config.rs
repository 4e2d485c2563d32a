use porter_kernel::config::{self, load_config, load_and_install};
use porter_kernel::domain::config::PorterConfig;
use porter_kernel::Flags;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write config file");
    path
}

#[test]
fn loads_named_flags_from_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "porter.toml", "[dto]\nflags = \"partial | mutable\"\n");

    let cfg: PorterConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.dto.flags, Flags::PARTIAL | Flags::MUTABLE);
}

#[test]
fn loads_numeric_flags_from_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "porter.json", r#"{ "dto": { "flags": 8 } }"#);

    let cfg: PorterConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.dto.flags, Flags::CAST_PRIMITIVES);
}

#[test]
fn explicit_file_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(load_config::<PorterConfig>(Some(&missing)).is_err());
}

#[test]
fn default_file_is_optional() {
    let cfg: PorterConfig = load_config(None::<&str>).unwrap();
    assert_eq!(cfg, PorterConfig::default());
}

#[test]
fn unknown_flag_names_fail_to_deserialize() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "porter.toml", "[dto]\nflags = \"sticky\"\n");

    let err = load_config::<PorterConfig>(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}

#[test]
#[serial]
fn installed_config_drives_process_flags() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "porter.toml", "[dto]\nflags = \"ignore_unknown_properties\"\n");

    let installed = load_and_install(Some(&path)).unwrap();
    assert_eq!(installed, config::current());
    assert_eq!(config::flags(), Flags::IGNORE_UNKNOWN_PROPERTIES);

    config::set_flags(Flags::MUTABLE);
    assert_eq!(config::flags(), Flags::MUTABLE);

    config::reset();
    assert_eq!(config::flags(), Flags::NONE);
}
