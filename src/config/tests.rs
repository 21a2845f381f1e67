//! Configuration tests
//!
//! The template written by `to_toml` must parse back into the same values,
//! so adding a field without serializing it fails here.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(toml_str: &str) -> FileConfig {
    toml::from_str(toml_str).expect("config should parse")
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

#[test]
fn test_config_roundtrip_preserves_every_field() {
    let mut config = Config::default();
    config.time_zone = TimeBasis::Utc;
    config.demo_on_start = false;
    config.display.top_n = 7;
    config.display.tick_ms = 250;
    config.display.point_glyph = '·';
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_dir = PathBuf::from("/tmp/msgscope-logs");
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "trace".to_string();

    let back = Config::layered(parse(&config.to_toml()), no_env);

    assert_eq!(back.time_zone, TimeBasis::Utc);
    assert!(!back.demo_on_start);
    assert_eq!(back.display.top_n, 7);
    assert_eq!(back.display.tick_ms, 250);
    assert_eq!(back.display.point_glyph, '·');
    assert_eq!(back.logging.level, "debug");
    assert!(back.logging.file_enabled);
    assert_eq!(back.logging.file_dir, PathBuf::from("/tmp/msgscope-logs"));
    assert_eq!(back.logging.file_rotation, LogRotation::Hourly);
    assert_eq!(back.logging.file_prefix, "trace");
}

// ─────────────────────────────────────────────────────────────────────────────
// Layering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::layered(FileConfig::default(), no_env);
    let defaults = Config::default();
    assert_eq!(config.time_zone, defaults.time_zone);
    assert_eq!(config.demo_on_start, defaults.demo_on_start);
    assert!(config.enable_tui);
    assert_eq!(config.display.top_n, 20);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
time_zone = "local"
[display]
top_n = 5
"#,
    );
    let env: HashMap<&str, &str> = [
        ("MSGSCOPE_TZ", "UTC"),
        ("MSGSCOPE_TOP_N", "12"),
        ("MSGSCOPE_NO_TUI", "true"),
    ]
    .into_iter()
    .collect();

    let config = Config::layered(file, |k| env.get(k).map(|v| v.to_string()));
    assert_eq!(config.time_zone, TimeBasis::Utc);
    assert_eq!(config.display.top_n, 12);
    assert!(!config.enable_tui);
}

#[test]
fn test_unparseable_env_number_falls_back_to_file() {
    let file = parse("[display]\ntop_n = 5\n");
    let config = Config::layered(file, |k| (k == "MSGSCOPE_TOP_N").then(|| "many".to_string()));
    assert_eq!(config.display.top_n, 5);
}

#[test]
fn test_partial_sections() {
    let file = parse(
        r#"
[logging]
file_rotation = "never"
"#,
    );
    let config = Config::layered(file, no_env);
    assert_eq!(config.logging.file_rotation, LogRotation::Never);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.display.tick_ms, 100);
}

// ─────────────────────────────────────────────────────────────────────────────
// Section parsing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_display_sanitizes_values() {
    let display = DisplayConfig::from_file(Some(FileDisplay {
        top_n: Some(0),
        tick_ms: Some(1),
        point_glyph: Some(String::new()),
    }));
    assert_eq!(display.top_n, 20);
    assert_eq!(display.tick_ms, 16);
    assert_eq!(display.point_glyph, '•');
}

#[test]
fn test_log_rotation_parsing() {
    assert_eq!("HOURLY".parse::<LogRotation>(), Ok(LogRotation::Hourly));
    assert_eq!(" never ".parse::<LogRotation>(), Ok(LogRotation::Never));
    assert!("weekly".parse::<LogRotation>().is_err());
}

#[test]
fn test_unknown_rotation_keeps_default() {
    let logging = LoggingConfig::from_file(
        Some(FileLogging {
            file_rotation: Some("weekly".to_string()),
            file_prefix: Some("  ".to_string()),
            ..FileLogging::default()
        }),
        None,
    );
    assert_eq!(logging.file_rotation, LogRotation::Daily);
    assert_eq!(logging.file_prefix, "msgscope");
}

#[test]
fn test_log_level_env_over_file() {
    let file = parse("[logging]\nlevel = \"warn\"\n");
    let config = Config::layered(file, |key| {
        (key == "MSGSCOPE_LOG").then(|| "DEBUG".to_string())
    });
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.directive(), "msgscope=debug");

    let file = parse("[logging]\nlevel = \"loud\"\n");
    let config = Config::layered(file, |_| None);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_time_zone_parsing() {
    assert_eq!("UTC".parse::<TimeBasis>(), Ok(TimeBasis::Utc));
    assert_eq!("local".parse::<TimeBasis>(), Ok(TimeBasis::Local));
    assert!("mars".parse::<TimeBasis>().is_err());
}

#[test]
fn test_unknown_keys_are_rejected_by_type() {
    // A wrong type is a parse error rather than a silent default
    let parsed: Result<FileConfig, _> = toml::from_str("demo_on_start = \"yes\"");
    assert!(parsed.is_err());
}
