//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::{Config, VERSION};

impl Config {
    /// Render the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# msgscope {version} configuration

# How timestamps map to dates and clock times: "local" or "utc"
# (MSGSCOPE_TZ overrides)
time_zone = "{time_zone}"

# Load the built-in demo archive when started without paths
demo_on_start = {demo_on_start}

[display]
# Bars kept by the thread histogram (MSGSCOPE_TOP_N overrides)
top_n = {top_n}
# Redraw tick in milliseconds
tick_ms = {tick_ms}
# Glyph drawn for each message on the scatter canvas
point_glyph = "{point_glyph}"

[logging]
# trace, debug, info, warn or error (MSGSCOPE_LOG overrides; RUST_LOG
# replaces the whole filter)
level = "{log_level}"
# JSON lines written next to the logs panel or stderr
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            version = VERSION,
            time_zone = self.time_zone.as_str(),
            demo_on_start = self.demo_on_start,
            top_n = self.display.top_n,
            tick_ms = self.display.tick_ms,
            point_glyph = self.display.point_glyph,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}

/// Paths inside basic TOML strings need their backslashes escaped
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
