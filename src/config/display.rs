//! Display configuration: histogram caps and canvas settings

use serde::Deserialize;

/// Smallest allowed tick; faster than this only burns CPU
const MIN_TICK_MS: u64 = 16;

/// Display configuration
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Bars kept by the thread histogram
    pub top_n: usize,
    /// Redraw tick in milliseconds
    pub tick_ms: u64,
    /// Glyph drawn for each message on the scatter canvas
    pub point_glyph: char,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            tick_ms: 100,
            point_glyph: '•',
        }
    }
}

/// Display settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileDisplay {
    pub top_n: Option<usize>,
    pub tick_ms: Option<u64>,
    pub point_glyph: Option<String>,
}

impl DisplayConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileDisplay>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            top_n: file.top_n.filter(|n| *n > 0).unwrap_or(defaults.top_n),
            tick_ms: file
                .tick_ms
                .map(|t| t.max(MIN_TICK_MS))
                .unwrap_or(defaults.tick_ms),
            point_glyph: file
                .point_glyph
                .and_then(|g| g.chars().next())
                .unwrap_or(defaults.point_glyph),
        }
    }
}
