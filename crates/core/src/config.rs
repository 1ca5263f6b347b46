//! Engine configuration
//!
//! Defaults: an 8x8 board, five colors, 250 ms
//! before a run disappears, 100 ms per gravity step and 60 second rounds.
//! Hosts can override values through `GEM_MATCH_*` environment variables or a
//! JSON document.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::MIN_PALETTE;
use crate::types::{
    Color, DEFAULT_COLUMNS, DEFAULT_ROWS, DROP_DELAY_MS, REMOVE_SEQUENCE_DELAY_MS, ROUND_SECONDS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board must have at least one column and one row (got {columns}x{rows})")]
    EmptyBoard { columns: u8, rows: u8 },
    #[error("palette size must be between {min} and {max} (got {got})")]
    Palette { got: u8, min: u8, max: u8 },
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub columns: u8,
    pub rows: u8,
    /// Number of palette colors in play
    pub colors: u8,
    pub remove_delay_ms: u32,
    pub drop_delay_ms: u32,
    pub round_seconds: u32,
    /// Fixed RNG seed; `None` seeds from the wall clock.
    pub seed: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            colors: Color::COUNT,
            remove_delay_ms: REMOVE_SEQUENCE_DELAY_MS,
            drop_delay_ms: DROP_DELAY_MS,
            round_seconds: ROUND_SECONDS,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            columns: env_parse("GEM_MATCH_COLUMNS").unwrap_or(d.columns),
            rows: env_parse("GEM_MATCH_ROWS").unwrap_or(d.rows),
            colors: env_parse("GEM_MATCH_COLORS").unwrap_or(d.colors),
            remove_delay_ms: env_parse("GEM_MATCH_REMOVE_DELAY_MS").unwrap_or(d.remove_delay_ms),
            drop_delay_ms: env_parse("GEM_MATCH_DROP_DELAY_MS").unwrap_or(d.drop_delay_ms),
            round_seconds: env_parse("GEM_MATCH_ROUND_SECONDS").unwrap_or(d.round_seconds),
            seed: env_parse("GEM_MATCH_SEED").or(d.seed),
        }
    }

    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyBoard {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !(MIN_PALETTE..=Color::COUNT).contains(&self.colors) {
            return Err(ConfigError::Palette {
                got: self.colors,
                min: MIN_PALETTE,
                max: Color::COUNT,
            });
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, columns: u8, rows: u8) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn with_delays(mut self, remove_delay_ms: u32, drop_delay_ms: u32) -> Self {
        self.remove_delay_ms = remove_delay_ms;
        self.drop_delay_ms = drop_delay_ms;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
