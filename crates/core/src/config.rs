//! Board configuration
//!
//! [`BoardConfig`] is plain serde data; every field has a default, so a JSON
//! file only needs the fields it changes. Environment overrides follow the
//! `MATCH3_*` naming used by the binaries.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    Coord, TileKind, CLEAR_DELAY_MS, COLLAPSE_BASE_MS, COLLAPSE_SETTLE_MS, DEFAULT_BORDER_SIZE,
    DEFAULT_HEIGHT, DEFAULT_PALETTE_SIZE, DEFAULT_WIDTH, FILL_FALL_OFFSET, FILL_MOVE_MS,
    HIGHLIGHT_MS, REFILL_SETTLE_MS, SWAP_MS,
};

/// Smallest palette that can always fill a board without matches.
pub const MIN_PALETTE_SIZE: u8 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("board dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u16, height: u16 },
    #[error("palette needs at least 3 values (got {0})")]
    PaletteTooSmall(u8),
    #[error("starting tile at {0} is outside the board")]
    StartingTileOutOfBounds(Coord),
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// A pre-placed tile, laid out before the board's normal tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingTile {
    pub x: i32,
    pub y: i32,
    /// Render depth hint, passed through to the view
    #[serde(default)]
    pub z: i32,
    #[serde(default)]
    pub kind: TileKind,
}

impl StartingTile {
    pub fn obstacle(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            z: 0,
            kind: TileKind::Obstacle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u16,
    pub height: u16,
    /// Margin kept around the board by the camera
    pub border_size: u16,
    pub palette_size: u8,
    pub swap_ms: u32,
    /// Fall time per row during collapse
    pub collapse_base_ms: u32,
    pub highlight_ms: u32,
    pub clear_delay_ms: u32,
    pub collapse_settle_ms: u32,
    pub refill_settle_ms: u32,
    /// Rows above its slot a refilled piece starts from (0 = no drop-in)
    pub fill_fall_offset: i32,
    pub fill_move_ms: u32,
    pub starting_tiles: Vec<StartingTile>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            border_size: DEFAULT_BORDER_SIZE,
            palette_size: DEFAULT_PALETTE_SIZE,
            swap_ms: SWAP_MS,
            collapse_base_ms: COLLAPSE_BASE_MS,
            highlight_ms: HIGHLIGHT_MS,
            clear_delay_ms: CLEAR_DELAY_MS,
            collapse_settle_ms: COLLAPSE_SETTLE_MS,
            refill_settle_ms: REFILL_SETTLE_MS,
            fill_fall_offset: FILL_FALL_OFFSET,
            fill_move_ms: FILL_MOVE_MS,
            starting_tiles: Vec::new(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build from environment variables.
    ///
    /// `MATCH3_CONFIG` names a JSON file to start from; `MATCH3_WIDTH`,
    /// `MATCH3_HEIGHT` and `MATCH3_PALETTE` override single fields.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`BoardConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut config = match get("MATCH3_CONFIG") {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(v) = get("MATCH3_WIDTH") {
            config.width = parse_env("MATCH3_WIDTH", v)?;
        }
        if let Some(v) = get("MATCH3_HEIGHT") {
            config.height = parse_env("MATCH3_HEIGHT", v)?;
        }
        if let Some(v) = get("MATCH3_PALETTE") {
            config.palette_size = parse_env("MATCH3_PALETTE", v)?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.palette_size < MIN_PALETTE_SIZE {
            return Err(ConfigError::PaletteTooSmall(self.palette_size));
        }
        for st in &self.starting_tiles {
            if st.x < 0 || st.y < 0 || st.x >= self.width as i32 || st.y >= self.height as i32 {
                return Err(ConfigError::StartingTileOutOfBounds(Coord::new(st.x, st.y)));
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

/// RNG seed from `MATCH3_SEED`, if set and numeric.
pub fn seed_from_env() -> Option<u32> {
    std::env::var("MATCH3_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Log file path from `MATCH3_LOG_PATH`, if set and non-empty.
pub fn log_path_from_env() -> Option<String> {
    std::env::var("MATCH3_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}
