//! Session configuration
//!
//! Read from environment variables, falling back to defaults:
//!
//! - `TETRIS_SEED`: randomizer seed (u32). Defaults to a clock-derived value.
//! - `TETRIS_RANDOMIZER`: `uniform` (default) or `bag`.
//! - `TETRIS_HIGH_SCORES`: high-score list capacity (1 to 100, default 10).

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::rng::RandomizerKind;
use crate::types::{HIGH_SCORE_CAPACITY, MAX_HIGH_SCORE_CAPACITY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u32,
    pub randomizer: RandomizerKind,
    pub high_score_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            randomizer: RandomizerKind::Uniform,
            high_score_capacity: HIGH_SCORE_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`SessionConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = match non_empty(lookup("TETRIS_SEED")) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "TETRIS_SEED",
                value,
            })?,
            None => clock_seed(),
        };

        let randomizer = match non_empty(lookup("TETRIS_RANDOMIZER")) {
            Some(value) => {
                RandomizerKind::from_str(&value).ok_or(ConfigError::InvalidValue {
                    var: "TETRIS_RANDOMIZER",
                    value,
                })?
            }
            None => RandomizerKind::default(),
        };

        let high_score_capacity = match non_empty(lookup("TETRIS_HIGH_SCORES")) {
            Some(value) => match value.parse::<usize>() {
                Ok(n) if (1..=MAX_HIGH_SCORE_CAPACITY).contains(&n) => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "TETRIS_HIGH_SCORES",
                        value,
                    })
                }
            },
            None => HIGH_SCORE_CAPACITY,
        };

        Ok(Self {
            seed,
            randomizer,
            high_score_capacity,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}
