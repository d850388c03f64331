//! Calculator configuration

use crate::core::{AngleMode, CalcMode};
use serde::{Deserialize, Serialize};

/// Default animation frame interval for frontends, in milliseconds
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 50;

/// Default matrix rain cell size, in pixels
pub const DEFAULT_CELL_SIZE: u16 = 15;

/// Power-on settings shared by both widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// Angle unit after power-on and after AC
    pub angle_mode: AngleMode,
    /// Mode indicator after power-on and after AC
    pub mode: CalcMode,
    /// Seed for `Ran#`, prank answers and the matrix rain; clock-derived when unset
    pub seed: Option<u64>,
    /// Animation frame interval for frontends
    pub frame_interval_ms: u64,
    /// Matrix rain cell size; the browser divides canvas width by it
    pub matrix_cell_size: u16,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Deg,
            mode: CalcMode::Comp,
            seed: None,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            matrix_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl CalcConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set angle mode
    #[must_use]
    pub const fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.angle_mode = angle_mode;
        self
    }

    /// Set calculator mode
    #[must_use]
    pub const fn with_mode(mut self, mode: CalcMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set random seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set frame interval
    #[must_use]
    pub const fn with_frame_interval_ms(mut self, interval: u64) -> Self {
        self.frame_interval_ms = interval;
        self
    }

    /// Set matrix rain cell size
    #[must_use]
    pub const fn with_matrix_cell_size(mut self, size: u16) -> Self {
        self.matrix_cell_size = size;
        self
    }

    /// Seed to use, falling back to the system clock
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// browser builds always pass an explicit seed from Date.now()
#[cfg(target_arch = "wasm32")]
const fn clock_seed() -> u64 {
    0x5EED
}
