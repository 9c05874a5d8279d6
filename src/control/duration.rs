//! Environment-adjusted focus/rest duration model.
//!
//! Pure function from one environment observation to a recommended
//! continuous-focus window and a recommended rest window.  Worse ambient
//! conditions shorten the safe focus window and lengthen the recovery
//! window; the adjustments are simple additive bands so a user can predict
//! the recommendation from the readings on the display.
//!
//! The model is recomputed every cycle so the display always shows the
//! current recommendation.  The *active* target of a running segment is a
//! separate latched copy in `SessionState` — this module never reads or
//! writes session state.

use crate::config::SystemConfig;

const MS_PER_MIN: u64 = 60_000;

/// Base continuous-focus window before adjustments (minutes).
const FOCUS_BASE_MIN: i32 = 45;
/// Base rest window before adjustments (minutes).
const REST_BASE_MIN: i32 = 15;

// Lux bands (lux).
const LUX_BRIGHT: f32 = 300.0;
const LUX_GOOD: f32 = 150.0;
const LUX_DIM: f32 = 80.0;

// Noise bands (raw ADC magnitude).
const NOISE_QUIET: u16 = 200;
const NOISE_MODERATE: u16 = 350;
const NOISE_LOUD: u16 = 650;

// Distance bands (cm).
const DIST_RELAXED: u16 = 40;
const DIST_CRAMPED: u16 = 20;

/// One cycle's recommendation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub focus_ms: u64,
    pub rest_ms: u64,
}

/// The duration model with its configured clamps.
#[derive(Debug, Clone, Copy)]
pub struct DurationModel {
    focus_floor_min: i32,
    focus_ceil_min: i32,
    rest_floor_min: i32,
    rest_ceil_min: i32,
}

impl DurationModel {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            focus_floor_min: config.focus_floor_min as i32,
            focus_ceil_min: config.focus_ceil_min as i32,
            rest_floor_min: config.rest_floor_min as i32,
            rest_ceil_min: config.rest_ceil_min as i32,
        }
    }

    /// Map one environment observation to a recommendation.
    ///
    /// `distance_cm` is the raw reading; `None` (no reliable echo this
    /// cycle) contributes a neutral distance adjustment.
    pub fn recommend(&self, lux: f32, noise_raw: u16, distance_cm: Option<u16>) -> Recommendation {
        let focus_min = (FOCUS_BASE_MIN
            + Self::lux_adjust_min(lux)
            + Self::noise_adjust_min(noise_raw)
            + Self::distance_adjust_min(distance_cm))
        .clamp(self.focus_floor_min, self.focus_ceil_min);

        let rest_min = (REST_BASE_MIN + Self::rest_adjust_min(lux, noise_raw))
            .clamp(self.rest_floor_min, self.rest_ceil_min);

        Recommendation {
            focus_ms: focus_min as u64 * MS_PER_MIN,
            rest_ms: rest_min as u64 * MS_PER_MIN,
        }
    }

    // ── Focus adjustments ─────────────────────────────────────

    fn lux_adjust_min(lux: f32) -> i32 {
        if lux >= LUX_BRIGHT {
            10
        } else if lux >= LUX_GOOD {
            5
        } else if lux >= LUX_DIM {
            0
        } else {
            -10
        }
    }

    fn noise_adjust_min(noise_raw: u16) -> i32 {
        if noise_raw < NOISE_QUIET {
            10
        } else if noise_raw < NOISE_MODERATE {
            5
        } else if noise_raw <= NOISE_LOUD {
            0
        } else {
            -10
        }
    }

    fn distance_adjust_min(distance_cm: Option<u16>) -> i32 {
        match distance_cm {
            Some(d) if d >= DIST_RELAXED => 5,
            Some(d) if d > 0 && d < DIST_CRAMPED => -5,
            _ => 0,
        }
    }

    // ── Rest adjustments ──────────────────────────────────────

    fn rest_adjust_min(lux: f32, noise_raw: u16) -> i32 {
        let mut adjust = 0;
        if lux < LUX_DIM {
            adjust += 5; // dim room: eyes need longer off the page
        }
        if noise_raw > NOISE_LOUD {
            adjust += 5;
        }
        if lux >= LUX_BRIGHT && noise_raw < NOISE_QUIET {
            adjust -= 5;
        }
        adjust
    }
}
