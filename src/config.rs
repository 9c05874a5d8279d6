//! System configuration parameters
//!
//! All tunable parameters for the FocusDock controller. Thresholds and
//! clamps that differed between hardware revisions are fields here rather
//! than constants, so a revision is a config change, not a code change.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Distance classification ---
    /// Shortest distance (cm) the ranger reads reliably (exclusive bound).
    pub min_valid_distance_cm: u16,
    /// Longest distance (cm) the ranger reads reliably (exclusive bound).
    pub max_valid_distance_cm: u16,
    /// Distances below this (cm) count as "user at the desk".
    pub present_distance_cm: u16,
    /// Distances below this (cm) count as "too close to the screen".
    pub too_close_distance_cm: u16,

    // --- Ambient classification ---
    /// Illuminance (lux) below which the room counts as too dark.
    pub min_lux: f32,
    /// Raw sound-level ADC reading above which the room counts as too noisy.
    pub max_noise_raw: u16,

    // --- Session timing ---
    /// Unbroken absence (ms) required before a warned user counts as away.
    pub absence_debounce_ms: u64,

    // --- Duration model clamps ---
    /// Lower clamp for the recommended continuous-focus window (minutes).
    pub focus_floor_min: u32,
    /// Upper clamp for the recommended continuous-focus window (minutes).
    pub focus_ceil_min: u32,
    /// Lower clamp for the recommended rest window (minutes).
    pub rest_floor_min: u32,
    /// Upper clamp for the recommended rest window (minutes).
    pub rest_ceil_min: u32,

    // --- Display / indicator ---
    /// Wall-clock period (ms) between automatic display page flips.
    pub page_rotate_ms: u64,
    /// Minimum interval (ms) between physical indicator writes.
    /// 0 disables the rate limit; changed colours then write immediately.
    pub indicator_min_rewrite_ms: u64,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Distance
            min_valid_distance_cm: 2,
            max_valid_distance_cm: 400,
            present_distance_cm: 50,
            too_close_distance_cm: 20,

            // Ambient
            min_lux: 50.0,
            max_noise_raw: 650,

            // Session
            absence_debounce_ms: 2_000,

            // Duration model
            focus_floor_min: 20,
            focus_ceil_min: 60,
            rest_floor_min: 5,
            rest_ceil_min: 25,

            // Display / indicator
            page_rotate_ms: 2_000,
            indicator_min_rewrite_ms: 0,

            // Timing
            control_loop_interval_ms: 300, // ~3 Hz
            telemetry_interval_secs: 60,   // 1/min
        }
    }
}
