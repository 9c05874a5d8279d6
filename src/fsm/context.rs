//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It contains the latest environment snapshot, the persistent
//! session state, the output directive, timing information, and
//! configuration.  Think of it as the "blackboard" in a blackboard
//! architecture.

use crate::config::SystemConfig;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

// ---------------------------------------------------------------------------
// Raw sensor readings (one bundle per cycle, produced by the sensor port)
// ---------------------------------------------------------------------------

/// One cycle's worth of raw sensor values, before classification.
#[derive(Debug, Clone, Copy)]
pub struct RawReadings {
    /// Ultrasonic distance in cm; `None` when the echo timed out or fell
    /// outside the ranger's reliable timing window.
    pub distance_cm: Option<u16>,
    /// Raw sound-level ADC magnitude.
    pub noise_raw: u16,
    /// Ambient illuminance in lux.
    pub lux: f32,
}

impl Default for RawReadings {
    fn default() -> Self {
        Self {
            distance_cm: None,
            noise_raw: 0,
            lux: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Environment snapshot (read-only to state handlers; rebuilt every cycle)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of the environment with derived conditions.
///
/// Derived booleans hold the implication chain
/// `user_too_close ⟹ user_near ⟹ valid_distance` by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSnapshot {
    /// Raw distance, `None` = no reliable reading this cycle.
    pub distance_cm: Option<u16>,
    /// Raw sound-level magnitude.
    pub noise_raw: u16,
    /// Ambient illuminance (lux).
    pub lux: f32,

    /// Distance fell inside the ranger's reliable window.
    pub valid_distance: bool,
    /// User is seated at the desk.
    pub user_near: bool,
    /// User is leaning in too close to the screen.
    pub user_too_close: bool,
    /// Room is darker than the configured minimum.
    pub too_dark: bool,
    /// Room is louder than the configured maximum.
    pub too_noisy: bool,
}

impl EnvironmentSnapshot {
    /// Classify one bundle of raw readings against the configured
    /// thresholds.  An invalid distance contributes no presence signal —
    /// it is not a fault.
    pub fn classify(raw: RawReadings, config: &SystemConfig) -> Self {
        let valid_distance = raw.distance_cm.is_some_and(|d| {
            d > config.min_valid_distance_cm && d < config.max_valid_distance_cm
        });
        let user_near =
            valid_distance && raw.distance_cm.is_some_and(|d| d < config.present_distance_cm);
        let user_too_close =
            valid_distance && raw.distance_cm.is_some_and(|d| d < config.too_close_distance_cm);

        Self {
            distance_cm: raw.distance_cm,
            noise_raw: raw.noise_raw,
            lux: raw.lux,
            valid_distance,
            user_near,
            user_too_close,
            too_dark: raw.lux < config.min_lux,
            too_noisy: raw.noise_raw > config.max_noise_raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Session state (persists across cycles; mutated only by state handlers)
// ---------------------------------------------------------------------------

/// Accumulated session bookkeeping.
///
/// Exactly one of the `*_start_ms` timestamps is live at any instant,
/// determined by the current phase; the others are stale and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionState {
    /// When the current focus segment began (live while Focusing).
    pub focus_start_ms: u64,
    /// When the current rest began (live while Resting).
    pub rest_start_ms: u64,
    /// When the last unbroken absence began (live while WarnPendingLeave).
    pub absence_start_ms: u64,

    /// Total focus time accrued today across completed segments.
    pub accumulated_focus_ms: u64,

    /// Focus target latched at Focusing entry — the active segment is
    /// measured against this, never against the live recommendation.
    pub target_focus_ms: u64,
    /// Rest target latched at Resting entry.
    pub target_rest_ms: u64,

    /// Live recommendation, recomputed every cycle for the display.
    pub recommended_focus_ms: u64,
    /// Live rest recommendation, recomputed every cycle for the display.
    pub recommended_rest_ms: u64,
}

// ---------------------------------------------------------------------------
// Output directive (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// The per-cycle directive for the status indicator.
///
/// `indicator` carries over between cycles: a handler that does not touch
/// it (Idle) holds the last meaningful colour, which is what keeps the LED
/// from flickering when the user briefly leans back.
#[derive(Debug, Clone, Copy)]
pub struct OutputDirective {
    /// Requested indicator colour.
    pub indicator: Rgb,
}

impl Default for OutputDirective {
    fn default() -> Self {
        Self { indicator: (0, 0, 0) }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic "now" for this cycle.  Read once per cycle; every duration
    /// comparison and every timestamp recorded within the cycle uses this
    /// same value, so trigger checks and bookkeeping can never skew.
    pub now_ms: u64,
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Sensor data --
    /// Latest classified snapshot.  Updated before each FSM tick.
    pub snapshot: EnvironmentSnapshot,

    // -- Session bookkeeping --
    pub session: SessionState,

    // -- Outputs --
    /// Directive to be applied after the FSM tick.
    pub outputs: OutputDirective,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            now_ms: 0,
            ticks_in_state: 0,
            total_ticks: 0,
            snapshot: EnvironmentSnapshot::default(),
            session: SessionState::default(),
            outputs: OutputDirective::default(),
            config,
        }
    }

    /// Milliseconds the current focus segment has been running.
    pub fn focus_elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.session.focus_start_ms)
    }

    /// Milliseconds the current rest has been running.
    pub fn rest_elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.session.rest_start_ms)
    }

    /// Milliseconds of unbroken absence since the last reset.
    pub fn absence_elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.session.absence_start_ms)
    }
}
