//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today that is the serial log.

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The session moved between phases.
    PhaseChanged { from: StateId, to: StateId },

    /// A focus segment closed (user left, or the warning threshold fired).
    SegmentClosed {
        segment_ms: u64,
        total_focus_ms: u64,
    },

    /// The daily focus total was reset (external day-rollover hook).
    DailyTotalReset { previous_total_ms: u64 },

    /// The application service has started (carries initial phase).
    Started(StateId),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub phase: StateId,
    pub distance_cm: Option<u16>,
    pub noise_raw: u16,
    pub lux: f32,
    pub accumulated_focus_min: u32,
    pub recommended_focus_min: u32,
    pub recommended_rest_min: u32,
}
