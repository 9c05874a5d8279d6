//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | phase={:?} | dist={} | noise={} | lux={:.0} | \
                     today={}min | rec={}min focus / {}min rest",
                    t.phase,
                    t.distance_cm
                        .map_or_else(|| "--".into(), |d| format!("{d}cm")),
                    t.noise_raw,
                    t.lux,
                    t.accumulated_focus_min,
                    t.recommended_focus_min,
                    t.recommended_rest_min,
                );
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::SegmentClosed {
                segment_ms,
                total_focus_ms,
            } => {
                info!(
                    "SEGMENT | closed after {}min, {}min today",
                    segment_ms / 60_000,
                    total_focus_ms / 60_000,
                );
            }
            AppEvent::DailyTotalReset { previous_total_ms } => {
                info!("RESET | daily total cleared ({}min)", previous_total_ms / 60_000);
            }
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
        }
    }
}
