//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, indicator/display, event sinks) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::display::DisplayView;
use crate::fsm::context::RawReadings;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
///
/// Implementations return raw values only; classification against the
/// configured thresholds is the domain's job.  A failed or implausible
/// distance measurement is reported as `None`, never as an error — each
/// cycle is a fresh, independent attempt.
pub trait SensorPort {
    fn read_raw(&mut self) -> RawReadings;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → indicator/display)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to apply the cycle's output
/// directive.  The domain owns all suppression (unchanged-colour and
/// unchanged-view writes never reach the port), so implementations can
/// push every call straight to the hardware.
pub trait OutputPort {
    /// Set the RGB status indicator colour.
    fn set_indicator(&mut self, r: u8, g: u8, b: u8);

    /// Switch the room light on or off.
    fn set_room_light(&mut self, on: bool);

    /// Render a display view onto the two-line text display.
    fn render(&mut self, view: &DisplayView);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// the trait seam is where a future transport would attach).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
