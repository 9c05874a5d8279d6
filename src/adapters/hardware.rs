//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all output drivers, exposing them through
//! [`SensorPort`] and [`OutputPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.
//!
//! Text formatting for the 16x2 panel happens here: the domain emits
//! typed [`DisplayView`]s, and this adapter turns them into two
//! fixed-capacity lines.

use core::fmt::Write;

use heapless::String;

use crate::app::ports::{OutputPort, SensorPort};
use crate::display::DisplayView;
use crate::drivers::lcd::{Lcd, LCD_COLS};
use crate::drivers::room_light::RoomLight;
use crate::drivers::status_led::StatusLed;
use crate::fsm::context::RawReadings;
use crate::sensors::SensorHub;

type Line = String<LCD_COLS>;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    led: StatusLed,
    room_light: RoomLight,
    lcd: Lcd,
    /// False when the panel failed init; renders become no-ops.
    lcd_alive: bool,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, led: StatusLed, room_light: RoomLight, lcd: Lcd, lcd_alive: bool) -> Self {
        Self {
            sensor_hub,
            led,
            room_light,
            lcd,
            lcd_alive,
        }
    }

    /// Turn every output off (shutdown path).
    pub fn all_off(&mut self) {
        self.led.off();
        self.room_light.off();
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_raw(&mut self) -> RawReadings {
        self.sensor_hub.read_raw()
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl OutputPort for HardwareAdapter {
    fn set_indicator(&mut self, r: u8, g: u8, b: u8) {
        self.led.set_colour(r, g, b);
    }

    fn set_room_light(&mut self, on: bool) {
        self.room_light.set(on);
    }

    fn render(&mut self, view: &DisplayView) {
        if !self.lcd_alive {
            return;
        }
        let (line0, line1) = format_view(view);
        self.lcd.render(&line0, &line1);
    }
}

// ── View formatting ───────────────────────────────────────────

/// Format a view into two panel lines.  Overflow truncates silently —
/// the field widths below fit 16 cells for every realistic value.
fn format_view(view: &DisplayView) -> (Line, Line) {
    let mut line0 = Line::new();
    let mut line1 = Line::new();

    match view {
        DisplayView::FocusSummary {
            total_focus_min,
            segment_min,
            recommended_min,
        } => {
            let _ = write!(line0, "Today {total_focus_min}m");
            let _ = write!(line1, "Seg {segment_min}/{recommended_min}m");
        }
        DisplayView::Ambient { lux, noise_raw } => {
            let _ = write!(line0, "Light {lux:.0} lx");
            let _ = write!(line1, "Noise {noise_raw}");
        }
        DisplayView::BreakPrompt => {
            let _ = line0.push_str("Take a break");
        }
        DisplayView::RestProgress {
            elapsed_min,
            target_min,
        } => {
            let _ = line0.push_str("Resting");
            let _ = write!(line1, "Rest: {elapsed_min}/{target_min} m");
        }
        DisplayView::AwaitingReturn => {
            let _ = line0.push_str("Rest finished");
            let _ = line1.push_str("Waiting for you");
        }
    }

    (line0, line1)
}
