//! Room light driver (relay module, active HIGH).
//!
//! Switches the desk lamp through a relay GPIO.  A dumb actuator: the
//! too-dark policy and the rest-phase power saving both live in the core.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the relay GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct RoomLight {
    on: bool,
}

impl RoomLight {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::ROOM_LIGHT_GPIO, on);
        self.on = on;
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
