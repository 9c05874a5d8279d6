//! HC-SR04 ultrasonic ranger driver.
//!
//! A 10 µs trigger pulse starts a measurement; the echo pin goes high for
//! the round-trip time of the ping (~58 µs per centimetre).  The echo wait
//! is a bounded busy-wait: a hard timeout caps it, and a timed-out or
//! zero-width pulse reads as `None` rather than a magic zero.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the trigger GPIO and times the echo GPIO against
//! the esp_timer microsecond clock.
//! On host/test: reads from a static atomic for injection.

use core::sync::atomic::{AtomicI32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Host-side injected distance; negative = no echo (invalid).
static SIM_DISTANCE_CM: AtomicI32 = AtomicI32::new(-1);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_distance(cm: Option<u16>) {
    SIM_DISTANCE_CM.store(cm.map_or(-1, i32::from), Ordering::Relaxed);
}

/// Echo round trip is ~58 µs per cm.
#[cfg(target_os = "espidf")]
const US_PER_CM: u64 = 58;
/// Give the module this long to raise the echo line after a trigger.
#[cfg(target_os = "espidf")]
const ECHO_START_TIMEOUT_US: u64 = 10_000;
/// Longest echo pulse still inside the sensor's reliable window (~4.3 m).
#[cfg(target_os = "espidf")]
const ECHO_PULSE_TIMEOUT_US: u64 = 25_000;

pub struct UltrasonicRanger {
    _trig_gpio: i32,
    _echo_gpio: i32,
}

impl UltrasonicRanger {
    pub fn new(trig_gpio: i32, echo_gpio: i32) -> Self {
        Self {
            _trig_gpio: trig_gpio,
            _echo_gpio: echo_gpio,
        }
    }

    /// One bounded-latency measurement.  `None` = no reliable reading.
    pub fn read(&mut self) -> Option<u16> {
        self.measure_cm()
    }

    #[cfg(target_os = "espidf")]
    fn measure_cm(&self) -> Option<u16> {
        // SAFETY: esp_rom_delay_us / esp_timer_get_time are plain reads of
        // the RTC counter plus a spin; main-loop context only.
        let now_us = || unsafe { esp_idf_svc::sys::esp_timer_get_time() } as u64;

        // 10 µs trigger pulse.
        hw_init::gpio_write(pins::ULTRA_TRIG_GPIO, false);
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(2) };
        hw_init::gpio_write(pins::ULTRA_TRIG_GPIO, true);
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(10) };
        hw_init::gpio_write(pins::ULTRA_TRIG_GPIO, false);

        // Wait for the echo line to rise.
        let start = now_us();
        while !hw_init::gpio_read(pins::ULTRA_ECHO_GPIO) {
            if now_us().saturating_sub(start) > ECHO_START_TIMEOUT_US {
                return None;
            }
        }

        // Time the pulse width, capped at the reliable window.
        let rise = now_us();
        while hw_init::gpio_read(pins::ULTRA_ECHO_GPIO) {
            if now_us().saturating_sub(rise) > ECHO_PULSE_TIMEOUT_US {
                return None;
            }
        }
        let width_us = now_us().saturating_sub(rise);
        if width_us == 0 {
            return None;
        }

        Some((width_us / US_PER_CM) as u16)
    }

    #[cfg(not(target_os = "espidf"))]
    fn measure_cm(&self) -> Option<u16> {
        let raw = SIM_DISTANCE_CM.load(Ordering::Relaxed);
        u16::try_from(raw).ok()
    }
}
