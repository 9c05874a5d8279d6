//! Electret sound-level module driver.
//!
//! The module outputs an analog envelope proportional to ambient loudness,
//! read through an ESP32-S3 ADC channel.  A short burst of samples is
//! taken per read and the peak kept — loudness spikes are what matter,
//! and a single mid-wave sample would understate them.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH4 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_NOISE_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_noise_adc(raw: u16) {
    SIM_NOISE_ADC.store(raw, Ordering::Relaxed);
}

/// Samples taken (and peak kept) per read call.
const BURST_SAMPLES: usize = 4;

pub struct NoiseSensor {
    _adc_gpio: i32,
}

impl NoiseSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
        }
    }

    /// Raw loudness magnitude (0 – 4095), peak of a short sample burst.
    pub fn read(&mut self) -> u16 {
        let mut peak = 0u16;
        for _ in 0..BURST_SAMPLES {
            peak = peak.max(self.read_adc());
        }
        peak
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_NOISE)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_NOISE_ADC.load(Ordering::Relaxed)
    }
}
