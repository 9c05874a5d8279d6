//! BH1750 ambient light sensor driver (I2C).
//!
//! Powered on and switched to continuous high-resolution mode at init;
//! each read fetches the latest 16-bit conversion and scales it to lux
//! (raw / 1.2 per the datasheet).
//!
//! Init is fallible and its failure is FATAL for the device: the duration
//! model and the too-dark classification are meaningless without light
//! data, so main halts before the control loop ever runs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: talks to the sensor through the hw_init I2C helpers.
//! On host/test: reads from a static `AtomicU32` (f32 bits) for injection.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_LUX_BITS: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_lux(lux: f32) {
    SIM_LUX_BITS.store(lux.to_bits(), Ordering::Relaxed);
}

/// BH1750 opcodes.
#[cfg(target_os = "espidf")]
const CMD_POWER_ON: u8 = 0x01;
#[cfg(target_os = "espidf")]
const CMD_CONT_H_RES: u8 = 0x10;

/// Datasheet scale factor: raw counts per lux.
#[cfg(target_os = "espidf")]
const COUNTS_PER_LUX: f32 = 1.2;

pub struct LuxSensor {
    addr: u8,
    initialised: bool,
}

impl LuxSensor {
    pub fn new(addr: u8) -> Self {
        Self {
            addr,
            initialised: false,
        }
    }

    /// Power the sensor on and start continuous conversions.
    ///
    /// Must succeed before the first `read()`; a failure here means the
    /// sensor is absent or the bus is broken.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.init_hw()?;
        self.initialised = true;
        Ok(())
    }

    /// Latest illuminance in lux.  Never fails at runtime: a missed
    /// conversion reads as 0.0 lux and is classified like any dark room.
    pub fn read(&mut self) -> f32 {
        debug_assert!(self.initialised, "LuxSensor::read before init");
        self.read_hw()
    }

    #[cfg(target_os = "espidf")]
    fn init_hw(&self) -> Result<(), SensorError> {
        hw_init::i2c_write(self.addr, &[CMD_POWER_ON]).map_err(|_| SensorError::NotResponding)?;
        hw_init::i2c_write(self.addr, &[CMD_CONT_H_RES]).map_err(|_| SensorError::NotResponding)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn init_hw(&self) -> Result<(), SensorError> {
        let _ = self.addr;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn read_hw(&self) -> f32 {
        let mut buf = [0u8; 2];
        if hw_init::i2c_read(self.addr, &mut buf).is_err() {
            return 0.0;
        }
        let raw = u16::from_be_bytes(buf);
        f32::from(raw) / COUNTS_PER_LUX
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_hw(&self) -> f32 {
        f32::from_bits(SIM_LUX_BITS.load(Ordering::Relaxed))
    }
}
