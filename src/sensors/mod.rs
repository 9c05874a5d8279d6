//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces one [`RawReadings`]
//! bundle per control tick.  Classification against the configured
//! thresholds happens in the domain core, not here — the hub's job is
//! only to get one coherent set of raw values per cycle.

pub mod lux;
pub mod noise;
pub mod ultrasonic;

use crate::fsm::context::RawReadings;
use lux::LuxSensor;
use noise::NoiseSensor;
use ultrasonic::UltrasonicRanger;

/// Aggregates all sensor drivers and produces one raw bundle per tick.
pub struct SensorHub {
    pub ranger: UltrasonicRanger,
    pub noise: NoiseSensor,
    pub lux: LuxSensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(ranger: UltrasonicRanger, noise: NoiseSensor, lux: LuxSensor) -> Self {
        Self { ranger, noise, lux }
    }

    /// Read every sensor once.
    ///
    /// A timed-out distance measurement yields `None` in the bundle and is
    /// absorbed by classification downstream — a single flaky echo must
    /// not disturb the control loop.
    pub fn read_raw(&mut self) -> RawReadings {
        RawReadings {
            distance_cm: self.ranger.read(),
            noise_raw: self.noise.read(),
            lux: self.lux.read(),
        }
    }
}
