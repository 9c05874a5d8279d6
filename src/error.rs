//! Unified error types for the FocusDock firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level boot path's error handling uniform.  All variants are `Copy` so
//! they can be cheaply returned from drivers without allocation.
//!
//! The error taxonomy is deliberately narrow: init-time failures are the
//! only fatal category.  A running sensor that returns an implausible value
//! is NOT an error — the reading is classified as invalid and absorbed by
//! the snapshot logic.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be initialised or probed.
    Sensor(SensorError),
    /// The character display could not be initialised or written.
    Display(DisplayError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transaction failed (NACK, bus error, timeout).
    I2cFailed,
    /// The sensor did not acknowledge its power-on / mode command.
    NotResponding,
    /// ADC read returned an error.
    AdcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2cFailed => write!(f, "I2C transaction failed"),
            Self::NotResponding => write!(f, "sensor not responding"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// LCD controller rejected or missed an I2C command.
    I2cFailed,
    /// Init sequence did not complete.
    InitFailed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2cFailed => write!(f, "I2C transaction failed"),
            Self::InitFailed => write!(f, "init sequence failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
