//! GPIO / peripheral pin assignments for the FocusDock main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ultrasonic ranger (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse starts a measurement.
pub const ULTRA_TRIG_GPIO: i32 = 12;
/// Digital input: echo pulse width encodes the round-trip time.
pub const ULTRA_ECHO_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Electret sound-level module — analog envelope output.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const NOISE_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I2C bus (LCD + ambient light sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 17;
pub const I2C_SCL_GPIO: i32 = 18;

/// AIP31068L 16x2 character LCD controller.
pub const LCD_I2C_ADDR: u8 = 0x3E;
/// BH1750 ambient light sensor (ADDR pin low).
pub const LUX_I2C_ADDR: u8 = 0x23;

// ---------------------------------------------------------------------------
// RGB status LED (common cathode, one LEDC channel per colour)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 6;
pub const LED_G_GPIO: i32 = 7;
pub const LED_B_GPIO: i32 = 8;

/// LEDC frequency for LED dimming.
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Room light (relay module, active HIGH)
// ---------------------------------------------------------------------------

pub const ROOM_LIGHT_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// User button (active-low momentary, external pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_GPIO: i32 = 16;
