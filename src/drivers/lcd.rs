//! AIP31068L 16x2 character LCD driver (I2C).
//!
//! The controller takes HD44780-style commands over I2C: a control byte
//! (0x80 = command, 0x40 = data) followed by the payload.  Rows are
//! rendered whole — 16 cells, space-padded — so stale characters never
//! linger after a shorter line.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes through the hw_init I2C helpers.
//! On host/test: records the last rendered lines in-memory.

use heapless::String;

use crate::error::DisplayError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

pub const LCD_COLS: usize = 16;
pub const LCD_ROWS: usize = 2;

/// Control byte prefixes.
#[cfg(target_os = "espidf")]
const CTRL_CMD: u8 = 0x80;
#[cfg(target_os = "espidf")]
const CTRL_DATA: u8 = 0x40;

// HD44780 command set (subset the panel needs).
#[cfg(target_os = "espidf")]
const CMD_FUNCTION_SET: u8 = 0x38; // 8-bit, 2 lines, 5x8 font
#[cfg(target_os = "espidf")]
const CMD_DISPLAY_ON: u8 = 0x0C;
#[cfg(target_os = "espidf")]
const CMD_CLEAR: u8 = 0x01;
#[cfg(target_os = "espidf")]
const CMD_ENTRY_MODE: u8 = 0x06;
#[cfg(target_os = "espidf")]
const CMD_SET_DDRAM: u8 = 0x80;

pub struct Lcd {
    addr: u8,
    #[cfg(not(target_os = "espidf"))]
    lines: [String<LCD_COLS>; LCD_ROWS],
}

impl Lcd {
    pub fn new(addr: u8) -> Self {
        Self {
            addr,
            #[cfg(not(target_os = "espidf"))]
            lines: [String::new(), String::new()],
        }
    }

    /// Run the panel init sequence.  Failure is non-fatal for the device:
    /// main logs it and continues LED-only.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.init_hw()
    }

    /// Render both rows, truncating and space-padding to 16 cells.
    pub fn render(&mut self, line0: &str, line1: &str) {
        self.render_row(0, line0);
        self.render_row(1, line1);
    }

    // ── ESP-IDF implementation ────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn init_hw(&mut self) -> Result<(), DisplayError> {
        // The controller wants >40ms after power before commands; main
        // reaches here well past that.
        for cmd in [CMD_FUNCTION_SET, CMD_DISPLAY_ON, CMD_CLEAR, CMD_ENTRY_MODE] {
            self.write_cmd(cmd)?;
            if cmd == CMD_CLEAR {
                // Clear needs ~1.5ms internally.
                unsafe { esp_idf_svc::sys::esp_rom_delay_us(2_000) };
            }
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn render_row(&mut self, row: u8, text: &str) {
        let _ = self.write_row(row, text);
    }

    #[cfg(target_os = "espidf")]
    fn write_row(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        self.write_cmd(CMD_SET_DDRAM | (row * 0x40))?;

        // One burst per row: control byte + 16 padded cells.
        let mut buf = [b' '; LCD_COLS + 1];
        buf[0] = CTRL_DATA;
        for (cell, byte) in buf[1..].iter_mut().zip(text.bytes()) {
            *cell = byte;
        }
        hw_init::i2c_write(self.addr, &buf).map_err(|_| DisplayError::I2cFailed)
    }

    #[cfg(target_os = "espidf")]
    fn write_cmd(&mut self, cmd: u8) -> Result<(), DisplayError> {
        hw_init::i2c_write(self.addr, &[CTRL_CMD, cmd]).map_err(|_| DisplayError::I2cFailed)
    }

    // ── Host simulation ───────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn init_hw(&mut self) -> Result<(), DisplayError> {
        let _ = self.addr;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn render_row(&mut self, row: u8, text: &str) {
        let line = &mut self.lines[row as usize];
        line.clear();
        for ch in text.chars().take(LCD_COLS) {
            let _ = line.push(ch);
        }
    }

    /// Last rendered lines (host/test builds only).
    #[cfg(not(target_os = "espidf"))]
    pub fn lines(&self) -> (&str, &str) {
        (self.lines[0].as_str(), self.lines[1].as_str())
    }
}
