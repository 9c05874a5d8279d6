//! FocusDock Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink        MonotonicClock     │
//! │  (Sensor+Output)        (EventSink)         (time source)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Session FSM · DurationModel · Pager                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Event queue (timers, button ISR) drives the control cycle     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod display;
mod error;
mod events;
mod pins;

pub mod app;
mod adapters;
mod control;
mod drivers;
pub mod fsm;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::time::MonotonicClock;
use app::commands::AppCommand;
use app::events::AppEvent;
use app::ports::EventSink;
use app::service::AppService;
use config::SystemConfig;
use drivers::button::{ButtonDriver, ButtonEvent};
use drivers::lcd::Lcd;
use drivers::room_light::RoomLight;
use drivers::status_led::StatusLed;
use events::{push_event, Event};
use sensors::lux::LuxSensor;
use sensors::noise::NoiseSensor;
use sensors::ultrasonic::UltrasonicRanger;
use sensors::SensorHub;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FocusDock v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — continuing without button", e);
    }

    let config = SystemConfig::default();

    // ── 3. Construct sensors ──────────────────────────────────
    let mut lux = LuxSensor::new(pins::LUX_I2C_ADDR);
    if let Err(e) = lux.init() {
        // The whole duration model and the too-dark classification hang
        // off this sensor; without it the device is useless.
        log::error!("Ambient light sensor init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let sensor_hub = SensorHub::new(
        UltrasonicRanger::new(pins::ULTRA_TRIG_GPIO, pins::ULTRA_ECHO_GPIO),
        NoiseSensor::new(pins::NOISE_ADC_GPIO),
        lux,
    );

    // ── 4. Display (non-fatal: device degrades to LED-only) ───
    let mut lcd = Lcd::new(pins::LCD_I2C_ADDR);
    let lcd_alive = match lcd.init() {
        Ok(()) => true,
        Err(e) => {
            warn!("LCD init failed ({}), continuing LED-only", e);
            false
        }
    };

    // ── 5. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        sensor_hub,
        StatusLed::new(),
        RoomLight::new(),
        lcd,
        lcd_alive,
    );
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();
    let mut button = ButtonDriver::new(pins::BUTTON_GPIO);

    // ── 6. Construct app service ──────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut sink);

    drivers::hw_timer::start_timers(
        config.control_loop_interval_ms,
        config.telemetry_interval_secs,
    );

    info!("System ready. Entering event loop.");

    // ── 7. Event loop ─────────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    let mut telemetry_elapsed_ms: u64 = 0;

    loop {
        // Simulate timer interrupts via sleep on non-espidf targets.
        // On real hardware, the esp_timers push ControlTick/TelemetryTick
        // from the timer task.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(
                config.control_loop_interval_ms as u64,
            ));
            push_event(Event::ControlTick);

            telemetry_elapsed_ms += u64::from(config.control_loop_interval_ms);
            if telemetry_elapsed_ms >= u64::from(config.telemetry_interval_secs) * 1_000 {
                push_event(Event::TelemetryTick);
                telemetry_elapsed_ms = 0;
            }
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::ControlTick => {
                app.tick(clock.now_ms(), &mut hw, &mut sink);
            }

            Event::TelemetryTick => {
                let t = app.build_telemetry();
                sink.emit(&AppEvent::Telemetry(t));
            }

            Event::ButtonShortPress => {
                info!("Button: short press → next page");
                app.handle_command(AppCommand::AdvancePage, &mut hw, &mut sink);
            }

            Event::ButtonLongPress => {
                info!("Button: long press → reset daily total");
                app.handle_command(AppCommand::ResetDailyTotal, &mut hw, &mut sink);
            }
        });

        // Button gesture detection (runs outside drain_events since it
        // uses its own atomic).
        let now_ms = clock.now_ms() as u32;
        if let Some(gesture) = button.tick(now_ms) {
            match gesture {
                ButtonEvent::ShortPress => {
                    push_event(Event::ButtonShortPress);
                }
                ButtonEvent::LongPress => {
                    push_event(Event::ButtonLongPress);
                }
            }
        }

        // On target the loop yields between event bursts so lower-priority
        // tasks (and the idle task feeding the TWDT) get CPU time.
        #[cfg(target_os = "espidf")]
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
