//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the FSM, duration model, pager, and shared context.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │        AppService           │
//!  OutputPort ◀── │  FSM · DurationModel · Pager│
//!                 └────────────────────────────┘
//! ```
//!
//! One control cycle is strictly downstream:
//! raw readings → classified snapshot → duration model → FSM → directive.

use log::info;

use crate::config::SystemConfig;
use crate::control::duration::DurationModel;
use crate::display::{DisplayView, Pager};
use crate::fsm::context::{EnvironmentSnapshot, FsmContext, Rgb};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, OutputPort, SensorPort};

const MS_PER_MIN: u64 = 60_000;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    model: DurationModel,
    pager: Pager,
    tick_count: u64,

    // Applied-output cache: the core is responsible for suppressing
    // redundant writes, not the drivers.
    last_indicator: Option<Rgb>,
    last_indicator_write_ms: u64,
    last_room_light: Option<bool>,
    last_view: Option<DisplayView>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let model = DurationModel::from_config(&config);
        let pager = Pager::new(config.page_rotate_ms);
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            model,
            pager,
            tick_count: 0,
            last_indicator: None,
            last_indicator_write_ms: 0,
            last_room_light: None,
            last_view: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial state (Idle).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle against the monotonic `now_ms`.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`OutputPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + OutputPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();
        let prev_accumulated = self.ctx.session.accumulated_focus_ms;

        // 1. Read and classify sensors via SensorPort.
        let raw = hw.read_raw();
        self.ctx.now_ms = now_ms;
        self.ctx.snapshot = EnvironmentSnapshot::classify(raw, &self.ctx.config);

        // 2. Duration model — recomputed every cycle regardless of phase so
        //    the display always shows the current recommendation.  The
        //    active segment target stays latched inside SessionState.
        let rec = self.model.recommend(raw.lux, raw.noise_raw, raw.distance_cm);
        self.ctx.session.recommended_focus_ms = rec.focus_ms;
        self.ctx.session.recommended_rest_ms = rec.rest_ms;

        // 3. FSM tick (pure state logic).
        self.fsm.tick(&mut self.ctx);

        // 4. Apply the output directive via OutputPort.
        let rotating = !self.fsm.current_state().is_rest_related();
        self.pager.tick(now_ms, rotating);
        self.apply_outputs(hw);

        // 5. Emit structured events for whatever moved.
        let new_state = self.fsm.current_state();
        if self.ctx.session.accumulated_focus_ms > prev_accumulated {
            sink.emit(&AppEvent::SegmentClosed {
                segment_ms: self.ctx.session.accumulated_focus_ms - prev_accumulated,
                total_focus_ms: self.ctx.session.accumulated_focus_ms,
            });
        }
        if new_state != prev_state {
            sink.emit(&AppEvent::PhaseChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the button today).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::AdvancePage => {
                self.pager.advance(self.ctx.now_ms);
                self.apply_outputs(hw);
            }
            AppCommand::ResetDailyTotal => {
                let previous_total_ms = self.ctx.session.accumulated_focus_ms;
                self.ctx.session.accumulated_focus_ms = 0;
                // A running segment restarts its own clock so the reset
                // cannot be undone by the segment closing later.
                if self.fsm.current_state() == StateId::Focusing {
                    self.ctx.session.focus_start_ms = self.ctx.now_ms;
                }
                sink.emit(&AppEvent::DailyTotalReset { previous_total_ms });
                info!(
                    "Daily focus total reset ({} min discarded)",
                    previous_total_ms / MS_PER_MIN
                );
                self.apply_outputs(hw);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        let s = &self.ctx.session;
        TelemetryData {
            phase: self.fsm.current_state(),
            distance_cm: self.ctx.snapshot.distance_cm,
            noise_raw: self.ctx.snapshot.noise_raw,
            lux: self.ctx.snapshot.lux,
            accumulated_focus_min: (s.accumulated_focus_ms / MS_PER_MIN) as u32,
            recommended_focus_min: (s.recommended_focus_ms / MS_PER_MIN) as u32,
            recommended_rest_min: (s.recommended_rest_ms / MS_PER_MIN) as u32,
        }
    }

    /// Current session phase.
    pub fn phase(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Accumulated daily focus time in milliseconds.
    pub fn accumulated_focus_ms(&self) -> u64 {
        self.ctx.session.accumulated_focus_ms
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the FSM directive into port calls, suppressing writes
    /// that would not change anything the user can see.
    fn apply_outputs(&mut self, hw: &mut impl OutputPort) {
        let now_ms = self.ctx.now_ms;

        // ── Status indicator ─────────────────────────────────
        let rgb = self.ctx.outputs.indicator;
        let changed = self.last_indicator != Some(rgb);
        let rewrite_ok = self.last_indicator.is_none()
            || self.ctx.config.indicator_min_rewrite_ms == 0
            || now_ms.saturating_sub(self.last_indicator_write_ms)
                >= self.ctx.config.indicator_min_rewrite_ms;
        if changed && rewrite_ok {
            hw.set_indicator(rgb.0, rgb.1, rgb.2);
            self.last_indicator = Some(rgb);
            self.last_indicator_write_ms = now_ms;
        }

        // ── Room light (forced off during rest — power saving) ─
        let phase = self.fsm.current_state();
        let light_on = phase != StateId::Resting && self.ctx.snapshot.too_dark;
        if self.last_room_light != Some(light_on) {
            hw.set_room_light(light_on);
            self.last_room_light = Some(light_on);
        }

        // ── Display ──────────────────────────────────────────
        let view = self.build_view(phase);
        if self.last_view != Some(view) {
            hw.render(&view);
            self.last_view = Some(view);
        }
    }

    /// Compose the display view for the current phase and page.
    fn build_view(&self, phase: StateId) -> DisplayView {
        let s = &self.ctx.session;
        match phase {
            StateId::WarnPendingLeave => DisplayView::BreakPrompt,
            StateId::Resting => DisplayView::RestProgress {
                elapsed_min: (self.ctx.rest_elapsed_ms() / MS_PER_MIN) as u32,
                target_min: (s.target_rest_ms / MS_PER_MIN) as u32,
            },
            StateId::RestFinished => DisplayView::AwaitingReturn,
            StateId::Idle | StateId::Focusing => match self.pager.page() {
                0 => DisplayView::FocusSummary {
                    total_focus_min: (s.accumulated_focus_ms / MS_PER_MIN) as u32,
                    segment_min: if phase == StateId::Focusing {
                        (self.ctx.focus_elapsed_ms() / MS_PER_MIN) as u32
                    } else {
                        0
                    },
                    recommended_min: (s.recommended_focus_ms / MS_PER_MIN) as u32,
                },
                _ => DisplayView::Ambient {
                    lux: self.ctx.snapshot.lux,
                    noise_raw: self.ctx.snapshot.noise_raw,
                },
            },
        }
    }
}
