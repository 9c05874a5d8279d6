//! Integration tests: AppService → FSM → output directive.
//!
//! Drives whole sessions against mock port adapters with a synthetic
//! monotonic clock, asserting on the recorded call history.

use focusdock::app::commands::AppCommand;
use focusdock::app::events::AppEvent;
use focusdock::app::ports::{EventSink, OutputPort, SensorPort};
use focusdock::app::service::AppService;
use focusdock::config::SystemConfig;
use focusdock::display::DisplayView;
use focusdock::fsm::context::RawReadings;
use focusdock::fsm::states::{
    COLOUR_BREAK, COLOUR_FOCUS_OK, COLOUR_NOISY, COLOUR_TOO_CLOSE, COLOUR_WAITING,
};
use focusdock::fsm::StateId;

const MIN: u64 = 60_000;

// ── Mock implementations ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum OutCall {
    SetIndicator(u8, u8, u8),
    SetRoomLight(bool),
    Render(DisplayView),
}

struct MockHw {
    raw: RawReadings,
    calls: Vec<OutCall>,
}

impl MockHw {
    /// Neutral environment: lux 100 (no adjust), noise 500 (no adjust),
    /// seat distance 30 cm (present, no adjust) → 45 min focus, 15 min
    /// rest recommendation.
    fn new() -> Self {
        Self {
            raw: RawReadings {
                distance_cm: Some(30),
                noise_raw: 500,
                lux: 100.0,
            },
            calls: Vec::new(),
        }
    }

    fn present(&mut self) {
        self.raw.distance_cm = Some(30);
    }

    fn away(&mut self) {
        self.raw.distance_cm = Some(120);
    }

    fn last_indicator(&self) -> Option<(u8, u8, u8)> {
        self.calls.iter().rev().find_map(|c| match c {
            OutCall::SetIndicator(r, g, b) => Some((*r, *g, *b)),
            _ => None,
        })
    }

    fn last_room_light(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            OutCall::SetRoomLight(on) => Some(*on),
            _ => None,
        })
    }

    fn last_view(&self) -> Option<DisplayView> {
        self.calls.iter().rev().find_map(|c| match c {
            OutCall::Render(v) => Some(*v),
            _ => None,
        })
    }

    fn indicator_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, OutCall::SetIndicator(..)))
            .count()
    }
}

impl SensorPort for MockHw {
    fn read_raw(&mut self) -> RawReadings {
        self.raw
    }
}

impl OutputPort for MockHw {
    fn set_indicator(&mut self, r: u8, g: u8, b: u8) {
        self.calls.push(OutCall::SetIndicator(r, g, b));
    }
    fn set_room_light(&mut self, on: bool) {
        self.calls.push(OutCall::SetRoomLight(on));
    }
    fn render(&mut self, view: &DisplayView) {
        self.calls.push(OutCall::Render(*view));
    }
}

struct RecordingSink {
    events: Vec<AppEvent>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { events: Vec::new() }
    }

    fn phase_changes(&self) -> Vec<(StateId, StateId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, e: &AppEvent) {
        self.events.push(e.clone());
    }
}

fn make_app(config: SystemConfig) -> (AppService, MockHw, RecordingSink) {
    let mut app = AppService::new(config);
    let hw = MockHw::new();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, hw, sink)
}

// ── Presence and segment accounting ───────────────────────────

#[test]
fn boots_idle_then_focuses_on_presence() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    assert_eq!(app.phase(), StateId::Idle);

    hw.away();
    app.tick(300, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Idle);

    hw.present();
    app.tick(600, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Focusing);
    assert_eq!(hw.last_indicator(), Some(COLOUR_FOCUS_OK));
    assert_eq!(
        sink.phase_changes(),
        vec![(StateId::Idle, StateId::Focusing)]
    );
}

#[test]
fn segment_accumulates_when_user_leaves() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Focusing);

    hw.away();
    app.tick(10 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Idle);
    assert_eq!(app.accumulated_focus_ms(), 10 * MIN);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SegmentClosed {
            segment_ms,
            total_focus_ms,
        } if *segment_ms == 10 * MIN && *total_focus_ms == 10 * MIN
    )));
    // Absence holds the last colour: no second indicator write happened.
    assert_eq!(hw.last_indicator(), Some(COLOUR_FOCUS_OK));
}

#[test]
fn focusing_colours_follow_snapshot() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(hw.last_indicator(), Some(COLOUR_FOCUS_OK));

    hw.raw.noise_raw = 900;
    app.tick(300, &mut hw, &mut sink);
    assert_eq!(hw.last_indicator(), Some(COLOUR_NOISY));

    // Too-close outranks noisy.
    hw.raw.distance_cm = Some(10);
    app.tick(600, &mut hw, &mut sink);
    assert_eq!(hw.last_indicator(), Some(COLOUR_TOO_CLOSE));
}

// ── Full session lifecycle (warning, debounce, rest) ──────────

#[test]
fn full_session_lifecycle() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    // Sit down; the neutral environment latches a 45-minute target.
    hw.present();
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Focusing);

    // 45 minutes of continuous presence reaches the warning.
    app.tick(45 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::WarnPendingLeave);
    assert_eq!(app.accumulated_focus_ms(), 45 * MIN);
    assert_eq!(hw.last_indicator(), Some(COLOUR_BREAK));

    let warn_ms = 45 * MIN;

    // Lingers in the chair: the absence clock keeps re-arming.
    app.tick(warn_ms + 300, &mut hw, &mut sink);
    app.tick(warn_ms + 600, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::WarnPendingLeave);

    // Leaves for 1.5 s, comes back, leaves again — the absence never
    // reaches 2 s contiguously, so the rest never starts.
    hw.away();
    app.tick(warn_ms + 2_100, &mut hw, &mut sink);
    hw.present();
    app.tick(warn_ms + 2_400, &mut hw, &mut sink);
    hw.away();
    app.tick(warn_ms + 3_900, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::WarnPendingLeave);

    // An unbroken 2 s absence finally starts the rest.
    app.tick(warn_ms + 4_400, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Resting);
    let rest_start = warn_ms + 4_400;

    // One tick before the 15-minute target: still resting.
    app.tick(rest_start + 15 * MIN - 1_000, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Resting);

    // Target elapsed with the user still away: rest finishes.
    app.tick(rest_start + 15 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::RestFinished);
    assert_eq!(hw.last_indicator(), Some(COLOUR_WAITING));

    // Return starts a fresh segment; the day's total is untouched.
    hw.present();
    app.tick(rest_start + 16 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Focusing);
    assert_eq!(app.accumulated_focus_ms(), 45 * MIN);
}

#[test]
fn early_return_does_not_interrupt_rest() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    app.tick(0, &mut hw, &mut sink);
    app.tick(45 * MIN, &mut hw, &mut sink);
    hw.away();
    app.tick(45 * MIN + 2_000, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Resting);
    let rest_start = 45 * MIN + 2_000;

    // Back at the desk while the rest clock runs — and still there when
    // the target elapses.  Rest must not end on that tick.
    hw.present();
    app.tick(rest_start + 5 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Resting);
    app.tick(rest_start + 15 * MIN, &mut hw, &mut sink);
    assert_eq!(
        app.phase(),
        StateId::Resting,
        "rest ends only when elapsed AND absent hold on the same tick"
    );

    hw.away();
    app.tick(rest_start + 16 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::RestFinished);
}

// ── Indicator write suppression ───────────────────────────────

#[test]
fn unchanged_indicator_is_never_rewritten() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    for i in 0..20 {
        app.tick(i * 300, &mut hw, &mut sink);
    }
    // A single write for the focus green on the first tick; every later
    // tick wants the same colour and is suppressed.
    assert_eq!(hw.indicator_writes(), 1);
}

#[test]
fn rewrite_rate_limit_defers_colour_changes() {
    let config = SystemConfig {
        indicator_min_rewrite_ms: 1_000,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app(config);

    hw.present();
    app.tick(300, &mut hw, &mut sink);
    assert_eq!(hw.last_indicator(), Some(COLOUR_FOCUS_OK));

    // Colour wants to change, but the rate limit holds it back.
    hw.raw.distance_cm = Some(10);
    app.tick(600, &mut hw, &mut sink);
    assert_eq!(hw.last_indicator(), Some(COLOUR_FOCUS_OK));

    // Past the window the deferred change lands.
    app.tick(1_400, &mut hw, &mut sink);
    assert_eq!(hw.last_indicator(), Some(COLOUR_TOO_CLOSE));
}

// ── Room light policy ─────────────────────────────────────────

#[test]
fn room_light_follows_darkness_but_rests_dark() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    // Bright room, nobody seated: light off.
    hw.away();
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(hw.last_room_light(), Some(false));

    // Dark room: light on.
    hw.raw.lux = 20.0;
    app.tick(300, &mut hw, &mut sink);
    assert_eq!(hw.last_room_light(), Some(true));

    // Sitting down in the dark latches a shortened target: 45−10 = 35 min.
    hw.present();
    app.tick(600, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Focusing);

    // Ride the session into Resting: the light is forced off despite the
    // darkness (power saving while nobody should be at the desk).
    app.tick(600 + 35 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::WarnPendingLeave);
    assert_eq!(hw.last_room_light(), Some(true));
    hw.away();
    app.tick(600 + 35 * MIN + 2_000, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Resting);
    assert_eq!(hw.last_room_light(), Some(false));

    // Rest over (dim room latched a 20-minute rest), still dark: the
    // light returns.
    let rest_start = 600 + 35 * MIN + 2_000;
    app.tick(rest_start + 20 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::RestFinished);
    assert_eq!(hw.last_room_light(), Some(true));
}

// ── Display pages ─────────────────────────────────────────────

#[test]
fn pages_rotate_and_rest_phases_override() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    app.tick(300, &mut hw, &mut sink);
    assert!(matches!(
        hw.last_view(),
        Some(DisplayView::FocusSummary {
            total_focus_min: 0,
            segment_min: 0,
            recommended_min: 45,
        })
    ));

    // 2000 ms of wall clock flips to the ambient page.
    app.tick(2_400, &mut hw, &mut sink);
    assert!(matches!(
        hw.last_view(),
        Some(DisplayView::Ambient { noise_raw: 500, .. })
    ));

    // And back.
    app.tick(4_500, &mut hw, &mut sink);
    assert!(matches!(
        hw.last_view(),
        Some(DisplayView::FocusSummary { .. })
    ));

    // Warning overrides rotation with the fixed prompt.
    app.tick(46 * MIN, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::WarnPendingLeave);
    assert_eq!(hw.last_view(), Some(DisplayView::BreakPrompt));

    // Resting shows progress against the latched 15-minute target.
    hw.away();
    app.tick(46 * MIN + 2_000, &mut hw, &mut sink);
    assert_eq!(app.phase(), StateId::Resting);
    app.tick(46 * MIN + 2_000 + 3 * MIN, &mut hw, &mut sink);
    assert_eq!(
        hw.last_view(),
        Some(DisplayView::RestProgress {
            elapsed_min: 3,
            target_min: 15,
        })
    );
}

#[test]
fn button_advances_page_manually() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    app.tick(300, &mut hw, &mut sink);
    assert!(matches!(
        hw.last_view(),
        Some(DisplayView::FocusSummary { .. })
    ));

    app.handle_command(AppCommand::AdvancePage, &mut hw, &mut sink);
    assert!(matches!(hw.last_view(), Some(DisplayView::Ambient { .. })));
}

// ── Daily total reset ─────────────────────────────────────────

#[test]
fn reset_daily_total_zeroes_accumulator() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    hw.present();
    app.tick(0, &mut hw, &mut sink);
    hw.away();
    app.tick(30 * MIN, &mut hw, &mut sink);
    assert_eq!(app.accumulated_focus_ms(), 30 * MIN);

    app.handle_command(AppCommand::ResetDailyTotal, &mut hw, &mut sink);
    assert_eq!(app.accumulated_focus_ms(), 0);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::DailyTotalReset { previous_total_ms } if *previous_total_ms == 30 * MIN
    )));
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_reflects_live_recommendations() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    // Bright, quiet, relaxed seat: the recommendation pins to the ceiling
    // even while nobody has started a session.
    hw.raw = RawReadings {
        distance_cm: Some(55),
        noise_raw: 100,
        lux: 500.0,
    };
    app.tick(300, &mut hw, &mut sink);

    let t = app.build_telemetry();
    assert_eq!(t.phase, StateId::Idle);
    assert_eq!(t.recommended_focus_min, 60);
    assert_eq!(t.recommended_rest_min, 10);
    assert_eq!(t.distance_cm, Some(55));
}
