//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────────────┬───────────┬──────────┬───────────────┐ │
//! │  │ StateId           │ on_enter  │ on_exit  │ on_update     │ │
//! │  ├──────────────────┼───────────┼──────────┼───────────────┤ │
//! │  │ Idle              │ fn(ctx)   │ fn(ctx)  │ fn->Option<>  │ │
//! │  │ Focusing          │ fn(ctx)   │ fn(ctx)  │ fn->Option<>  │ │
//! │  │ WarnPendingLeave  │ fn(ctx)   │ fn(ctx)  │ fn->Option<>  │ │
//! │  │ Resting           │ fn(ctx)   │ fn(ctx)  │ fn->Option<>  │ │
//! │  │ RestFinished      │ fn(ctx)   │ fn(ctx)  │ fn->Option<>  │ │
//! │  └──────────────────┴───────────┴──────────┴───────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut FsmContext`, which
//! holds the snapshot, session bookkeeping, outputs, config, and the
//! cycle's monotonic `now_ms` — enter/exit handlers therefore observe
//! the exact same "now" as the update that triggered the transition.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all session phases.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Focusing = 1,
    WarnPendingLeave = 2,
    Resting = 3,
    RestFinished = 4,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Focusing,
            2 => Self::WarnPendingLeave,
            3 => Self::Resting,
            4 => Self::RestFinished,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    /// Rest-related phases override the rotating display pages and pause
    /// page rotation.
    pub fn is_rest_related(self) -> bool {
        matches!(
            self,
            Self::WarnPendingLeave | Self::Resting | Self::RestFinished
        )
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and advances it
/// against a mutable [`FsmContext`] that is threaded through every handler
/// call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter (wraps at u64::MAX).
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// The caller must have set `ctx.now_ms` and `ctx.snapshot` for this
    /// cycle already.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    /// 3. Increment tick counter.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::context::{EnvironmentSnapshot, FsmContext, RawReadings};
    use super::*;
    use crate::config::SystemConfig;

    const MIN_MS: u64 = 60_000;

    fn make_ctx() -> FsmContext {
        let mut ctx = FsmContext::new(SystemConfig::default());
        // A plausible default environment: 45-minute focus, 15-minute rest.
        ctx.session.recommended_focus_ms = 45 * MIN_MS;
        ctx.session.recommended_rest_ms = 15 * MIN_MS;
        ctx
    }

    fn make_fsm() -> Fsm {
        Fsm::new(states::build_state_table(), StateId::Idle)
    }

    fn present(ctx: &mut FsmContext, distance_cm: u16) {
        ctx.snapshot = EnvironmentSnapshot::classify(
            RawReadings {
                distance_cm: Some(distance_cm),
                noise_raw: 300,
                lux: 200.0,
            },
            &ctx.config,
        );
    }

    fn away(ctx: &mut FsmContext) {
        ctx.snapshot = EnvironmentSnapshot::classify(
            RawReadings {
                distance_cm: Some(120),
                noise_raw: 300,
                lux: 200.0,
            },
            &ctx.config,
        );
    }

    fn tick_at(fsm: &mut Fsm, ctx: &mut FsmContext, now_ms: u64) {
        ctx.now_ms = now_ms;
        fsm.tick(ctx);
    }

    #[test]
    fn starts_in_idle() {
        let fsm = make_fsm();
        assert_eq!(fsm.current_state(), StateId::Idle);
    }

    #[test]
    fn idle_holds_indicator_untouched() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        ctx.outputs.indicator = (1, 2, 3);
        fsm.start(&mut ctx);
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, 1_000);
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert_eq!(ctx.outputs.indicator, (1, 2, 3), "Idle must hold last colour");
    }

    #[test]
    fn idle_to_focusing_on_presence() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);

        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 10_000);
        assert_eq!(fsm.current_state(), StateId::Focusing);
        assert_eq!(ctx.session.focus_start_ms, 10_000);
        assert_eq!(
            ctx.session.target_focus_ms, 45 * MIN_MS,
            "focus target latched from live recommendation at entry"
        );
    }

    #[test]
    fn focusing_ignores_live_recommendation_changes() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);
        assert_eq!(fsm.current_state(), StateId::Focusing);

        // Environment degrades; the live recommendation drops to 20 minutes,
        // but the running segment keeps its latched 45-minute target.
        ctx.session.recommended_focus_ms = 20 * MIN_MS;
        tick_at(&mut fsm, &mut ctx, 25 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::Focusing);
        assert_eq!(ctx.session.target_focus_ms, 45 * MIN_MS);
    }

    #[test]
    fn focusing_back_to_idle_accumulates_segment() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);

        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, 10 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::Idle);
        assert_eq!(ctx.session.accumulated_focus_ms, 10 * MIN_MS);
    }

    #[test]
    fn focusing_below_target_is_idempotent() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);

        for i in 1..50 {
            tick_at(&mut fsm, &mut ctx, i * 1_000);
            assert_eq!(fsm.current_state(), StateId::Focusing);
            assert_eq!(ctx.session.accumulated_focus_ms, 0);
        }
    }

    #[test]
    fn focusing_to_warn_on_target_reached() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);

        tick_at(&mut fsm, &mut ctx, 45 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::WarnPendingLeave);
        assert_eq!(
            ctx.session.accumulated_focus_ms,
            45 * MIN_MS,
            "segment force-closed at the warning threshold"
        );
        assert_eq!(ctx.session.absence_start_ms, 45 * MIN_MS);
        assert_eq!(
            ctx.outputs.indicator,
            states::COLOUR_BREAK,
            "warning colour forced on entry"
        );
    }

    #[test]
    fn warn_debounce_resets_while_present() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);
        tick_at(&mut fsm, &mut ctx, 45 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::WarnPendingLeave);

        let t0 = 45 * MIN_MS;
        // User lingers: every present observation re-arms the clock.
        tick_at(&mut fsm, &mut ctx, t0 + 500);
        tick_at(&mut fsm, &mut ctx, t0 + 1_000);
        assert_eq!(ctx.session.absence_start_ms, t0 + 1_000);

        // Leaves for 1.5s, comes back, leaves again — never 2s contiguous.
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, t0 + 2_500);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, t0 + 3_000);
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, t0 + 4_500);
        assert_eq!(
            fsm.current_state(),
            StateId::WarnPendingLeave,
            "no contiguous 2s absence yet"
        );

        // Now an unbroken 2s stretch.
        tick_at(&mut fsm, &mut ctx, t0 + 5_000);
        assert_eq!(fsm.current_state(), StateId::Resting);
        assert_eq!(ctx.session.rest_start_ms, t0 + 5_000);
        assert_eq!(
            ctx.session.target_rest_ms, 15 * MIN_MS,
            "rest target latched at Resting entry"
        );
    }

    #[test]
    fn rest_requires_elapsed_and_absent_together() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);
        tick_at(&mut fsm, &mut ctx, 45 * MIN_MS);
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, 45 * MIN_MS + 2_000);
        assert_eq!(fsm.current_state(), StateId::Resting);
        let rest_start = ctx.session.rest_start_ms;

        // One second short of the 15-minute target: still resting.
        tick_at(&mut fsm, &mut ctx, rest_start + 15 * MIN_MS - 1_000);
        assert_eq!(fsm.current_state(), StateId::Resting);

        // Target elapsed but the user is back at the desk: rest does not end.
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, rest_start + 15 * MIN_MS);
        assert_eq!(
            fsm.current_state(),
            StateId::Resting,
            "early return must not terminate rest"
        );

        // Away again with the target elapsed: both conditions hold.
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, rest_start + 16 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::RestFinished);
    }

    #[test]
    fn rest_finished_waits_then_starts_fresh_segment() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 0);
        tick_at(&mut fsm, &mut ctx, 45 * MIN_MS);
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, 45 * MIN_MS + 2_000);
        tick_at(&mut fsm, &mut ctx, 65 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::RestFinished);
        assert_eq!(ctx.outputs.indicator, states::COLOUR_WAITING);

        // Still away: holds.
        tick_at(&mut fsm, &mut ctx, 66 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::RestFinished);

        // Returns: a fresh segment starts, prior accumulation untouched.
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 70 * MIN_MS);
        assert_eq!(fsm.current_state(), StateId::Focusing);
        assert_eq!(ctx.session.focus_start_ms, 70 * MIN_MS);
        assert_eq!(ctx.session.accumulated_focus_ms, 45 * MIN_MS);
    }

    #[test]
    fn no_transition_without_trigger_in_any_state() {
        // From each phase, a snapshot matching no trigger row leaves the
        // phase unchanged.
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);

        // Idle + away → Idle.
        away(&mut ctx);
        tick_at(&mut fsm, &mut ctx, 1_000);
        assert_eq!(fsm.current_state(), StateId::Idle);

        // Focusing + present below target → Focusing.
        present(&mut ctx, 45);
        tick_at(&mut fsm, &mut ctx, 2_000);
        tick_at(&mut fsm, &mut ctx, 3_000);
        assert_eq!(fsm.current_state(), StateId::Focusing);
    }

    #[test]
    fn state_id_from_index_roundtrip() {
        for i in 0..StateId::COUNT {
            let id = StateId::from_index(i);
            assert_eq!(id as usize, i);
        }
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn state_id_from_invalid_index_returns_idle() {
        let id = StateId::from_index(99);
        assert_eq!(id, StateId::Idle);
    }
}
