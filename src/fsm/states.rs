//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.  This is the classic embedded C FSM pattern
//! expressed in safe Rust.
//!
//! ```text
//!  IDLE ──[user near]──▶ FOCUSING ──[target reached]──▶ WARN_PENDING_LEAVE
//!    ▲                      │  ▲                               │
//!    └──────[user away]─────┘  │                     [away ≥ 2s unbroken]
//!                              │                               ▼
//!                     [user near]                           RESTING
//!                              │                               │
//!                       REST_FINISHED ◀──[rest done ∧ away]────┘
//! ```
//!
//! Segment accounting lives on `focusing_exit`, so both ways out of
//! Focusing (user left, or the warning threshold fired) close the segment
//! with identical bookkeeping.

use super::context::{FsmContext, Rgb};
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Indicator colours
// ═══════════════════════════════════════════════════════════════════════════

/// Focusing with a good environment.
pub const COLOUR_FOCUS_OK: Rgb = (0, 180, 60); // green
/// Focusing but leaning in too close to the screen.
pub const COLOUR_TOO_CLOSE: Rgb = (255, 0, 0); // red
/// Focusing in a room that is too loud.
pub const COLOUR_NOISY: Rgb = (255, 160, 0); // amber
/// Break required — locked through WarnPendingLeave and Resting.
pub const COLOUR_BREAK: Rgb = (0, 80, 255); // blue
/// Rest complete, waiting for the user to come back.
pub const COLOUR_WAITING: Rgb = (0, 200, 200); // cyan

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Focusing
        StateDescriptor {
            id: StateId::Focusing,
            name: "Focusing",
            on_enter: Some(focusing_enter),
            on_exit: Some(focusing_exit),
            on_update: focusing_update,
        },
        // Index 2 — WarnPendingLeave
        StateDescriptor {
            id: StateId::WarnPendingLeave,
            name: "WarnPendingLeave",
            on_enter: Some(warn_enter),
            on_exit: None,
            on_update: warn_update,
        },
        // Index 3 — Resting
        StateDescriptor {
            id: StateId::Resting,
            name: "Resting",
            on_enter: Some(resting_enter),
            on_exit: None,
            on_update: resting_update,
        },
        // Index 4 — RestFinished
        StateDescriptor {
            id: StateId::RestFinished,
            name: "RestFinished",
            on_enter: Some(rest_finished_enter),
            on_exit: None,
            on_update: rest_finished_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — nobody at the desk, no segment running
// ═══════════════════════════════════════════════════════════════════════════
//
// No on_enter: Idle deliberately leaves the indicator untouched so the last
// meaningful colour survives a brief lean-back without flicker.

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.snapshot.user_near {
        return Some(StateId::Focusing);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FOCUSING state — user seated, segment clock running
// ═══════════════════════════════════════════════════════════════════════════

fn focusing_enter(ctx: &mut FsmContext) {
    ctx.session.focus_start_ms = ctx.now_ms;
    // Latch the target now; the running segment is measured against this
    // value even as the live recommendation keeps moving with the room.
    ctx.session.target_focus_ms = ctx.session.recommended_focus_ms;
    ctx.outputs.indicator = COLOUR_FOCUS_OK;
    info!(
        "FOCUSING: segment started, target {} min",
        ctx.session.target_focus_ms / 60_000
    );
}

fn focusing_exit(ctx: &mut FsmContext) {
    let segment_ms = ctx.focus_elapsed_ms();
    ctx.session.accumulated_focus_ms = ctx
        .session
        .accumulated_focus_ms
        .saturating_add(segment_ms);
    info!(
        "FOCUSING: segment closed after {} min, {} min total today",
        segment_ms / 60_000,
        ctx.session.accumulated_focus_ms / 60_000
    );
}

fn focusing_update(ctx: &mut FsmContext) -> Option<StateId> {
    // Sub-classify the indicator every tick.  An invalid distance carries
    // no presence evidence, so it falls through to the noisy/OK split.
    ctx.outputs.indicator = if ctx.snapshot.user_too_close {
        COLOUR_TOO_CLOSE
    } else if ctx.snapshot.too_noisy {
        COLOUR_NOISY
    } else {
        COLOUR_FOCUS_OK
    };

    if !ctx.snapshot.user_near {
        return Some(StateId::Idle);
    }

    if ctx.focus_elapsed_ms() >= ctx.session.target_focus_ms {
        return Some(StateId::WarnPendingLeave);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  WARN_PENDING_LEAVE state — target reached, waiting for the user to go
// ═══════════════════════════════════════════════════════════════════════════

fn warn_enter(ctx: &mut FsmContext) {
    ctx.session.absence_start_ms = ctx.now_ms;
    ctx.outputs.indicator = COLOUR_BREAK;
    info!("WARN: focus target reached, prompting a break");
}

fn warn_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.outputs.indicator = COLOUR_BREAK;

    if ctx.snapshot.user_near {
        // Debounce: the absence clock only starts once the user actually
        // leaves; every present observation re-arms it.
        ctx.session.absence_start_ms = ctx.now_ms;
        return None;
    }

    if ctx.absence_elapsed_ms() >= ctx.config.absence_debounce_ms {
        return Some(StateId::Resting);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RESTING state — user away on a mandated break
// ═══════════════════════════════════════════════════════════════════════════

fn resting_enter(ctx: &mut FsmContext) {
    ctx.session.rest_start_ms = ctx.now_ms;
    ctx.session.target_rest_ms = ctx.session.recommended_rest_ms;
    ctx.outputs.indicator = COLOUR_BREAK;
    info!(
        "RESTING: break started, target {} min",
        ctx.session.target_rest_ms / 60_000
    );
}

fn resting_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.outputs.indicator = COLOUR_BREAK;

    // Rest ends only when the clock has run out AND the user is away on
    // the same tick.  An early return never interrupts the break.
    if !ctx.snapshot.user_near && ctx.rest_elapsed_ms() >= ctx.session.target_rest_ms {
        return Some(StateId::RestFinished);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  REST_FINISHED state — break over, waiting for the user to return
// ═══════════════════════════════════════════════════════════════════════════

fn rest_finished_enter(ctx: &mut FsmContext) {
    ctx.outputs.indicator = COLOUR_WAITING;
    info!("REST_FINISHED: break complete, waiting for return");
}

fn rest_finished_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.outputs.indicator = COLOUR_WAITING;

    if ctx.snapshot.user_near {
        return Some(StateId::Focusing);
    }

    None
}
