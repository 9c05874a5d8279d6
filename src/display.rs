//! Typed display views and the page rotation engine.
//!
//! The core never formats text.  It emits one [`DisplayView`] per cycle;
//! the display adapter turns the view into character-cell writes.  Views
//! compare with `PartialEq` so the service can skip redraws when nothing
//! changed.
//!
//! Two rotating status pages exist while a session is idle or focusing:
//!
//! | Page | Content                                        |
//! |------|------------------------------------------------|
//! | 0    | total / current-segment / recommended minutes  |
//! | 1    | ambient lux and raw noise magnitude            |
//!
//! The rest-related phases replace the rotating pages with fixed prompts.

/// What the two-line display should show this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayView {
    /// Page 0: session minutes.
    FocusSummary {
        total_focus_min: u32,
        segment_min: u32,
        recommended_min: u32,
    },
    /// Page 1: ambient readings.
    Ambient { lux: f32, noise_raw: u16 },
    /// WarnPendingLeave: "Take a break".
    BreakPrompt,
    /// Resting: "Rest: x/y m".
    RestProgress { elapsed_min: u32, target_min: u32 },
    /// RestFinished: waiting for the user to come back.
    AwaitingReturn,
}

/// Wall-clock page rotator for the two status pages.
///
/// Rotation is held while the session is in a rest-related phase; the flip
/// timer re-arms during the hold so leaving a long rest does not cause an
/// immediate flip.
pub struct Pager {
    page: u8,
    last_flip_ms: u64,
    rotate_ms: u64,
}

impl Pager {
    pub fn new(rotate_ms: u64) -> Self {
        Self {
            page: 0,
            last_flip_ms: 0,
            rotate_ms,
        }
    }

    /// Advance the rotation clock.  Returns the page to show this cycle.
    pub fn tick(&mut self, now_ms: u64, rotating: bool) -> u8 {
        if !rotating {
            self.last_flip_ms = now_ms;
            return self.page;
        }
        if now_ms.saturating_sub(self.last_flip_ms) >= self.rotate_ms {
            self.flip(now_ms);
        }
        self.page
    }

    /// Manual page flip (button short press).  Also re-arms the timer so
    /// the next automatic flip comes a full period later.
    pub fn advance(&mut self, now_ms: u64) {
        self.flip(now_ms);
    }

    pub fn page(&self) -> u8 {
        self.page
    }

    fn flip(&mut self, now_ms: u64) {
        self.page = (self.page + 1) % 2;
        self.last_flip_ms = now_ms;
    }
}
