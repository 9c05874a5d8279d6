//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the user button
//! today) that the [`AppService`](super::service::AppService) interprets
//! and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Flip the status display to the next page immediately.
    AdvancePage,

    /// Zero the accumulated daily focus total.  This is the external
    /// day-rollover hook: the accumulator itself never decreases inside
    /// the session machine.
    ResetDailyTotal,
}
