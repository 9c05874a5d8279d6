//! Hardware drivers: one-shot peripheral bring-up plus thin actuator and
//! input wrappers.  Everything here is a dumb device — policy lives in the
//! domain core.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod lcd;
pub mod room_light;
pub mod status_led;
