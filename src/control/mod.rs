//! Control-math modules: pure, stateless computation kept apart from the
//! FSM so it can be unit-tested exhaustively.

pub mod duration;
