mod display;
mod edit;
mod engine;
mod mode;

pub use display::{format_accumulated, format_clock, format_hms, format_session};
pub use edit::{minutes_for, EditKey, TimeEdit, MAX_DURATION_SECS};
pub use engine::{SessionEngine, TimerState};
pub use mode::{next_mode, Mode, Settings, DEFAULT_LONG_BREAK_INTERVAL, MAX_MODE_MINUTES};
