//! Turn timer: the pure engine, the validated duration type, and the shared
//! handle plus frame loop used across threads.

mod duration;
mod engine;
mod shared;

pub use duration::{TimerDuration, DEFAULT_TIMER_SECS, MAX_TIMER_SECS, TIMER_PRESETS};
pub use engine::{TimerEngine, TimerPhase, TimerSnapshot};
pub use shared::{FrameDriver, SharedTimer, DEFAULT_FRAME_INTERVAL};
