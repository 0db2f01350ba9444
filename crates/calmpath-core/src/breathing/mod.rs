mod pacer;
mod phase;
mod session;

pub use pacer::{Pacer, DEFAULT_TICK_INTERVAL};
pub use phase::{Phase, CYCLE_SECS, MAX_CYCLES};
pub use session::{BreathingSession, BreathingSnapshot};
