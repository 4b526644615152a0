pub mod clock;
pub mod focus_timer;
pub mod interval;
pub mod navigation;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::FixedClock;
pub use focus_timer::{FocusTimer, TimerEvent};
pub use interval::Interval;
pub use navigation::{CellTarget, NavigationState, Step, ViewMode};
