//! Ports for capabilities the lifecycle consumes from its environment.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
