//! Dead-reckoned motion primitives and the sweep pattern

mod planner;
mod pose;

pub use planner::{Phase, SweepPattern, SweepStep};
pub use pose::{Heading, Pose, PositionTracker, YAW_TICKS_PER_REV};
