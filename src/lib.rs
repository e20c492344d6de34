//! sweepd - sweep-and-avoid motion control for a differential stepper robot
//!
//! A single sequential control loop fuses multiplexed color/distance sensor
//! readings, dead-reckons a quantized grid pose, drives a lawnmower-style
//! sweep pattern, and retreats into a deterministic sidestep maneuver when an
//! obstacle or boundary line shows up. Obstacle reports are published into a
//! fixed-size shared-memory record consumed by an external relay process.

pub mod bus;
pub mod config;
pub mod control;
pub mod devices;
pub mod error;
pub mod motion;
pub mod sensing;
pub mod status;

// Re-export commonly used types
pub use config::Config;
pub use control::{Controller, Verdict};
pub use error::{Error, Result};
