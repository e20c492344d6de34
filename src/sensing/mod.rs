//! Sensor fusion building blocks
//!
//! The control loop never talks to drivers directly; it goes through the
//! [`SensorHub`] trait, which hides the mux sequencing and lets tests script
//! every reading.

mod color;
mod hub;
mod window;

pub use color::{classify, scale8, Classification, RgbSample};
pub use hub::{MuxSensorHub, SensorHub};
pub use window::RollingWindow;
