//! Device drivers
//!
//! Register-level drivers for the color and time-of-flight sensors behind the
//! mux, plus the serial-framed stepper controller link and the mock devices
//! used by the test suite.

mod mock;
mod stepper;
mod tcs3472;
mod vl53l0x;

pub use mock::{MockDrive, ScriptedHub};
pub use stepper::{Drive, SerialStepperDrive};
pub use tcs3472::Tcs3472;
pub use vl53l0x::Vl53l0x;
