//! I2C bus layer
//!
//! All sensors sit behind a channel multiplexer on one physical bus. The
//! [`I2cBus`] trait is the seam between the drivers and the kernel device so
//! the whole sensing stack can run against a mock bus in tests.

use crate::error::Result;

mod linux;
mod mock;
mod mux;

pub use linux::LinuxI2cBus;
pub use mock::MockBus;
pub use mux::BusMultiplexer;

/// Raw I2C bus operations
pub trait I2cBus: Send {
    /// Write raw bytes to a device address
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()>;

    /// Write bytes to a device register
    fn write_register(&mut self, addr: u8, reg: u8, bytes: &[u8]) -> Result<()>;

    /// Read bytes starting at a device register
    fn read_register(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<()>;
}
