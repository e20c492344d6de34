//! Linux kernel I2C bus implementation

use super::I2cBus;
use crate::error::{Error, Result};
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// I2C bus backed by a `/dev/i2c-*` character device
///
/// The kernel interface fixes the slave address per open handle, so one handle
/// is kept per device address and reused across transactions.
pub struct LinuxI2cBus {
    path: String,
    handles: HashMap<u8, LinuxI2CDevice>,
}

impl LinuxI2cBus {
    /// Open the bus character device
    pub fn open(path: &str) -> Result<Self> {
        // Fail on a missing adapter at startup rather than on the first
        // sensor transaction.
        std::fs::metadata(path)?;

        log::info!("Opened I2C bus: {}", path);

        Ok(Self {
            path: path.to_string(),
            handles: HashMap::new(),
        })
    }

    fn handle(&mut self, addr: u8) -> Result<&mut LinuxI2CDevice> {
        match self.handles.entry(addr) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let dev = LinuxI2CDevice::new(&self.path, u16::from(addr))
                    .map_err(|e| Error::Bus(e.to_string()))?;
                Ok(entry.insert(dev))
            }
        }
    }
}

impl I2cBus for LinuxI2cBus {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()> {
        self.handle(addr)?
            .write(bytes)
            .map_err(|e| Error::Bus(e.to_string()))
    }

    fn write_register(&mut self, addr: u8, reg: u8, bytes: &[u8]) -> Result<()> {
        let mut frame = Vec::with_capacity(bytes.len() + 1);
        frame.push(reg);
        frame.extend_from_slice(bytes);
        self.handle(addr)?
            .write(&frame)
            .map_err(|e| Error::Bus(e.to_string()))
    }

    fn read_register(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
        let dev = self.handle(addr)?;
        dev.write(&[reg]).map_err(|e| Error::Bus(e.to_string()))?;
        dev.read(buf).map_err(|e| Error::Bus(e.to_string()))
    }
}
