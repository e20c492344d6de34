//! VL53L0X time-of-flight distance sensor driver
//!
//! Single-shot ranging only: kick off a measurement, poll the interrupt
//! status for data-ready, read the range result in millimeters, clear the
//! interrupt.

use crate::bus::I2cBus;
use crate::error::{Error, Result};

const DEFAULT_ADDR: u8 = 0x29;

const REG_SYSRANGE_START: u8 = 0x00;
const REG_SYSTEM_INTERRUPT_CLEAR: u8 = 0x0B;
const REG_RESULT_INTERRUPT_STATUS: u8 = 0x13;
const REG_RESULT_RANGE_MM: u8 = 0x1E;
const REG_MODEL_ID: u8 = 0xC0;

const MODEL_ID: u8 = 0xEE;

/// Poll attempts before a measurement counts as timed out
const READY_POLL_LIMIT: u32 = 100;

/// VL53L0X handle for one mux channel
pub struct Vl53l0x {
    addr: u8,
    channel: u8,
}

impl Vl53l0x {
    /// Create a handle at the default sensor address
    pub fn new(channel: u8) -> Self {
        Self {
            addr: DEFAULT_ADDR,
            channel,
        }
    }

    /// Probe the sensor identity
    ///
    /// The caller must have the sensor's mux channel selected.
    pub fn init(&mut self, bus: &mut dyn I2cBus) -> Result<()> {
        let mut id = [0u8; 1];
        bus.read_register(self.addr, REG_MODEL_ID, &mut id)?;
        if id[0] != MODEL_ID {
            return Err(Error::BadDeviceId {
                channel: self.channel,
                expected: MODEL_ID,
                actual: id[0],
            });
        }

        log::debug!("VL53L0X initialized on channel {}", self.channel);
        Ok(())
    }

    /// Perform one single-shot range measurement, in millimeters
    pub fn read_mm(&mut self, bus: &mut dyn I2cBus) -> Result<u32> {
        bus.write_register(self.addr, REG_SYSRANGE_START, &[0x01])?;

        let mut status = [0u8; 1];
        let mut ready = false;
        for _ in 0..READY_POLL_LIMIT {
            bus.read_register(self.addr, REG_RESULT_INTERRUPT_STATUS, &mut status)?;
            if status[0] & 0x07 != 0 {
                ready = true;
                break;
            }
        }
        if !ready {
            return Err(Error::ReadTimeout(self.addr));
        }

        let mut range = [0u8; 2];
        bus.read_register(self.addr, REG_RESULT_RANGE_MM, &mut range)?;
        bus.write_register(self.addr, REG_SYSTEM_INTERRUPT_CLEAR, &[0x01])?;

        Ok(u32::from(u16::from_be_bytes(range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MockBus;

    #[test]
    fn test_init_rejects_unknown_id() {
        let mut bus = MockBus::new();
        bus.queue_read(DEFAULT_ADDR, REG_MODEL_ID, &[0x00]);

        let mut sensor = Vl53l0x::new(2);
        assert!(sensor.init(&mut bus).is_err());
    }

    #[test]
    fn test_read_mm() {
        let mut bus = MockBus::new();
        bus.queue_read(DEFAULT_ADDR, REG_RESULT_INTERRUPT_STATUS, &[0x04]);
        // 0x0136 = 310 mm big-endian
        bus.queue_read(DEFAULT_ADDR, REG_RESULT_RANGE_MM, &[0x01, 0x36]);

        let mut sensor = Vl53l0x::new(3);
        assert_eq!(sensor.read_mm(&mut bus).unwrap(), 310);

        // Start, then interrupt clear after the read
        let writes = bus.register_writes();
        assert_eq!(writes[0], (DEFAULT_ADDR, REG_SYSRANGE_START, vec![0x01]));
        assert_eq!(
            writes[1],
            (DEFAULT_ADDR, REG_SYSTEM_INTERRUPT_CLEAR, vec![0x01])
        );
    }

    #[test]
    fn test_read_mm_times_out_without_ready_flag() {
        let mut bus = MockBus::new();
        for _ in 0..READY_POLL_LIMIT {
            bus.queue_read(DEFAULT_ADDR, REG_RESULT_INTERRUPT_STATUS, &[0x00]);
        }

        let mut sensor = Vl53l0x::new(2);
        assert!(matches!(
            sensor.read_mm(&mut bus),
            Err(Error::ReadTimeout(_))
        ));
    }
}
