//! TCS3472 color sensor driver
//!
//! Minimal driver for the ams TCS3472 RGBC sensor: identity probe, fixed
//! integration time and gain at init, then repeated four-channel reads. Every
//! register access goes through the command register (0x80 | reg; 0xA0 | reg
//! for auto-incrementing block reads).

use crate::bus::I2cBus;
use crate::error::{Error, Result};
use crate::sensing::RgbSample;

const DEFAULT_ADDR: u8 = 0x29;

const CMD: u8 = 0x80;
const CMD_AUTO_INC: u8 = 0xA0;

const REG_ENABLE: u8 = 0x00;
const REG_ATIME: u8 = 0x01;
const REG_CONTROL: u8 = 0x0F;
const REG_ID: u8 = 0x12;
const REG_CDATAL: u8 = 0x14;

/// ENABLE: power on + ADC enable
const ENABLE_PON_AEN: u8 = 0x03;
/// CONTROL: 4x analog gain
const GAIN_4X: u8 = 0x01;

/// Known identity register values (TCS34725 / TCS34727)
const KNOWN_IDS: [u8; 2] = [0x44, 0x4D];

/// TCS3472 handle for one mux channel
pub struct Tcs3472 {
    addr: u8,
    channel: u8,
}

impl Tcs3472 {
    /// Create a handle at the default sensor address
    pub fn new(channel: u8) -> Self {
        Self {
            addr: DEFAULT_ADDR,
            channel,
        }
    }

    /// Probe and configure the sensor
    ///
    /// Verifies the identity register, sets a 60 ms integration time and 4x
    /// gain, and powers up the ADC. The caller must have the sensor's mux
    /// channel selected.
    pub fn init(&mut self, bus: &mut dyn I2cBus) -> Result<()> {
        let mut id = [0u8; 1];
        bus.read_register(self.addr, CMD | REG_ID, &mut id)?;
        if !KNOWN_IDS.contains(&id[0]) {
            return Err(Error::BadDeviceId {
                channel: self.channel,
                expected: KNOWN_IDS[0],
                actual: id[0],
            });
        }

        // ATIME = 256 - ms / 2.4; 60 ms integration -> 0xE7
        bus.write_register(self.addr, CMD | REG_ATIME, &[0xE7])?;
        bus.write_register(self.addr, CMD | REG_CONTROL, &[GAIN_4X])?;
        bus.write_register(self.addr, CMD | REG_ENABLE, &[ENABLE_PON_AEN])?;

        log::debug!("TCS3472 initialized on channel {}", self.channel);
        Ok(())
    }

    /// Read one RGB sample
    ///
    /// Reads the clear/red/green/blue data block in one auto-incrementing
    /// transaction; the clear channel is discarded.
    pub fn read_rgb(&mut self, bus: &mut dyn I2cBus) -> Result<RgbSample> {
        let mut data = [0u8; 8];
        bus.read_register(self.addr, CMD_AUTO_INC | REG_CDATAL, &mut data)?;

        Ok(RgbSample {
            red: u16::from_le_bytes([data[2], data[3]]),
            green: u16::from_le_bytes([data[4], data[5]]),
            blue: u16::from_le_bytes([data[6], data[7]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MockBus;

    #[test]
    fn test_init_rejects_unknown_id() {
        let mut bus = MockBus::new();
        bus.queue_read(DEFAULT_ADDR, CMD | REG_ID, &[0x99]);

        let mut sensor = Tcs3472::new(0);
        let err = sensor.init(&mut bus).unwrap_err();
        assert!(matches!(err, Error::BadDeviceId { channel: 0, .. }));
    }

    #[test]
    fn test_init_configures_sensor() {
        let mut bus = MockBus::new();
        bus.queue_read(DEFAULT_ADDR, CMD | REG_ID, &[0x44]);

        let mut sensor = Tcs3472::new(1);
        sensor.init(&mut bus).unwrap();

        let writes = bus.register_writes();
        assert_eq!(writes[0], (DEFAULT_ADDR, CMD | REG_ATIME, vec![0xE7]));
        assert_eq!(writes[1], (DEFAULT_ADDR, CMD | REG_CONTROL, vec![GAIN_4X]));
        assert_eq!(writes[2], (DEFAULT_ADDR, CMD | REG_ENABLE, vec![ENABLE_PON_AEN]));
    }

    #[test]
    fn test_read_rgb() {
        let mut bus = MockBus::new();
        // clear=1, r=0x0120, g=0x0240, b=0x0360 little-endian
        bus.queue_read(
            DEFAULT_ADDR,
            CMD_AUTO_INC | REG_CDATAL,
            &[0x01, 0x00, 0x20, 0x01, 0x40, 0x02, 0x60, 0x03],
        );

        let mut sensor = Tcs3472::new(0);
        let sample = sensor.read_rgb(&mut bus).unwrap();
        assert_eq!(sample.red, 0x0120);
        assert_eq!(sample.green, 0x0240);
        assert_eq!(sample.blue, 0x0360);
    }
}
