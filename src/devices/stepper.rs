//! Stepper controller link
//!
//! The two drive steppers hang off a small controller board reached over a
//! UART. Commands are fixed-size frames:
//!
//! ```text
//! ┌──────┬──────┬─────┬───────────────┬───────────────┬─────┐
//! │ 0xA5 │ 0x5A │ CMD │ left (i32 LE) │ right (i32 LE)│ SUM │
//! └──────┴──────┴─────┴───────────────┴───────────────┴─────┘
//! ```
//!
//! SUM is the wrapping byte sum of CMD and both payload words. The board
//! executes a STEPS command to completion on its own; the host side only
//! observes the fixed settle delay.

use crate::error::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Write;
use std::time::Duration;

const SYNC: [u8; 2] = [0xA5, 0x5A];
const CMD_ENABLE: u8 = 0x01;
const CMD_SET_SPEED: u8 = 0x02;
const CMD_STEPS: u8 = 0x03;

/// Drive interface consumed by the position tracker
pub trait Drive: Send {
    /// Issue a synchronous step command to both wheels
    ///
    /// Equal values translate; opposite values rotate in place.
    fn steps(&mut self, left: i32, right: i32) -> Result<()>;
}

/// Stepper controller reached over a serial port
pub struct SerialStepperDrive {
    port: Box<dyn SerialPort>,
}

impl SerialStepperDrive {
    /// Open the controller link and bring the steppers up
    ///
    /// Enables the drivers and programs the fixed raw speed on both channels.
    pub fn open(path: &str, baud_rate: u32, speed: i32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(100))
            .open()?;

        log::info!("Opened stepper link: {} at {} baud", path, baud_rate);

        let mut drive = SerialStepperDrive { port };
        drive.send(CMD_ENABLE, 0, 0)?;
        drive.send(CMD_SET_SPEED, speed, speed)?;
        Ok(drive)
    }

    fn send(&mut self, cmd: u8, left: i32, right: i32) -> Result<()> {
        let frame = encode_frame(cmd, left, right);
        self.port.write_all(&frame)?;
        self.port.flush()?;
        Ok(())
    }
}

impl Drive for SerialStepperDrive {
    fn steps(&mut self, left: i32, right: i32) -> Result<()> {
        log::debug!("Stepper: steps L={} R={}", left, right);
        self.send(CMD_STEPS, left, right)
    }
}

/// Build one command frame
fn encode_frame(cmd: u8, left: i32, right: i32) -> [u8; 12] {
    let mut frame = [0u8; 12];
    frame[0] = SYNC[0];
    frame[1] = SYNC[1];
    frame[2] = cmd;
    frame[3..7].copy_from_slice(&left.to_le_bytes());
    frame[7..11].copy_from_slice(&right.to_le_bytes());

    let sum = frame[2..11]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    frame[11] = sum;
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_layout() {
        let frame = encode_frame(CMD_STEPS, 400, -400);
        assert_eq!(&frame[..2], &SYNC);
        assert_eq!(frame[2], CMD_STEPS);
        assert_eq!(&frame[3..7], &400i32.to_le_bytes());
        assert_eq!(&frame[7..11], &(-400i32).to_le_bytes());

        let expected_sum = frame[2..11]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(frame[11], expected_sum);
    }

    #[test]
    fn test_encode_frame_zero_payload() {
        let frame = encode_frame(CMD_ENABLE, 0, 0);
        assert_eq!(frame[11], CMD_ENABLE);
    }
}
