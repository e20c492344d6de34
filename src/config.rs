//! Configuration for the sweepd daemon
//!
//! Loads configuration from a TOML file. Every timing constant of the control
//! loop lives here so that tests can run the loop with zeroed delays.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub hardware: HardwareConfig,
    pub sensing: SensingConfig,
    pub motion: MotionConfig,
    pub status: StatusConfig,
    pub logging: LoggingConfig,
}

/// Hardware configuration (bus paths and addresses)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HardwareConfig {
    /// I2C bus device shared by all sensors (e.g. "/dev/i2c-0")
    pub i2c_bus: String,
    /// 7-bit address of the channel multiplexer on that bus
    pub mux_addr: u8,
    /// Serial port of the stepper controller board
    pub stepper_port: String,
    /// Stepper link baud rate
    pub stepper_baud: u32,
}

/// Sensor polling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensingConfig {
    /// Settle delay after a mux channel select (ms)
    pub mux_settle_ms: u64,
    /// Delay at the end of every fusion cycle (ms)
    pub cycle_delay_ms: u64,
    /// Depth of the down-distance rolling window
    pub down_window: usize,
    /// Down-distance average below this means an object is very close (mm)
    pub near_threshold_mm: f32,
    /// Front distances below this publish size code "6", otherwise "3" (mm)
    pub size_code_threshold_mm: u32,
}

/// Motion configuration (step counts and settle delays)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Steps per short spin, roughly 15 degrees of rotation
    pub short_spin_steps: i32,
    /// Steps per long straight segment
    pub long_move_steps: i32,
    /// Pause after each motor command (ms)
    pub settle_ms: u64,
    /// Short spins per quarter turn
    pub spins_per_quarter: u32,
    /// Raw speed value written to both stepper channels at startup
    pub stepper_speed: i32,
}

/// Status record publishing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusConfig {
    /// Backing file for the shared status region
    pub shm_path: String,
    /// Fixed capacity of the region in bytes
    pub capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration for the four-channel mux rig
    pub fn sweeper_defaults() -> Self {
        Self {
            hardware: HardwareConfig {
                i2c_bus: "/dev/i2c-0".to_string(),
                mux_addr: 0x70,
                stepper_port: "/dev/ttyS1".to_string(),
                stepper_baud: 115_200,
            },
            sensing: SensingConfig {
                mux_settle_ms: 10,
                cycle_delay_ms: 80,
                down_window: 1,
                near_threshold_mm: 80.0,
                size_code_threshold_mm: 280,
            },
            motion: MotionConfig {
                short_spin_steps: 100,
                long_move_steps: 400,
                settle_ms: 1000,
                spins_per_quarter: 6,
                stepper_speed: -32_536,
            },
            status: StatusConfig {
                shm_path: "/dev/shm/sweep_status".to_string(),
                capacity: 128,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    /// Defaults with every delay zeroed, for driving the loop in tests
    pub fn zero_delay() -> Self {
        let mut config = Self::sweeper_defaults();
        config.sensing.mux_settle_ms = 0;
        config.sensing.cycle_delay_ms = 0;
        config.motion.settle_ms = 0;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::sweeper_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::sweeper_defaults();
        assert_eq!(config.hardware.mux_addr, 0x70);
        assert_eq!(config.sensing.down_window, 1);
        assert_eq!(config.sensing.near_threshold_mm, 80.0);
        assert_eq!(config.motion.long_move_steps, 400);
        assert_eq!(config.motion.spins_per_quarter, 6);
        assert_eq!(config.status.capacity, 128);
    }

    #[test]
    fn test_toml_serialization() {
        let config = Config::sweeper_defaults();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[hardware]"));
        assert!(toml_string.contains("[sensing]"));
        assert!(toml_string.contains("[motion]"));
        assert!(toml_string.contains("[status]"));
        assert!(toml_string.contains("[logging]"));

        assert!(toml_string.contains("mux_addr = 112"));
        assert!(toml_string.contains("long_move_steps = 400"));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[hardware]
i2c_bus = "/dev/i2c-1"
mux_addr = 0x70
stepper_port = "/dev/ttyUSB0"
stepper_baud = 57600

[sensing]
mux_settle_ms = 10
cycle_delay_ms = 80
down_window = 4
near_threshold_mm = 100.0
size_code_threshold_mm = 280

[motion]
short_spin_steps = 100
long_move_steps = 400
settle_ms = 1000
spins_per_quarter = 6
stepper_speed = -32536

[status]
shm_path = "/dev/shm/sweep_status"
capacity = 128

[logging]
level = "debug"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.hardware.i2c_bus, "/dev/i2c-1");
        assert_eq!(config.sensing.down_window, 4);
        assert_eq!(config.sensing.near_threshold_mm, 100.0);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_delay_config() {
        let config = Config::zero_delay();
        assert_eq!(config.sensing.mux_settle_ms, 0);
        assert_eq!(config.sensing.cycle_delay_ms, 0);
        assert_eq!(config.motion.settle_ms, 0);
        // Non-timing values stay at the rig defaults
        assert_eq!(config.motion.long_move_steps, 400);
    }
}
