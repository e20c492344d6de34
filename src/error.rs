//! Error types for sweepd

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// sweepd error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I2C bus error
    #[error("I2C bus error: {0}")]
    Bus(String),

    /// Sensor never came up on its mux channel
    #[error("Sensor not initialized on channel {0}")]
    NotInitialized(u8),

    /// Sensor probe returned an unexpected identity
    #[error("Unexpected device id {actual:#04x} on channel {channel} (expected {expected:#04x})")]
    BadDeviceId {
        /// Mux channel the probe ran on
        channel: u8,
        /// Identity register value the datasheet promises
        expected: u8,
        /// Identity register value actually read
        actual: u8,
    },

    /// Sensor read timed out waiting for a data-ready flag
    #[error("Sensor read timeout at address {0:#04x}")]
    ReadTimeout(u8),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// Shared-memory status region could not be set up
    #[error("Status region error: {0}")]
    StatusRegion(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
