//! Sensor hub: mux sequencing over the four sensor channels

use crate::bus::{BusMultiplexer, I2cBus};
use crate::config::Config;
use crate::devices::{Tcs3472, Vl53l0x};
use crate::sensing::RgbSample;
use std::time::Duration;

/// Mux channel of the forward-facing color sensor
pub const CH_FRONT_COLOR: u8 = 0;
/// Mux channel of the downward-facing color sensor
pub const CH_DOWN_COLOR: u8 = 1;
/// Mux channel of the downward-facing distance sensor
pub const CH_DOWN_TOF: u8 = 2;
/// Mux channel of the forward-facing distance sensor
pub const CH_FRONT_TOF: u8 = 3;

/// One read per sensor channel, with value-based fault handling
///
/// A color read fault is `None`; a distance read fault is 0, which callers
/// cannot tell apart from a true zero reading. Implementations select the
/// right mux channel before touching the sensor.
pub trait SensorHub: Send {
    fn front_color(&mut self) -> Option<RgbSample>;
    fn down_color(&mut self) -> Option<RgbSample>;
    fn front_distance_mm(&mut self) -> u32;
    fn down_distance_mm(&mut self) -> u32;
}

/// The real four-channel hub behind the bus multiplexer
///
/// A sensor that failed to initialize stays down for the session: its color
/// reads return `None` and its distance reads return 0.
pub struct MuxSensorHub {
    bus: Box<dyn I2cBus>,
    mux: BusMultiplexer,
    front_color: Option<Tcs3472>,
    down_color: Option<Tcs3472>,
    front_tof: Option<Vl53l0x>,
    down_tof: Option<Vl53l0x>,
}

impl MuxSensorHub {
    /// Probe and initialize all four mux channels
    ///
    /// Init failures are logged per channel and never abort startup; the
    /// affected sensor simply reads as failed.
    pub fn initialize(mut bus: Box<dyn I2cBus>, config: &Config) -> Self {
        let mux = BusMultiplexer::new(
            config.hardware.mux_addr,
            Duration::from_millis(config.sensing.mux_settle_ms),
        );

        let front_color = {
            mux.select(bus.as_mut(), CH_FRONT_COLOR);
            let mut sensor = Tcs3472::new(CH_FRONT_COLOR);
            match sensor.init(bus.as_mut()) {
                Ok(()) => Some(sensor),
                Err(e) => {
                    log::error!("Color sensor init failed on channel {}: {}", CH_FRONT_COLOR, e);
                    None
                }
            }
        };

        let down_color = {
            mux.select(bus.as_mut(), CH_DOWN_COLOR);
            let mut sensor = Tcs3472::new(CH_DOWN_COLOR);
            match sensor.init(bus.as_mut()) {
                Ok(()) => Some(sensor),
                Err(e) => {
                    log::error!("Color sensor init failed on channel {}: {}", CH_DOWN_COLOR, e);
                    None
                }
            }
        };

        let down_tof = {
            mux.select(bus.as_mut(), CH_DOWN_TOF);
            let mut sensor = Vl53l0x::new(CH_DOWN_TOF);
            match sensor.init(bus.as_mut()) {
                Ok(()) => Some(sensor),
                Err(e) => {
                    log::error!("TOF sensor init failed on channel {}: {}", CH_DOWN_TOF, e);
                    None
                }
            }
        };

        let front_tof = {
            mux.select(bus.as_mut(), CH_FRONT_TOF);
            let mut sensor = Vl53l0x::new(CH_FRONT_TOF);
            match sensor.init(bus.as_mut()) {
                Ok(()) => Some(sensor),
                Err(e) => {
                    log::error!("TOF sensor init failed on channel {}: {}", CH_FRONT_TOF, e);
                    None
                }
            }
        };

        Self {
            bus,
            mux,
            front_color,
            down_color,
            front_tof,
            down_tof,
        }
    }

    fn read_color(
        bus: &mut dyn I2cBus,
        mux: &BusMultiplexer,
        channel: u8,
        sensor: &mut Option<Tcs3472>,
    ) -> Option<RgbSample> {
        mux.select(bus, channel);
        let sensor = sensor.as_mut()?;
        match sensor.read_rgb(bus) {
            Ok(sample) => Some(sample),
            Err(e) => {
                log::warn!("Color read failed on channel {}: {}", channel, e);
                None
            }
        }
    }

    fn read_distance(
        bus: &mut dyn I2cBus,
        mux: &BusMultiplexer,
        channel: u8,
        sensor: &mut Option<Vl53l0x>,
    ) -> u32 {
        mux.select(bus, channel);
        let Some(sensor) = sensor.as_mut() else {
            return 0;
        };
        match sensor.read_mm(bus) {
            Ok(mm) => mm,
            Err(e) => {
                log::warn!("Distance read failed on channel {}: {}", channel, e);
                0
            }
        }
    }
}

impl SensorHub for MuxSensorHub {
    fn front_color(&mut self) -> Option<RgbSample> {
        Self::read_color(
            self.bus.as_mut(),
            &self.mux,
            CH_FRONT_COLOR,
            &mut self.front_color,
        )
    }

    fn down_color(&mut self) -> Option<RgbSample> {
        Self::read_color(
            self.bus.as_mut(),
            &self.mux,
            CH_DOWN_COLOR,
            &mut self.down_color,
        )
    }

    fn front_distance_mm(&mut self) -> u32 {
        Self::read_distance(
            self.bus.as_mut(),
            &self.mux,
            CH_FRONT_TOF,
            &mut self.front_tof,
        )
    }

    fn down_distance_mm(&mut self) -> u32 {
        Self::read_distance(
            self.bus.as_mut(),
            &self.mux,
            CH_DOWN_TOF,
            &mut self.down_tof,
        )
    }
}
