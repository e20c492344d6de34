//! Channel multiplexer control

use super::I2cBus;
use std::thread;
use std::time::Duration;

/// Selects which sensor is addressable on the shared bus
///
/// The mux exposes one control register; writing the bit mask `1 << channel`
/// routes that channel through. A fixed settle delay after the write lets the
/// bus stabilize before the next sensor transaction.
pub struct BusMultiplexer {
    addr: u8,
    settle: Duration,
}

impl BusMultiplexer {
    /// Create a mux handle at the given bus address
    pub fn new(addr: u8, settle: Duration) -> Self {
        Self { addr, settle }
    }

    /// Route `channel` through the mux
    ///
    /// A failed control write is logged but does not abort the cycle; the
    /// following sensor read simply runs on whatever channel was selected
    /// last.
    pub fn select(&self, bus: &mut dyn I2cBus, channel: u8) {
        let mask = 1u8 << channel;
        if let Err(e) = bus.write(self.addr, &[mask]) {
            log::warn!("Mux select failed on channel {}: {}", channel, e);
        }
        thread::sleep(self.settle);
    }
}
