//! Temperature source for the beacon.
//!
//! The refresh loop reads the sensor synchronously from inside a timer
//! callback, while the MCP9808 sits behind an async I²C bus. The firmware
//! samples the device first and hands the value over through
//! `CachedTemperature`.

pub mod mcp9808;

use crate::stack::TemperatureSensor;

/// Last good temperature sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CachedTemperature {
    celsius: f64,
    valid: bool,
}

impl CachedTemperature {
    pub const fn new() -> Self {
        Self {
            celsius: 0.0,
            valid: false,
        }
    }

    /// Record a fresh sample.
    pub fn set(&mut self, celsius: f64) {
        self.celsius = celsius;
        self.valid = true;
    }

    /// Whether at least one sample has been recorded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl TemperatureSensor for CachedTemperature {
    fn read_celsius(&mut self) -> f64 {
        if !self.valid {
            warn!("no temperature sample yet, reporting 0");
        }
        self.celsius
    }
}
