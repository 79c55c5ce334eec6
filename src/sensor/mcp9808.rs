//! Microchip MCP9808 digital temperature sensor.
//!
//! Ambient temperature register (0x05), big-endian:
//! ```text
//! Byte 0: bit 7..5 alert flags (Tcrit, Tupper, Tlower)
//!         bit 4    sign
//!         bit 3..0 temperature bits 2^7..2^4
//! Byte 1: temperature bits 2^3..2^-4
//! ```
//! 13-bit two's complement, 0.0625 °C per LSB.

/// Configuration register.
pub const REG_CONFIG: u8 = 0x01;
/// Ambient temperature register.
pub const REG_AMBIENT_TEMP: u8 = 0x05;
/// Manufacturer ID register.
pub const REG_MANUFACTURER_ID: u8 = 0x06;
/// Device ID / revision register.
pub const REG_DEVICE_ID: u8 = 0x07;
/// Resolution register.
pub const REG_RESOLUTION: u8 = 0x08;

/// Expected manufacturer ID.
pub const MANUFACTURER_ID: u16 = 0x0054;
/// Expected device ID (upper byte of the device ID register).
pub const DEVICE_ID: u8 = 0x04;

/// Resolution register value for 0.0625 °C (power-up default).
pub const RESOLUTION_0_0625: u8 = 0x03;

/// Shutdown bit in the configuration register.
pub const CONFIG_SHUTDOWN: u16 = 1 << 8;

/// Decode the ambient temperature register into °C.
pub fn decode_ambient(raw: [u8; 2]) -> f32 {
    let value = u16::from_be_bytes(raw) & 0x1FFF;
    // Sign-extend 13 bits.
    let signed = ((value << 3) as i16) >> 3;
    signed as f32 * 0.0625
}

/// Check the identification registers.
pub fn is_mcp9808(manufacturer_id: [u8; 2], device_id: [u8; 2]) -> bool {
    u16::from_be_bytes(manufacturer_id) == MANUFACTURER_ID && device_id[0] == DEVICE_ID
}

#[cfg(feature = "embedded")]
pub use driver::Mcp9808;

#[cfg(feature = "embedded")]
mod driver {
    use super::*;
    use crate::error::Error;
    use embedded_hal_async::i2c::I2c;

    /// MCP9808 on an async I²C bus.
    pub struct Mcp9808<I2C> {
        i2c: I2C,
        address: u8,
    }

    impl<I2C: I2c> Mcp9808<I2C> {
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Verify the device identity, wake it and select 0.0625 °C resolution.
        pub async fn probe(&mut self) -> Result<(), Error> {
            let manufacturer = self.read_register(REG_MANUFACTURER_ID).await?;
            let device = self.read_register(REG_DEVICE_ID).await?;
            if !is_mcp9808(manufacturer, device) {
                warn!(
                    "unexpected sensor id {=u16:#x} / {=u8:#x}",
                    u16::from_be_bytes(manufacturer),
                    device[0]
                );
                return Err(Error::Sensor);
            }

            let config = u16::from_be_bytes(self.read_register(REG_CONFIG).await?);
            let config = (config & !CONFIG_SHUTDOWN).to_be_bytes();
            self.write(&[REG_CONFIG, config[0], config[1]]).await?;
            self.write(&[REG_RESOLUTION, RESOLUTION_0_0625]).await?;

            info!("MCP9808 found at {=u8:#x}", self.address);
            Ok(())
        }

        /// Read the ambient temperature (°C).
        pub async fn read_celsius(&mut self) -> Result<f64, Error> {
            let raw = self.read_register(REG_AMBIENT_TEMP).await?;
            Ok(f64::from(decode_ambient(raw)))
        }

        async fn read_register(&mut self, reg: u8) -> Result<[u8; 2], Error> {
            let mut buf = [0u8; 2];
            self.i2c
                .write_read(self.address, &[reg], &mut buf)
                .await
                .map_err(|_| Error::Sensor)?;
            Ok(buf)
        }

        async fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
            self.i2c
                .write(self.address, bytes)
                .await
                .map_err(|_| Error::Sensor)
        }
    }
}
