//! Application-wide constants and compile-time configuration.
//!
//! Advertising layout, refresh timing, and sensor wiring live here
//! so they can be tuned in one place.

// BLE advertising

/// Maximum legacy advertising payload (bytes).
pub const ADV_DATA_LEN: usize = 31;

/// Maximum legacy scan-response payload (bytes).
pub const SCAN_RSP_DATA_LEN: usize = 31;

/// Advertising interval (in 0.625 ms units). 1600 = 1 s.
pub const ADV_INTERVAL: u32 = 1600;

/// Delay between two advertising data refreshes (ms).
pub const ADV_DATA_UPDATE_INTERVAL_MS: u32 = 10_000;

/// Default advertising payload, present before the manufacturer record
/// is appended.
///
/// Flags (BR/EDR not supported) followed by the complete list
/// of 16-bit service UUIDs: Environmental Sensing (0x181A).
#[rustfmt::skip]
pub const USER_ADVERTISE_DATA: [u8; 7] = [
    0x02, 0x01, 0x04,
    0x03, 0x03, 0x1A, 0x18,
];

pub const USER_ADVERTISE_DATA_LEN: usize = USER_ADVERTISE_DATA.len();

/// Default scan-response payload: complete local name.
#[rustfmt::skip]
pub const USER_ADVERTISE_SCAN_RESPONSE_DATA: [u8; 12] = [
    0x0B, 0x09, b'T', b'e', b'm', b'p', b'B', b'e', b'a', b'c', b'o', b'n',
];

// Manufacturer-specific data

/// Bluetooth SIG company identifier carried in the record.
/// 0xFFFF is reserved for internal use and testing.
pub const MSD_COMPANY_ID: u16 = 0xFFFF;

/// Length of the company identifier field (bytes).
pub const MSD_COMPANY_ID_LEN: usize = 2;

/// Capacity of the record's proprietary data field (bytes).
/// Holds the formatted temperature string, e.g. `"23.0625"`.
pub const MSD_DATA_LEN: usize = 8;

// MCP9808 temperature sensor

/// 7-bit I²C address with A2..A0 tied low.
pub const MCP9808_I2C_ADDR: u8 = 0x18;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
