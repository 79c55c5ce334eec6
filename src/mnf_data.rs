//! Manufacturer-specific data AD structure carrying the temperature.
//!
//! Layout (`MNF_RECORD_SIZE` = 12 bytes):
//! ```text
//! Byte 0:     AD structure size (type + company id + formatted text)
//! Byte 1:     AD type 0xFF (manufacturer specific data)
//! Byte 2-3:   Company identifier (little-endian)
//! Byte 4-11:  ASCII temperature "<int>.<4-digit fraction>", zero padded
//! ```
//!
//! The record is always written at its full size; only `structure_size`
//! shrinks with the text, so bytes past the structure read as zeros.

use core::fmt::Write;

use heapless::String;

use crate::config::{MSD_COMPANY_ID, MSD_COMPANY_ID_LEN, MSD_DATA_LEN};

/// AD type for manufacturer specific data.
pub const AD_TYPE_MANUFACTURER_SPECIFIC: u8 = 0xFF;

/// Serialized record size in bytes.
pub const MNF_RECORD_SIZE: usize = 2 + MSD_COMPANY_ID_LEN + MSD_DATA_LEN;

/// Header bytes counted by `structure_size` besides the text (type + company id).
pub const MNF_HEADER_LEN: usize = 1 + MSD_COMPANY_ID_LEN;

/// Worst case for `i32.i32` text, e.g. `-2147483648.-2147483648`.
const FORMAT_SCRATCH_LEN: usize = 24;

/// Manufacturer-specific advertising record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManufacturerData {
    /// Length of the AD structure, excluding this byte.
    pub structure_size: u8,
    /// Always `AD_TYPE_MANUFACTURER_SPECIFIC`.
    pub structure_type: u8,
    /// Company identifier, little-endian.
    pub company_id: [u8; MSD_COMPANY_ID_LEN],
    /// Formatted temperature text, zero padded.
    pub proprietary_data: [u8; MSD_DATA_LEN],
}

impl Default for ManufacturerData {
    fn default() -> Self {
        Self::new()
    }
}

impl ManufacturerData {
    /// Create a record with header fields set and an empty payload.
    pub const fn new() -> Self {
        let id = MSD_COMPANY_ID.to_le_bytes();
        Self {
            structure_size: (MNF_RECORD_SIZE - 1) as u8,
            structure_type: AD_TYPE_MANUFACTURER_SPECIFIC,
            company_id: [id[0], id[1]],
            proprietary_data: [0; MSD_DATA_LEN],
        }
    }

    /// Reset header fields and zero the payload.
    pub fn initialize(&mut self) {
        debug!("mnf_data: initialize");
        *self = Self::new();
    }

    /// Encode `temperature` (°C) into the payload.
    ///
    /// Both parts are truncated toward zero, so a negative reading with a
    /// fractional part carries the sign twice (`-5.5` → `"-5.-5000"`).
    /// Text longer than `MSD_DATA_LEN` is cut. Returns the text length.
    pub fn update(&mut self, temperature: f64) -> usize {
        let (int_part, fraction) = split_temperature(temperature);

        let mut text: String<FORMAT_SCRATCH_LEN> = String::new();
        let formatted = write!(text, "{}.{:04}", int_part, fraction).is_ok();
        debug_assert!(formatted, "scratch fits any i32 pair");

        let bytes = text.as_bytes();
        let len = bytes.len().min(MSD_DATA_LEN);
        self.proprietary_data = [0; MSD_DATA_LEN];
        self.proprietary_data[..len].copy_from_slice(&bytes[..len]);
        self.structure_size = (MNF_RECORD_SIZE - 1 - (MSD_DATA_LEN - len)) as u8;

        info!("Temperature: {}.{} C", int_part, fraction);
        len
    }

    /// Formatted temperature text, without padding.
    pub fn payload(&self) -> &[u8] {
        let len = (self.structure_size as usize)
            .saturating_sub(MNF_HEADER_LEN)
            .min(MSD_DATA_LEN);
        &self.proprietary_data[..len]
    }

    /// Serialize the full fixed-size record.
    pub fn as_bytes(&self) -> [u8; MNF_RECORD_SIZE] {
        let mut out = [0u8; MNF_RECORD_SIZE];
        out[0] = self.structure_size;
        out[1] = self.structure_type;
        out[2..2 + MSD_COMPANY_ID_LEN].copy_from_slice(&self.company_id);
        out[2 + MSD_COMPANY_ID_LEN..].copy_from_slice(&self.proprietary_data);
        out
    }
}

/// Split into integer part and 4-digit fraction, both truncated toward zero.
pub fn split_temperature(temperature: f64) -> (i32, i32) {
    let int_part = temperature as i32;
    let fraction = ((temperature - int_part as f64) * 10_000.0) as i32;
    (int_part, fraction)
}
