//! Unified error type for temp-beacon.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Advertising data
    /// Appending the record would overrun the advertising buffer.
    CapacityExceeded { needed: usize, capacity: usize },

    /// A patch did not fit the record slot or the stored buffer.
    SlotOutOfBounds,

    /// The refresh timer fired before the record was composed.
    NoRecordSlot,

    // BLE
    /// The BLE stack rejected a request.
    Stack(StackError),

    // Sensor
    /// I²C transfer failed or the device did not identify as an MCP9808.
    Sensor,
}

/// Errors reported by the BLE stack boundary (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackError {
    /// Raw error code from the SoftDevice.
    Raw(u32),
    /// Payload longer than the stack accepts.
    InvalidLength,
    /// The stack cannot take the request right now.
    Busy,
}

// Convenience conversions

impl From<StackError> for Error {
    fn from(e: StackError) -> Self {
        Error::Stack(e)
    }
}
