//! Advertising data buffers and the record slot.
//!
//! `AdvCommand` is the stack's active advertising command payload.
//! `StoredAdvData` is the copy we last pushed to the stack; the
//! manufacturer record sits inside it at a `RecordSlot` that is fixed
//! once the record has been composed.

use heapless::Vec;

use crate::config::{ADV_DATA_LEN, SCAN_RSP_DATA_LEN, USER_ADVERTISE_DATA};
use crate::error::Error;

/// Advertising and scan-response payload of the active advertising command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvCommand {
    adv_data: Vec<u8, ADV_DATA_LEN>,
    scan_rsp_data: Vec<u8, SCAN_RSP_DATA_LEN>,
}

impl AdvCommand {
    pub const fn new() -> Self {
        Self {
            adv_data: Vec::new(),
            scan_rsp_data: Vec::new(),
        }
    }

    /// Replace both payloads. Input longer than the capacity is rejected
    /// and leaves the command unchanged.
    pub fn seed(&mut self, adv_data: &[u8], scan_rsp_data: &[u8]) -> Result<(), Error> {
        check_fits(adv_data.len(), ADV_DATA_LEN)?;
        check_fits(scan_rsp_data.len(), SCAN_RSP_DATA_LEN)?;
        self.adv_data.clear();
        self.scan_rsp_data.clear();
        // Lengths were checked above.
        let _ = self.adv_data.extend_from_slice(adv_data);
        let _ = self.scan_rsp_data.extend_from_slice(scan_rsp_data);
        Ok(())
    }

    pub fn adv_data(&self) -> &[u8] {
        &self.adv_data
    }

    pub fn scan_rsp_data(&self) -> &[u8] {
        &self.scan_rsp_data
    }
}

/// Location of the manufacturer record inside `StoredAdvData`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecordSlot {
    offset: usize,
    len: usize,
}

impl RecordSlot {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Advertising payload last sent to the stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredAdvData {
    data: Vec<u8, ADV_DATA_LEN>,
}

impl StoredAdvData {
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Load the default advertising payload.
    pub fn seed_default(&mut self) {
        self.data.clear();
        // USER_ADVERTISE_DATA is shorter than ADV_DATA_LEN.
        let _ = self.data.extend_from_slice(&USER_ADVERTISE_DATA);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Overwrite the bytes covered by `slot` with `bytes`.
    ///
    /// `bytes` must be exactly `slot.len()` long and the slot must lie
    /// within the stored payload; nothing is written otherwise.
    pub fn patch(&mut self, slot: RecordSlot, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() != slot.len || slot.end() > self.data.len() {
            warn!(
                "patch rejected: {} bytes into slot {}+{} of {}",
                bytes.len(),
                slot.offset,
                slot.len,
                self.data.len()
            );
            return Err(Error::SlotOutOfBounds);
        }
        self.data[slot.offset..slot.end()].copy_from_slice(bytes);
        Ok(())
    }

    fn replace_with(&mut self, bytes: &[u8]) {
        self.data.clear();
        // Both buffers share ADV_DATA_LEN capacity.
        let _ = self.data.extend_from_slice(bytes);
    }
}

/// Append `record` to the active command and capture the result.
///
/// The record goes at the current end of the command's advertising data.
/// The updated payload is copied into `stored`, and the record's slot in
/// it is returned. Fails without touching either buffer if the record does
/// not fit.
pub fn compose(
    cmd: &mut AdvCommand,
    record: &[u8],
    stored: &mut StoredAdvData,
) -> Result<RecordSlot, Error> {
    debug!("compose: appending {} byte AD structure", record.len());

    let needed = cmd.adv_data.len() + record.len();
    check_fits(needed, ADV_DATA_LEN)?;
    let _ = cmd.adv_data.extend_from_slice(record);

    let total = cmd.adv_data.len();
    let slot = RecordSlot {
        offset: total - record.len(),
        len: record.len(),
    };

    stored.replace_with(&cmd.adv_data);
    Ok(slot)
}

fn check_fits(needed: usize, capacity: usize) -> Result<(), Error> {
    if needed > capacity {
        warn!("advertising data overflow: {} > {}", needed, capacity);
        return Err(Error::CapacityExceeded { needed, capacity });
    }
    Ok(())
}
