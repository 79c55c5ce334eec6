//! Host-testable core of temp-beacon.
//!
//! Everything here is `no_std`, allocation-free and independent of the
//! SoftDevice: the manufacturer-data encoder, the advertising buffer
//! composer, the refresh loop and the catch-all message handler. The
//! BLE stack, timer and sensor are reached through the traits in
//! [`stack`] and [`events`].
//!
//! Usage: `cargo test --lib` (host), `cargo test` for integration tests.
//!
//! Note: The embedded binary (`main.rs`, feature `embedded`) implements
//! the stack traits on top of nrf-softdevice and embassy-time.

#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod adv;
pub mod beacon;
pub mod config;
pub mod error;
pub mod events;
pub mod mnf_data;
pub mod sensor;
pub mod stack;

pub use adv::{compose, AdvCommand, RecordSlot, StoredAdvData};
pub use beacon::{RefreshState, TempBeacon};
pub use error::{Error, StackError};
pub use events::{dispatch, EventConfirm, MessageKind, MessageSink, StackMessage, TaskId};
pub use mnf_data::{ManufacturerData, MNF_RECORD_SIZE};
pub use stack::{AdvStopReason, AdvertisingStack, TemperatureSensor, TimerHandle, TimerService};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - cross-module scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ADV_DATA_LEN, USER_ADVERTISE_DATA, USER_ADVERTISE_DATA_LEN};

    // ════════════════════════════════════════════════════════════════════════
    // Encoder + Composer
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn encoded_record_lands_at_end_of_stored_payload() {
        let mut record = ManufacturerData::new();
        record.initialize();
        record.update(21.37);

        let mut cmd = AdvCommand::new();
        cmd.seed(&USER_ADVERTISE_DATA, &[]).unwrap();
        let mut stored = StoredAdvData::new();
        stored.seed_default();

        let slot = compose(&mut cmd, &record.as_bytes(), &mut stored).unwrap();

        let data = stored.as_slice();
        assert_eq!(data.len(), USER_ADVERTISE_DATA_LEN + MNF_RECORD_SIZE);
        assert_eq!(&data[data.len() - MNF_RECORD_SIZE..], &record.as_bytes());
        assert_eq!(slot.offset(), USER_ADVERTISE_DATA_LEN);
    }

    #[test]
    fn patched_record_keeps_surrounding_bytes() {
        let mut record = ManufacturerData::new();
        record.update(18.0);

        let mut cmd = AdvCommand::new();
        cmd.seed(&USER_ADVERTISE_DATA, &[]).unwrap();
        let mut stored = StoredAdvData::new();
        let slot = compose(&mut cmd, &record.as_bytes(), &mut stored).unwrap();
        let before = stored.clone();

        for temp in [-10.5, 0.0, 37.0625, 99.9] {
            record.update(temp);
            stored.patch(slot, &record.as_bytes()).unwrap();
            let data = stored.as_slice();
            assert_eq!(data.len(), before.len());
            assert_eq!(&data[..slot.offset()], &before.as_slice()[..slot.offset()]);
            assert_eq!(&data[slot.offset()..], &record.as_bytes());
        }
    }

    #[test]
    fn record_fits_default_payload() {
        assert!(USER_ADVERTISE_DATA_LEN + MNF_RECORD_SIZE <= ADV_DATA_LEN);
    }

    #[test]
    fn stored_record_parses_as_ad_structure() {
        let mut record = ManufacturerData::new();
        record.update(23.0);
        let mut cmd = AdvCommand::new();
        cmd.seed(&USER_ADVERTISE_DATA, &[]).unwrap();
        let mut stored = StoredAdvData::new();
        let slot = compose(&mut cmd, &record.as_bytes(), &mut stored).unwrap();

        // Walk the AD structures: flags, service list, manufacturer data.
        let data = stored.as_slice();
        let mut i = 0;
        let mut types = heapless::Vec::<u8, 4>::new();
        while i < data.len() && data[i] != 0 {
            types.push(data[i + 1]).unwrap();
            i += data[i] as usize + 1;
        }
        assert_eq!(types.as_slice(), &[0x01, 0x03, 0xFF]);

        let mnf = &data[slot.offset()..];
        assert_eq!(&mnf[4..4 + mnf[0] as usize - 3], b"23.0000");
    }
}
