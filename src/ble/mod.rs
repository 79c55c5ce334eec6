//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Broadcaster** role:
//!
//! 1. **Advertiser** - holds the active advertising command and
//!    implements the beacon's `AdvertisingStack` on top of
//!    `nrf_softdevice::ble::peripheral::advertise`.
//! 2. **GATT client events** - maps raw SoftDevice events onto the
//!    beacon's catch-all dispatcher and confirms indications.

pub mod advertiser;
pub mod gattc;

use core::mem;

use nrf_softdevice::{raw, Softdevice};

/// GAP device name, also used in the default scan response.
const DEVICE_NAME: &[u8] = b"TempBeacon";

/// SoftDevice configuration for a single non-connectable advertising set.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Enable the SoftDevice. Must be called once, before any BLE use.
pub fn enable() -> &'static mut Softdevice {
    Softdevice::enable(&softdevice_config())
}
