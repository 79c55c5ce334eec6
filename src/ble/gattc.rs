//! Raw SoftDevice events → beacon messages.
//!
//! A GATT client that receives an indication must answer with
//! `sd_ble_gattc_hv_confirm`, otherwise the peer's ATT transaction times
//! out and the link drops.

use defmt::warn;
use nrf_softdevice::raw;
use temp_beacon::{dispatch, EventConfirm, MessageKind, MessageSink, StackError, StackMessage, TaskId};

/// Task id used for the application side of a message.
const APP_TASK: TaskId = TaskId(0);

/// Confirms indications through the SoftDevice.
pub struct HvConfirmSink;

impl MessageSink for HvConfirmSink {
    fn send_confirm(&mut self, cfm: EventConfirm) -> Result<(), StackError> {
        // dest is the connection that sent the indication.
        let ret = unsafe { raw::sd_ble_gattc_hv_confirm(cfm.dest.0, cfm.handle) };
        if ret != raw::NRF_SUCCESS {
            return Err(StackError::Raw(ret));
        }
        Ok(())
    }
}

/// Translate a raw SoftDevice event.
pub fn classify(evt: *const raw::ble_evt_t) -> Option<StackMessage> {
    // SAFETY: the SoftDevice hands us a valid event for the duration of the callback.
    let evt = unsafe { evt.as_ref()? };
    let id = evt.header.evt_id as u32;

    if id == raw::BLE_GATTC_EVTS_BLE_GATTC_EVT_HVX {
        // SAFETY: evt_id selects the gattc_evt / hvx union members.
        let (conn_handle, hvx) = unsafe {
            let gattc = &evt.evt.gattc_evt;
            (gattc.conn_handle, &gattc.params.hvx)
        };
        let kind = if hvx.type_ as u32 == raw::BLE_GATT_HVX_INDICATION {
            MessageKind::GattcEventInd { handle: hvx.handle }
        } else {
            MessageKind::Other(evt.header.evt_id)
        };
        return Some(StackMessage {
            kind,
            dest: APP_TASK,
            src: TaskId(conn_handle),
        });
    }

    Some(StackMessage {
        kind: MessageKind::Other(evt.header.evt_id),
        dest: APP_TASK,
        src: TaskId(raw::BLE_CONN_HANDLE_INVALID as u16),
    })
}

/// SoftDevice event callback.
pub fn on_ble_event(evt: *const raw::ble_evt_t) {
    let Some(msg) = classify(evt) else {
        return;
    };
    if let Err(e) = dispatch(&msg, &mut HvConfirmSink) {
        warn!("indication confirm failed: {}", e);
    }
}
