//! SoftDevice-backed advertising control.
//!
//! nrf-softdevice advertises for as long as the `advertise` future is
//! polled, so "update on the fly" means: keep the new payload in the
//! active command and let the beacon task restart advertising. The task
//! drops the running advertisement when the refresh timer fires and
//! reports it as canceled; the beacon's stop handler then restarts it
//! with the refreshed command.

use defmt::{debug, warn};
use nrf_softdevice::ble::peripheral;
use nrf_softdevice::Softdevice;
use temp_beacon::config::{
    ADV_DATA_LEN, ADV_INTERVAL, SCAN_RSP_DATA_LEN, USER_ADVERTISE_DATA,
    USER_ADVERTISE_SCAN_RESPONSE_DATA,
};
use temp_beacon::{AdvCommand, AdvStopReason, AdvertisingStack, StackError};

pub struct SoftdeviceAdvertiser {
    cmd: AdvCommand,
    requested: bool,
}

impl SoftdeviceAdvertiser {
    pub const fn new() -> Self {
        Self {
            cmd: AdvCommand::new(),
            requested: false,
        }
    }

    /// Whether the beacon asked for advertising to run.
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Advertise the active command until it ends on its own.
    ///
    /// Dropping the returned future stops advertising; the caller then
    /// owes the beacon an `AdvStopReason::Canceled`.
    pub async fn run(&self, sd: &Softdevice) -> AdvStopReason {
        let config = peripheral::Config {
            interval: ADV_INTERVAL,
            ..Default::default()
        };
        let adv = peripheral::NonconnectableAdvertisement::ScannableUndirected {
            adv_data: self.cmd.adv_data(),
            scan_data: self.cmd.scan_rsp_data(),
        };

        match peripheral::advertise(sd, adv, &config).await {
            Ok(()) => AdvStopReason::Timeout,
            Err(e) => {
                warn!("advertise failed: {:?}", e);
                AdvStopReason::Failed
            }
        }
    }

    /// Advertising is no longer running.
    pub fn stopped(&mut self) {
        self.requested = false;
    }
}

impl AdvertisingStack for SoftdeviceAdvertiser {
    fn init_defaults(&mut self) {
        if let Err(e) = self
            .cmd
            .seed(&USER_ADVERTISE_DATA, &USER_ADVERTISE_SCAN_RESPONSE_DATA)
        {
            warn!("default advertising data rejected: {}", e);
        }
    }

    fn active_command(&mut self) -> &mut AdvCommand {
        &mut self.cmd
    }

    fn start_nonconnectable(&mut self) -> Result<(), StackError> {
        debug!("advertising start requested ({} bytes)", self.cmd.adv_data().len());
        self.requested = true;
        Ok(())
    }

    fn update_adv_data(&mut self, adv_data: &[u8], scan_rsp_data: &[u8]) -> Result<(), StackError> {
        if adv_data.len() > ADV_DATA_LEN || scan_rsp_data.len() > SCAN_RSP_DATA_LEN {
            return Err(StackError::InvalidLength);
        }

        // An empty scan response keeps the current one.
        let mut scan = heapless::Vec::<u8, SCAN_RSP_DATA_LEN>::new();
        let current = if scan_rsp_data.is_empty() {
            self.cmd.scan_rsp_data()
        } else {
            scan_rsp_data
        };
        scan.extend_from_slice(current)
            .map_err(|_| StackError::InvalidLength)?;

        self.cmd
            .seed(adv_data, &scan)
            .map_err(|_| StackError::InvalidLength)
    }
}
