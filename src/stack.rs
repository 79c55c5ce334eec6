//! Boundary with the BLE stack, timer service and temperature sensor.
//!
//! The application never talks to the SoftDevice directly; the firmware
//! binary implements these traits on top of `nrf-softdevice` and
//! `embassy-time`, and tests implement them with recorders.

use crate::adv::AdvCommand;
use crate::error::StackError;

/// Source of the temperature reading (°C).
pub trait TemperatureSensor {
    fn read_celsius(&mut self) -> f64;
}

/// Handle of an armed one-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(pub u16);

/// One-shot timer service. The owner calls back into the beacon when the
/// timer expires.
pub trait TimerService {
    /// Schedule a single expiry `delay_ms` from now.
    fn arm(&mut self, delay_ms: u32) -> TimerHandle;
}

/// Non-connectable advertising control.
pub trait AdvertisingStack {
    /// Stack default initialisation: load the default payloads into the
    /// active command.
    fn init_defaults(&mut self);

    /// The command used by the next `start_nonconnectable`.
    fn active_command(&mut self) -> &mut AdvCommand;

    /// Start advertising with the active command.
    fn start_nonconnectable(&mut self) -> Result<(), StackError>;

    /// Replace the advertising payload on the fly. An empty
    /// `scan_rsp_data` leaves the scan response as it is.
    fn update_adv_data(&mut self, adv_data: &[u8], scan_rsp_data: &[u8])
        -> Result<(), StackError>;
}

/// Why non-connectable advertising ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvStopReason {
    /// Stopped on request; the active command may have changed.
    Canceled,
    /// Advertising duration or event count elapsed.
    Timeout,
    /// The stack refused or aborted advertising.
    Failed,
}
