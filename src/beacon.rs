//! Beacon application state and stack callbacks.
//!
//! `TempBeacon` owns the record, the stored advertising payload, the
//! record slot and the refresh timer state. The stack
//! collaborators are passed into each callback, so the caller decides
//! what "the stack" is.
//!
//! Refresh cycle:
//! ```text
//! Idle ──on_advertising_start──▶ Scheduled ──timer──▶ Fired
//!                                    ▲                  │
//!                                    └──── re-armed ────┘
//! ```

use crate::adv::{compose, RecordSlot, StoredAdvData};
use crate::config::ADV_DATA_UPDATE_INTERVAL_MS;
use crate::error::Error;
use crate::mnf_data::ManufacturerData;
use crate::stack::{AdvStopReason, AdvertisingStack, TemperatureSensor, TimerHandle, TimerService};

/// Refresh timer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshState {
    /// No timer armed.
    Idle,
    /// Timer armed, waiting for expiry.
    Scheduled(TimerHandle),
    /// Timer callback running.
    Fired,
}

/// Temperature beacon application.
pub struct TempBeacon<S> {
    sensor: S,
    record: ManufacturerData,
    stored: StoredAdvData,
    slot: Option<RecordSlot>,
    state: RefreshState,
}

impl<S: TemperatureSensor> TempBeacon<S> {
    pub const fn new(sensor: S) -> Self {
        Self {
            sensor,
            record: ManufacturerData::new(),
            stored: StoredAdvData::new(),
            slot: None,
            state: RefreshState::Idle,
        }
    }

    /// Application init: reset the record, seed the stored payload with
    /// the defaults and run the stack's default initialisation.
    pub fn on_application_init<A: AdvertisingStack>(&mut self, stack: &mut A) {
        debug!("on_application_init");
        self.record.initialize();
        info!("manufacturer data initialised");
        self.stored.seed_default();
        stack.init_defaults();
    }

    /// Advertising start: arm the first refresh, append a fresh record to
    /// the active command and start non-connectable advertising.
    pub fn on_advertising_start<A, T>(&mut self, stack: &mut A, timer: &mut T) -> Result<(), Error>
    where
        A: AdvertisingStack,
        T: TimerService,
    {
        debug!("on_advertising_start");
        self.arm(timer);

        let temperature = self.sensor.read_celsius();
        self.record.update(temperature);

        let slot = compose(stack.active_command(), &self.record.as_bytes(), &mut self.stored)?;
        debug!("record slot at offset {}", slot.offset());
        self.slot = Some(slot);

        stack.start_nonconnectable()?;
        Ok(())
    }

    /// Refresh timer expiry.
    ///
    /// The timer is re-armed even when patching or the stack update fails;
    /// the failure is returned so the caller can log it.
    pub fn on_refresh_timer<A, T>(&mut self, stack: &mut A, timer: &mut T) -> Result<(), Error>
    where
        A: AdvertisingStack,
        T: TimerService,
    {
        debug!("on_refresh_timer");
        self.state = RefreshState::Fired;

        let outcome = self.refresh(stack);
        self.arm(timer);
        outcome
    }

    /// Non-connectable advertising ended.
    ///
    /// A canceled advertisement is restarted with the active command.
    /// Other reasons are left alone. Returns whether a restart was issued.
    pub fn on_advertising_stopped<A: AdvertisingStack>(
        &mut self,
        reason: AdvStopReason,
        stack: &mut A,
    ) -> Result<bool, Error> {
        debug!("on_advertising_stopped: {}", reason);
        match reason {
            AdvStopReason::Canceled => {
                stack.start_nonconnectable()?;
                Ok(true)
            }
            AdvStopReason::Timeout | AdvStopReason::Failed => Ok(false),
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn record(&self) -> &ManufacturerData {
        &self.record
    }

    pub fn stored_adv_data(&self) -> &StoredAdvData {
        &self.stored
    }

    pub fn record_slot(&self) -> Option<RecordSlot> {
        self.slot
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    fn refresh<A: AdvertisingStack>(&mut self, stack: &mut A) -> Result<(), Error> {
        let temperature = self.sensor.read_celsius();
        self.record.update(temperature);

        let slot = self.slot.ok_or(Error::NoRecordSlot)?;
        self.stored.patch(slot, &self.record.as_bytes())?;

        stack.update_adv_data(self.stored.as_slice(), &[])?;
        Ok(())
    }

    fn arm<T: TimerService>(&mut self, timer: &mut T) {
        let handle = timer.arm(ADV_DATA_UPDATE_INTERVAL_MS);
        trace!("refresh timer armed: {}", handle);
        self.state = RefreshState::Scheduled(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adv::AdvCommand;
    use crate::config::{USER_ADVERTISE_DATA, USER_ADVERTISE_DATA_LEN};
    use crate::error::StackError;
    use crate::mnf_data::MNF_RECORD_SIZE;

    struct FixedSensor(f64);

    impl TemperatureSensor for FixedSensor {
        fn read_celsius(&mut self) -> f64 {
            self.0
        }
    }

    #[derive(Default)]
    struct CountingTimer {
        armed: u16,
        last_delay: u32,
    }

    impl TimerService for CountingTimer {
        fn arm(&mut self, delay_ms: u32) -> TimerHandle {
            self.armed += 1;
            self.last_delay = delay_ms;
            TimerHandle(self.armed)
        }
    }

    #[derive(Default)]
    struct FakeStack {
        cmd: AdvCommand,
        starts: usize,
        updates: usize,
        last_update: heapless::Vec<u8, 31>,
        reject_updates: bool,
        reject_starts: bool,
    }

    impl AdvertisingStack for FakeStack {
        fn init_defaults(&mut self) {
            self.cmd.seed(&USER_ADVERTISE_DATA, &[]).unwrap();
        }

        fn active_command(&mut self) -> &mut AdvCommand {
            &mut self.cmd
        }

        fn start_nonconnectable(&mut self) -> Result<(), StackError> {
            if self.reject_starts {
                return Err(StackError::Busy);
            }
            self.starts += 1;
            Ok(())
        }

        fn update_adv_data(&mut self, adv_data: &[u8], _scan: &[u8]) -> Result<(), StackError> {
            if self.reject_updates {
                return Err(StackError::Raw(0x12));
            }
            self.updates += 1;
            self.last_update.clear();
            self.last_update.extend_from_slice(adv_data).unwrap();
            Ok(())
        }
    }

    fn started(temp: f64) -> (TempBeacon<FixedSensor>, FakeStack, CountingTimer) {
        let mut beacon = TempBeacon::new(FixedSensor(temp));
        let mut stack = FakeStack::default();
        let mut timer = CountingTimer::default();
        beacon.on_application_init(&mut stack);
        beacon.on_advertising_start(&mut stack, &mut timer).unwrap();
        (beacon, stack, timer)
    }

    #[test]
    fn init_seeds_stored_payload() {
        let mut beacon = TempBeacon::new(FixedSensor(0.0));
        let mut stack = FakeStack::default();
        beacon.on_application_init(&mut stack);

        assert_eq!(beacon.stored_adv_data().as_slice(), &USER_ADVERTISE_DATA);
        assert_eq!(stack.cmd.adv_data(), &USER_ADVERTISE_DATA);
        assert_eq!(beacon.state(), RefreshState::Idle);
        assert_eq!(beacon.record_slot(), None);
    }

    #[test]
    fn start_arms_timer_composes_and_advertises() {
        let (beacon, stack, timer) = started(21.37);

        assert_eq!(timer.armed, 1);
        assert_eq!(timer.last_delay, ADV_DATA_UPDATE_INTERVAL_MS);
        assert_eq!(beacon.state(), RefreshState::Scheduled(TimerHandle(1)));
        assert_eq!(stack.starts, 1);
        assert_eq!(stack.updates, 0);

        let stored = beacon.stored_adv_data().as_slice();
        assert_eq!(stored.len(), USER_ADVERTISE_DATA_LEN + MNF_RECORD_SIZE);
        assert_eq!(&stored[USER_ADVERTISE_DATA_LEN..], &beacon.record().as_bytes());
        assert_eq!(beacon.record().payload(), b"21.3700");
    }

    #[test]
    fn refresh_patches_pushes_and_rearms() {
        let (mut beacon, mut stack, mut timer) = started(21.0);
        beacon.sensor_mut().0 = 22.5;

        beacon.on_refresh_timer(&mut stack, &mut timer).unwrap();

        assert_eq!(stack.updates, 1);
        assert_eq!(stack.last_update.as_slice(), beacon.stored_adv_data().as_slice());
        assert_eq!(beacon.record().payload(), b"22.5000");
        assert_eq!(timer.armed, 2);
        assert_eq!(beacon.state(), RefreshState::Scheduled(TimerHandle(2)));
        // Patching does not grow the payload.
        assert_eq!(
            beacon.stored_adv_data().len(),
            USER_ADVERTISE_DATA_LEN + MNF_RECORD_SIZE
        );
    }

    #[test]
    fn refresh_leaves_bytes_outside_record_alone() {
        let (mut beacon, mut stack, mut timer) = started(21.0);
        beacon.sensor_mut().0 = -3.25;
        beacon.on_refresh_timer(&mut stack, &mut timer).unwrap();

        let stored = beacon.stored_adv_data().as_slice();
        assert_eq!(&stored[..USER_ADVERTISE_DATA_LEN], &USER_ADVERTISE_DATA);
    }

    #[test]
    fn refresh_with_same_temperature_is_idempotent() {
        let (mut beacon, mut stack, mut timer) = started(19.125);

        beacon.on_refresh_timer(&mut stack, &mut timer).unwrap();
        let first = beacon.stored_adv_data().clone();
        beacon.on_refresh_timer(&mut stack, &mut timer).unwrap();

        assert_eq!(beacon.stored_adv_data(), &first);
    }

    #[test]
    fn rejected_update_is_reported_and_timer_still_rearmed() {
        let (mut beacon, mut stack, mut timer) = started(20.0);
        stack.reject_updates = true;

        let res = beacon.on_refresh_timer(&mut stack, &mut timer);

        assert_eq!(res, Err(Error::Stack(StackError::Raw(0x12))));
        assert_eq!(timer.armed, 2);
        assert_eq!(beacon.state(), RefreshState::Scheduled(TimerHandle(2)));
    }

    #[test]
    fn refresh_before_start_reports_missing_slot() {
        let mut beacon = TempBeacon::new(FixedSensor(20.0));
        let mut stack = FakeStack::default();
        let mut timer = CountingTimer::default();
        beacon.on_application_init(&mut stack);

        let res = beacon.on_refresh_timer(&mut stack, &mut timer);

        assert_eq!(res, Err(Error::NoRecordSlot));
        assert_eq!(stack.updates, 0);
        assert_eq!(timer.armed, 1);
    }

    #[test]
    fn canceled_stop_restarts_once() {
        let (mut beacon, mut stack, _) = started(20.0);
        let before = stack.starts;

        let restarted = beacon.on_advertising_stopped(AdvStopReason::Canceled, &mut stack);

        assert_eq!(restarted, Ok(true));
        assert_eq!(stack.starts, before + 1);
    }

    #[test]
    fn other_stop_reasons_are_ignored() {
        let (mut beacon, mut stack, _) = started(20.0);
        let before = stack.starts;

        for reason in [AdvStopReason::Timeout, AdvStopReason::Failed] {
            assert_eq!(beacon.on_advertising_stopped(reason, &mut stack), Ok(false));
        }
        assert_eq!(stack.starts, before);
    }

    #[test]
    fn start_fails_cleanly_when_command_is_full() {
        let mut beacon = TempBeacon::new(FixedSensor(20.0));
        let mut stack = FakeStack::default();
        let mut timer = CountingTimer::default();
        beacon.on_application_init(&mut stack);
        stack.cmd.seed(&[0u8; 25], &[]).unwrap();

        let res = beacon.on_advertising_start(&mut stack, &mut timer);

        assert!(matches!(res, Err(Error::CapacityExceeded { .. })));
        assert_eq!(stack.starts, 0);
        assert_eq!(beacon.record_slot(), None);
    }

    #[test]
    fn start_failure_is_returned_after_slot_is_recorded() {
        let mut beacon = TempBeacon::new(FixedSensor(20.0));
        let mut stack = FakeStack::default();
        let mut timer = CountingTimer::default();
        beacon.on_application_init(&mut stack);
        stack.reject_starts = true;

        let res = beacon.on_advertising_start(&mut stack, &mut timer);

        assert_eq!(res, Err(Error::Stack(StackError::Busy)));
        assert_eq!(stack.starts, 0);
        assert!(beacon.record_slot().is_some());
        assert_eq!(beacon.state(), RefreshState::Scheduled(TimerHandle(1)));
    }

    #[test]
    fn failed_restart_after_cancel_is_returned() {
        let (mut beacon, mut stack, _) = started(20.0);
        stack.reject_starts = true;

        let res = beacon.on_advertising_stopped(AdvStopReason::Canceled, &mut stack);

        assert_eq!(res, Err(Error::Stack(StackError::Busy)));
        assert_eq!(stack.starts, 1);
    }
}
