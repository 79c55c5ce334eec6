//! temp-beacon firmware for nRF52840 + SoftDevice S140.
//!
//! Tasks:
//! - `softdevice_task` runs the SoftDevice and routes unhandled events
//!   to the beacon's catch-all dispatcher.
//! - `beacon_task` owns the beacon, samples the MCP9808 and keeps the
//!   manufacturer-specific advertising data fresh.

#![no_std]
#![no_main]

mod ble;
mod timer;

use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use nrf_softdevice::Softdevice;
use temp_beacon::config::MCP9808_I2C_ADDR;
use temp_beacon::sensor::mcp9808::Mcp9808;
use temp_beacon::sensor::CachedTemperature;
use temp_beacon::{AdvStopReason, TempBeacon};
use {defmt_rtt as _, panic_probe as _};

use crate::ble::advertiser::SoftdeviceAdvertiser;
use crate::timer::RefreshTimer;

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type Sensor = Mcp9808<Twim<'static, TWISPI0>>;

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run_with_callback(ble::gattc::on_ble_event).await
}

/// Refresh the cached reading; keep the previous one if the bus fails.
async fn sample(sensor: &mut Sensor, cache: &mut CachedTemperature) {
    match sensor.read_celsius().await {
        Ok(celsius) => cache.set(celsius),
        Err(e) => warn!("temperature read failed, keeping last sample: {}", e),
    }
}

#[embassy_executor::task]
async fn beacon_task(sd: &'static Softdevice, mut sensor: Sensor) {
    let mut advertiser = SoftdeviceAdvertiser::new();
    let mut timer = RefreshTimer::new();
    let mut beacon = TempBeacon::new(CachedTemperature::new());

    if let Err(e) = sensor.probe().await {
        error!("MCP9808 probe failed: {}", e);
    }
    sample(&mut sensor, beacon.sensor_mut()).await;

    beacon.on_application_init(&mut advertiser);
    if let Err(e) = beacon.on_advertising_start(&mut advertiser, &mut timer) {
        error!("advertising start failed: {}", e);
    }

    loop {
        let stop = if advertiser.is_requested() {
            let outcome = select(advertiser.run(sd), timer.expired()).await;
            match outcome {
                Either::First(reason) => {
                    advertiser.stopped();
                    Some(reason)
                }
                Either::Second(()) => {
                    // Advertisement dropped by the refresh; canceled after the update.
                    advertiser.stopped();
                    refresh(&mut beacon, &mut sensor, &mut advertiser, &mut timer).await;
                    Some(AdvStopReason::Canceled)
                }
            }
        } else {
            timer.expired().await;
            refresh(&mut beacon, &mut sensor, &mut advertiser, &mut timer).await;
            None
        };

        if let Some(reason) = stop {
            if let Err(e) = beacon.on_advertising_stopped(reason, &mut advertiser) {
                warn!("advertising restart failed: {}", e);
            }
        }
    }
}

async fn refresh(
    beacon: &mut TempBeacon<CachedTemperature>,
    sensor: &mut Sensor,
    advertiser: &mut SoftdeviceAdvertiser,
    timer: &mut RefreshTimer,
) {
    sample(sensor, beacon.sensor_mut()).await;
    if let Err(e) = beacon.on_refresh_timer(advertiser, timer) {
        warn!("advertising data refresh failed: {}", e);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("temp-beacon starting");

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    interrupt::SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0.set_priority(Priority::P3);
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let sensor = Mcp9808::new(i2c, MCP9808_I2C_ADDR);

    let sd: &'static Softdevice = ble::enable();
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(beacon_task(sd, sensor)));
}
