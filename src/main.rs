//! radio-blinky firmware for the nRF52840 Dongle.
//!
//! Advertises as `nRF52840_Dongle`, accepts one central and blinks LD1
//! once per second while the link is up.
//!
//! Task layout:
//!   - `softdevice_task` - SoftDevice event pump
//!   - `blink_task`      - owns the LED and the blink controller
//!   - `main`            - bring-up, then the advertising loop

#![no_std]
#![no_main]

mod ble;

use core::convert::Infallible;

use defmt::{error, info, trace, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use radio_blinky::adv_payload::AdvPayload;
use radio_blinky::blink::HCI_SUCCESS;
use radio_blinky::config::{self, BLINK_PERIOD_MS, EVENT_QUEUE_DEPTH, LED_POLARITY};
use radio_blinky::{BlinkController, Error, Event, StatusLed, WorkScheduler};
use {defmt_rtt as _, panic_probe as _};

/// Connection events from the advertiser to the blink task.
static EVENTS: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH> = Channel::new();

/// The blink work item: a single optional deadline awaited by `blink_task`.
struct DelayedWork {
    deadline: Option<Instant>,
}

impl WorkScheduler for DelayedWork {
    fn reschedule(&mut self, delay_ms: u64) {
        self.deadline = Some(Instant::now() + Duration::from_millis(delay_ms));
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

fn log_event(event: Event) {
    match event {
        Event::Connected(HCI_SUCCESS) => info!("Connected"),
        Event::Connected(err) => warn!("Connection failed (err {=u8:#x})", err),
        Event::Disconnected(reason) => info!("Disconnected (reason {=u8:#x})", reason),
        Event::TimerFired => trace!("Blink"),
    }
}

#[embassy_executor::task]
async fn blink_task(mut led: StatusLed<Output<'static>>) -> ! {
    let mut controller = BlinkController::new(BLINK_PERIOD_MS);
    let mut work = DelayedWork { deadline: None };

    loop {
        let event = match work.deadline {
            Some(at) => match select(EVENTS.receive(), Timer::at(at)).await {
                Either::First(event) => event,
                Either::Second(()) => {
                    work.deadline = None;
                    Event::TimerFired
                }
            },
            None => EVENTS.receive().await,
        };

        log_event(event);
        // nRF GPIO outputs cannot fail.
        let _ = controller.handle(event, &mut led, &mut work);
    }
}

async fn run(spawner: Spawner) -> Result<Infallible, Error> {
    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);

    // LD1 on P0.06, configured off before anything can connect.
    let off = Level::from(bool::from(LED_POLARITY.state(false)));
    let mut led = StatusLed::new(Output::new(p.P0_06, off, OutputDrive::Standard), LED_POLARITY);
    if led.is_on().unwrap_or(true) {
        return Err(Error::LedNotReady);
    }

    let payload = AdvPayload::new(config::DEVICE_NAME)?;

    let sd = ble::enable()?;
    spawner
        .spawn(ble::softdevice_task(sd))
        .map_err(|_| Error::TaskSpawn)?;
    info!("Bluetooth initialized");

    spawner
        .spawn(blink_task(led))
        .map_err(|_| Error::TaskSpawn)?;

    ble::advertise(sd, &payload, &EVENTS.sender()).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting BLE advertising on nRF52840 Dongle");

    if let Err(e) = run(spawner).await {
        error!("Startup failed: {}", e);
    }
}
