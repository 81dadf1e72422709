//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Bring-up** - enables the SoftDevice with a single peripheral link
//!    and sets the GAP device name.
//! 2. **Advertiser** - advertises connectable, waits for a central, holds
//!    the link until it drops, then advertises again.
//!
//! Connection outcomes are not acted on here. They are translated into
//! [`Event`]s and sent to the blink task over an Embassy channel.

use core::convert::Infallible;

use defmt::{debug, info};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use nrf_softdevice::ble::gatt_server::{self, WriteOp};
use nrf_softdevice::ble::peripheral::{self, AdvertiseError, ConnectableAdvertisement};
use nrf_softdevice::ble::Connection;
use nrf_softdevice::{raw, RawError, Softdevice};
use radio_blinky::adv_payload::AdvPayload;
use radio_blinky::blink::HCI_SUCCESS;
use radio_blinky::config::{self, EVENT_QUEUE_DEPTH};
use radio_blinky::{Error, Event};

/// HCI "Connection Limit Exceeded", reported when the SoftDevice has no
/// free link for an incoming connection.
const HCI_CONNECTION_LIMIT_EXCEEDED: u8 = 0x09;

/// HCI "Advertising Timeout".
const HCI_ADVERTISING_TIMEOUT: u8 = 0x3C;

/// The SoftDevice GATT runner ends on disconnect without the HCI reason,
/// so disconnects are reported with this placeholder.
const DISCONNECT_REASON_UNREPORTED: u8 = 0xFF;

fn softdevice_config() -> nrf_softdevice::Config {
    let clock = if config::LF_CLOCK_FROM_RC {
        raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }
    } else {
        raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }
    };

    nrf_softdevice::Config {
        clock: Some(clock),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: config::PERIPHERAL_LINK_COUNT,
            event_length: config::CONN_EVENT_LENGTH,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: config::PERIPHERAL_LINK_COUNT,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        ..Default::default()
    }
}

/// Enable the SoftDevice and set the GAP device name.
///
/// The returned handle must be handed to [`softdevice_task`] before any
/// BLE operation is awaited.
pub fn enable() -> Result<&'static Softdevice, Error> {
    let sd: &'static Softdevice = Softdevice::enable(&softdevice_config());
    set_device_name(config::DEVICE_NAME)?;
    Ok(sd)
}

fn set_device_name(name: &str) -> Result<(), Error> {
    // Zeroed security mode: peers may not write the name.
    let write_perm: raw::ble_gap_conn_sec_mode_t = unsafe { core::mem::zeroed() };
    let ret = unsafe {
        raw::sd_ble_gap_device_name_set(&write_perm, name.as_ptr(), name.len() as u16)
    };
    RawError::convert(ret).map_err(|e| Error::BleInit(e as u32))
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Attribute table with no services. Running it keeps the link serviced
/// (MTU exchange, connection parameter updates) until it closes.
struct NoServices;

impl gatt_server::Server for NoServices {
    type Event = ();

    fn on_write(
        &self,
        _conn: &Connection,
        _handle: u16,
        _op: WriteOp,
        _offset: usize,
        _data: &[u8],
    ) -> Option<Self::Event> {
        None
    }
}

/// Advertise and accept one central at a time, forever.
///
/// Only a raw SoftDevice error is fatal; every other advertising outcome
/// is reported as a failed connection and advertising resumes.
pub async fn advertise(
    sd: &'static Softdevice,
    payload: &AdvPayload,
    events: &Sender<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>,
) -> Result<Infallible, Error> {
    let adv_config = peripheral::Config {
        interval: config::ADV_INTERVAL,
        ..Default::default()
    };

    info!(
        "Advertising as {} ({} byte payload)",
        payload.local_name().unwrap_or("?"),
        payload.as_bytes().len()
    );

    loop {
        let adv = ConnectableAdvertisement::ScannableUndirected {
            adv_data: payload.as_bytes(),
            scan_data: &[],
        };

        match peripheral::advertise_connectable(sd, adv, &adv_config).await {
            Ok(conn) => {
                debug!("Link from {}", conn.peer_address());
                events.send(Event::Connected(HCI_SUCCESS)).await;

                // Returns once the central goes away.
                let _ = gatt_server::run(&conn, &NoServices, |()| {}).await;

                events
                    .send(Event::Disconnected(DISCONNECT_REASON_UNREPORTED))
                    .await;
            }
            Err(AdvertiseError::NoFreeConn) => {
                events
                    .send(Event::Connected(HCI_CONNECTION_LIMIT_EXCEEDED))
                    .await;
            }
            Err(AdvertiseError::Timeout) => {
                events.send(Event::Connected(HCI_ADVERTISING_TIMEOUT)).await;
            }
            Err(AdvertiseError::Raw(e)) => return Err(Error::AdvertisingStart(e as u32)),
        }
    }
}
