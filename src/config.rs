//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::led::Polarity;

// BLE

/// Complete local name placed in the advertising data and the GAP
/// device name characteristic.
pub const DEVICE_NAME: &str = "nRF52840_Dongle";

/// Advertising interval (in 0.625 ms units). 160 = 100 ms, the fast
/// connectable interval most centrals expect.
pub const ADV_INTERVAL: u32 = 160;

/// Number of simultaneous peripheral links configured in the SoftDevice.
pub const PERIPHERAL_LINK_COUNT: u8 = 1;

/// Connection event length (in 1.25 ms units).
pub const CONN_EVENT_LENGTH: u16 = 24;

/// Use the internal RC oscillator as the low-frequency clock source.
/// The Dongle's 32 kHz crystal is not guaranteed to be populated.
pub const LF_CLOCK_FROM_RC: bool = true;

// Blink

/// Period between LED toggles while a central is connected (ms).
pub const BLINK_PERIOD_MS: u64 = 1000;

/// Depth of the connection-event queue between the BLE loop and the
/// blink task.
pub const EVENT_QUEUE_DEPTH: usize = 4;

// GPIO pin assignments (nRF52840 Dongle, PCA10059)
//
//   LD1 (green)    → P0.06, active-low
//   LD2 red        → P0.08
//   LD2 green      → P1.09
//   LD2 blue       → P0.12

/// Electrical polarity of the status LED.
pub const LED_POLARITY: Polarity = Polarity::ActiveLow;
