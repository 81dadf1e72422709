//! Unified error type for radio-blinky.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for efficient
//! on-target logging.

/// Fatal startup conditions. None of them is retried: `main` logs the
/// error and returns without entering the advertising loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // GPIO
    /// The LED pin did not read back its OFF level after configuration.
    LedNotReady,

    // BLE
    /// A GAP bring-up call was rejected by the SoftDevice (raw NRF error code).
    BleInit(u32),

    /// Advertising data does not fit in a 31-byte legacy advertising PDU.
    AdvDataOverflow,

    /// The SoftDevice refused to start connectable advertising (raw NRF error code).
    AdvertisingStart(u32),

    // Executor
    /// An embassy task pool was exhausted.
    TaskSpawn,
}
