//! Library interface for radio-blinky.
//!
//! Everything that does not need the radio lives here so it can be
//! tested on the host (no embedded hardware required): the blink state
//! machine, the LED wrapper and the advertising data.
//!
//! Usage: `cargo test --lib --tests`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

pub mod adv_payload;
pub mod blink;
pub mod config;
pub mod error;
pub mod led;

pub use blink::{BlinkController, BlinkState, Event, WorkScheduler};
pub use error::Error;
pub use led::{Polarity, StatusLed};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
