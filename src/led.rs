//! Status LED driven through `embedded-hal` digital output traits.
//!
//! Callers think in terms of "on" and "off"; the wrapper maps that onto
//! the physical pin level according to the board wiring. The nRF52840
//! Dongle sinks its LEDs, so "on" is a low pin there.

use embedded_hal::digital::{PinState, StatefulOutputPin};

/// How the LED is wired to its GPIO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// LED lights when the pin is driven high.
    ActiveHigh,
    /// LED lights when the pin is driven low.
    ActiveLow,
}

impl Polarity {
    /// Pin level that produces the requested LED state.
    pub const fn state(self, on: bool) -> PinState {
        match (self, on) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => PinState::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => PinState::Low,
        }
    }
}

/// A single LED on a stateful output pin.
pub struct StatusLed<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: StatefulOutputPin> StatusLed<P> {
    /// Wrap an already-configured output pin.
    ///
    /// The pin's current level is left untouched so bring-up code can
    /// choose the initial level when it creates the pin.
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Drive the LED on or off.
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        self.pin.set_state(self.polarity.state(on))
    }

    /// Invert the LED. Polarity does not matter for a read-modify-write toggle.
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.pin.toggle()
    }

    /// Whether the LED is currently lit, from the pin's output latch.
    pub fn is_on(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_set_high()?;
        Ok(PinState::from(high) == self.polarity.state(true))
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}
