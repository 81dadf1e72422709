//! Connection-driven blink controller.
//!
//! A single [`BlinkController`] owns the connection flag and reacts to
//! three kinds of [`Event`]:
//!
//! - **Connected** - on success, mark the link up and arm the blink work
//!   item for one period from now. A failed attempt changes nothing.
//! - **Disconnected** - mark the link down, cancel pending work and force
//!   the LED off. Safe to repeat.
//! - **TimerFired** - while connected, toggle the LED and re-arm for the
//!   next period. Otherwise go dormant until the next connection.
//!
//! The controller never touches hardware timers directly; it asks a
//! [`WorkScheduler`] to (re)arm or cancel its one deferred work item. On
//! target that is a deadline polled by the blink task, in tests it is a
//! simulated clock.

use crate::led::StatusLed;
use embedded_hal::digital::StatefulOutputPin;

/// HCI status code reported for a successful connection.
pub const HCI_SUCCESS: u8 = 0x00;

/// Inputs to the blink state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Outcome of a connection attempt (HCI status, `0x00` = success).
    Connected(u8),
    /// Link closed (HCI reason, not interpreted).
    Disconnected(u8),
    /// The blink work item's deadline elapsed.
    TimerFired,
}

impl Event {
    /// `true` for a successful `Connected` outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Event::Connected(HCI_SUCCESS))
    }
}

/// Observable state of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// No link. Work item disarmed, LED off.
    Idle,
    /// Link up. Work item armed and re-arming every period.
    Blinking,
}

/// The one schedulable work item owned by the controller.
pub trait WorkScheduler {
    /// Arm the work item to fire once after `delay_ms`, replacing any
    /// pending deadline.
    fn reschedule(&mut self, delay_ms: u64);

    /// Disarm the work item. No-op when nothing is pending.
    fn cancel(&mut self);
}

/// Connection state plus the blink period.
#[derive(Debug)]
pub struct BlinkController {
    is_connected: bool,
    period_ms: u64,
}

impl BlinkController {
    pub const fn new(period_ms: u64) -> Self {
        Self {
            is_connected: false,
            period_ms,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn state(&self) -> BlinkState {
        if self.is_connected {
            BlinkState::Blinking
        } else {
            BlinkState::Idle
        }
    }

    /// Apply one event. Only GPIO failures are reported; every event is
    /// otherwise accepted in every state.
    pub fn handle<P, W>(
        &mut self,
        event: Event,
        led: &mut StatusLed<P>,
        work: &mut W,
    ) -> Result<(), P::Error>
    where
        P: StatefulOutputPin,
        W: WorkScheduler,
    {
        match event {
            Event::Connected(HCI_SUCCESS) => {
                self.is_connected = true;
                work.reschedule(self.period_ms);
            }
            // Failed attempt: the stack keeps advertising, nothing to undo.
            Event::Connected(_) => {}
            Event::Disconnected(_) => {
                self.is_connected = false;
                // Cancelling here means a fire already queued for this link
                // can never toggle after the LED was forced off.
                work.cancel();
                led.set(false)?;
            }
            Event::TimerFired => {
                // A fire that slipped past `cancel` still finds the flag down
                // and leaves the work item dormant.
                if self.is_connected {
                    led.toggle()?;
                    work.reschedule(self.period_ms);
                }
            }
        }
        Ok(())
    }
}

impl Default for BlinkController {
    fn default() -> Self {
        Self::new(crate::config::BLINK_PERIOD_MS)
    }
}
