//! Timed connection scenarios for the blink controller.
//!
//! A simulated millisecond clock stands in for the embassy timer: the
//! harness fires `TimerFired` whenever the armed deadline is reached.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use radio_blinky::blink::HCI_SUCCESS;
use radio_blinky::config::{BLINK_PERIOD_MS, LED_POLARITY};
use radio_blinky::{BlinkController, BlinkState, Event, StatusLed, WorkScheduler};

/// Pin latch plus the simulated time of every toggle.
#[derive(Default)]
struct Wire {
    high: bool,
    now: u64,
    toggles: Vec<u64>,
}

struct FakePin(Rc<RefCell<Wire>>);

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().high = true;
        Ok(())
    }
}

impl StatefulOutputPin for FakePin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.borrow().high)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.borrow().high)
    }

    fn toggle(&mut self) -> Result<(), Infallible> {
        let mut wire = self.0.borrow_mut();
        let now = wire.now;
        wire.toggles.push(now);
        wire.high = !wire.high;
        Ok(())
    }
}

/// One-shot deadline on the simulated clock.
#[derive(Default)]
struct SimWork {
    now: u64,
    deadline: Option<u64>,
}

impl WorkScheduler for SimWork {
    fn reschedule(&mut self, delay_ms: u64) {
        self.deadline = Some(self.now + delay_ms);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

struct Device {
    controller: BlinkController,
    led: StatusLed<FakePin>,
    work: SimWork,
    wire: Rc<RefCell<Wire>>,
}

impl Device {
    /// Powered up with the LED configured off, as bring-up does.
    fn new() -> Self {
        let wire = Rc::new(RefCell::new(Wire {
            high: bool::from(LED_POLARITY.state(false)),
            ..Default::default()
        }));
        Self {
            controller: BlinkController::new(BLINK_PERIOD_MS),
            led: StatusLed::new(FakePin(Rc::clone(&wire)), LED_POLARITY),
            work: SimWork::default(),
            wire,
        }
    }

    fn send(&mut self, event: Event) {
        self.controller
            .handle(event, &mut self.led, &mut self.work)
            .unwrap();
        if !self.controller.is_connected() {
            assert!(!self.led_on(), "LED lit while disconnected");
        }
    }

    /// Run the clock forward to `t`, firing the work item at each deadline.
    fn advance_to(&mut self, t: u64) {
        while let Some(deadline) = self.work.deadline.filter(|&d| d <= t) {
            self.set_now(deadline);
            self.work.deadline = None;
            self.send(Event::TimerFired);
        }
        self.set_now(t);
    }

    fn set_now(&mut self, t: u64) {
        self.work.now = t;
        self.wire.borrow_mut().now = t;
    }

    fn toggle_times(&self) -> Vec<u64> {
        self.wire.borrow().toggles.clone()
    }

    fn led_on(&mut self) -> bool {
        self.led.is_on().unwrap()
    }
}

#[test]
fn connected_for_2500ms_toggles_twice() {
    let mut dev = Device::new();
    dev.send(Event::Connected(HCI_SUCCESS));
    dev.advance_to(2500);

    assert_eq!(dev.toggle_times(), vec![1000, 2000]);
    // Off → on → off.
    assert!(!dev.led_on());
    assert_eq!(dev.controller.state(), BlinkState::Blinking);
    assert_eq!(dev.work.deadline, Some(3000));
}

#[test]
fn disconnect_before_first_period_never_toggles() {
    let mut dev = Device::new();
    dev.send(Event::Connected(HCI_SUCCESS));
    dev.advance_to(500);
    dev.send(Event::Disconnected(0x13));
    dev.advance_to(5000);

    assert!(dev.toggle_times().is_empty());
    assert!(!dev.led_on());
    assert_eq!(dev.work.deadline, None);
}

#[test]
fn failed_connection_leaves_device_dark() {
    let mut dev = Device::new();
    dev.send(Event::Connected(0x3E));
    dev.advance_to(5000);

    assert!(!dev.controller.is_connected());
    assert!(dev.toggle_times().is_empty());
    assert!(!dev.led_on());
}

#[test]
fn disconnect_while_lit_forces_off() {
    let mut dev = Device::new();
    dev.send(Event::Connected(HCI_SUCCESS));
    dev.advance_to(1500);
    assert!(dev.led_on());

    dev.send(Event::Disconnected(0x08));
    assert!(!dev.led_on());

    dev.advance_to(10_000);
    assert_eq!(dev.toggle_times(), vec![1000]);
}

#[test]
fn stale_fire_after_disconnect_is_ignored() {
    let mut dev = Device::new();
    dev.send(Event::Connected(HCI_SUCCESS));
    dev.advance_to(1999);
    dev.send(Event::Disconnected(0x13));

    // A fire that was already in flight when the link dropped.
    dev.set_now(2000);
    dev.send(Event::TimerFired);

    assert_eq!(dev.toggle_times(), vec![1000]);
    assert!(!dev.led_on());
    assert_eq!(dev.work.deadline, None);
}

#[test]
fn one_toggle_per_period_across_sessions() {
    let mut dev = Device::new();

    dev.send(Event::Connected(HCI_SUCCESS));
    dev.advance_to(3200);
    dev.send(Event::Disconnected(0x13));
    dev.send(Event::Disconnected(0x13));
    dev.advance_to(4000);

    dev.send(Event::Connected(HCI_SUCCESS));
    dev.advance_to(6100);

    assert_eq!(dev.toggle_times(), vec![1000, 2000, 3000, 5000, 6000]);
    for pair in dev.toggle_times().windows(2) {
        assert!(pair[1] - pair[0] >= BLINK_PERIOD_MS);
    }
}
