//! Timer-driven toggling of a single output line.

use embedded_hal::digital::{PinState, StatefulOutputPin};

use crate::config::TimerConfig;
use crate::timer::PeriodicTimer;

/// Sole owner of the blink pin and the counter that paces it.
///
/// The pin starts LOW and is inverted once per compare-match event, so after
/// `n` events it is HIGH exactly when `n` is odd.
pub struct Blinker<P, T> {
    pin: P,
    timer: T,
    events: u32,
}

impl<P, T> Blinker<P, T>
where
    P: StatefulOutputPin,
    T: PeriodicTimer,
{
    /// Drive the pin LOW, then arm the timer.
    ///
    /// The pin is put in a defined state before the counter runs, so the
    /// first event always sees LOW.
    pub fn start(mut pin: P, mut timer: T, config: &TimerConfig) -> Result<Self, P::Error> {
        pin.set_low()?;
        timer.arm(config);
        Ok(Self {
            pin,
            timer,
            events: 0,
        })
    }

    /// Service a compare-match interrupt.
    ///
    /// Toggles the pin only if the timer actually had an event pending and
    /// returns the new level; a spurious call leaves the pin alone.
    pub fn on_compare_match(&mut self) -> Result<Option<PinState>, P::Error> {
        if !self.timer.acknowledge() {
            return Ok(None);
        }
        self.toggle()?;
        self.events = self.events.wrapping_add(1);
        self.level().map(Some)
    }

    /// Invert the pin. Touches no other line of the port.
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.pin.toggle()
    }

    pub fn level(&mut self) -> Result<PinState, P::Error> {
        Ok(PinState::from(self.pin.is_set_high()?))
    }

    /// Compare-match events serviced since `start`.
    pub fn events(&self) -> u32 {
        self.events
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
