use blink_core::{PeriodicTimer, TimerConfig};
use embassy_stm32::Peripheral;
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::CoreInstance;
use embassy_stm32::timer::low_level::Timer;

/// General-purpose timer running in auto-reload mode.
///
/// The counter runs `0..=ARR` at `clock / (PSC + 1)` and raises the update
/// interrupt each time it wraps, which is the compare-match event the
/// blinker listens for.
pub struct CompareTimer<'d, T: CoreInstance> {
    timer: Timer<'d, T>,
}

impl<'d, T: CoreInstance> CompareTimer<'d, T> {
    /// Take ownership of the timer and enable its peripheral clock.
    pub fn new(tim: impl Peripheral<P = T> + 'd) -> Self {
        Self {
            timer: Timer::new(tim),
        }
    }

    /// Clock feeding the prescaler, as configured by the RCC.
    pub fn clock_frequency(&self) -> Hertz {
        self.timer.get_clock_frequency()
    }
}

impl<'d, T: CoreInstance> PeriodicTimer for CompareTimer<'d, T> {
    fn arm(&mut self, config: &TimerConfig) {
        self.timer.stop();

        let regs = self.timer.regs_core();
        regs.psc().write_value(config.prescaler_register());
        regs.arr().write(|r| r.set_arr(config.reload_register()));

        // PSC is buffered; UG latches it and zeroes the counter.
        regs.egr().write(|r| r.set_ug(true));
        // UG also sets UIF, which would fire immediately.
        self.timer.clear_update_interrupt();

        self.timer.enable_update_interrupt(true);
        self.timer.start();
    }

    fn acknowledge(&mut self) -> bool {
        self.timer.clear_update_interrupt()
    }
}
