//! STM32 Blue Pill Timer-Interrupt Blinky
//! This firmware toggles PC13 from the TIM3 update interrupt:
//! 1. TIM3 counts up at 8 MHz / 64 = 125 kHz
//! 2. The counter wraps at 62,500 ticks, i.e. every 500 ms
//! 3. Each wrap raises the TIM3 interrupt, which inverts PC13
//! 4. The main task does nothing after setup
//!
//! Hardware Connection:
//!   - No external connections needed - uses onboard LED at PC13
//!
//! Expected Behavior:
//!   - PC13 is LOW for the first 500 ms after reset, then toggles every 500 ms
//!     (one full LOW/HIGH cycle per second)
//!   - Each toggle is traced via defmt RTT

#![no_std]
#![no_main]

use blink_core::{Blinker, Period, PinState, TimerConfig};
use core::cell::RefCell;
use defmt::{info, trace, warn};
use embassy_executor::Spawner;
use embassy_stm32::{
    gpio::{Level, Output, Speed},
    interrupt,
    interrupt::InterruptExt,
    peripherals::TIM3,
};
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::Instant;
use timer_blinky::hardware::compare_timer::CompareTimer;
use {defmt_rtt as _, panic_probe as _};

/// Reset-default HSI; APB1 timers run from it undivided.
const INPUT_CLOCK_HZ: u32 = 8_000_000;
const DIVISION: u32 = 64;
/// Time between toggles. A full blink cycle is twice this.
const HALF_PERIOD: Period = Period::from_millis(500);

// Evaluated at compile time; an unrealisable pair fails the build.
const BLINK: TimerConfig = TimerConfig::validated(INPUT_CLOCK_HZ, HALF_PERIOD, DIVISION);

type Blink = Blinker<Output<'static>, CompareTimer<'static, TIM3>>;

// Filled once by `main` before TIM3 is unmasked, then only touched by the ISR.
static BLINKER: Mutex<CriticalSectionRawMutex, RefCell<Option<Blink>>> =
    Mutex::new(RefCell::new(None));

/// Main application entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // HSI 8 MHz, no PLL
    let p = embassy_stm32::init(Default::default());
    info!("timer blinky starting at {} ms", Instant::now().as_millis());

    let timer = CompareTimer::new(p.TIM3);
    let clock = timer.clock_frequency();
    if clock.0 != BLINK.input_hz() {
        warn!(
            "TIM3 clock is {} Hz but blink timing assumes {} Hz",
            clock.0,
            BLINK.input_hz()
        );
    }
    info!(
        "TIM3: {} Hz / {}, TOP {}, toggle every {} us",
        BLINK.input_hz(),
        BLINK.division(),
        BLINK.target_count(),
        HALF_PERIOD.as_micros()
    );

    // Push-pull output, LOW before the counter starts
    let led = Output::new(p.PC13, Level::Low, Speed::Low);

    let blinker = match Blinker::start(led, timer, &BLINK) {
        Ok(blinker) => blinker,
        Err(never) => match never {},
    };
    BLINKER.lock(|cell| *cell.borrow_mut() = Some(blinker));

    interrupt::TIM3.unpend();
    unsafe { interrupt::TIM3.enable() };

    // Everything else happens in TIM3; let the executor sleep.
    core::future::pending::<()>().await
}

/// TIM3 update interrupt: one compare-match event per half period.
#[interrupt]
fn TIM3() {
    BLINKER.lock(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(blinker) = slot.as_mut() else {
            return;
        };

        match blinker.on_compare_match() {
            Ok(Some(level)) => {
                let high = level == PinState::High;
                trace!("toggle #{}: PC13 high={}", blinker.events(), high);
            }
            Ok(None) => {}
            Err(never) => match never {},
        }
    });
}
