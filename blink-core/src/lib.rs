//! Hardware-independent half of the timer blinker.
//!
//! The firmware binary supplies a concrete output pin and counter; this crate
//! owns the timing arithmetic and the toggle state machine so both can be
//! exercised on the host.

#![cfg_attr(not(test), no_std)]

pub mod blinker;
pub mod config;
pub mod timer;

pub use blinker::Blinker;
pub use config::{ConfigError, Period, TimerConfig};
pub use embedded_hal::digital::PinState;
pub use timer::PeriodicTimer;
