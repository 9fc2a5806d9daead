use crate::config::TimerConfig;

/// A hardware counter that raises a recurring compare-match event.
///
/// Implementations count up from zero at `config.tick_hz()`, raise an event
/// when the counter reaches `config.target_count()` and restart at zero on
/// their own.
pub trait PeriodicTimer {
    /// Program the divider and TOP value, enable the event and start counting.
    fn arm(&mut self, config: &TimerConfig);

    /// Clear a pending compare-match event.
    ///
    /// Returns `true` if an event was pending.
    fn acknowledge(&mut self) -> bool;
}
