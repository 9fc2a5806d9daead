//! Timer configuration derived from a fixed input clock.
//!
//! target_count = input_hz * period / division
//!
//! Everything here is `const fn` so a firmware can evaluate its
//! configuration in a `const` item and have a bad period/division pair
//! rejected by the compiler instead of producing a wrong blink rate.

/// Widest target count the 16-bit counter can hold.
pub const COUNTER_MAX: u32 = u16::MAX as u32 + 1;

const MICROS_PER_SECOND: u64 = 1_000_000;
const NANOS_PER_MICRO: u64 = 1_000;

/// An exact span of time, stored in microseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Period {
    micros: u32,
}

impl Period {
    pub const fn from_micros(micros: u32) -> Self {
        Self { micros }
    }

    /// # Panics
    /// If `millis` exceeds `u32::MAX / 1000` (about 71 minutes). In a
    /// `const` item this is a build error.
    pub const fn from_millis(millis: u32) -> Self {
        match millis.checked_mul(1_000) {
            Some(micros) => Self { micros },
            None => panic!("period in milliseconds overflows the microsecond range"),
        }
    }

    pub const fn as_micros(&self) -> u32 {
        self.micros
    }
}

/// Reasons a period/division pair cannot be realised by the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The input clock frequency is zero.
    ZeroClock,
    /// The requested period is zero.
    ZeroPeriod,
    /// The division factor is zero.
    ZeroDivision,
    /// The division factor does not fit in the prescaler.
    PrescalerOverflow { division: u32 },
    /// `input_hz * period` is not a whole multiple of the division factor.
    Inexact,
    /// The target count does not fit in the counter.
    CounterOverflow { target: u64 },
}

/// Immutable timer parameters: tick source, divider and TOP value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    input_hz: u32,
    division: u32,
    target_count: u32,
}

impl TimerConfig {
    /// Derive the target count for one event every `period`.
    ///
    /// # Arguments
    /// - `input_hz`: frequency of the clock feeding the prescaler
    /// - `period`: desired time between compare-match events
    /// - `division`: prescale factor applied to `input_hz`
    ///
    /// # Returns
    /// - `Ok(TimerConfig)` if the period is an exact number of divided ticks
    ///   and that number fits in the counter
    /// - `Err(ConfigError)` otherwise
    pub const fn new(input_hz: u32, period: Period, division: u32) -> Result<Self, ConfigError> {
        if input_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if period.micros == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if division == 0 {
            return Err(ConfigError::ZeroDivision);
        }
        if division > COUNTER_MAX {
            return Err(ConfigError::PrescalerOverflow { division });
        }

        let numerator = input_hz as u64 * period.micros as u64;
        let denominator = MICROS_PER_SECOND * division as u64;
        if numerator % denominator != 0 {
            return Err(ConfigError::Inexact);
        }

        let target = numerator / denominator;
        if target > COUNTER_MAX as u64 {
            return Err(ConfigError::CounterOverflow { target });
        }

        Ok(Self {
            input_hz,
            division,
            target_count: target as u32,
        })
    }

    /// Like [`TimerConfig::new`], but panics on an invalid pair.
    ///
    /// Used from a `const` item this turns a bad configuration into a
    /// compile error.
    pub const fn validated(input_hz: u32, period: Period, division: u32) -> Self {
        match Self::new(input_hz, period, division) {
            Ok(config) => config,
            Err(ConfigError::ZeroClock) => panic!("timer input clock must be non-zero"),
            Err(ConfigError::ZeroPeriod) => panic!("timer period must be non-zero"),
            Err(ConfigError::ZeroDivision) => panic!("timer division factor must be non-zero"),
            Err(ConfigError::PrescalerOverflow { .. }) => {
                panic!("timer division factor does not fit the 16-bit prescaler")
            }
            Err(ConfigError::Inexact) => {
                panic!("timer period is not a whole number of divided clock ticks")
            }
            Err(ConfigError::CounterOverflow { .. }) => {
                panic!("timer target count does not fit the 16-bit counter")
            }
        }
    }

    pub const fn input_hz(&self) -> u32 {
        self.input_hz
    }

    pub const fn division(&self) -> u32 {
        self.division
    }

    /// Counter value at which the compare-match event fires.
    pub const fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Rate at which the counter increments, rounded down to whole hertz.
    pub const fn tick_hz(&self) -> u32 {
        self.input_hz / self.division
    }

    /// Time between two compare-match events, in nanoseconds.
    pub const fn period_ns(&self) -> u64 {
        self.cycles_per_event() * MICROS_PER_SECOND * NANOS_PER_MICRO / self.input_hz as u64
    }

    /// Duration of one counter tick, in nanoseconds, rounded down.
    pub const fn resolution_ns(&self) -> u64 {
        self.division as u64 * MICROS_PER_SECOND * NANOS_PER_MICRO / self.input_hz as u64
    }

    /// Input clock cycles between two compare-match events.
    pub const fn cycles_per_event(&self) -> u64 {
        self.target_count as u64 * self.division as u64
    }

    /// Value for a prescaler register that divides by `PSC + 1`.
    pub const fn prescaler_register(&self) -> u16 {
        (self.division - 1) as u16
    }

    /// Value for an auto-reload register that counts `0..=ARR`.
    pub const fn reload_register(&self) -> u16 {
        (self.target_count - 1) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_SECOND: TimerConfig = TimerConfig::validated(8_000_000, Period::from_millis(500), 64);

    #[test]
    fn half_second_at_8mhz_div64_is_62500() {
        assert_eq!(HALF_SECOND.target_count(), 62_500);
        assert_eq!(HALF_SECOND.tick_hz(), 125_000);
        assert_eq!(HALF_SECOND.period_ns(), 500_000_000);
        assert_eq!(HALF_SECOND.resolution_ns(), 8_000);
        assert_eq!(HALF_SECOND.cycles_per_event(), 4_000_000);
    }

    #[test]
    fn full_blink_cycle_is_two_events() {
        assert_eq!(2 * HALF_SECOND.period_ns(), 1_000_000_000);
    }

    #[test]
    fn register_encoding_is_off_by_one() {
        assert_eq!(HALF_SECOND.prescaler_register(), 63);
        assert_eq!(HALF_SECOND.reload_register(), 62_499);
    }

    #[test]
    fn target_scales_with_period() {
        let config = TimerConfig::new(8_000_000, Period::from_millis(100), 64).unwrap();
        assert_eq!(config.target_count(), 12_500);
    }

    #[test]
    fn rejects_period_beyond_counter_width() {
        let err = TimerConfig::new(8_000_000, Period::from_millis(1_000), 64).unwrap_err();
        assert_eq!(err, ConfigError::CounterOverflow { target: 125_000 });
    }

    #[test]
    fn accepts_full_counter_range() {
        // 65_536 ticks at 1 MHz
        let config = TimerConfig::new(1_000_000, Period::from_micros(65_536), 1).unwrap();
        assert_eq!(config.target_count(), COUNTER_MAX);
        assert_eq!(config.reload_register(), u16::MAX);
    }

    #[test]
    fn rejects_fractional_tick_counts() {
        assert_eq!(
            TimerConfig::new(8_000_000, Period::from_micros(3), 64),
            Err(ConfigError::Inexact)
        );
    }

    #[test]
    fn rejects_zero_inputs() {
        assert_eq!(
            TimerConfig::new(8_000_000, Period::from_micros(0), 64),
            Err(ConfigError::ZeroPeriod)
        );
        assert_eq!(
            TimerConfig::new(8_000_000, Period::from_millis(500), 0),
            Err(ConfigError::ZeroDivision)
        );
        assert_eq!(
            TimerConfig::new(0, Period::from_millis(500), 64),
            Err(ConfigError::ZeroClock)
        );
    }

    #[test]
    fn rejects_division_beyond_prescaler_width() {
        assert_eq!(
            TimerConfig::new(8_000_000, Period::from_millis(500), 100_000),
            Err(ConfigError::PrescalerOverflow { division: 100_000 })
        );
    }

    #[test]
    fn period_is_exact_when_tick_is_fractional_ns() {
        // 1 / 3 MHz is 333.33 ns per tick
        let config = TimerConfig::new(3_000_000, Period::from_millis(1), 1).unwrap();
        assert_eq!(config.target_count(), 3_000);
        assert_eq!(config.cycles_per_event(), 3_000);
        assert_eq!(config.resolution_ns(), 333);
        assert_eq!(config.period_ns(), 1_000_000);
    }

    #[test]
    fn from_millis_accepts_largest_representable_span() {
        let period = Period::from_millis(u32::MAX / 1_000);
        assert_eq!(period.as_micros(), 4_294_967_000);
    }

    #[test]
    #[should_panic(expected = "overflows the microsecond range")]
    fn from_millis_panics_past_microsecond_range() {
        let _ = Period::from_millis(core::hint::black_box(5_000_000));
    }

    #[test]
    #[should_panic(expected = "16-bit counter")]
    fn validated_panics_on_overflow() {
        let _ = TimerConfig::validated(8_000_000, Period::from_millis(2_000), 64);
    }
}
