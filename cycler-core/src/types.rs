//! Core data types for the duty-cycle controller

use crate::codec::MAX_DURATION_MIN;
use crate::hal::Duration;

/// Which half of the duty cycle the pump currently occupies.
/// Mirrors the relay: `Phase::On` means the relay is energized.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Pump energized, ON-timer counting down
    On,
    /// Pump de-energized, OFF-timer counting down
    Off,
}

impl Phase {
    /// Returns the other phase
    pub const fn flipped(&self) -> Phase {
        match self {
            Phase::On => Phase::Off,
            Phase::Off => Phase::On,
        }
    }

    /// Returns true if the relay is energized in this phase
    pub const fn is_on(&self) -> bool {
        matches!(self, Phase::On)
    }
}

/// Which digit bank a key mask addresses, relative to the running phase.
///
/// The keypad's low bank (bits below the zone boundary) maps to the
/// ON-duration digits and the high bank to the OFF-duration digits. Keys
/// for the running phase's own digits are repurposed as a manual
/// skip-to-next-phase gesture; only the idle phase's duration is editable
/// while the other one counts down.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyZone {
    /// Keys belonging to the running phase's digit bank: flip request
    ActivePhaseDigits,
    /// Keys belonging to the idle phase's digit bank: duration edit
    IdlePhaseDigits,
}

impl KeyZone {
    /// Classify a nonzero key mask once; callers dispatch on the tag.
    ///
    /// A mask is in the low bank when every set bit sits below `boundary`
    /// (for the default boundary `0x10` that is bits 0..=3).
    pub fn classify(mask: u8, phase: Phase, boundary: u8) -> KeyZone {
        let low_bank = mask < boundary;
        match (phase, low_bank) {
            (Phase::On, true) | (Phase::Off, false) => KeyZone::ActivePhaseDigits,
            (Phase::On, false) | (Phase::Off, true) => KeyZone::IdlePhaseDigits,
        }
    }
}

/// Controller configuration
#[derive(Copy, Clone, Debug)]
pub struct CyclerConfig {
    /// Initial ON-phase duration in minutes
    pub on_minutes: u32,
    /// Initial OFF-phase duration in minutes
    pub off_minutes: u32,
    /// Scheduler tick interval; all timers count in these ticks
    pub tick_interval: Duration,
    /// Run-LED blink period in seconds
    pub blink_period_secs: u32,
    /// First key mask value belonging to the OFF-duration digit bank
    pub key_zone_boundary: u8,
}

impl Default for CyclerConfig {
    fn default() -> Self {
        Self {
            on_minutes: 60,
            off_minutes: 60,
            tick_interval: Duration::from_millis(10),
            blink_period_secs: 1,
            key_zone_boundary: 0x10,
        }
    }
}

impl CyclerConfig {
    /// Create a new configuration with validation
    pub fn new(
        on_minutes: u32,
        off_minutes: u32,
        tick_interval_ms: u64,
        blink_period_secs: u32,
        key_zone_boundary: u8,
    ) -> Result<Self, &'static str> {
        if on_minutes > MAX_DURATION_MIN || off_minutes > MAX_DURATION_MIN {
            return Err("phase duration must fit the 4-digit display");
        }
        if tick_interval_ms == 0 || tick_interval_ms > 1000 {
            return Err("tick interval must be between 1 and 1000 ms");
        }
        if blink_period_secs == 0 {
            return Err("blink period must be at least 1 s");
        }
        if key_zone_boundary == 0 {
            return Err("key zone boundary must be nonzero");
        }

        Ok(Self {
            on_minutes,
            off_minutes,
            tick_interval: Duration::from_millis(tick_interval_ms),
            blink_period_secs,
            key_zone_boundary,
        })
    }

    /// Scheduler ticks per second for this tick interval
    pub fn ticks_per_sec(&self) -> u64 {
        (1000 / self.tick_interval.as_millis()).max(1)
    }
}
