//! Frame building for the 8-digit/8-LED panel
//!
//! The running phase's bank shows its countdown as MMSS; the idle phase's
//! bank shows its configured duration as HHMM. The LED row is a
//! thermometer of whole hours remaining: LED i lit means at least i+1
//! hours are left.

use crate::types::Phase;

/// LEDs available on the panel
pub const LED_COUNT: u32 = 8;

/// Separator dots after each bank's hour pair; fixed, not data-derived
pub const DOT_MASK: u8 = 0b0100_0100;

/// One rendered panel state
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayFrame {
    /// Decimal digit per position, left to right
    pub digits: [u8; 8],
    /// Decimal-point mask, bit i for digit i
    pub dots: u8,
    /// Remaining-hours thermometer
    pub leds: u8,
}

/// Build the frame for the current controller state
pub fn build_frame(
    phase: Phase,
    on_minutes: u32,
    off_minutes: u32,
    remaining_secs: u32,
) -> DisplayFrame {
    let mut digits = [0u8; 8];
    match phase {
        Phase::On => {
            digits[..4].copy_from_slice(&countdown_digits(remaining_secs));
            digits[4..].copy_from_slice(&configured_digits(off_minutes));
        }
        Phase::Off => {
            digits[..4].copy_from_slice(&configured_digits(on_minutes));
            digits[4..].copy_from_slice(&countdown_digits(remaining_secs));
        }
    }
    DisplayFrame {
        digits,
        dots: DOT_MASK,
        leds: elapsed_hours_leds(remaining_secs),
    }
}

/// Remaining seconds as MMSS digits
fn countdown_digits(remaining_secs: u32) -> [u8; 4] {
    let r = remaining_secs;
    [
        (r / 60 % 60 / 10) as u8,
        (r / 60 % 10) as u8,
        (r % 60 / 10) as u8,
        (r % 60 % 10) as u8,
    ]
}

/// Configured minutes as HHMM digits
fn configured_digits(minutes: u32) -> [u8; 4] {
    [
        (minutes / 60 / 10) as u8,
        (minutes / 60 % 10) as u8,
        (minutes % 60 / 10) as u8,
        (minutes % 60 % 10) as u8,
    ]
}

/// One lit LED per whole hour of remaining time, filling up from bit 0
pub fn elapsed_hours_leds(remaining_secs: u32) -> u8 {
    let hours = (remaining_secs / 3600).min(LED_COUNT);
    let mut leds = 0u8;
    for i in 0..hours {
        leds |= 1 << i;
    }
    leds
}
