//! Duration <-> digit-array codec used by the display and the key editor
//!
//! Both phase durations live on the panel as eight decimal digits:
//! indices 0..=3 are the ON duration, 4..=7 the OFF duration, each bank
//! decomposed as tens-of-hours, units-of-hours, tens-of-minutes and
//! units-of-minutes. The minutes-tens digits (indices 2 and 6) wrap at 6
//! so minutes-within-hour never exceed 59.

/// Digits on the panel, and bits in a key mask
pub const DIGIT_COUNT: usize = 8;

/// Largest duration representable in one 4-digit bank (99h59m)
pub const MAX_DURATION_MIN: u32 = 99 * 60 + 59;

/// Value-typed fixed-size digit sequence; digits are validated against
/// their per-position modulus at construction
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DigitArray([u8; DIGIT_COUNT]);

impl DigitArray {
    /// Decompose both durations (minutes) into their digit banks.
    /// Inputs beyond [`MAX_DURATION_MIN`] do not fit four digits; the
    /// controller's config validation keeps them out of this range.
    pub fn encode(on_minutes: u32, off_minutes: u32) -> Self {
        let mut digits = [0u8; DIGIT_COUNT];
        digits[..4].copy_from_slice(&encode_bank(on_minutes));
        digits[4..].copy_from_slice(&encode_bank(off_minutes));
        Self(digits)
    }

    /// Build from raw digits, rejecting any digit at or above its modulus
    pub fn from_digits(digits: [u8; DIGIT_COUNT]) -> Result<Self, &'static str> {
        for (index, &digit) in digits.iter().enumerate() {
            if digit >= Self::modulus(index) {
                return Err("digit out of range for its position");
            }
        }
        Ok(Self(digits))
    }

    /// Recompose both durations as (on_minutes, off_minutes)
    pub fn decode(&self) -> (u32, u32) {
        (decode_bank(&self.0[..4]), decode_bank(&self.0[4..]))
    }

    /// Increment every digit whose bit is set in `mask`, independently,
    /// wrapping at that digit's modulus. No carry propagates between
    /// digits. Bits beyond the recognized 0..=7 range cannot exist in a
    /// `u8` mask and are thereby ignored.
    pub fn apply_key(&mut self, mask: u8) {
        for index in 0..DIGIT_COUNT {
            if mask & (1 << index) != 0 {
                self.0[index] = (self.0[index] + 1) % Self::modulus(index);
            }
        }
    }

    /// Raw digit view
    pub fn digits(&self) -> &[u8; DIGIT_COUNT] {
        &self.0
    }

    /// Wraparound bound for a digit position: minutes-tens digits cap at 5
    const fn modulus(index: usize) -> u8 {
        if index == 2 || index == 6 {
            6
        } else {
            10
        }
    }
}

fn encode_bank(minutes: u32) -> [u8; 4] {
    [
        (minutes / 60 / 10) as u8,
        (minutes / 60 % 10) as u8,
        (minutes % 60 / 10) as u8,
        (minutes % 60 % 10) as u8,
    ]
}

fn decode_bank(digits: &[u8]) -> u32 {
    (digits[0] as u32 * 10 + digits[1] as u32) * 60 + digits[2] as u32 * 10 + digits[3] as u32
}
