//! Property tests for the digit codec, the LED bar and edit isolation

use cycler_core::display::elapsed_hours_leds;
use cycler_core::hal::mock::MockCyclerHal;
use cycler_core::{CyclerConfig, DigitArray, DutyCycler, Phase, MAX_DURATION_MIN};

use proptest::prelude::*;

proptest! {
    #[test]
    fn encode_decode_round_trip(
        on_minutes in 0..=MAX_DURATION_MIN,
        off_minutes in 0..=MAX_DURATION_MIN,
    ) {
        let digits = DigitArray::encode(on_minutes, off_minutes);
        prop_assert_eq!(digits.decode(), (on_minutes, off_minutes));
    }

    #[test]
    fn digits_stay_within_their_modulus(
        on_minutes in 0..=MAX_DURATION_MIN,
        off_minutes in 0..=MAX_DURATION_MIN,
        masks in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut digits = DigitArray::encode(on_minutes, off_minutes);
        for mask in masks {
            digits.apply_key(mask);
            for (index, &digit) in digits.digits().iter().enumerate() {
                let bound = if index == 2 || index == 6 { 5 } else { 9 };
                prop_assert!(digit <= bound);
            }
        }
    }

    #[test]
    fn edited_values_stay_decodable(
        on_minutes in 0..=MAX_DURATION_MIN,
        off_minutes in 0..=MAX_DURATION_MIN,
        mask in any::<u8>(),
    ) {
        let mut digits = DigitArray::encode(on_minutes, off_minutes);
        digits.apply_key(mask);
        let (on_edited, off_edited) = digits.decode();
        prop_assert!(on_edited <= MAX_DURATION_MIN);
        prop_assert!(off_edited <= MAX_DURATION_MIN);
        // Re-encoding the decoded values is stable
        prop_assert_eq!(
            DigitArray::encode(on_edited, off_edited).decode(),
            (on_edited, off_edited)
        );
    }

    #[test]
    fn led_bar_is_contiguous_and_counts_hours(remaining_secs in 0u32..100_000) {
        let leds = elapsed_hours_leds(remaining_secs);
        let hours = (remaining_secs / 3600).min(8);
        prop_assert_eq!(leds.count_ones(), hours);
        prop_assert_eq!(leds.trailing_ones(), hours);
    }

    #[test]
    fn active_bank_masks_never_edit(mask in 1u8..0x10) {
        let mut cycler = DutyCycler::new(CyclerConfig::new(60, 60, 1000, 1, 0x10).unwrap());
        let mut board = MockCyclerHal::new();
        cycler.start(&mut board).unwrap();

        board.keypad.press(mask);
        cycler.tick(&mut board).unwrap();
        prop_assert_eq!(cycler.on_minutes(), 60);
        prop_assert_eq!(cycler.off_minutes(), 60);
        // The mask was a flip request instead
        prop_assert_eq!(cycler.phase(), Phase::Off);
    }

    #[test]
    fn idle_bank_masks_edit_only_the_off_duration(mask in 0x10u8..=0xff) {
        let mut cycler = DutyCycler::new(CyclerConfig::new(60, 60, 1000, 1, 0x10).unwrap());
        let mut board = MockCyclerHal::new();
        cycler.start(&mut board).unwrap();

        board.keypad.press(mask & 0xf0); // keep the mask purely in the OFF bank
        cycler.tick(&mut board).unwrap();
        prop_assert_eq!(cycler.phase(), Phase::On);
        prop_assert_eq!(cycler.on_minutes(), 60);
        prop_assert!(cycler.on_timer().is_running());
        prop_assert_eq!(
            cycler.off_timer().configured_minutes(),
            cycler.off_minutes()
        );
    }
}

#[test]
fn two_hours_five_minutes_encodes_as_0205() {
    let digits = DigitArray::encode(125, 0);
    assert_eq!(&digits.digits()[..4], &[0, 2, 0, 5]);
}

#[test]
fn minutes_tens_increment_wraps_five_to_zero() {
    // Push the ON minutes-tens digit from 5 over the cap
    let mut digits = DigitArray::encode(55, 0);
    assert_eq!(digits.digits()[2], 5);
    digits.apply_key(0x04);
    assert_eq!(digits.digits()[2], 0);
    assert_eq!(digits.decode(), (5, 0));
}
