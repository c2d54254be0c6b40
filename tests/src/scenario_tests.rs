//! End-to-end controller scenarios over simulated boards
//!
//! Timers here use a 1 s tick so a whole phase fits in a short loop; the
//! controller logic is tick-count based and does not care about the
//! wall-clock width of a tick.

use cycler_core::hal::mock::MockCyclerHal;
use cycler_core::test_utils::key_script::ScriptedKeyPad;
use cycler_core::test_utils::sim_board::SimBoard;
use cycler_core::{CyclerConfig, DutyCycler, Phase};

use rstest::rstest;

fn one_sec_tick(on_minutes: u32, off_minutes: u32) -> CyclerConfig {
    CyclerConfig::new(on_minutes, off_minutes, 1000, 1, 0x10).unwrap()
}

#[test]
fn boot_starts_on_phase_with_configured_duration() {
    let mut cycler = DutyCycler::new(one_sec_tick(60, 30));
    let mut board = MockCyclerHal::new();
    cycler.start(&mut board).unwrap();

    assert_eq!(cycler.phase(), Phase::On);
    assert!(board.pump.is_energized());
    assert!(cycler.on_timer().is_running());
    assert!(!cycler.off_timer().is_running());
    assert_eq!(cycler.remaining_secs(), 3600);
}

#[test]
fn on_timer_expiry_starts_off_phase() {
    let mut cycler = DutyCycler::new(one_sec_tick(1, 2));
    let mut board = MockCyclerHal::new();
    cycler.start(&mut board).unwrap();

    for _ in 0..59 {
        assert_eq!(cycler.tick(&mut board).unwrap(), None);
    }
    assert_eq!(cycler.tick(&mut board).unwrap(), Some(Phase::Off));
    assert!(!board.pump.is_energized());
    assert!(!cycler.on_timer().is_running());
    assert!(cycler.off_timer().is_running());
    assert_eq!(cycler.remaining_secs(), 120);
}

#[test]
fn idle_bank_key_edits_off_duration_in_place() {
    let mut cycler = DutyCycler::new(one_sec_tick(60, 60));
    let mut board = MockCyclerHal::new();
    cycler.start(&mut board).unwrap();

    board.keypad.press(0x10);
    assert_eq!(cycler.tick(&mut board).unwrap(), None);

    assert_eq!(cycler.phase(), Phase::On);
    assert!(board.pump.is_energized());
    assert_eq!(cycler.off_minutes(), 660);
    assert_eq!(cycler.off_timer().configured_minutes(), 660);
    // The running timer was not disturbed
    assert!(cycler.on_timer().is_running());
    assert_eq!(cycler.on_minutes(), 60);
}

#[test]
fn active_bank_key_skips_to_next_phase() {
    let mut cycler = DutyCycler::new(one_sec_tick(60, 60));
    let mut board = MockCyclerHal::new();
    cycler.start(&mut board).unwrap();

    board.keypad.press(0x04);
    assert_eq!(cycler.tick(&mut board).unwrap(), Some(Phase::Off));

    assert!(!board.pump.is_energized());
    assert_eq!(cycler.on_minutes(), 60);
    assert_eq!(cycler.off_minutes(), 60);
    assert!(cycler.off_timer().is_running());
}

#[test]
fn full_cycle_keeps_phase_and_relay_coherent() {
    // Two short phases plus a scripted manual skip
    let keypad = ScriptedKeyPad::new().at(150, 0x01);
    let mut board = SimBoard::new(keypad);
    let mut cycler = DutyCycler::new(one_sec_tick(1, 1));
    cycler.start(&mut board).unwrap();

    let mut transitions = 0;
    for _ in 0..300 {
        if cycler.tick(&mut board).unwrap().is_some() {
            transitions += 1;
        }
        assert_eq!(cycler.phase().is_on(), board.pump.is_energized());
        assert_ne!(
            cycler.on_timer().is_running(),
            cycler.off_timer().is_running()
        );
    }
    // 60-tick phases over 300 ticks: four timer expiries and one skip
    assert_eq!(transitions, 5);
    // Exactly one keypad poll and one frame per tick
    assert_eq!(board.keypad.polls(), 300);
    assert_eq!(board.panel.frames().len(), 300);
}

#[test]
fn led_bar_tracks_whole_hours_remaining() {
    let mut board = SimBoard::new(ScriptedKeyPad::new());
    let mut cycler = DutyCycler::new(one_sec_tick(121, 1));
    cycler.start(&mut board).unwrap();

    for _ in 0..3500 {
        cycler.tick(&mut board).unwrap();
    }
    for frame in board.panel.frames() {
        assert_eq!(frame.leds.count_ones(), frame.leds.trailing_ones());
    }
    // 121 minutes down to just over an hour: the bar shrank 2 -> 1
    let last = board.panel.last().unwrap();
    assert_eq!(last.leds, 0b0000_0001);
}

#[test]
fn countdown_and_config_banks_swap_with_phase() {
    let mut board = SimBoard::new(ScriptedKeyPad::new().at(10, 0x02));
    let mut cycler = DutyCycler::new(one_sec_tick(125, 90));
    cycler.start(&mut board).unwrap();

    for _ in 0..5 {
        cycler.tick(&mut board).unwrap();
    }
    let frame = *board.panel.last().unwrap();
    // ON phase: countdown left (124m55s -> "04:55"), OFF config right (1h30m)
    assert_eq!(frame.digits, [0, 4, 5, 5, 0, 1, 3, 0]);

    // The scripted key on tick 10 forces the OFF phase
    for _ in 0..6 {
        cycler.tick(&mut board).unwrap();
    }
    assert_eq!(cycler.phase(), Phase::Off);
    let frame = *board.panel.last().unwrap();
    // OFF phase: ON config left (2h05m), countdown right
    assert_eq!(frame.digits[..4], [0, 2, 0, 5]);
}

#[rstest]
#[case(Phase::On, 0x01, true)]
#[case(Phase::On, 0x0f, true)]
#[case(Phase::On, 0x10, false)]
#[case(Phase::On, 0x80, false)]
#[case(Phase::Off, 0x10, true)]
#[case(Phase::Off, 0xf0, true)]
#[case(Phase::Off, 0x01, false)]
#[case(Phase::Off, 0x08, false)]
fn key_routing_per_phase(#[case] phase: Phase, #[case] mask: u8, #[case] expect_flip: bool) {
    let mut cycler = DutyCycler::new(one_sec_tick(30, 30));
    let mut board = MockCyclerHal::new();
    cycler.start(&mut board).unwrap();

    if phase == Phase::Off {
        board.keypad.press(0x01); // skip the boot ON phase first
        cycler.tick(&mut board).unwrap();
        assert_eq!(cycler.phase(), Phase::Off);
    }

    board.keypad.press(mask);
    let transitioned = cycler.tick(&mut board).unwrap();
    assert_eq!(transitioned.is_some(), expect_flip);
    if expect_flip {
        assert_eq!(cycler.on_minutes(), 30);
        assert_eq!(cycler.off_minutes(), 30);
    }
}
