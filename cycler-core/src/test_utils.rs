//! Host-side simulation helpers for controller tests

pub mod key_script {
    //! Scripted keypad input: masks delivered on chosen ticks

    use crate::hal::{HalError, KeyScan};
    use heapless::Vec;

    /// One scheduled key event
    #[derive(Debug, Clone, Copy)]
    pub struct KeyPress {
        /// Tick number on which the mask is reported, counted from the
        /// first poll
        pub tick: u64,
        pub mask: u8,
    }

    /// Keypad that replays a script against the polling loop
    #[derive(Debug, Default)]
    pub struct ScriptedKeyPad {
        script: Vec<KeyPress, 32>,
        tick: u64,
    }

    impl ScriptedKeyPad {
        pub fn new() -> Self {
            Self::default()
        }

        /// Schedule `mask` for poll number `tick`
        pub fn at(mut self, tick: u64, mask: u8) -> Self {
            self.script.push(KeyPress { tick, mask }).ok();
            self
        }

        pub fn polls(&self) -> u64 {
            self.tick
        }
    }

    impl KeyScan for ScriptedKeyPad {
        type Error = HalError;

        fn read_keys(&mut self) -> Result<u8, Self::Error> {
            let now = self.tick;
            self.tick += 1;
            Ok(self
                .script
                .iter()
                .find(|press| press.tick == now)
                .map(|press| press.mask)
                .unwrap_or(0))
        }
    }
}

pub mod frame_capture {
    //! Frame recording across a whole simulated run

    use crate::display::DisplayFrame;
    use crate::hal::{HalError, PanelDisplay};

    /// Panel that keeps every rendered frame for later inspection
    #[derive(Debug, Default)]
    pub struct FrameLog {
        frames: Vec<DisplayFrame>,
    }

    impl FrameLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn frames(&self) -> &[DisplayFrame] {
            &self.frames
        }

        pub fn last(&self) -> Option<&DisplayFrame> {
            self.frames.last()
        }

        /// Tick indices (0-based) at which the LED bar changed
        pub fn led_change_ticks(&self) -> Vec<usize> {
            let mut changes = Vec::new();
            for (i, pair) in self.frames.windows(2).enumerate() {
                if pair[0].leds != pair[1].leds {
                    changes.push(i + 1);
                }
            }
            changes
        }
    }

    impl PanelDisplay for FrameLog {
        type Error = HalError;

        fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error> {
            self.frames.push(*frame);
            Ok(())
        }
    }
}

pub mod sim_board {
    //! A complete simulated board: scripted keys, mock relays, frame log

    use super::frame_capture::FrameLog;
    use super::key_script::ScriptedKeyPad;
    use crate::hal::mock::MockRelay;
    use crate::hal::CyclerHal;

    /// Board used by host scenario tests
    #[derive(Debug, Default)]
    pub struct SimBoard {
        pub pump: MockRelay,
        pub status_led: MockRelay,
        pub keypad: ScriptedKeyPad,
        pub panel: FrameLog,
    }

    impl SimBoard {
        pub fn new(keypad: ScriptedKeyPad) -> Self {
            Self {
                keypad,
                ..Self::default()
            }
        }
    }

    impl CyclerHal for SimBoard {
        type Pump = MockRelay;
        type StatusLed = MockRelay;
        type Keys = ScriptedKeyPad;
        type Panel = FrameLog;

        fn pump(&mut self) -> &mut Self::Pump {
            &mut self.pump
        }

        fn status_led(&mut self) -> &mut Self::StatusLed {
            &mut self.status_led
        }

        fn keypad(&mut self) -> &mut Self::Keys {
            &mut self.keypad
        }

        fn panel(&mut self) -> &mut Self::Panel {
            &mut self.panel
        }
    }
}
