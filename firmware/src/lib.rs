#![no_std]

//! Firmware library for the pump duty-cycle controller board.
//!
//! Exposes the CH32V203 board implementation, no_std mock hardware for
//! bring-up, and the embassy task wrappers the binary spawns.

pub use cycler_core::*;

// CH32V203 board (TM1638 front panel + relay + run LED)
pub mod ch32v203_hardware;

// Mock hardware module
pub mod mock_hardware {
    use cycler_core::display::DisplayFrame;
    use cycler_core::hal::{CyclerHal, HalError, KeyScan, PanelDisplay, RelayOutput};

    /// Mock relay implementation
    #[derive(Debug, Default)]
    pub struct MockRelay {
        on: bool,
    }

    impl MockRelay {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get the driven state for bring-up checks
        pub fn is_energized(&self) -> bool {
            self.on
        }
    }

    impl RelayOutput for MockRelay {
        type Error = HalError;

        fn set_on(&mut self) -> Result<(), Self::Error> {
            #[cfg(feature = "defmt")]
            if !self.on {
                defmt::info!("🔌 Relay: ON");
            }
            self.on = true;
            Ok(())
        }

        fn set_off(&mut self) -> Result<(), Self::Error> {
            #[cfg(feature = "defmt")]
            if self.on {
                defmt::info!("🔌 Relay: OFF");
            }
            self.on = false;
            Ok(())
        }

        fn is_on(&self) -> Result<bool, Self::Error> {
            Ok(self.on)
        }
    }

    /// Mock keypad: one injectable mask, consumed on read
    #[derive(Debug, Default)]
    pub struct MockKeyPad {
        pending: Option<u8>,
    }

    impl MockKeyPad {
        pub fn new() -> Self {
            Self::default()
        }

        /// Inject a key mask for the next poll
        pub fn inject(&mut self, mask: u8) {
            self.pending = Some(mask);
        }
    }

    impl KeyScan for MockKeyPad {
        type Error = HalError;

        fn read_keys(&mut self) -> Result<u8, Self::Error> {
            Ok(self.pending.take().unwrap_or(0))
        }
    }

    /// Mock panel keeping the last frame
    #[derive(Debug, Default)]
    pub struct MockPanel {
        last_frame: Option<DisplayFrame>,
    }

    impl MockPanel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn last_frame(&self) -> Option<&DisplayFrame> {
            self.last_frame.as_ref()
        }
    }

    impl PanelDisplay for MockPanel {
        type Error = HalError;

        fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error> {
            self.last_frame = Some(*frame);
            Ok(())
        }
    }

    /// Mock hardware collection
    #[derive(Debug, Default)]
    pub struct MockPumpBoard {
        pub pump: MockRelay,
        pub run_led: MockRelay,
        pub keypad: MockKeyPad,
        pub panel: MockPanel,
    }

    impl MockPumpBoard {
        pub fn new() -> Self {
            #[cfg(feature = "defmt")]
            defmt::info!("🧪 Using mock hardware (for bring-up)");
            Self::default()
        }
    }

    impl CyclerHal for MockPumpBoard {
        type Pump = MockRelay;
        type StatusLed = MockRelay;
        type Keys = MockKeyPad;
        type Panel = MockPanel;

        fn pump(&mut self) -> &mut Self::Pump {
            &mut self.pump
        }

        fn status_led(&mut self) -> &mut Self::StatusLed {
            &mut self.run_led
        }

        fn keypad(&mut self) -> &mut Self::Keys {
            &mut self.keypad
        }

        fn panel(&mut self) -> &mut Self::Panel {
            &mut self.panel
        }
    }
}

// Embassy tasks for the concrete board types
#[cfg(target_arch = "riscv32")]
pub mod tasks {
    use crate::ch32v203_hardware::PumpBoard;
    use cycler_core::controller::cycler_task;
    use cycler_core::DutyCycler;

    /// Tick task over the real board
    #[embassy_executor::task]
    pub async fn cycler_task_board(cycler: DutyCycler, board: PumpBoard) {
        #[cfg(feature = "defmt")]
        defmt::info!("🧠 Cycler task started");
        cycler_task(cycler, board).await;
    }

    /// Tick task over the mock board, for bench bring-up without the panel
    #[embassy_executor::task]
    pub async fn cycler_task_mock(cycler: DutyCycler, board: crate::mock_hardware::MockPumpBoard) {
        #[cfg(feature = "defmt")]
        defmt::info!("🧠 Cycler task started (mock board)");
        cycler_task(cycler, board).await;
    }
}

// Time driver for embassy
#[cfg(target_arch = "riscv32")]
mod time_driver;
