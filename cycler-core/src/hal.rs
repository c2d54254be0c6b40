//! Hardware abstraction layer for the duty-cycle controller
//!
//! The core consumes four collaborators: the pump relay, the run LED, the
//! key scanner and the panel display. Each is a small trait so the state
//! machine can run unchanged against real pins, the firmware's board
//! implementation, or the mocks below.

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::Duration;

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::Duration;

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Stand-in duration type for builds without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs * 1000)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }
}

use crate::display::DisplayFrame;
use embedded_hal::digital::OutputPin;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Key matrix scan failed
    KeyScanError,
    /// Panel write failed
    DisplayError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::KeyScanError => write!(f, "Key matrix scan failed"),
            HalError::DisplayError => write!(f, "Panel write failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Binary on/off output: the pump relay and the run LED
pub trait RelayOutput {
    type Error: Into<HalError>;

    /// Energize the output
    fn set_on(&mut self) -> Result<(), Self::Error>;

    /// De-energize the output
    fn set_off(&mut self) -> Result<(), Self::Error>;

    /// Current driven state
    fn is_on(&self) -> Result<bool, Self::Error>;

    /// Invert the driven state
    fn toggle(&mut self) -> Result<(), Self::Error> {
        if self.is_on()? {
            self.set_off()
        } else {
            self.set_on()
        }
    }
}

/// Keypad scanner
pub trait KeyScan {
    type Error: Into<HalError>;

    /// Bitmask of keys newly pressed since the last poll; 0 means none.
    /// Debouncing is the scanner's responsibility.
    fn read_keys(&mut self) -> Result<u8, Self::Error>;
}

/// 8-digit/8-LED panel
pub trait PanelDisplay {
    type Error: Into<HalError>;

    /// Push one complete frame to the panel
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error>;
}

/// Complete collaborator bundle consumed by the controller tick
pub trait CyclerHal {
    type Pump: RelayOutput;
    type StatusLed: RelayOutput;
    type Keys: KeyScan;
    type Panel: PanelDisplay;

    /// Pump relay output
    fn pump(&mut self) -> &mut Self::Pump;

    /// Run-LED output
    fn status_led(&mut self) -> &mut Self::StatusLed;

    /// Keypad scanner
    fn keypad(&mut self) -> &mut Self::Keys;

    /// Panel display
    fn panel(&mut self) -> &mut Self::Panel;
}

/// Relay driver over any embedded-hal output pin.
///
/// embedded-hal cannot read an output pin back, so the logical state is
/// cached on the driver and `is_on` mirrors the last driven value.
pub struct EmbeddedHalRelay<P> {
    pin: P,
    active_low: bool,
    is_on: bool,
}

impl<P> EmbeddedHalRelay<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            is_on: false,
        }
    }
}

impl<P> RelayOutput for EmbeddedHalRelay<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn set_on(&mut self) -> Result<(), Self::Error> {
        let result = if self.active_low {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        };
        result.map_err(|_| HalError::GpioError)?;
        self.is_on = true;
        Ok(())
    }

    fn set_off(&mut self) -> Result<(), Self::Error> {
        let result = if self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| HalError::GpioError)?;
        self.is_on = false;
        Ok(())
    }

    fn is_on(&self) -> Result<bool, Self::Error> {
        Ok(self.is_on)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock collaborators for host tests

    use super::*;
    use std::collections::VecDeque;

    /// Relay mock tracking the driven state and how often it changed
    #[derive(Debug, Default)]
    pub struct MockRelay {
        on: bool,
        switches: u32,
    }

    impl MockRelay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn is_energized(&self) -> bool {
            self.on
        }

        /// Number of observed state changes
        pub fn switch_count(&self) -> u32 {
            self.switches
        }
    }

    impl RelayOutput for MockRelay {
        type Error = HalError;

        fn set_on(&mut self) -> Result<(), Self::Error> {
            if !self.on {
                self.switches += 1;
            }
            self.on = true;
            Ok(())
        }

        fn set_off(&mut self) -> Result<(), Self::Error> {
            if self.on {
                self.switches += 1;
            }
            self.on = false;
            Ok(())
        }

        fn is_on(&self) -> Result<bool, Self::Error> {
            Ok(self.on)
        }
    }

    /// Keypad mock fed from a queue of masks; empty queue reads as 0
    #[derive(Debug, Default)]
    pub struct MockKeyPad {
        queue: VecDeque<u8>,
    }

    impl MockKeyPad {
        pub fn new() -> Self {
            Self::default()
        }

        /// Enqueue a mask for the next poll
        pub fn press(&mut self, mask: u8) {
            self.queue.push_back(mask);
        }
    }

    impl KeyScan for MockKeyPad {
        type Error = HalError;

        fn read_keys(&mut self) -> Result<u8, Self::Error> {
            Ok(self.queue.pop_front().unwrap_or(0))
        }
    }

    /// Panel mock capturing the most recent frame
    #[derive(Debug, Default)]
    pub struct MockPanel {
        last_frame: Option<DisplayFrame>,
        frames_rendered: usize,
    }

    impl MockPanel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn last_frame(&self) -> Option<&DisplayFrame> {
            self.last_frame.as_ref()
        }

        pub fn frames_rendered(&self) -> usize {
            self.frames_rendered
        }
    }

    impl PanelDisplay for MockPanel {
        type Error = HalError;

        fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error> {
            self.last_frame = Some(*frame);
            self.frames_rendered += 1;
            Ok(())
        }
    }

    /// Full mock collaborator bundle
    #[derive(Debug, Default)]
    pub struct MockCyclerHal {
        pub pump: MockRelay,
        pub status_led: MockRelay,
        pub keypad: MockKeyPad,
        pub panel: MockPanel,
    }

    impl MockCyclerHal {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl CyclerHal for MockCyclerHal {
        type Pump = MockRelay;
        type StatusLed = MockRelay;
        type Keys = MockKeyPad;
        type Panel = MockPanel;

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
