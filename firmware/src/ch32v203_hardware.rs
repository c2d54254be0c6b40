//! CH32V203 board implementation
//!
//! Pin plan (adjust to the actual PCB):
//! - PA0: TM1638 STB
//! - PA1: TM1638 CLK
//! - PA2: TM1638 DIO
//! - PA3: pump relay (active high)
//! - PA4: run LED (active low, blue)
//!
//! GPIO register access goes through a placeholder pin type until the
//! ch32v2 HAL crate is wired in; the pin state is kept in atomics so the
//! rest of the stack is exercised end to end.

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use cycler_core::display::DisplayFrame;
use cycler_core::hal::{
    CyclerHal, EmbeddedHalRelay, HalError, KeyScan, PanelDisplay, RelayOutput,
};
use embedded_hal::digital::{ErrorType, OutputPin};

/// Seven-segment patterns for digits 0-9, bit 7 = decimal point
const SEGMENT_TABLE: [u8; 10] = [
    0x3f, 0x06, 0x5b, 0x4f, 0x66, 0x6d, 0x7d, 0x07, 0x7f, 0x6f,
];

/// Placeholder GPIO output pin backed by an atomic
pub struct BoardPin {
    level: AtomicBool,
}

impl BoardPin {
    const fn new() -> Self {
        Self {
            level: AtomicBool::new(false),
        }
    }

    /// Driven level, for bring-up checks
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }
}

impl ErrorType for BoardPin {
    type Error = Infallible;
}

impl OutputPin for BoardPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        // TODO: drive the GPIO output data register once ch32v2-hal lands
        self.level.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Key mask snapshot shared with the TM1638 scan routine
static SCANNED_KEYS: AtomicU8 = AtomicU8::new(0);

/// Record a freshly scanned key mask; the controller consumes it on the
/// next poll. Safe to call from interrupt context.
pub fn report_keys(mask: u8) {
    SCANNED_KEYS.store(mask, Ordering::Relaxed);
}

/// TM1638 keypad front end
pub struct Tm1638Keys {
    _private: (),
}

impl Tm1638Keys {
    fn new() -> Self {
        Self { _private: () }
    }
}

impl KeyScan for Tm1638Keys {
    type Error = HalError;

    fn read_keys(&mut self) -> Result<u8, Self::Error> {
        // Read-and-clear so a press is reported once
        Ok(SCANNED_KEYS.swap(0, Ordering::Relaxed))
    }
}

/// TM1638 display front end (STB/CLK/DIO bit-bang)
pub struct Tm1638Panel {
    stb: BoardPin,
    clk: BoardPin,
    dio: BoardPin,
}

impl Tm1638Panel {
    fn new() -> Self {
        Self {
            stb: BoardPin::new(),
            clk: BoardPin::new(),
            dio: BoardPin::new(),
        }
    }

    fn write_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            let _ = self.clk.set_low();
            if byte & (1 << bit) != 0 {
                let _ = self.dio.set_high();
            } else {
                let _ = self.dio.set_low();
            }
            let _ = self.clk.set_high();
        }
    }

    fn write_command(&mut self, command: u8) {
        let _ = self.stb.set_low();
        self.write_byte(command);
        let _ = self.stb.set_high();
    }
}

impl PanelDisplay for Tm1638Panel {
    type Error = HalError;

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error> {
        // Data command: auto-increment address mode
        self.write_command(0x40);

        let _ = self.stb.set_low();
        // Address command: start at grid 0
        self.write_byte(0xc0);
        for position in 0..8 {
            let digit = frame.digits[position] as usize % 10;
            let mut segments = SEGMENT_TABLE[digit];
            if frame.dots & (1 << position) != 0 {
                segments |= 0x80;
            }
            self.write_byte(segments);
            // Odd addresses carry the LED row, one LED per grid
            self.write_byte((frame.leds >> position) & 0x01);
        }
        let _ = self.stb.set_high();

        // Display control: on, medium brightness
        self.write_command(0x8a);
        Ok(())
    }
}

/// Complete CH32V203 pump controller board
pub struct PumpBoard {
    pump_relay: EmbeddedHalRelay<BoardPin>,
    run_led: EmbeddedHalRelay<BoardPin>,
    keys: Tm1638Keys,
    panel: Tm1638Panel,
    initialized: bool,
}

impl PumpBoard {
    pub fn new() -> Self {
        Self {
            pump_relay: EmbeddedHalRelay::new(BoardPin::new(), false),
            run_led: EmbeddedHalRelay::new(BoardPin::new(), true),
            keys: Tm1638Keys::new(),
            panel: Tm1638Panel::new(),
            initialized: false,
        }
    }

    /// Configure GPIO and bring the panel out of reset
    pub fn init(&mut self) -> Result<(), HalError> {
        // TODO: RCC clock enable + GPIOA mode registers via ch32v2-hal
        self.pump_relay.set_off()?;
        self.run_led.set_off()?;
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::info!("🔌 CH32V203 pump board initialized");

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for PumpBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl CyclerHal for PumpBoard {
    type Pump = EmbeddedHalRelay<BoardPin>;
    type StatusLed = EmbeddedHalRelay<BoardPin>;
    type Keys = Tm1638Keys;
    type Panel = Tm1638Panel;

    fn pump(&mut self) -> &mut Self::Pump {
        &mut self.pump_relay
    }

    fn status_led(&mut self) -> &mut Self::StatusLed {
        &mut self.run_led
    }

    fn keypad(&mut self) -> &mut Self::Keys {
        &mut self.keys
    }

    fn panel(&mut self) -> &mut Self::Panel {
        &mut self.panel
    }
}
