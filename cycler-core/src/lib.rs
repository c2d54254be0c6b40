#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! # Cycler Core
//!
//! Duty-cycle controller core for a pump relay with a TM1638-style
//! 8-digit/8-key/8-LED front panel. The controller alternates the relay
//! between ON and OFF phases of configurable length, shows the running
//! countdown next to the idle phase's configured duration, and lets the
//! operator edit durations digit-by-digit from the keypad while running.

pub mod codec;
pub mod controller;
pub mod display;
pub mod hal;
pub mod timer;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use codec::*;
pub use controller::*;
pub use display::*;
pub use hal::{Duration, *};
pub use timer::*;
pub use types::*;

/// Controller library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration for the reference board: 60 minutes per phase,
/// 10 ms scheduler tick, 1 s run-LED blink
pub fn default_config() -> CyclerConfig {
    CyclerConfig::default()
}
