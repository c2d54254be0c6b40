//! The duty-cycle state machine and its tick orchestration

use crate::codec::DigitArray;
use crate::display::{build_frame, DisplayFrame};
use crate::hal::{CyclerHal, HalError, KeyScan, PanelDisplay, RelayOutput};
use crate::timer::PhaseTimer;
use crate::types::{CyclerConfig, KeyZone, Phase};

/// All mutable controller state, owned by the tick task.
///
/// One logical tick runs in a fixed order: blink-LED timer, key handling
/// (which may edit durations and re-arm the idle timer), phase-timer
/// evaluation with at most one transition, then the display render. No
/// state is shared outside the tick path.
pub struct DutyCycler {
    config: CyclerConfig,
    phase: Phase,
    on_minutes: u32,
    off_minutes: u32,
    on_timer: PhaseTimer,
    off_timer: PhaseTimer,
    blink_timer: PhaseTimer,
}

impl DutyCycler {
    /// Create the controller; the pump starts its ON phase once
    /// [`start`](Self::start) energizes the relay and arms the timers.
    pub fn new(config: CyclerConfig) -> Self {
        Self {
            phase: Phase::On,
            on_minutes: config.on_minutes,
            off_minutes: config.off_minutes,
            on_timer: PhaseTimer::from_minutes(config.on_minutes, config.tick_interval),
            off_timer: PhaseTimer::from_minutes(config.off_minutes, config.tick_interval),
            blink_timer: PhaseTimer::from_secs(config.blink_period_secs, config.tick_interval),
            config,
        }
    }

    /// Boot sequence: energize the pump and start the ON and blink timers
    pub fn start<H: CyclerHal>(&mut self, hal: &mut H) -> Result<(), HalError> {
        #[cfg(feature = "defmt")]
        defmt::info!("Turn on pump");

        hal.pump().set_on().map_err(Into::into)?;
        self.on_timer.start();
        self.blink_timer.start();
        Ok(())
    }

    /// One logical tick. Returns the new phase when a transition happened.
    pub fn tick<H: CyclerHal>(&mut self, hal: &mut H) -> Result<Option<Phase>, HalError> {
        if self.blink_timer.tick() {
            hal.status_led().toggle().map_err(Into::into)?;
            self.blink_timer.start();
        }

        let mask = hal.keypad().read_keys().map_err(Into::into)?;
        let flip_requested = self.handle_keys(mask);

        let on_expired = self.on_timer.tick();
        let off_expired = self.off_timer.tick();

        // An expiry and a flip request in the same tick are one transition
        let transitioned = if on_expired || off_expired || flip_requested {
            Some(self.transition(hal)?)
        } else {
            None
        };

        let frame = self.frame();
        hal.panel().render(&frame).map_err(Into::into)?;

        Ok(transitioned)
    }

    /// Key handling for one tick. Returns true when the key event is a
    /// bare flip request (no duration was edited).
    ///
    /// Keys in the running phase's own digit bank skip to the next phase;
    /// keys in the idle bank edit the durations and re-arm the idle
    /// phase's timer so the edit takes effect on its next run.
    pub fn handle_keys(&mut self, mask: u8) -> bool {
        if mask == 0 {
            return false;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("keyed: {=u8:x}", mask);

        match KeyZone::classify(mask, self.phase, self.config.key_zone_boundary) {
            KeyZone::ActivePhaseDigits => true,
            KeyZone::IdlePhaseDigits => {
                let mut digits = DigitArray::encode(self.on_minutes, self.off_minutes);
                digits.apply_key(mask);
                let (on_minutes, off_minutes) = digits.decode();
                self.on_minutes = on_minutes;
                self.off_minutes = off_minutes;

                match self.phase {
                    Phase::On => self.off_timer.set_minutes(off_minutes),
                    Phase::Off => self.on_timer.set_minutes(on_minutes),
                }
                false
            }
        }
    }

    /// Perform the single phase transition for this tick
    fn transition<H: CyclerHal>(&mut self, hal: &mut H) -> Result<Phase, HalError> {
        match self.phase {
            Phase::On => {
                #[cfg(feature = "defmt")]
                defmt::info!("Turn off pump");

                hal.pump().set_off().map_err(Into::into)?;
                self.on_timer.stop();
                self.on_timer.set_minutes(self.on_minutes);
                self.off_timer.start();
            }
            Phase::Off => {
                #[cfg(feature = "defmt")]
                defmt::info!("Turn on pump");

                hal.pump().set_on().map_err(Into::into)?;
                self.off_timer.stop();
                self.off_timer.set_minutes(self.off_minutes);
                self.on_timer.start();
            }
        }
        self.phase = self.phase.flipped();
        Ok(self.phase)
    }

    /// Frame for the current state: running countdown on the active bank,
    /// configured duration on the idle bank
    pub fn frame(&self) -> DisplayFrame {
        build_frame(
            self.phase,
            self.on_minutes,
            self.off_minutes,
            self.remaining_secs(),
        )
    }

    /// Seconds left in the running phase
    pub fn remaining_secs(&self) -> u32 {
        match self.phase {
            Phase::On => self.on_timer.remaining_secs(),
            Phase::Off => self.off_timer.remaining_secs(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn on_minutes(&self) -> u32 {
        self.on_minutes
    }

    pub fn off_minutes(&self) -> u32 {
        self.off_minutes
    }

    pub fn on_timer(&self) -> &PhaseTimer {
        &self.on_timer
    }

    pub fn off_timer(&self) -> &PhaseTimer {
        &self.off_timer
    }

    pub fn config(&self) -> &CyclerConfig {
        &self.config
    }
}

/// Async tick task: gates the controller to the configured interval
#[cfg(feature = "embassy-time")]
pub async fn cycler_task<H: CyclerHal>(mut cycler: DutyCycler, mut hal: H) {
    use embassy_time::Ticker;

    let mut ticker = Ticker::every(cycler.config().tick_interval);

    if cycler.start(&mut hal).is_err() {
        #[cfg(feature = "defmt")]
        defmt::error!("pump relay failed to initialize");
        return;
    }

    loop {
        ticker.next().await;
        if let Err(_e) = cycler.tick(&mut hal) {
            #[cfg(feature = "defmt")]
            defmt::warn!("tick failed: {}", _e);
        }
    }
}
