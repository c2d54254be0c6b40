#![cfg_attr(target_arch = "riscv32", no_std)]
#![cfg_attr(target_arch = "riscv32", no_main)]

#[cfg(target_arch = "riscv32")]
mod firmware {
    #[cfg(feature = "defmt")]
    use defmt_rtt as _;

    // RISC-V runtime
    use riscv_rt as _;

    // Panic handler
    use panic_halt as _;

    use embassy_executor::Spawner;
    use embassy_time::Duration;

    use pump_cycler_firmware::ch32v203_hardware::PumpBoard;
    use pump_cycler_firmware::tasks::cycler_task_board;
    use pump_cycler_firmware::{default_config, DutyCycler};

    /// Main firmware entry point
    #[embassy_executor::main]
    async fn main(spawner: Spawner) {
        #[cfg(feature = "defmt")]
        defmt::info!("🚿 Pump cycler firmware starting...");

        let mut board = PumpBoard::new();
        if board.init().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("board init failed");
        }
        #[cfg(feature = "defmt")]
        defmt::info!("✅ Hardware initialized");

        // 60 minutes ON / 60 minutes OFF, 10 ms tick, 1 s run-LED blink
        let config = default_config();
        #[cfg(feature = "defmt")]
        defmt::info!(
            "⚙️ Duty cycle: {} min on / {} min off",
            config.on_minutes,
            config.off_minutes
        );

        let cycler = DutyCycler::new(config);
        spawner.must_spawn(cycler_task_board(cycler, board));

        #[cfg(feature = "defmt")]
        defmt::info!("✨ Pump cycler ready!");

        // Main supervision loop
        loop {
            embassy_time::Timer::after(Duration::from_secs(1)).await;
            #[cfg(feature = "defmt")]
            defmt::trace!("💓 Heartbeat");
        }
    }
}

// Stub entry for host builds of the workspace
#[cfg(not(target_arch = "riscv32"))]
fn main() {
    eprintln!("pump-cycler firmware must be built for the riscv32 target");
}
