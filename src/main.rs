//! sweepd - sweep-and-avoid motion control daemon
//!
//! Brings up the I2C sensor rig and the stepper controller link, maps the
//! shared status region, and runs the sweep loop until SIGINT/SIGTERM.

use sweepd::bus::LinuxI2cBus;
use sweepd::config::Config;
use sweepd::control::Controller;
use sweepd::devices::SerialStepperDrive;
use sweepd::error::Result;
use sweepd::sensing::MuxSensorHub;
use sweepd::status::SharedMemoryStatus;
use std::env;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `sweepd <path>` (positional)
/// - `sweepd --config <path>` (flag-based)
/// - `sweepd -c <path>` (short flag)
///
/// Defaults to `/etc/sweepd.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/sweepd.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = Config::from_file(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.clone()),
    )
    .init();

    log::info!("sweepd starting (config: {})", config_path);

    // Startup resource faults are fatal; without the bus, the drive, or the
    // status region there is nothing useful to run.
    let bus = LinuxI2cBus::open(&config.hardware.i2c_bus)?;
    let drive = SerialStepperDrive::open(
        &config.hardware.stepper_port,
        config.hardware.stepper_baud,
        config.motion.stepper_speed,
    )?;
    let status = SharedMemoryStatus::create(&config.status.shm_path, config.status.capacity)?;

    // Sensor init failures are per-channel and non-fatal: the affected
    // channel reads as failed for the session.
    let hub = MuxSensorHub::initialize(Box::new(bus), &config);

    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))?;

    let mut controller = Controller::new(
        Box::new(hub),
        Box::new(drive),
        Box::new(status),
        &config,
    );
    controller.run(&shutdown);

    log::info!("sweepd stopped");
    Ok(())
}
