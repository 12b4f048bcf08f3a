use log::{error, info};
use smart_plug::config::{self, Config};
use smart_plug::device::{
    Collaborators, Peripherals, SimulatedPin, command_channel, run_startup,
};
use smart_plug::input::ButtonRegistry;
use smart_plug::input::console::run_console;
use smart_plug::network::LoggingNetworkReset;
use smart_plug::remote::{AttributeStore, RemoteAccessory, WatchPublisher, run_persistence};
use std::sync::Arc;
use tokio::signal;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    // Environment must be settled before the runtime starts its worker threads
    config::load_dotenv();
    init_logger();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };
    runtime.block_on(run());
}

async fn run() {
    let config = Config::from_env();
    info!("Starting {} {}", config.device.manufacturer, config.device.name);
    info!("  Model: {}", config.device.model);
    info!("  Serial: {}", config.device.serial);
    info!("  Firmware: {}", config.device.firmware_revision);
    info!(
        "  Pins: relay={} led={} button={}",
        config.pins.relay, config.pins.status_led, config.pins.button
    );

    let store = AttributeStore::new(config.storage.state_file.clone());
    let restored_on = store.restore_on();
    let publisher = Arc::new(WatchPublisher::new(restored_on));
    let persistence_task = run_persistence(store, publisher.subscribe());
    let registry = Arc::new(ButtonRegistry::new());
    let (commands, rx) = command_channel();

    let peripherals = Peripherals {
        relay: SimulatedPin::new(config.pins.relay),
        status_led: SimulatedPin::new(config.pins.status_led),
    };
    let collaborators = Collaborators {
        publisher: Box::new(publisher.clone()),
        network: Box::new(LoggingNetworkReset),
    };

    let controller = match run_startup(
        &config,
        peripherals,
        restored_on,
        &*registry,
        collaborators,
        &commands,
    ) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let remote = RemoteAccessory::new(
        config.device.clone(),
        controller.state_view(),
        &publisher,
        commands,
    );
    let controller_task = tokio::spawn(controller.run(rx));
    let console_task = run_console(config.pins.button, registry.clone(), remote);

    info!("Accessory ready");
    info!("  - Commands: press, long, verylong, on, off, identify, wifi-reset, status");
    info!("  - Press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal");
        }
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
        }
    }

    console_task.abort();
    persistence_task.abort();
    controller_task.abort();
    info!("Accessory stopped");
}
