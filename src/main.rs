use clap::Parser;
use midiclock::{
    cli::{require_device, select_device, Args},
    config::Settings,
    handle_device_list,
    led::{DigitalOutput, LogLed},
    logging,
    midi::DefaultMidiEngine,
    timer::ThreadTimer,
    ui::ConsoleLed,
    EventLoop,
};
use std::process;
use std::sync::atomic::AtomicBool;

fn main() {
    let args = Args::parse();
    let settings = load_settings(&args);
    initialize_logging(&settings);

    let devices = handle_device_list();

    if args.device_list {
        list_available_devices(&devices);
        return;
    }

    let device_name = match require_device(resolve_device(&args, &settings, &devices), &devices) {
        Ok(device_name) => device_name,
        Err(error_msg) => {
            log::error!("{}", error_msg);
            eprintln!("{}", error_msg);
            process::exit(1);
        }
    };

    let engine = match DefaultMidiEngine::new(&device_name) {
        Ok(engine) => engine,
        Err(e) => {
            let error_msg = format!("Error connecting to MIDI device: {}", e);
            log::error!("{}", error_msg);
            eprintln!("{}", error_msg);
            process::exit(1);
        }
    };

    println!("Connected to MIDI device: {}", device_name);

    if settings.display && !args.no_display {
        run(engine, ConsoleLed::new());
    } else {
        run(engine, LogLed::new());
    }
}

fn load_settings(args: &Args) -> Settings {
    match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error reading settings: {}", e);
            process::exit(1);
        }
    }
}

fn initialize_logging(settings: &Settings) {
    if let Err(e) = logging::init_logger(settings.log_level) {
        eprintln!("Logger initialization failed: {}", e);
        process::exit(1);
    }
    log::info!("Application starting");
    log::info!("Settings: {}", settings);
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI devices:");
    for device in devices {
        println!("  - {}", device);
    }
}

fn resolve_device(args: &Args, settings: &Settings, devices: &[String]) -> Option<String> {
    if args.select_device {
        return select_device(devices);
    }
    args.bind_to_device
        .clone()
        .or_else(|| settings.device.clone())
}

fn run<L: DigitalOutput>(engine: DefaultMidiEngine, led: L) {
    let shutdown = AtomicBool::new(false);
    let mut event_loop = EventLoop::new(engine, ThreadTimer::new(), led);

    log::info!("Waiting for tempo or transport messages. Press Ctrl+C to exit...");
    println!("\nPress Ctrl+C to exit...");

    if let Err(e) = event_loop.run(&shutdown) {
        eprintln!("Clock stopped: {}", e);
        process::exit(1);
    }
}
