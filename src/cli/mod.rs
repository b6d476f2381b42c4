use clap::Parser;
use dialoguer::Select;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// List available MIDI devices
    #[arg(long)]
    pub device_list: bool,

    /// Bind to a specific MIDI device
    #[arg(long)]
    pub bind_to_device: Option<String>,

    /// Pick the MIDI device from an interactive list
    #[arg(long, conflicts_with = "bind_to_device")]
    pub select_device: bool,

    /// Settings file layered under MIDICLOCK_* environment variables
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Log beat LED edges instead of drawing them on the terminal
    #[arg(long)]
    pub no_display: bool,
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}

/// Resolves the device to bind. A missing name is an error listing the
/// available devices.
pub fn require_device(device_name: Option<String>, devices: &[String]) -> Result<String, String> {
    let Some(device_name) = device_name else {
        let mut error_msg = "Error: No MIDI device selected. Available devices:\n".to_string();
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        error_msg.push_str("Use --bind-to-device, --select-device or MIDICLOCK_DEVICE.\n");
        return Err(error_msg);
    };
    validate_device(&device_name, devices)?;
    Ok(device_name)
}

/// Prompts for one of `devices`. `None` if the list is empty or the prompt
/// was dismissed.
pub fn select_device(devices: &[String]) -> Option<String> {
    if devices.is_empty() {
        return None;
    }

    match Select::new()
        .with_prompt("MIDI device")
        .items(devices)
        .default(0)
        .interact_opt()
    {
        Ok(choice) => choice.map(|index| devices[index].clone()),
        Err(e) => {
            log::error!("Device selection failed: {}", e);
            None
        }
    }
}
