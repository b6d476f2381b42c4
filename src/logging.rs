use simplelog::*;
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();
static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Directory holding `app.log`: `~/.local/share/midiclock/logs`.
pub fn log_dir() -> Result<PathBuf, Error> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not set"))?;

    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("midiclock")
        .join("logs"))
}

/// Installs the file logger. Only the first call takes effect.
pub fn init_logger(level: LevelFilter) -> Result<(), Error> {
    let log_dir = log_dir()?;

    // Create the log directory if it doesn't exist
    fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("app.log"))?;

    let config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Debug)
        .build();

    INIT.call_once(|| {
        if CombinedLogger::init(vec![WriteLogger::new(level, config, log_file)]).is_ok() {
            LOGGER_INITIALIZED.store(true, Ordering::SeqCst);
        }
    });

    if LOGGER_INITIALIZED.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::Other, "Logger initialization failed"))
    }
}
