// ui.rs

use crate::led::DigitalOutput;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const LIT: &str = "●";
const DARK: &str = "○";

fn create_beat_spinner(target: ProgressDrawTarget) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, target);
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix("Beat");
    pb.set_message(DARK);
    pb
}

/// Beat LED drawn as a glyph on the terminal.
pub struct ConsoleLed {
    spinner: ProgressBar,
    high: bool,
}

impl Default for ConsoleLed {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLed {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        ConsoleLed {
            spinner: create_beat_spinner(target),
            high: false,
        }
    }
}

impl DigitalOutput for ConsoleLed {
    fn set_high(&mut self) {
        self.high = true;
        self.spinner.set_message(LIT);
    }

    fn set_low(&mut self) {
        self.high = false;
        self.spinner.set_message(DARK);
    }

    fn is_high(&self) -> bool {
        self.high
    }
}

impl Drop for ConsoleLed {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}
