//! Spinners shown while waiting on the model

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner line that ends with a success or failure message
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start spinning with `message`
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Stop and leave `message` on the line
    pub fn succeed(self, message: impl Into<String>) {
        self.bar.finish_with_message(message.into());
    }

    /// Stop and replace the line with `message`
    pub fn fail(self, message: impl Into<String>) {
        self.bar.abandon_with_message(message.into());
    }
}
