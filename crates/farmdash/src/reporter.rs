//! Terminal status reporting: a spinner while a request is in flight and one
//! line per outcome message.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use services::services::message::StatusReporter;

#[derive(Debug, Default)]
pub struct ConsoleReporter {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the spinner, drop success messages. Failures are still printed.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }
}

impl StatusReporter for ConsoleReporter {
    fn set_message(&self, text: &str, is_success: bool) {
        if is_success {
            if !self.quiet {
                println!("✓ {text}");
            }
        } else {
            eprintln!("✗ {text}");
        }
    }

    fn set_loading(&self, loading: bool) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if loading {
            if spinner.is_none() {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.set_message("Loading…");
                bar.enable_steady_tick(Duration::from_millis(80));
                *spinner = Some(bar);
            }
        } else if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }
}
