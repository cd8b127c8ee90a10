//! Progress indicators with CI fallback

use super::context::UiContext;
use console::style;
use std::time::Instant;

/// A task spinner that degrades to plain lines outside a terminal
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
    quiet: bool,
    started: Option<Instant>,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
            quiet: ctx.is_quiet(),
            started: None,
        }
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        self.started = Some(Instant::now());
        if self.quiet {
            return;
        }
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message, suffixed with the elapsed time
    pub fn stop(&mut self, message: &str) {
        let message = self.with_elapsed(message);
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else if !self.quiet {
            println!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else if !self.quiet {
            println!("{} {}", style("[FAIL]").red(), message);
        }
    }

    fn with_elapsed(&self, message: &str) -> String {
        match self.started {
            Some(started) => format!("{} ({:.1}s)", message, started.elapsed().as_secs_f64()),
            None => message.to_string(),
        }
    }
}
