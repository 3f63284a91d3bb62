//! Spinner display for long-running tree copies

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a source tree is being projected into a target
/// directory. Cleared on finish so the status lines printed afterwards
/// land on a clean row.
pub struct CopySpinner {
    bar: ProgressBar,
}

impl CopySpinner {
    pub fn start(message: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap();

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let spinner = CopySpinner::start("Copying blueprint/");
        spinner.finish();
    }

    #[test]
    fn test_spinner_template_parses() {
        // ProgressStyle::template returns an error on malformed templates;
        // constructing a spinner proves ours is well-formed
        let spinner = CopySpinner::start("message");
        assert!(!spinner.bar.is_finished());
        spinner.finish();
    }
}
