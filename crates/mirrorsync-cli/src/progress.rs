//! Progress display for the terminal

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mirrorsync_engine::ProgressSink;
use mirrorsync_types::ProgressEvent;
use std::time::Duration;

/// "Progress: N of M files (P%)"
pub fn progress_line(event: &ProgressEvent) -> String {
    format!(
        "Progress: {} of {} files ({:.0}%)",
        event.files_done,
        event.files_total,
        event.percent()
    )
}

/// Terminal progress sink.
///
/// Draws an indicatif bar when enabled, prints plain lines otherwise, and
/// stays silent in quiet mode. Clones share the same bar.
#[derive(Debug, Clone)]
pub struct SyncProgressBar {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl SyncProgressBar {
    /// Create a progress display
    pub fn new(use_bar: bool, quiet: bool) -> Self {
        let bar = (use_bar && !quiet).then(|| {
            let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%)")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        Self { bar, quiet }
    }

    /// A display that never prints
    pub fn hidden() -> Self {
        Self {
            bar: None,
            quiet: true,
        }
    }

    /// Finish and clear the bar
    pub fn finish_and_clear(&self) {
        if let Some(pb) = &self.bar {
            pb.finish_and_clear();
        }
    }
}

impl ProgressSink for SyncProgressBar {
    fn on_progress(&mut self, event: &ProgressEvent) {
        if let Some(pb) = &self.bar {
            pb.set_length(event.files_total);
            pb.set_position(event.files_done);
            pb.set_message(format!("Copying: {}", event.file_name()));
        } else if !self.quiet {
            println!("Copying: {}", event.file_name());
            println!("{}", progress_line(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line() {
        let event = ProgressEvent::new("/work/report.docx", 3, 4);
        assert_eq!(progress_line(&event), "Progress: 3 of 4 files (75%)");
    }

    #[test]
    fn test_hidden_sink_accepts_events() {
        let mut sink = SyncProgressBar::hidden();
        sink.on_progress(&ProgressEvent::new("/work/a.txt", 1, 1));
        sink.finish_and_clear();
    }
}
