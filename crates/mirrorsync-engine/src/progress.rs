//! Progress reporting for mirror runs

use mirrorsync_types::ProgressEvent;
use tracing::info;

/// Receiver of per-file progress events.
///
/// Events are delivered synchronously on the thread running the mirror, in
/// walk order, once per file and before that file is compared or copied.
/// Any `FnMut(&ProgressEvent)` closure is a sink.
pub trait ProgressSink {
    /// Called once per file
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent),
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event);
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

/// Sink that keeps every event
#[derive(Debug, Clone, Default)]
pub struct ProgressRecorder {
    events: Vec<ProgressEvent>,
}

impl ProgressRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Take the recorded events
    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
    }
}

impl ProgressSink for ProgressRecorder {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Sink that writes each event to the log at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&mut self, event: &ProgressEvent) {
        info!(
            "Copying: {} ({} of {} files, {:.0}%)",
            event.file_name(),
            event.files_done,
            event.files_total,
            event.percent()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliver(sink: &mut dyn ProgressSink) {
        sink.on_progress(&ProgressEvent::new("/src/a.txt", 1, 2));
        sink.on_progress(&ProgressEvent::new("/src/b.txt", 2, 2));
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        let mut sink = |event: &ProgressEvent| seen.push(event.files_done);
        deliver(&mut sink);
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_recorder() {
        let mut recorder = ProgressRecorder::new();
        deliver(&mut recorder);

        assert_eq!(recorder.events().len(), 2);
        let events = recorder.into_events();
        assert_eq!(events[1].current_file.to_str(), Some("/src/b.txt"));
    }

    #[test]
    fn test_silent_sinks() {
        deliver(&mut NoProgress);
        deliver(&mut LogProgress);
    }
}
