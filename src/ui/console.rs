use std::io::Write;
use std::sync::Mutex;

use tracing::{info, warn};

use crate::api::models::{CuratorSummary, KeySummary};
use crate::controller::composer::TranscriptView;
use crate::controller::events::{Announcer, DisplaySink, SinkUpdate, StatusSink};
use crate::error::Priority;
use crate::output::{render_curator_summary, render_key_summary};
use crate::ui::notify::Notifier;

/// Logs every announcement and forwards it to desktop notifications.
pub struct ConsoleAnnouncer {
    notifier: Notifier,
}

impl ConsoleAnnouncer {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }
}

impl Announcer for ConsoleAnnouncer {
    fn announce(&self, message: &str, priority: Priority) {
        match priority {
            Priority::Polite => info!(announcement = message, "announce"),
            Priority::Assertive => warn!(announcement = message, "announce"),
        }
        self.notifier.notify(message, priority);
    }
}

struct StatusLine<W> {
    out: W,
    last: Option<String>,
}

/// Progress lines for the terminal. Repeats of the same status are folded.
pub struct ConsoleStatus<W: Write + Send> {
    inner: Mutex<StatusLine<W>>,
}

impl<W: Write + Send> ConsoleStatus<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(StatusLine { out, last: None }),
        }
    }

    pub fn into_inner(self) -> W {
        match self.inner.into_inner() {
            Ok(line) => line.out,
            Err(poison) => poison.into_inner().out,
        }
    }
}

impl<W: Write + Send> StatusSink for ConsoleStatus<W> {
    fn show_status(&self, status: &str) {
        let mut line = self
            .inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        if line.last.as_deref() == Some(status) {
            return;
        }
        line.last = Some(status.to_owned());
        if let Err(error) = writeln!(line.out, "... {status}") {
            warn!(error = %error, "failed to write status line");
        }
    }

    fn show_error(&self, message: &str) {
        let mut line = self
            .inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        line.last = None;
        if let Err(error) = writeln!(line.out, "{message}") {
            warn!(error = %error, "failed to write error line");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Text,
    /// Nothing is printed as results arrive; the caller prints the final JSON.
    Quiet,
}

/// Transcript and summary panels written as titled text blocks.
pub struct ConsoleDisplay<W: Write + Send> {
    out: Mutex<W>,
    mode: DisplayMode,
}

impl<W: Write + Send> ConsoleDisplay<W> {
    pub fn new(out: W, mode: DisplayMode) -> Self {
        Self {
            out: Mutex::new(out),
            mode,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn panel<T>(&self, title: &str, update: SinkUpdate<'_, T>, render: impl Fn(&T) -> String) {
        if self.mode == DisplayMode::Quiet {
            return;
        }
        let body = match update {
            SinkUpdate::Ready(value) => render(value),
            SinkUpdate::Error(message) => format!("Error: {message}\n"),
        };

        let mut out = self.out.lock().unwrap_or_else(|poison| poison.into_inner());
        if let Err(error) = write!(out, "\n== {title} ==\n{body}").and_then(|()| out.flush()) {
            warn!(error = %error, panel = title, "failed to write panel");
        }
    }
}

impl<W: Write + Send> DisplaySink<TranscriptView> for ConsoleDisplay<W> {
    fn update(&self, update: SinkUpdate<'_, TranscriptView>) {
        self.panel("Transcript", update, TranscriptView::render_text);
    }
}

impl<W: Write + Send> DisplaySink<KeySummary> for ConsoleDisplay<W> {
    fn update(&self, update: SinkUpdate<'_, KeySummary>) {
        self.panel("Key summary", update, |summary: &KeySummary| {
            render_key_summary(summary)
        });
    }
}

impl<W: Write + Send> DisplaySink<CuratorSummary> for ConsoleDisplay<W> {
    fn update(&self, update: SinkUpdate<'_, CuratorSummary>) {
        self.panel("Curator summary", update, render_curator_summary);
    }
}
