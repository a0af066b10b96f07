pub mod console;
pub mod notify;

use std::io::{Stderr, Stdout};
use std::sync::Arc;

use crate::controller::events::Sinks;

pub use console::{ConsoleAnnouncer, ConsoleDisplay, ConsoleStatus, DisplayMode};
pub use notify::Notifier;

/// Terminal front end: progress on stderr, results on stdout.
pub fn console_sinks(notifier: Notifier, mode: DisplayMode) -> Sinks {
    let display: Arc<ConsoleDisplay<Stdout>> = Arc::new(ConsoleDisplay::new(std::io::stdout(), mode));
    let status: Arc<ConsoleStatus<Stderr>> = Arc::new(ConsoleStatus::new(std::io::stderr()));

    Sinks {
        announcer: Arc::new(ConsoleAnnouncer::new(notifier)),
        status,
        transcript: display.clone(),
        key_summary: display.clone(),
        curator_summary: display,
    }
}
