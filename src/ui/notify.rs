use notify_rust::Notification;
use tracing::debug;

use crate::error::Priority;

const APP_NAME: &str = "yt-scribe";

/// Desktop notifications for announcements. Disabled unless configured.
#[derive(Debug, Clone)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn notify(&self, message: &str, priority: Priority) {
        if !self.enabled {
            return;
        }

        let result = Notification::new()
            .appname(APP_NAME)
            .summary(summary_for(priority))
            .body(message)
            .show();
        if let Err(error) = result {
            debug!(error = %error, "desktop notification failed");
        }
    }
}

fn summary_for(priority: Priority) -> &'static str {
    match priority {
        Priority::Polite => "yt-scribe",
        Priority::Assertive => "yt-scribe: attention",
    }
}
