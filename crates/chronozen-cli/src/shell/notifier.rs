//! Desktop notifications and the audio cue.
//!
//! Notifications go through `notify-rust`; the sound is the terminal bell.
//! Failures are logged and otherwise ignored.

use std::io::Write;

use chronozen_core::{Notifier, Permission};
use notify_rust::Notification;
use tracing::{debug, warn};

const APP_NAME: &str = "ChronoZen";

#[derive(Debug, Default)]
pub struct DesktopNotifier;

/// The notification shown for `title` and `body`.
fn build(title: &str, body: Option<&str>) -> Notification {
    let mut notification = Notification::new();
    notification.summary(title).appname(APP_NAME);
    if let Some(body) = body {
        notification.body(body);
    }
    notification
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: Option<&str>) {
        let notification = build(title, body);
        // Delivery can block on the notification daemon; keep it off the
        // controller task.
        std::thread::spawn(move || {
            if let Err(e) = notification.show() {
                warn!(error = %e, "desktop notification failed");
            }
        });
    }

    fn play_sound(&self) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }

    /// Shows a confirmation notification; permission follows whether it
    /// could be delivered.
    fn request_permission(&mut self) -> Permission {
        match build("Notifications enabled", Some("You'll get alerts for timer sessions.")).show() {
            Ok(_) => Permission::Granted,
            Err(e) => {
                debug!(error = %e, "notifications unavailable");
                Permission::Denied
            }
        }
    }
}
