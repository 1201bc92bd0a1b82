//! Notification and sound side channel.
//!
//! Implementations must swallow their own failures: a missing notification
//! daemon or a broken audio device never changes application state.

use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Whether desktop notifications may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

pub trait Notifier {
    fn notify(&self, title: &str, body: Option<&str>);

    fn play_sound(&self);

    /// Ask the platform for permission. Implementations without a permission
    /// model simply grant it.
    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }
}

/// Forward the notification and sound effects in `events` to `notifier`.
///
/// Notifications are dropped unless `permission` is granted; sounds are
/// dropped when `sound` is off. Every other event is ignored here.
pub fn dispatch(events: &[Event], notifier: &dyn Notifier, permission: Permission, sound: bool) {
    for event in events {
        match event {
            Event::Notify { title, body } if permission == Permission::Granted => {
                notifier.notify(title, body.as_deref());
            }
            Event::PlaySound if sound => notifier.play_sound(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        notes: RefCell<Vec<String>>,
        sounds: RefCell<u32>,
    }

    impl Notifier for Recorder {
        fn notify(&self, title: &str, _body: Option<&str>) {
            self.notes.borrow_mut().push(title.to_string());
        }

        fn play_sound(&self) {
            *self.sounds.borrow_mut() += 1;
        }
    }

    #[test]
    fn notifications_require_permission() {
        let rec = Recorder::default();
        let events = vec![Event::notify("Timer paused", "Take a breath."), Event::PlaySound];

        dispatch(&events, &rec, Permission::Default, true);
        assert!(rec.notes.borrow().is_empty());
        assert_eq!(*rec.sounds.borrow(), 1);

        dispatch(&events, &rec, Permission::Granted, false);
        assert_eq!(rec.notes.borrow().as_slice(), ["Timer paused"]);
        assert_eq!(*rec.sounds.borrow(), 1);
    }
}
