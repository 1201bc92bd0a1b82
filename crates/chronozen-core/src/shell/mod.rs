//! Everything between raw input and the domain reducers: the app
//! controller, keyboard routing, onboarding, and title/location reflection.

pub mod app;
pub mod keymap;
pub mod onboarding;
pub mod reflection;

pub use app::{App, KeyOutcome, Tab, UserProfile};
pub use keymap::{route, Focus, Key, Shortcut};
pub use onboarding::{Onboarding, Step};
pub use reflection::{format_clock, reflect, Location, Reflection};
