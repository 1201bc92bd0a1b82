//! Mirrors the running timer into the window title and a shareable location.
//!
//! A location looks like `#pomodoro/work/1500` or `#stopwatch/42`. Passing
//! one to `chronozen run` resumes that timer where it was.

use std::fmt;
use std::str::FromStr;

use super::app::{App, Tab};
use crate::timer::Mode;

const APP_NAME: &str = "ChronoZen";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Pomodoro { mode: Mode, secs: u64 },
    Stopwatch { secs: u64 },
}

impl Location {
    /// Parse a location, with or without the leading `#`.
    ///
    /// Anything that is not exactly one of the two shapes is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        let parts: Vec<&str> = raw.split('/').collect();
        match parts.as_slice() {
            ["pomodoro", mode, secs] => {
                let mode = match *mode {
                    "work" => Mode::Work,
                    "break" => Mode::Break,
                    _ => return None,
                };
                Some(Location::Pomodoro {
                    mode,
                    secs: parse_secs(secs)?,
                })
            }
            ["stopwatch", secs] => Some(Location::Stopwatch {
                secs: parse_secs(secs)?,
            }),
            _ => None,
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s).ok_or_else(|| format!("not a timer location: {s}"))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Pomodoro { mode, secs } => write!(f, "#pomodoro/{}/{secs}", mode.as_str()),
            Location::Stopwatch { secs } => write!(f, "#stopwatch/{secs}"),
        }
    }
}

fn parse_secs(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// What the window title and location should currently say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflection {
    pub title: String,
    pub location: Option<Location>,
}

pub fn reflect(app: &App) -> Reflection {
    let pomodoro = app.pomodoro();
    let stopwatch = app.stopwatch();
    match app.tab() {
        Tab::Pomodoro if pomodoro.running() => {
            let pending = app.tasks().pending();
            let secs = pomodoro.remaining_secs();
            Reflection {
                title: format!(
                    "{} - {} | {APP_NAME}",
                    format_clock(secs),
                    pomodoro.title_label(&pending)
                ),
                location: Some(Location::Pomodoro {
                    mode: pomodoro.mode(),
                    secs,
                }),
            }
        }
        Tab::Stopwatch if stopwatch.running => Reflection {
            title: format!("{} - Stopwatch | {APP_NAME}", format_clock(stopwatch.elapsed_secs)),
            location: Some(Location::Stopwatch {
                secs: stopwatch.elapsed_secs,
            }),
        },
        _ => {
            let pending = app.tasks().pending_count();
            let title = if pending > 0 {
                format!("({pending}) {APP_NAME}")
            } else {
                APP_NAME.to_string()
            };
            Reflection {
                title,
                location: None,
            }
        }
    }
}

/// `MM:SS`, or `H:MM:SS` once the value reaches an hour.
pub fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Permission;
    use crate::storage::MemoryStore;

    fn app(location: Option<Location>) -> App {
        App::load(Box::new(MemoryStore::new()), location, Permission::Default)
    }

    #[test]
    fn parses_both_shapes() {
        assert_eq!(
            Location::parse("#pomodoro/break/120"),
            Some(Location::Pomodoro {
                mode: Mode::Break,
                secs: 120
            })
        );
        assert_eq!(
            Location::parse("stopwatch/0"),
            Some(Location::Stopwatch { secs: 0 })
        );
    }

    #[test]
    fn rejects_malformed_locations() {
        for raw in [
            "",
            "#",
            "#pomodoro/foo",
            "#pomodoro/work",
            "#pomodoro/rest/10",
            "#pomodoro/work/10/extra",
            "#pomodoro/work/-5",
            "#pomodoro/work/+5",
            "#pomodoro/work/12abc",
            "#stopwatch/",
            "#stopwatch/1.5",
            "#timer/5",
        ] {
            assert_eq!(Location::parse(raw), None, "{raw}");
        }
    }

    #[test]
    fn display_parses_back() {
        let loc = Location::Pomodoro {
            mode: Mode::Work,
            secs: 1499,
        };
        assert_eq!(loc.to_string(), "#pomodoro/work/1499");
        assert_eq!(Location::parse(&loc.to_string()), Some(loc));
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(3725), "1:02:05");
    }

    #[test]
    fn idle_title_counts_pending_tasks() {
        let mut a = app(None);
        assert_eq!(reflect(&a).title, "ChronoZen");
        a.add_task("write report").unwrap();
        a.add_task("call mom").unwrap();
        let r = reflect(&a);
        assert_eq!(r.title, "(2) ChronoZen");
        assert_eq!(r.location, None);
    }

    #[test]
    fn running_pomodoro_is_reflected() {
        let a = app(Location::parse("#pomodoro/work/1499"));
        let r = reflect(&a);
        assert_eq!(r.title, "24:59 - Work | ChronoZen");
        assert_eq!(r.location, Location::parse("pomodoro/work/1499"));
    }

    #[test]
    fn running_stopwatch_is_reflected_only_on_its_tab() {
        let mut a = app(Location::parse("#stopwatch/65"));
        assert_eq!(reflect(&a).title, "01:05 - Stopwatch | ChronoZen");

        a.switch_tab();
        let r = reflect(&a);
        assert_eq!(r.title, "ChronoZen");
        assert_eq!(r.location, None);
    }
}
