//! One-second tick sources for the two timers.
//!
//! A timer has a ticker task exactly while it is running. [`Tickers::sync`]
//! is called after every state change to start or abort them.

use std::collections::HashMap;
use std::time::Duration;

use chronozen_core::{App, TimerKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::Msg;

pub const TICK: Duration = Duration::from_secs(1);

pub struct Tickers {
    tx: UnboundedSender<Msg>,
    handles: HashMap<TimerKind, JoinHandle<()>>,
}

impl Tickers {
    pub fn new(tx: UnboundedSender<Msg>) -> Self {
        Self {
            tx,
            handles: HashMap::new(),
        }
    }

    pub fn sync(&mut self, app: &App) {
        for timer in [TimerKind::Pomodoro, TimerKind::Stopwatch] {
            let running = app.is_running(timer);
            match (running, self.handles.contains_key(&timer)) {
                (true, false) => {
                    debug!(?timer, "ticker started");
                    self.handles.insert(timer, self.spawn(timer));
                }
                (false, true) => {
                    if let Some(handle) = self.handles.remove(&timer) {
                        handle.abort();
                        debug!(?timer, "ticker stopped");
                    }
                }
                _ => {}
            }
        }
    }

    pub fn is_ticking(&self, timer: TimerKind) -> bool {
        self.handles.contains_key(&timer)
    }

    pub fn shutdown(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    fn spawn(&self, timer: TimerKind) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut ticks = interval(TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval fires immediately.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                if tx.send(Msg::Tick(timer)).is_err() {
                    break;
                }
            }
        })
    }
}

impl Drop for Tickers {
    fn drop(&mut self) {
        self.shutdown();
    }
}
