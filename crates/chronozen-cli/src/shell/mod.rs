//! Interactive terminal shell.
//!
//! One task owns the [`App`] and everything else talks to it through a
//! channel: a blocking key reader, one ticker per running timer, and
//! fire-and-forget congratulation requests.

pub mod notifier;
pub mod ticker;
pub mod ui;
pub mod view;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chronozen_core::shell::reflect;
use chronozen_core::shell::onboarding::Step;
use chronozen_core::{
    congratulate, notify, App, Config, Event, Focus, Key, KeyOutcome, MessageGenerator, Notifier,
    Shortcut, TimerKind,
};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use self::notifier::DesktopNotifier;
use self::ticker::Tickers;
use self::view::{Form, FormEdit, FormKind, View};

/// How often the screen is redrawn when nothing happens.
const REFRESH: Duration = Duration::from_millis(500);
const KEY_POLL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Tick(TimerKind),
    Congrats(Event),
    Redraw,
}

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the shell until the user quits.
pub async fn run(
    app: App,
    config: Config,
    generator: Option<Arc<dyn MessageGenerator>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_key_reader(tx.clone(), stop.clone());

    let mut shell = Shell::new(app, config, Box::new(DesktopNotifier), generator, tx);
    shell.open_pending_forms();
    info!("shell started");

    let result = event_loop(&mut terminal, &mut shell, &mut rx).await;

    stop.store(true, Ordering::Relaxed);
    shell.tickers.shutdown();
    restore_terminal(&mut terminal)?;
    let _ = reader.await;
    info!("shell stopped");
    result
}

async fn event_loop(
    terminal: &mut Term,
    shell: &mut Shell,
    rx: &mut mpsc::UnboundedReceiver<Msg>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut title = String::new();
    loop {
        terminal.draw(|f| ui::render(f, &shell.app, &shell.view))?;

        let next = reflect(&shell.app).title;
        if next != title {
            execute!(io::stdout(), SetTitle(&next))?;
            title = next;
        }

        if shell.view.quit {
            return Ok(());
        }

        match timeout(REFRESH, rx.recv()).await {
            Ok(Some(msg)) => shell.handle(msg),
            Ok(None) => return Ok(()),
            Err(_) => {}
        }
        shell.view.expire_toasts(Instant::now());
    }
}

fn setup_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Forward key presses until `stop` is set or the receiver is gone.
fn spawn_key_reader(
    tx: UnboundedSender<Msg>,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(KEY_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!(error = %e, "key reader failed");
                    break;
                }
            }
            let msg = match event::read() {
                Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Ok(TermEvent::Resize(..)) => Msg::Redraw,
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "key reader failed");
                    break;
                }
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    })
}

/// Map a terminal key to the keys the controller understands.
pub fn to_key(key: &KeyEvent) -> Option<Key> {
    match key.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Tab | KeyCode::BackTab => Some(Key::Tab),
        _ => None,
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub struct Shell {
    app: App,
    view: View,
    config: Config,
    notifier: Box<dyn Notifier + Send>,
    generator: Option<Arc<dyn MessageGenerator>>,
    tx: UnboundedSender<Msg>,
    tickers: Tickers,
}

impl Shell {
    pub fn new(
        app: App,
        config: Config,
        notifier: Box<dyn Notifier + Send>,
        generator: Option<Arc<dyn MessageGenerator>>,
        tx: UnboundedSender<Msg>,
    ) -> Self {
        let mut tickers = Tickers::new(tx.clone());
        tickers.sync(&app);
        Self {
            app,
            view: View::default(),
            config,
            notifier,
            generator,
            tx,
            tickers,
        }
    }

    pub fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Key(key) => self.on_key(key),
            Msg::Tick(timer) => {
                let today = chrono::Local::now().date_naive();
                let events = self.app.tick(timer, today);
                self.apply(events);
            }
            Msg::Congrats(event) => self.apply(vec![event]),
            Msg::Redraw => {}
        }
    }

    /// Show the name prompt while onboarding waits for it.
    fn open_pending_forms(&mut self) {
        if self.app.onboarding().step() == Step::AskName && self.view.form.is_none() {
            self.view.form = Some(Form::name());
        }
    }

    fn on_key(&mut self, event: KeyEvent) {
        if is_interrupt(&event) {
            self.view.quit = true;
            return;
        }
        let Some(key) = to_key(&event) else {
            return;
        };

        let focus = self.app.focus(self.view.form.is_some());
        if focus == Focus::TextInput {
            self.edit_form(key);
            return;
        }

        match self.app.handle_key(key, focus) {
            KeyOutcome::Applied(events) => self.apply(events),
            KeyOutcome::Passthrough(shortcut) => self.shortcut(shortcut),
            KeyOutcome::Ignored => {}
        }
    }

    fn edit_form(&mut self, key: Key) {
        let Some(form) = self.view.form.as_mut() else {
            return;
        };
        match form.edit(key) {
            FormEdit::Editing => {}
            FormEdit::Cancel => self.view.form = None,
            FormEdit::Submit => self.submit_form(),
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.view.form.take() else {
            return;
        };
        let result = match &form.kind {
            FormKind::AddTask => self.app.add_task(form.value(0)).map_err(|e| e.to_string()),
            FormKind::EditTask { id } => self
                .app
                .edit_task(id, form.value(0))
                .map_err(|e| e.to_string()),
            FormKind::Name => self.app.submit_name(form.value(0)).map_err(|e| e.to_string()),
            FormKind::Settings => {
                match (parse_minutes(form.value(0)), parse_minutes(form.value(1))) {
                    (Some(work), Some(brk)) => {
                        Ok(self.app.update_settings(work, brk, form.value(2), form.value(3)))
                    }
                    _ => Err("Minutes must be whole numbers".to_string()),
                }
            }
        };
        match result {
            Ok(events) => self.apply(events),
            Err(error) => {
                self.view.form = Some(Form {
                    error: Some(error),
                    ..form
                });
            }
        }
    }

    fn shortcut(&mut self, shortcut: Shortcut) {
        let len = self.app.tasks().len();
        let selected = self
            .app
            .tasks()
            .display_order()
            .get(self.view.cursor)
            .map(|t| (t.id.clone(), t.text.clone()));

        match shortcut {
            Shortcut::CursorUp => self.view.move_cursor(-1, len),
            Shortcut::CursorDown => self.view.move_cursor(1, len),
            Shortcut::ToggleTask => {
                if let Some((id, _)) = selected {
                    let events = self.app.toggle_task(&id);
                    self.apply(events);
                }
            }
            Shortcut::DeleteTask => {
                if let Some((id, _)) = selected {
                    let events = self.app.delete_task(&id);
                    self.apply(events);
                }
            }
            Shortcut::EditTask => {
                if let Some((id, text)) = selected {
                    self.view.form = Some(Form::edit_task(&id, &text));
                }
            }
            Shortcut::OpenSettings => {
                self.view.form = Some(Form::settings(self.app.pomodoro().settings()));
            }
            Shortcut::Quit => self.view.quit = true,
            other => debug!(?other, "unhandled shortcut"),
        }
    }

    /// Carry out the side effects handed back by the controller.
    fn apply(&mut self, events: Vec<Event>) {
        notify::dispatch(
            &events,
            self.notifier.as_ref(),
            self.app.permission(),
            self.config.notifications.sound,
        );

        for event in events {
            match event {
                Event::Toast { title, description } => self.view.push_toast(&title, &description),
                Event::CongratsRequested { name } => self.request_congrats(name),
                Event::PermissionRequested => {
                    let permission = self.notifier.request_permission();
                    info!(?permission, "notification permission resolved");
                    self.config.notifications.permission = permission;
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "failed to save notification permission");
                    }
                    let follow_up = self.app.permission_resolved(permission);
                    self.apply(follow_up);
                }
                Event::AddTaskRequested => self.view.form = Some(Form::add_task()),
                _ => {}
            }
        }

        self.tickers.sync(&self.app);
        self.view.clamp_cursor(self.app.tasks().len());
        self.open_pending_forms();
    }

    fn request_congrats(&self, name: String) {
        let Some(generator) = self.generator.clone() else {
            debug!("no message generator configured");
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(event) = congratulate(generator.as_ref(), &name).await {
                let _ = tx.send(Msg::Congrats(event));
            }
        });
    }
}

fn parse_minutes(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
