//! Terminal rendering.

use chronozen_core::shell::keymap::SHORTCUT_HELP;
use chronozen_core::shell::onboarding::{Step, TOUR_FEATURES};
use chronozen_core::shell::{format_clock, reflect};
use chronozen_core::{App, Mode, Tab};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::view::{Form, View};

/// Draw the whole screen.
pub fn render(f: &mut Frame, app: &App, view: &View) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    if app.fullscreen() {
        render_timer(f, app, chunks[0]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);
        render_timer(f, app, body[0]);
        render_tasks(f, app, view, body[1]);
    }
    render_footer(f, app, chunks[1]);

    match app.onboarding().step() {
        Step::AskNotifications => render_permission_prompt(f, size),
        Step::Tour => render_tour(f, size),
        Step::AskName | Step::Done => {}
    }
    if app.onboarding().is_done() && app.pomodoro().awaiting_break_confirmation() {
        render_break_prompt(f, size);
    }
    if let Some(form) = &view.form {
        render_form(f, form, size);
    }
    render_toasts(f, view, size);
}

// ── Panes ────────────────────────────────────────────────────────────

fn render_timer(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" ChronoZen ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let selected = match app.tab() {
        Tab::Pomodoro => 0,
        Tab::Stopwatch => 1,
    };
    let tabs = Tabs::new(vec!["Pomodoro", "Stopwatch"])
        .select(selected)
        .highlight_style(selected_style())
        .divider("|");
    f.render_widget(tabs, rows[0]);

    let lines = match app.tab() {
        Tab::Pomodoro => pomodoro_lines(app),
        Tab::Stopwatch => stopwatch_lines(app),
    };
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, centered_rows(rows[1], 9));
}

fn pomodoro_lines(app: &App) -> Vec<Line<'static>> {
    let p = app.pomodoro();
    let label_style = match p.mode() {
        Mode::Work => title_style(),
        Mode::Break => break_style(),
    };
    let status = if p.awaiting_break_confirmation() {
        Span::styled("Session complete", running_style())
    } else if p.running() {
        Span::styled("● Running", running_style())
    } else {
        Span::styled("Paused", paused_style())
    };
    vec![
        Line::from(Span::styled(app.current_label().to_string(), label_style)),
        Line::raw(""),
        Line::from(Span::styled(format_clock(p.remaining_secs()), clock_style())),
        Line::raw(""),
        Line::from(status),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Sessions ", hint_style()),
            Span::raw(p.sessions_completed().to_string()),
            Span::raw("    "),
            Span::styled("Streak ", hint_style()),
            Span::raw(p.streak_days().to_string()),
        ]),
    ]
}

fn stopwatch_lines(app: &App) -> Vec<Line<'static>> {
    let s = app.stopwatch();
    let status = if s.running {
        Span::styled("● Running", running_style())
    } else {
        Span::styled("Paused", paused_style())
    };
    vec![
        Line::from(Span::styled("Stopwatch", title_style())),
        Line::raw(""),
        Line::from(Span::styled(format_clock(s.elapsed_secs), clock_style())),
        Line::raw(""),
        Line::from(status),
    ]
}

fn render_tasks(f: &mut Frame, app: &App, view: &View, area: Rect) {
    let title = format!(" Tasks ({} pending) ", app.tasks().pending_count());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    let tasks = app.tasks().display_order();
    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press T to add one.")
            .style(hint_style())
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    // Pending tasks come first, so a pending row index is its pending index.
    let active = app.active_task_index();
    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_active = !task.completed && active == Some(i);
            let (marker, style) = if task.completed {
                ("[x] ", done_style())
            } else if is_active {
                ("[ ] ", running_style())
            } else {
                ("[ ] ", Style::default())
            };
            ListItem::new(Line::from(vec![
                Span::raw(if is_active { "▶ " } else { "  " }),
                Span::raw(marker),
                Span::styled(task.text.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(selected_style());
    let mut state = ListState::default();
    state.select(Some(view.cursor.min(tasks.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(
        " space start/pause  r reset  s switch  t add  x done  e edit  d delete  [ ] task  , settings  f focus  q quit",
    )];
    if let Some(location) = reflect(app).location {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("share {location}"), title_style()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(hint_style()), area);
}

// ── Modals ───────────────────────────────────────────────────────────

fn render_break_prompt(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("You've completed a focus session."),
        Line::raw("Time for a well-deserved break?"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y] ", title_style()),
            Span::raw("Start Break    "),
            Span::styled("[n] ", title_style()),
            Span::raw("Maybe Later"),
        ]),
    ];
    render_modal(f, area, " Great job! ", lines, 50, 30);
}

fn render_permission_prompt(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("Allow notifications to get alerts for timer sessions and sound cues."),
        Line::raw("It's a great way to stay on track!"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y] ", title_style()),
            Span::raw("Allow    "),
            Span::styled("[n] ", title_style()),
            Span::raw("Maybe Later"),
        ]),
    ];
    render_modal(f, area, " Stay in the loop! ", lines, 60, 30);
}

fn render_tour(f: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::raw("Here's a quick overview of what you can do:"),
        Line::raw(""),
    ];
    for (title, description) in TOUR_FEATURES {
        lines.push(Line::from(Span::styled(*title, title_style())));
        lines.push(Line::from(Span::styled(*description, hint_style())));
        lines.push(Line::raw(""));
    }
    for (keys, description) in SHORTCUT_HELP {
        lines.push(Line::from(vec![
            Span::styled(format!("{keys:>8}  "), modal_title_style()),
            Span::raw(*description),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Press Enter to get started", title_style())));
    render_modal(f, area, " Welcome to ChronoZen! ", lines, 70, 85);
}

fn render_form(f: &mut Frame, form: &Form, area: Rect) {
    let mut lines = vec![Line::raw("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        lines.push(Line::raw(if focused {
            format!("{}: (editing)", field.label)
        } else {
            format!("{}:", field.label)
        }));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(field.value.clone(), modal_title_style()),
            Span::styled(if focused { "█" } else { "" }, modal_title_style()),
        ]));
        lines.push(Line::raw(""));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), error_style())));
    }
    lines.push(Line::from(Span::styled(
        "Enter save  Tab next field  Esc cancel",
        hint_style(),
    )));
    let height = if form.fields.len() > 1 { 60 } else { 35 };
    render_modal(f, area, form.title(), lines, 50, height);
}

fn render_toasts(f: &mut Frame, view: &View, area: Rect) {
    let width = area.width.min(48);
    let mut y = area.y + 1;
    for toast in view.toasts() {
        if y + 4 > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, 4);
        f.render_widget(Clear, rect);
        let body = Paragraph::new(toast.description.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(title_style())
                    .title(Span::styled(format!(" {} ", toast.title), title_style())),
            );
        f.render_widget(body, rect);
        y += 4;
    }
}

fn render_modal(
    f: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line<'_>>,
    percent_x: u16,
    percent_y: u16,
) {
    let rect = centered_rect(percent_x, percent_y, area);
    f.render_widget(Clear, rect);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(modal_bg_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), modal_title_style())),
        );
    f.render_widget(paragraph, rect);
}

// ── Layout helpers ───────────────────────────────────────────────────

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// A band of `height` rows centred vertically in `area`.
fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let top = area.y + (area.height - height) / 2;
    Rect::new(area.x, top, area.width, height)
}

// ── Styles ───────────────────────────────────────────────────────────

fn title_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn clock_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

fn break_style() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

fn running_style() -> Style {
    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
}

fn paused_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn done_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT)
}

fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD)
}
