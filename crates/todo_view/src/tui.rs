use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
    api::TodoBackend,
    view::{FormField, NewTodoForm, TodoView, ViewStatus},
};

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const LIST_HELP: &str = "j/k move  |  space toggle  |  d delete  |  n new  |  r refresh  |  q quit";
const FORM_HELP: &str = "tab switch field  |  enter submit  |  esc close";

struct TuiCleanup;

impl Drop for TuiCleanup {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    }
}

pub async fn run_tui<B: TodoBackend>(view: &mut TodoView<B>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide).context("failed to init tui")?;
    let _cleanup = TuiCleanup;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.clear().ok();

    view.refresh().await;

    loop {
        terminal.draw(|frame| draw_ui(frame, view))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(view, key).await {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Applies one key press. Returns `true` when the user asked to quit.
pub async fn handle_key<B: TodoBackend>(view: &mut TodoView<B>, key: KeyEvent) -> bool {
    if let Some(form) = view.form_mut() {
        match key.code {
            KeyCode::Esc => view.close_form(),
            KeyCode::Tab | KeyCode::BackTab => form.switch_field(),
            KeyCode::Enter => view.submit_form().await,
            KeyCode::Backspace => {
                form.focused_mut().pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.focused_mut().clear();
            }
            KeyCode::Char(ch) => form.focused_mut().push(ch),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('j') | KeyCode::Down => view.select_next(),
        KeyCode::Char('k') | KeyCode::Up => view.select_previous(),
        KeyCode::Char(' ') => view.toggle_selected().await,
        KeyCode::Char('d') => view.delete_selected().await,
        KeyCode::Char('n') => view.open_form(),
        KeyCode::Char('r') => {
            view.clear_notice();
            view.refresh().await;
        }
        _ => {}
    }
    false
}

pub fn draw_ui<B: TodoBackend>(frame: &mut Frame<'_>, view: &TodoView<B>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header = Line::from(vec![
        Span::styled(
            "Todos",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  -  {}", status_label(view.status()))),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    match view.status() {
        ViewStatus::Ready(_) => render_list(frame, chunks[1], view),
        ViewStatus::Loading => {
            frame.render_widget(Paragraph::new("Loading..."), chunks[1]);
        }
        ViewStatus::Failed(message) => {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("Could not load todos: {message}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from("Press r to retry."),
            ])
            .wrap(Wrap { trim: true });
            frame.render_widget(body, chunks[1]);
        }
    }

    if let Some(notice) = view.notice() {
        let line = Paragraph::new(notice).style(Style::default().fg(Color::Yellow));
        frame.render_widget(line, chunks[2]);
    }

    let help = if view.form().is_some() { FORM_HELP } else { LIST_HELP };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    if let Some(form) = view.form() {
        render_form(frame, form);
    }
}

fn status_label(status: &ViewStatus) -> String {
    match status {
        ViewStatus::Loading => "loading".to_string(),
        ViewStatus::Ready(todos) => {
            let open = todos.iter().filter(|todo| !todo.completed).count();
            format!("{open} open, {} done", todos.len() - open)
        }
        ViewStatus::Failed(_) => "offline".to_string(),
    }
}

fn render_list<B: TodoBackend>(frame: &mut Frame<'_>, area: Rect, view: &TodoView<B>) {
    let todos = view.ordered();
    if todos.is_empty() {
        frame.render_widget(Paragraph::new("Nothing to do. Press n to add a todo."), area);
        return;
    }

    let items: Vec<ListItem> = todos
        .iter()
        .map(|todo| {
            let mark = if todo.completed { "[x]" } else { "[ ]" };
            let mut spans = vec![
                Span::styled(mark, Style::default().fg(Color::Green)),
                Span::raw(format!(" {}", todo.name)),
            ];
            if let Some(description) = todo.description.as_deref() {
                spans.push(Span::styled(
                    format!("  {description}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let style = if todo.completed {
                Style::default().add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(view.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_form(frame: &mut Frame<'_>, form: &NewTodoForm) {
    let area = centered(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let field = |label: &str, value: &str, focused: bool| {
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{label:<12}"), style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let body = Paragraph::new(vec![
        field("Name", &form.name, form.focus == FormField::Name),
        Line::from(""),
        field(
            "Description",
            &form.description,
            form.focus == FormField::Description,
        ),
    ])
    .block(Block::default().borders(Borders::ALL).title(" New todo "));
    frame.render_widget(body, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
