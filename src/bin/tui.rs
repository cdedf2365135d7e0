//! Terminal User Interface for folder-sizes
//!
//! # Architecture
//!
//! A thin wrapper around [`folder_sizes::Browser`]. It uses `ratatui` for
//! rendering and maps keys onto the browser's triggers:
//! Enter opens the selected row, Backspace goes back, `s` selects a folder.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use folder_sizes::{clamp_selection, logging, Activation, Browser, Opener, SizeUnits};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::{env, io, path::PathBuf, time::Duration};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "folder-sizes-tui", version, about = "Browse folder sizes in the terminal")]
struct Args {
    /// Folder to show at startup (defaults to the current directory)
    path: Option<PathBuf>,

    /// Label sizes GiB/MiB instead of GB/MB
    #[arg(long)]
    binary_units: bool,

    /// Write logs to this file; nothing is logged otherwise
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Something the user asked for that needs the browser to list a folder.
enum Action {
    Activate(PathBuf),
    Back,
    Select(PathBuf),
    Refresh,
}

struct App {
    browser: Browser,
    table_state: TableState,
    should_quit: bool,
    popup_message: Option<String>,
    /// Text typed into the "select folder" prompt while it is open
    prompt: Option<String>,
    /// Folder being listed right now, shown while the walk blocks
    busy: Option<PathBuf>,
    /// An opener may have written over the screen
    needs_clear: bool,
}

impl App {
    fn new(browser: Browser) -> Self {
        Self {
            browser,
            table_state: TableState::default(),
            should_quit: false,
            popup_message: None,
            prompt: None,
            busy: None,
            needs_clear: false,
        }
    }

    fn show_popup(&mut self, message: String) {
        self.popup_message = Some(message);
    }

    fn close_popup(&mut self) {
        self.popup_message = None;
    }

    fn selected_path(&self) -> Option<PathBuf> {
        let idx = self.table_state.selected()?;
        self.browser.entries().get(idx).map(|e| e.path.clone())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.browser.entries().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
    }

    /// Folder the action will list, if any.
    fn target_of(&self, action: &Action) -> Option<PathBuf> {
        match action {
            Action::Activate(path) if path.is_dir() => Some(path.clone()),
            Action::Activate(_) => None,
            Action::Select(path) => Some(path.clone()),
            Action::Back => self.browser.history().iter().rev().nth(1).map(PathBuf::from),
            Action::Refresh => self.browser.current_folder().map(PathBuf::from),
        }
    }

    fn perform(&mut self, action: Action) {
        let result = match action {
            Action::Activate(path) => self.browser.activate(&path).map(|activation| {
                if activation == Activation::Opened {
                    self.needs_clear = true;
                }
            }),
            Action::Back => self.browser.go_back(),
            Action::Select(path) => self.browser.select_folder(&path),
            Action::Refresh => self.browser.refresh(),
        };

        if let Err(e) = result {
            error!(error = %e, "action failed");
            self.show_popup(format!("✗ {}", e));
        }

        let len = self.browser.entries().len();
        self.table_state
            .select(clamp_selection(self.table_state.selected(), len));
    }

    fn handle_prompt_key(&mut self, code: KeyCode) -> Option<Action> {
        let input = self.prompt.as_mut()?;
        match code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let typed = self.prompt.take().unwrap_or_default();
                let typed = typed.trim();
                if !typed.is_empty() {
                    self.table_state.select(None);
                    return Some(Action::Select(PathBuf::from(typed)));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<Action> {
        if self.prompt.is_some() {
            return self.handle_prompt_key(code);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Enter => self.selected_path().map(Action::Activate),
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => {
                if self.browser.can_go_back() {
                    self.table_state.select(None);
                    Some(Action::Back)
                } else {
                    None
                }
            }
            KeyCode::Char('s') => {
                let start = self
                    .browser
                    .current_folder()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(start);
                None
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        }
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(ref log_file) = args.log_file {
        logging::init_file_logging(log_file)?;
    }

    let start_path = match args.path {
        Some(path) => path,
        None => env::current_dir()?,
    };
    let units = if args.binary_units {
        SizeUnits::Binary
    } else {
        SizeUnits::Legacy
    };
    let mut app = App::new(Browser::new(Opener::detect()).with_units(units));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run UI loop
    let res = run_app(&mut terminal, &mut app, Action::Select(start_path));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

// ============================================================================
// UI EVENT LOOP
// ============================================================================

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, first: Action) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    let mut pending = Some(first);

    loop {
        if let Some(action) = pending.take() {
            // Listing blocks until the walk is done, so say what we are doing first.
            app.busy = app.target_of(&action);
            if app.busy.is_some() {
                terminal.draw(|f| ui(f, app))?;
            }
            app.perform(action);
            app.busy = None;
        }

        if app.needs_clear {
            terminal.clear()?;
            app.needs_clear = false;
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press, not release
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Handle popup close first
                if app.popup_message.is_some() {
                    app.close_popup();
                    continue;
                }

                pending = app.handle_key(key.code);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

// ============================================================================
// UI RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.busy {
        Some(ref path) => render_busy(f, chunks[1], path),
        None => render_results(f, chunks[1], app),
    }

    render_footer(f, chunks[2], app);

    if let Some(ref input) = app.prompt {
        render_prompt(f, input);
    }

    if let Some(ref message) = app.popup_message {
        render_popup(f, message);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = app
        .browser
        .current_folder()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "No folder selected".to_string());

    let header = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" folder-sizes ")
                .title(
                    Line::from(format!(" v{} ", env!("CARGO_PKG_VERSION")))
                        .alignment(Alignment::Right),
                ),
        )
        .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn render_busy(f: &mut Frame, area: Rect, path: &std::path::Path) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⟳ Measuring folder sizes...",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(path.display().to_string()),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let browser = &app.browser;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from(Line::from("Size").alignment(Alignment::Right)),
    ])
    .style(bold);

    let rows = browser.entries().iter().map(|entry| {
        let name_style = if entry.is_dir {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(Span::styled(entry.name.clone(), name_style)),
            Cell::from(
                Line::from(Span::styled(
                    browser.format(entry.size),
                    Style::default().fg(Color::Green),
                ))
                .alignment(Alignment::Right),
            ),
        ])
    });

    let title = format!(
        "Contents | Total: {} | Skipped: {}",
        browser.format(browser.total_size()),
        browser.report().skipped.len()
    );

    let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(16)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let back_color = if app.browser.can_go_back() {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let key_hints = if app.prompt.is_some() {
        vec![
            key("Enter", Color::Green),
            Span::raw(" Show folder "),
            key("Esc", Color::Yellow),
            Span::raw(" Cancel "),
        ]
    } else {
        vec![
            key("Enter", Color::Green),
            Span::raw(" Open "),
            key("⌫", back_color),
            Span::raw(" Back "),
            key("S", Color::Green),
            Span::raw(" Select folder "),
            key("R", Color::Green),
            Span::raw(" Refresh "),
            key("Q", Color::Yellow),
            Span::raw(" Quit "),
        ]
    };

    let footer = Paragraph::new(Line::from(key_hints))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn render_prompt(f: &mut Frame, input: &str) {
    let area = centered_rect(70, 20, f.area());

    let block = Block::default()
        .title(" Select folder ")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));

    let text = Paragraph::new(format!("{}_", input))
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(text, area);
}

fn render_popup(f: &mut Frame, message: &str) {
    let area = centered_rect(60, 40, f.area());

    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));

    let text = Paragraph::new(message)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(text, area);
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
