//! Ratatui interface: search form, result list, cover preview, settings.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};
use tracing::info;

mod about;
mod config;
mod cover;
mod home;

use crate::base_system::context::Config;
use crate::base_system::logging::take_broadcast_rx;
use crate::openlibrary::client::{ClientOptions, OpenLibraryClient};
use crate::openlibrary::request::SearchField;
use crate::search::controller::{SearchController, SearchPhase};
use crate::search::notify::NotificationKind;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const LOG_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiExit {
    Quit,
    SwitchToOldCli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Menu,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Home,
    Cover,
    Config,
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MenuAction {
    Search,
    ToggleField,
    Config,
    About,
    Quit,
}

const MENU_ITEMS: &[(&str, MenuAction)] = &[
    ("Search", MenuAction::Search),
    ("Switch field (title/author)", MenuAction::ToggleField),
    ("Settings", MenuAction::Config),
    ("About", MenuAction::About),
    ("Quit", MenuAction::Quit),
];

#[derive(Debug)]
enum WorkerMsg {
    CoverReady {
        title: String,
        bytes: Option<Vec<u8>>,
    },
}

pub(super) struct App {
    input: String,
    field: SearchField,
    focus: Focus,
    view: View,
    previous_view: View,
    status: String,
    messages: Vec<String>,
    logs: Vec<String>,
    list_state: ListState,
    menu_state: ListState,
    config: Config,
    config_path: PathBuf,
    client: Arc<OpenLibraryClient>,
    controller: SearchController,
    should_quit: bool,
    switch_to_old_cli: bool,

    // worker (cover fetches)
    worker_tx: Sender<WorkerMsg>,
    worker_rx: Receiver<WorkerMsg>,

    // spinner
    spinner_active: bool,
    spinner_text: String,
    spinner_idx: usize,
    spinner_last: Instant,

    // cover state
    cover_lines: Vec<String>,
    cover_title: String,

    // settings state
    cfg_state: ListState,
    cfg_editing: Option<usize>,
    cfg_edit_buffer: String,
    last_config_layout: Option<[Rect; 3]>,

    // about state
    about_btn_state: ListState,
    last_about_buttons: Option<Rect>,

    // home layout cache (for mouse)
    last_home_layout: Option<[Rect; 5]>,

    // log
    log_rx: Option<crossbeam_channel::Receiver<String>>,
}

impl App {
    fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let client = Arc::new(OpenLibraryClient::new(ClientOptions {
            request_timeout: config.timeout(),
            ..ClientOptions::default()
        })?);
        let controller = SearchController::new(client.clone());
        let (worker_tx, worker_rx) = mpsc::channel();

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));
        let mut cfg_state = ListState::default();
        cfg_state.select(Some(0));
        let mut about_btn_state = ListState::default();
        about_btn_state.select(Some(0));

        let field = config.default_field();

        Ok(Self {
            input: String::new(),
            field,
            focus: Focus::Input,
            view: View::Home,
            previous_view: View::Home,
            status: "Type a book title or author name, Enter searches, Tab moves focus, q quits."
                .to_string(),
            messages: Vec::new(),
            logs: Vec::new(),
            list_state: ListState::default(),
            menu_state,
            config,
            config_path,
            client,
            controller,
            should_quit: false,
            switch_to_old_cli: false,
            worker_tx,
            worker_rx,
            spinner_active: false,
            spinner_text: String::new(),
            spinner_idx: 0,
            spinner_last: Instant::now(),
            cover_lines: Vec::new(),
            cover_title: String::new(),
            cfg_state,
            cfg_editing: None,
            cfg_edit_buffer: String::new(),
            last_config_layout: None,
            about_btn_state,
            last_about_buttons: None,
            last_home_layout: None,
            log_rx: take_broadcast_rx(),
        })
    }

    fn push_message(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
        if self.messages.len() > 8 {
            let overflow = self.messages.len() - 8;
            self.messages.drain(0..overflow);
        }
    }

    fn push_log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        let trimmed = msg.trim_end_matches(['\r', '\n']);
        self.logs.push(trimmed.to_string());
        if self.logs.len() > 200 {
            let overflow = self.logs.len() - 200;
            self.logs.drain(0..overflow);
        }
    }

    fn select_next(&mut self) {
        let len = self.controller.results().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let next = match self.list_state.selected() {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        let len = self.controller.results().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let prev = match self.list_state.selected() {
            Some(0) | None => len.saturating_sub(1),
            Some(idx) => idx - 1,
        };
        self.list_state.select(Some(prev));
    }
}

pub fn run(config: Config, config_path: PathBuf) -> Result<TuiExit> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    execute!(stdout, EnableMouseCapture).context("enable mouse capture")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("init terminal")?;

    let result = run_loop(&mut terminal, config, config_path);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), DisableMouseCapture).ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: Config,
    config_path: PathBuf,
) -> Result<TuiExit> {
    let mut app = App::new(config, config_path)?;

    loop {
        tick_spinner(&mut app);
        poll_controller(&mut app);
        poll_worker(&mut app);
        drain_log_channel(&mut app);

        terminal.draw(|f| draw_ui(f, &mut app))?;

        if !handle_event(&mut app)? {
            break;
        }
    }

    Ok(if app.switch_to_old_cli {
        TuiExit::SwitchToOldCli
    } else {
        TuiExit::Quit
    })
}

fn draw_ui(frame: &mut ratatui::Frame, app: &mut App) {
    match app.view {
        View::Home => home::draw_home(frame, app),
        View::Cover => cover::draw_cover(frame, app),
        View::Config => config::draw_config(frame, app),
        View::About => about::draw_about(frame, app),
    }
}

fn handle_event(app: &mut App) -> Result<bool> {
    if !event::poll(Duration::from_millis(200)).context("poll event")? {
        return Ok(true);
    }

    let evt = event::read().context("read event")?;
    match app.view {
        View::Home => home::handle_event_home(app, evt)?,
        View::Cover => cover::handle_event_cover(app, evt)?,
        View::Config => config::handle_event_config(app, evt)?,
        View::About => about::handle_event_about(app, evt)?,
    }

    Ok(!app.should_quit)
}

/// Apply finished searches and surface their notifications.
fn poll_controller(app: &mut App) {
    let notifications = app.controller.poll();
    if notifications.is_empty() {
        return;
    }

    stop_spinner(app);
    for n in notifications {
        app.status = n.description.clone();
        app.push_message(format!("{}: {}", n.title, n.description));
        match n.kind {
            NotificationKind::Found => {
                app.list_state.select(Some(0));
                app.focus = Focus::Results;
            }
            NotificationKind::NoResults | NotificationKind::Error => {
                app.list_state.select(None);
                app.focus = Focus::Input;
            }
        }
    }
}

fn poll_worker(app: &mut App) {
    while let Ok(msg) = app.worker_rx.try_recv() {
        stop_spinner(app);
        match msg {
            WorkerMsg::CoverReady { title, bytes } => cover::on_cover_ready(app, title, bytes),
        }
    }
}

fn drain_log_channel(app: &mut App) {
    let mut pending = Vec::new();
    if let Some(rx) = app.log_rx.as_ref() {
        while let Ok(line) = rx.try_recv() {
            pending.push(line);
        }
    }
    for line in pending {
        app.push_log(line);
    }
}

fn start_search(app: &mut App) {
    let term = app.input.trim().to_string();
    if term.is_empty() {
        app.status = "Type a book title or author name, then press Enter.".to_string();
        return;
    }
    if app.controller.submit(&term, app.field) {
        start_spinner(app, "Searching books…");
    }
}

fn trigger_menu_action(app: &mut App) -> Result<()> {
    let Some(idx) = app.menu_state.selected() else {
        return Ok(());
    };
    let Some((_, action)) = MENU_ITEMS.get(idx) else {
        return Ok(());
    };
    match action {
        MenuAction::Search => {
            app.focus = Focus::Input;
            start_search(app);
        }
        MenuAction::ToggleField => {
            app.field = app.field.toggled();
            app.status = format!("Now searching by {}.", app.field.label().to_lowercase());
        }
        MenuAction::Config => {
            app.previous_view = app.view;
            app.view = View::Config;
            app.cfg_editing = None;
            app.status = "Settings: Up/Down selects, Enter edits or toggles, q returns.".to_string();
        }
        MenuAction::About => {
            app.previous_view = app.view;
            app.view = View::About;
            app.status = "About: q returns.".to_string();
        }
        MenuAction::Quit => {
            app.should_quit = true;
        }
    }
    Ok(())
}

fn start_spinner(app: &mut App, text: impl Into<String>) {
    app.spinner_active = true;
    app.spinner_text = text.into();
    app.spinner_idx = 0;
    app.spinner_last = Instant::now();
    app.status = app.spinner_text.clone();
}

fn stop_spinner(app: &mut App) {
    app.spinner_active = false;
}

fn tick_spinner(app: &mut App) {
    if !app.spinner_active {
        return;
    }
    if app.spinner_last.elapsed() < Duration::from_millis(140) {
        return;
    }
    app.spinner_idx = (app.spinner_idx + 1) % SPINNER_FRAMES.len();
    app.spinner_last = Instant::now();
    app.status = format!("{} {}", app.spinner_text, SPINNER_FRAMES[app.spinner_idx]);
}

fn split_with_log(area: Rect) -> (Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(LOG_HEIGHT.max(4)),
            Constraint::Length(LOG_HEIGHT),
        ])
        .split(area);
    let main = layout.first().copied().unwrap_or(area);
    let log = layout.get(1).copied().unwrap_or(Rect {
        x: area.x,
        y: area.y.saturating_add(area.height.saturating_sub(LOG_HEIGHT)),
        width: area.width,
        height: LOG_HEIGHT,
    });
    (main, log)
}

fn render_log_box(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    if app.logs.is_empty() {
        lines.push(Line::from("log: nothing yet"));
    } else {
        // Fit to visible height so the box sticks to the latest entries.
        let visible = area.height.saturating_sub(2).max(1) as usize;
        lines.extend(
            app.logs
                .iter()
                .rev()
                .take(visible)
                .rev()
                .map(|m| style_log_line(m)),
        );
    }

    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Log"));
    frame.render_widget(log, area);
}

fn style_log_line(line: &str) -> Line<'static> {
    let style = if line.contains("ERROR") {
        Style::default().fg(Color::Red)
    } else if line.contains("WARN") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(line.to_string(), style))
}

fn pos_in(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Map a mouse row inside a bordered list widget to an item index.
fn list_index_from_mouse_row(
    area: Rect,
    row: u16,
    state: &ListState,
    len: usize,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let inner_top = area.y.saturating_add(1);
    if row < inner_top {
        return None;
    }
    let offset = state.offset();
    let idx = offset + (row - inner_top) as usize;
    (idx < len).then_some(idx)
}
