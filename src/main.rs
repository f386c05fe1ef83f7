use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use scout_terminal::provider::spawn_provider;
use scout_terminal::state::{
    AppState, Delta, Focus, GameMode, MIN_SEARCH_LEN, ProviderCommand, RequestPhase, SearchBox,
    Tab, TeamRef, apply_delta, game_label, tab_label,
};
use scout_terminal::view;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }

    fn send_opt(&mut self, cmd: Option<ProviderCommand>) {
        if let Some(cmd) = cmd {
            self.send(cmd);
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') | KeyCode::Esc => self.state.help_overlay = false,
                _ => {}
            }
            return;
        }
        match self.state.focus {
            Focus::Search => self.on_search_key(key, now),
            Focus::Compose => self.on_compose_key(key),
            Focus::Normal => self.on_normal_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                if let Some(search) = self.state.active_search_mut() {
                    search.close();
                }
                self.state.focus = Focus::Normal;
            }
            KeyCode::Enter => {
                let cmd = self.state.select_team();
                self.send_opt(cmd);
                self.state.focus = Focus::Normal;
            }
            KeyCode::Up => {
                if let Some(search) = self.state.active_search_mut() {
                    search.highlight_prev();
                }
            }
            KeyCode::Down => {
                if let Some(search) = self.state.active_search_mut() {
                    search.highlight_next();
                }
            }
            KeyCode::Backspace => {
                if let Some(search) = self.state.active_search_mut() {
                    search.backspace(now);
                }
            }
            KeyCode::Char(ch) => {
                if let Some(search) = self.state.active_search_mut() {
                    search.input_char(ch, now);
                }
            }
            _ => {}
        }
    }

    fn on_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.focus = Focus::Normal,
            KeyCode::Enter => {
                let cmd = self.state.send_chat();
                self.send_opt(cmd);
            }
            KeyCode::Backspace => {
                self.state.coach.input.pop();
            }
            KeyCode::Char(ch) => self.state.coach.input.push(ch),
            _ => {}
        }
    }

    fn on_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('g') => {
                let cmd = self.state.toggle_game();
                self.send_opt(cmd);
            }
            KeyCode::Char('1') => self.switch_tab(Tab::Report),
            KeyCode::Char('2') => self.switch_tab(Tab::Counter),
            KeyCode::Char('3') => self.switch_tab(Tab::Coach),
            KeyCode::Char('4') => self.switch_tab(Tab::Threats),
            KeyCode::Char('5') => self.switch_tab(Tab::Maps),
            KeyCode::Char('6') => self.switch_tab(Tab::History),
            KeyCode::Tab => self.switch_tab(self.state.tab.next()),
            KeyCode::Char('/') => {
                if let Some(search) = self.state.active_search_mut() {
                    search.focus();
                    self.state.focus = Focus::Search;
                }
            }
            KeyCode::Enter => match self.state.tab {
                Tab::History => {
                    let cmd = self.state.view_history_selected();
                    self.send_opt(cmd);
                }
                Tab::Coach => self.state.focus = Focus::Compose,
                _ => {
                    let cmd = self.state.trigger_primary();
                    self.send_opt(cmd);
                }
            },
            KeyCode::Char('i') if self.state.tab == Tab::Coach => {
                self.state.focus = Focus::Compose;
            }
            KeyCode::Char('c') if self.state.tab == Tab::Coach => {
                self.state.clear_coach_team();
            }
            KeyCode::Char('h') if self.state.tab == Tab::Counter => {
                let cmd = self.state.trigger_compare();
                self.send_opt(cmd);
            }
            KeyCode::Char('r') if self.state.tab == Tab::History => {
                let cmd = self.state.request_history();
                self.send(cmd);
            }
            KeyCode::Char('x') if self.state.tab == Tab::History => {
                let cmd = self.state.delete_history_selected();
                self.send_opt(cmd);
            }
            KeyCode::Char('+') | KeyCode::Char('=') if self.state.tab == Tab::Report => {
                self.state.report.adjust_matches(1);
            }
            KeyCode::Char('-') if self.state.tab == Tab::Report => {
                self.state.report.adjust_matches(-1);
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        let cmd = self.state.set_tab(tab);
        self.send_opt(cmd);
    }

    fn scroll_down(&mut self) {
        match self.state.tab {
            Tab::Report => self.state.report.scroll = self.state.report.scroll.saturating_add(1),
            Tab::Counter => self.state.counter.scroll = self.state.counter.scroll.saturating_add(1),
            Tab::Threats => self.state.threats.scroll = self.state.threats.scroll.saturating_add(1),
            Tab::Maps => self.state.maps.scroll = self.state.maps.scroll.saturating_add(1),
            Tab::History => self.state.history.select_next(),
            Tab::Coach => {
                let coach = &mut self.state.coach;
                coach.scroll = coach.scroll.saturating_sub(1);
                if coach.scroll == 0 {
                    coach.chat.stick_to_bottom = true;
                }
            }
        }
    }

    fn scroll_up(&mut self) {
        match self.state.tab {
            Tab::Report => self.state.report.scroll = self.state.report.scroll.saturating_sub(1),
            Tab::Counter => self.state.counter.scroll = self.state.counter.scroll.saturating_sub(1),
            Tab::Threats => self.state.threats.scroll = self.state.threats.scroll.saturating_sub(1),
            Tab::Maps => self.state.maps.scroll = self.state.maps.scroll.saturating_sub(1),
            Tab::History => self.state.history.select_prev(),
            Tab::Coach => {
                let coach = &mut self.state.coach;
                coach.chat.stick_to_bottom = false;
                coach.scroll = coach.scroll.saturating_add(1);
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    app.send(ProviderCommand::ProbeBackend);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    // Short tick so debounce deadlines are noticed promptly between key
    // events.
    let tick_rate = Duration::from_millis(120);

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        let now = Instant::now();
        if let Some(cmd) = app.state.poll_search(now) {
            app.send(cmd);
        }
        if app.state.history.needs_refresh {
            let cmd = app.state.request_history();
            app.send(cmd);
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key, Instant::now());
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    frame.render_widget(tab_bar(&app.state), chunks[1]);

    match app.state.tab {
        Tab::Report => render_report(frame, chunks[2], &app.state),
        Tab::Counter => render_counter(frame, chunks[2], &app.state),
        Tab::Coach => render_coach(frame, chunks[2], &app.state),
        Tab::Threats => render_threats(frame, chunks[2], &app.state),
        Tab::Maps => render_maps(frame, chunks[2], &app.state),
        Tab::History => render_history(frame, chunks[2], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if app.state.booting {
        render_boot_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    format!(
        " SCOUT TERMINAL | {} | {}",
        game_label(state.game),
        tab_label(state.tab)
    )
}

fn tab_bar(state: &AppState) -> Paragraph<'static> {
    let tabs = [
        Tab::Report,
        Tab::Counter,
        Tab::Coach,
        Tab::Threats,
        Tab::Maps,
        Tab::History,
    ];
    let mut spans = Vec::new();
    for (i, tab) in tabs.iter().enumerate() {
        let label = format!(" [{}] {} ", i + 1, tab_label(*tab));
        let style = if *tab == state.tab {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }
    Paragraph::new(Line::from(spans))
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return String::new();
    }
    state
        .logs
        .iter()
        .rev()
        .take(1)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(state: &AppState) -> String {
    match state.focus {
        Focus::Search => "type to search | Up/Down highlight | Enter select | Esc close".to_string(),
        Focus::Compose => "type message | Enter send | Esc done".to_string(),
        Focus::Normal => match state.tab {
            Tab::Report => {
                "/ search | Enter generate | +/- matches | j/k scroll | Tab/1-6 tabs | g game | ? help | q quit"
                    .to_string()
            }
            Tab::Counter => {
                "/ search | Enter strategy | h head-to-head | j/k scroll | g game | ? help | q quit"
                    .to_string()
            }
            Tab::Coach => {
                "/ context team | i message | c clear team | j/k scroll | g game | ? help | q quit"
                    .to_string()
            }
            Tab::Threats => {
                "/ search | Enter analyze | j/k scroll | g game | ? help | q quit".to_string()
            }
            Tab::Maps => {
                "/ search | Enter map stats | j/k scroll | g game | ? help | q quit".to_string()
            }
            Tab::History => {
                "Enter view | r refresh | x delete | j/k move | g game | ? help | q quit".to_string()
            }
        },
    }
}

fn render_search_box(
    frame: &mut Frame,
    area: Rect,
    search: &SearchBox,
    focused: bool,
    title: &str,
) {
    let mut title = title.to_string();
    if search.searching {
        title.push_str(" | searching...");
    }
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let (text, style) = if search.query.is_empty() && !focused {
        (
            "Search team...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if focused {
        (format!("{}_", search.query), Style::default())
    } else {
        (search.query.clone(), Style::default())
    };
    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

/// Drawn last so it floats above the page body, like the web dropdown did.
fn render_dropdown(frame: &mut Frame, anchor: Rect, search: &SearchBox) {
    if !search.open {
        return;
    }
    let below_min = search.query.trim().chars().count() < MIN_SEARCH_LEN;
    if search.results.is_empty() && (search.searching || below_min) {
        return;
    }

    let rows = search.results.len().clamp(1, 8) as u16;
    let area = Rect {
        x: anchor.x + 1,
        y: anchor.y + anchor.height,
        width: anchor.width.saturating_sub(2),
        height: rows + 2,
    }
    .intersection(frame.size());
    if area.height < 3 {
        return;
    }
    frame.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL);
    if search.results.is_empty() {
        let empty = Paragraph::new("No teams found")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for (i, hit) in search.results.iter().enumerate() {
        let style = if i == search.highlighted {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(hit.team_name.clone(), style));
    }
    let list = Paragraph::new(Text::from(lines)).block(block);
    frame.render_widget(list, area);
}

fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(format!("Request failed: {message}"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    frame.render_widget(banner, area);
}

fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let loading = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}

fn render_hint(frame: &mut Frame, area: Rect, message: &str) {
    let hint = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false });
    frame.render_widget(hint, area);
}

fn render_payload(frame: &mut Frame, area: Rect, title: &str, lines: Vec<String>, scroll: u16) {
    let text = lines.join("\n");
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(body, area);
}

fn selection_line(team: Option<&TeamRef>) -> String {
    match team {
        Some(team) => format!("Opponent: {}", team.name),
        None => "Opponent: - (search with /)".to_string(),
    }
}

fn render_report(frame: &mut Frame, area: Rect, state: &AppState) {
    let page = &state.report;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let controls = Paragraph::new(format!(
        "{}\nMatches to analyze: {} (+/-)",
        selection_line(page.team.as_ref()),
        page.num_matches
    ));
    frame.render_widget(controls, sections[1]);

    match &page.phase {
        RequestPhase::Loading => render_loading(frame, sections[2], "Generating scouting report..."),
        RequestPhase::Failed(message) => render_error_banner(frame, sections[2], message),
        RequestPhase::Idle => match &page.report {
            Some(report) => render_payload(
                frame,
                sections[2],
                "Scouting report",
                view::report_lines(report),
                page.scroll,
            ),
            None => render_hint(
                frame,
                sections[2],
                "Search an opponent team, then press Enter to generate a report.",
            ),
        },
    }

    render_search_box(
        frame,
        sections[0],
        &page.search,
        state.focus == Focus::Search,
        "Opponent team",
    );
    render_dropdown(frame, sections[0], &page.search);
}

fn render_counter(frame: &mut Frame, area: Rect, state: &AppState) {
    let page = &state.counter;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let opponent = page
        .team
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or("- (search with /)");
    let controls = Paragraph::new(format!(
        "Our team: #{}   vs   Opponent: {opponent}\nEnter strategy | h head-to-head",
        state.home_team_id()
    ));
    frame.render_widget(controls, sections[1]);

    match &page.phase {
        RequestPhase::Loading => render_loading(frame, sections[2], "Analyzing matchup..."),
        RequestPhase::Failed(message) => render_error_banner(frame, sections[2], message),
        RequestPhase::Idle => {
            let mut lines = match &page.strategy {
                Some(strategy) => view::strategy_lines(strategy, state.game),
                None => Vec::new(),
            };
            match &page.compare_phase {
                RequestPhase::Loading => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push("Comparing teams...".to_string());
                }
                RequestPhase::Failed(message) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(format!("Head-to-head failed: {message}"));
                }
                RequestPhase::Idle => {
                    if let Some(comparison) = &page.comparison {
                        if !lines.is_empty() {
                            lines.push(String::new());
                        }
                        lines.push("Head-to-head:".to_string());
                        for line in view::comparison_lines(comparison) {
                            lines.push(format!("  {line}"));
                        }
                    }
                }
            }
            if lines.is_empty() {
                render_hint(
                    frame,
                    sections[2],
                    "Search an opponent, then press Enter for a counter strategy.",
                );
            } else {
                render_payload(frame, sections[2], "Counter strategy", lines, page.scroll);
            }
        }
    }

    render_search_box(
        frame,
        sections[0],
        &page.search,
        state.focus == Focus::Search,
        "Opponent team",
    );
    render_dropdown(frame, sections[0], &page.search);
}

fn render_coach(frame: &mut Frame, area: Rect, state: &AppState) {
    let page = &state.coach;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    let transcript_block = Block::default().borders(Borders::ALL).title("Coach");
    let inner = transcript_block.inner(sections[1]);
    let width = inner.width.max(1) as usize;
    let mut lines = Vec::new();
    for raw in view::chat_lines(&page.chat) {
        for wrapped in view::wrap_plain(&raw, width) {
            lines.push(wrapped);
        }
    }
    let total = lines.len() as u16;
    let visible = inner.height;
    let max_offset = total.saturating_sub(visible);
    let offset = if page.chat.stick_to_bottom {
        max_offset
    } else {
        max_offset.saturating_sub(page.scroll.min(max_offset))
    };
    let transcript = Paragraph::new(lines.join("\n"))
        .scroll((offset, 0))
        .block(transcript_block);
    frame.render_widget(transcript, sections[1]);

    let composing = state.focus == Focus::Compose;
    let input_text = if composing {
        format!("{}_", page.input)
    } else if page.input.is_empty() {
        "Ask the coach... ([i] to type)".to_string()
    } else {
        page.input.clone()
    };
    let input_style = if composing || !page.input.is_empty() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input_border = if composing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Message")
            .border_style(input_border),
    );
    frame.render_widget(input, sections[2]);

    let context_title = match &page.team {
        Some(team) => format!("Context team: {} ([c] clear)", team.name),
        None => "Context team (optional)".to_string(),
    };
    render_search_box(
        frame,
        sections[0],
        &page.search,
        state.focus == Focus::Search,
        &context_title,
    );
    render_dropdown(frame, sections[0], &page.search);
}

fn render_threats(frame: &mut Frame, area: Rect, state: &AppState) {
    let page = &state.threats;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let controls = Paragraph::new(selection_line(page.team.as_ref()));
    frame.render_widget(controls, sections[1]);

    match &page.phase {
        RequestPhase::Loading => render_loading(frame, sections[2], "Analyzing player threats..."),
        RequestPhase::Failed(message) => render_error_banner(frame, sections[2], message),
        RequestPhase::Idle => match &page.threats {
            Some(threats) if threats.is_empty() => {
                render_hint(frame, sections[2], "No threat data for this team.")
            }
            Some(threats) => render_payload(
                frame,
                sections[2],
                "Threat rankings",
                view::threat_lines(threats),
                page.scroll,
            ),
            None => render_hint(
                frame,
                sections[2],
                "Search a team, then press Enter to rank its players by threat.",
            ),
        },
    }

    render_search_box(
        frame,
        sections[0],
        &page.search,
        state.focus == Focus::Search,
        "Team to analyze",
    );
    render_dropdown(frame, sections[0], &page.search);
}

fn render_maps(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.game != GameMode::Valorant {
        let notice = Paragraph::new("Map statistics are only available for VALORANT.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(notice, area);
        return;
    }

    let page = &state.maps;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let controls = Paragraph::new(selection_line(page.team.as_ref()));
    frame.render_widget(controls, sections[1]);

    match &page.phase {
        RequestPhase::Loading => render_loading(frame, sections[2], "Fetching map statistics..."),
        RequestPhase::Failed(message) => render_error_banner(frame, sections[2], message),
        RequestPhase::Idle => match &page.maps {
            Some(maps) if maps.is_empty() => {
                render_hint(frame, sections[2], "No map data for this team.")
            }
            Some(maps) => render_payload(
                frame,
                sections[2],
                "Map statistics",
                view::map_lines(maps),
                page.scroll,
            ),
            None => render_hint(
                frame,
                sections[2],
                "Search a team, then press Enter to fetch its map statistics.",
            ),
        },
    }

    render_search_box(
        frame,
        sections[0],
        &page.search,
        state.focus == Focus::Search,
        "Team to analyze",
    );
    render_dropdown(frame, sections[0], &page.search);
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let page = &state.history;
    let block = Block::default().borders(Borders::ALL).title("Report history");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &page.phase {
        RequestPhase::Loading => {
            let loading = Paragraph::new("Loading report history...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(loading, inner);
        }
        RequestPhase::Failed(message) => {
            let banner = Paragraph::new(format!("Request failed: {message}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false });
            frame.render_widget(banner, inner);
        }
        RequestPhase::Idle => {
            if page.reports.is_empty() {
                let empty = Paragraph::new(
                    "No reports generated yet.\nGenerate a new scouting report to get started.",
                )
                .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(empty, inner);
                return;
            }
            let mut lines = Vec::new();
            lines.push(Line::styled(
                format!("  {:<24} {:<10} {:<12} Matches", "Opponent", "Game", "Date"),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for (i, entry) in page.reports.iter().enumerate() {
                let marker = if i == page.selected { "> " } else { "  " };
                let style = if i == page.selected {
                    Style::default().fg(Color::White).bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                lines.push(Line::styled(
                    format!("{marker}{}", view::history_line(entry)),
                    style,
                ));
            }
            let table = Paragraph::new(Text::from(lines));
            frame.render_widget(table, inner);
        }
    }
}

fn render_boot_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(44, 24, area);
    frame.render_widget(Clear, popup);
    let text = "SCOUT TERMINAL\n\nChecking analytics backend...";
    let boot = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(boot, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);

    let text = [
        "Scout Terminal - Help",
        "",
        "Global:",
        "  1-6 / Tab    Switch tab",
        "  g            Toggle game (VALORANT / LEAGUE)",
        "  /            Search teams on the current tab",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Search:",
        "  Up/Down      Highlight result",
        "  Enter        Select team",
        "  Esc          Close dropdown",
        "",
        "Pages:",
        "  Enter        Generate / analyze / view",
        "  +/-          Report: matches to analyze",
        "  h            Counter: head-to-head compare",
        "  i            Coach: compose message",
        "  c            Coach: clear context team",
        "  r / x        History: refresh / delete",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
