use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use padel_analyst::config::AppConfig;
use padel_analyst::fixtures::{
    AnalysisRecord, FixtureSet, group_by_priority, priority_heading, priority_label,
};
use padel_analyst::mock_analyst;
use padel_analyst::radar::{self, Point, RadarLayout, TextAlign};
use padel_analyst::state::{
    self, AppState, NavTab, PendingReview, ReviewField, Screen, ScreenKind, UploadView,
    apply_delta, screen_label,
};
use padel_analyst::video::VIDEO_EXTENSIONS;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
    config: AppConfig,
}

impl App {
    fn new(
        state: AppState,
        cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
        config: AppConfig,
    ) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            config,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.state.modal.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.state.dismiss_modal();
            }
            return;
        }

        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }

        let handled = match self.state.screen_kind() {
            ScreenKind::Onboarding => self.on_onboarding_key(key),
            ScreenKind::Upload => self.on_upload_key(key),
            ScreenKind::Review => self.on_review_key(key),
            ScreenKind::TeamList => self.on_team_key(key),
            ScreenKind::PlayerPerformance => self.on_performance_key(key),
        };
        if !handled && !self.state.is_text_input_active() {
            self.on_global_key(key);
        }

        self.flush_cancelled_jobs();
    }

    fn on_global_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.navigate(NavTab::Upload),
            KeyCode::Char('2') => self.state.navigate(NavTab::Team),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_onboarding_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => {
                self.state.start();
                true
            }
            _ => false,
        }
    }

    fn on_upload_key(&mut self, key: KeyEvent) -> bool {
        let prompt_open = self
            .state
            .upload_view()
            .is_some_and(|view| view.path_prompt.is_some());
        if prompt_open {
            match key.code {
                KeyCode::Enter => {
                    self.state.submit_path_prompt();
                }
                KeyCode::Esc => self.state.close_path_prompt(),
                KeyCode::Backspace => self.state.path_prompt_pop(),
                KeyCode::Char(ch) => self.state.path_prompt_push(ch),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.state.open_path_prompt();
                true
            }
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.request_analysis();
                true
            }
            _ => false,
        }
    }

    fn on_review_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.try_save();
            return true;
        }
        let focus = self
            .state
            .pending_review()
            .map(|review| review.focus)
            .unwrap_or(ReviewField::Player);

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.state.focus_next_field();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state.focus_prev_field();
                true
            }
            KeyCode::Esc => {
                self.state.cancel_review();
                true
            }
            KeyCode::Backspace => self.state.review_backspace(),
            KeyCode::Enter => {
                match focus {
                    ReviewField::Save => self.try_save(),
                    _ => self.state.focus_next_field(),
                }
                true
            }
            KeyCode::Left | KeyCode::Char('h') if focus == ReviewField::Player => {
                self.state.cycle_review_player(false);
                true
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ')
                if focus == ReviewField::Player =>
            {
                self.state.cycle_review_player(true);
                true
            }
            KeyCode::Char(ch) => self.state.review_type_char(ch),
            _ => false,
        }
    }

    fn on_team_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char('d') => self.state.open_selected_player(),
            _ => return false,
        }
        true
    }

    fn on_performance_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => self.state.select_prev(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.back(),
            _ => return false,
        }
        true
    }

    fn try_save(&mut self) {
        if !self.state.save_review() {
            self.state
                .push_log("[WARN] Pick a player and add a correction note before saving");
        }
    }

    fn request_analysis(&mut self) {
        let Some(job) = self.state.begin_analysis() else {
            return;
        };
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Analyst unavailable");
            return;
        };
        let cmd = state::ProviderCommand::StartAnalysis {
            job,
            delay: self.config.analysis_delay,
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Analysis request failed");
        }
    }

    fn flush_cancelled_jobs(&mut self) {
        let cancelled = self.state.drain_cancelled_jobs();
        let Some(tx) = &self.cmd_tx else {
            return;
        };
        for job in cancelled {
            let _ = tx.send(state::ProviderCommand::CancelAnalysis { job });
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let (fixtures, source) = match &config.fixtures_path {
        Some(path) => (FixtureSet::load(path)?, path.display().to_string()),
        None => (FixtureSet::builtin()?, "built-in fixtures".to_string()),
    };
    let mut state = AppState::new(fixtures);
    state.push_log(format!(
        "[INFO] Loaded {} players from {source}",
        state.fixtures.players.len()
    ));

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let worker = mock_analyst::spawn_mock_analyst(tx, cmd_rx);

    let mut app = App::new(state, Some(cmd_tx), config);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Closing the command channel stops the worker.
    drop(app);
    let _ = worker.join();

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = app.config.tick_rate;
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &state.screen {
        Screen::Onboarding => render_onboarding(frame, chunks[1]),
        Screen::Upload(view) => render_upload(frame, chunks[1], view),
        Screen::Review(review) => render_review(frame, chunks[1], review),
        Screen::TeamList { selected } => render_team(frame, chunks[1], state, *selected),
        Screen::PlayerPerformance(_) => render_performance(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_line(state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if let Some(message) = state.modal_message() {
        render_modal(frame, frame.size(), message);
    } else if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = format!("PADEL ANALYST | {}", screen_label(state.screen_kind()));
    let line1 = format!("  (o)  {title}");
    let line2 = "  /|\\".to_string();
    format!("{line1}\n{line2}")
}

fn footer_line(state: &AppState) -> Line<'static> {
    let active = state.active_tab();
    let tab = |label: &'static str, which: NavTab| {
        let style = if active == Some(which) {
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };
    let hints = match state.screen_kind() {
        ScreenKind::Onboarding => "Enter Start | ? Help | q Quit",
        ScreenKind::Upload => "o Attach video | Enter/a Analyze | ? Help | q Quit",
        ScreenKind::Review => "Tab Field | ←/→ Player | Ctrl-s Save | Esc Back",
        ScreenKind::TeamList => "j/k Move | Enter View performance | ? Help | q Quit",
        ScreenKind::PlayerPerformance => "j/k Record | b/Esc Back | ? Help | q Quit",
    };
    Line::from(vec![
        tab(" [1] Upload ", NavTab::Upload),
        Span::raw(" "),
        tab(" [2] Team ", NavTab::Team),
        Span::styled(format!("   {hints}"), Style::default().fg(Color::DarkGray)),
    ])
}

fn render_onboarding(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 60, area);
    let text = Text::from(vec![
        Line::from(Span::styled(
            "AI Padel Analyst Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            "Upload your Padel performance videos, get detailed analysis, and improve your technique with the power of AI.",
        ),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter ] Start Analysis",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
    ]);
    let welcome = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(welcome, popup);
}

fn render_upload(frame: &mut Frame, area: Rect, view: &UploadView) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Upload Video",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Select a video file to analyze."),
        Line::from(Span::styled(
            "(Note: This is an MVP. Just press Enter to see a mock result and continue.)",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    match &view.video {
        Some(video) => lines.push(Line::from(format!(
            "Video uploaded: {} ({})",
            video.name,
            video.size_label()
        ))),
        None => lines.push(Line::from("Press o to attach a video (or skip)")),
    }
    lines.push(Line::from(Span::styled(
        format!("(supports {})", VIDEO_EXTENSIONS.join(", ")),
        Style::default().fg(Color::DarkGray),
    )));

    if let Some(prompt) = &view.path_prompt {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Path: ", Style::default().fg(Color::Yellow)),
            Span::raw(prompt.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]));
        lines.push(Line::from(Span::styled(
            "Enter attach | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    let (button, style) = match view.phase {
        state::AnalysisPhase::Analyzing { .. } => (
            "[ Analyzing... ]",
            Style::default().fg(Color::DarkGray),
        ),
        state::AnalysisPhase::Idle => (
            "[ Start Analysis ]",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
    };
    lines.push(Line::from(Span::styled(button, style)));

    let body = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn render_review(frame: &mut Frame, area: Rect, review: &PendingReview) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    let field_block = |title: &'static str, field: ReviewField| {
        let border = if review.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border)
    };

    let player = match &review.assigned_player {
        Some(player) => Span::raw(format!("< {} >", player.name)),
        None => Span::styled("< Choose a player >", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(player)).block(field_block("Select Player", ReviewField::Player)),
        left[0],
    );

    frame.render_widget(
        note_paragraph(&review.coach_note, "Add your personal notes here...")
            .block(field_block("Coach's Notes", ReviewField::CoachNote)),
        left[1],
    );
    frame.render_widget(
        note_paragraph(
            &review.correction_note,
            "E.g., Based on the AI, the forehand needs more wrist action.",
        )
        .block(field_block(
            "Correction Notes from AI Result",
            ReviewField::CorrectionNote,
        )),
        left[2],
    );

    let save_style = if review.can_save() {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let save = Paragraph::new(Span::styled(" Save Analysis ", save_style))
        .alignment(Alignment::Center)
        .block(field_block("Save", ReviewField::Save));
    frame.render_widget(save, left[3]);

    let draft = &review.draft;
    let mut lines = vec![
        Line::from(Span::styled(
            "Overall Summary:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(draft.overall_summary.clone()),
        Line::from(""),
        section_heading("Strengths:", Color::Green),
    ];
    lines.extend(draft.strengths.iter().map(|s| bullet(s)));
    lines.push(section_heading("Areas for Improvement:", Color::Red));
    lines.extend(draft.weaknesses.iter().map(|w| {
        bullet(&format!("{} ({} priority)", w.text, priority_label(w.priority)))
    }));
    lines.push(section_heading("Recommended Drills:", Color::Blue));
    lines.extend(draft.drills.iter().map(|d| bullet(d)));

    let result = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("AI Analysis Result")
                .borders(Borders::ALL),
        );
    frame.render_widget(result, columns[1]);
}

fn note_paragraph<'a>(text: &'a str, placeholder: &'a str) -> Paragraph<'a> {
    if text.is_empty() {
        Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
            .wrap(Wrap { trim: false })
    } else {
        Paragraph::new(text).wrap(Wrap { trim: false })
    }
}

fn render_team(frame: &mut Frame, area: Rect, state: &AppState, selected: usize) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Team Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Monitor your team's performance at a glance."),
        Line::from(""),
    ];
    if state.fixtures.players.is_empty() {
        lines.push(Line::from(Span::styled(
            "No players in roster",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, player) in state.fixtures.players.iter().enumerate() {
        let records = state.fixtures.records(player.id).len();
        let text = format!("{:<20} {:<8} {records} analyses", player.name, player.sport);
        if idx == selected {
            lines.push(Line::from(Span::styled(
                format!("> {text}   View Performance ->"),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(format!("  {text}")));
        }
    }
    let body = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn render_performance(frame: &mut Frame, area: Rect, state: &AppState) {
    let (Some(player), true) = (state.selected_player(), state.has_performance_data()) else {
        let empty = Paragraph::new(Text::from(vec![
            Line::from("No performance data available for this player."),
            Line::from(""),
            Line::from(Span::styled(
                "b / Esc  Back to Team",
                Style::default().fg(Color::Blue),
            )),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let records = state.fixtures.records(player.id);
    let picker_height = (records.len() as u16).saturating_add(2).min(8);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(picker_height), Constraint::Min(5)])
        .split(columns[0]);

    let picked = state.selected_record_index();
    let visible = left[0].height.saturating_sub(2) as usize;
    let (start, end) = picker_window(records.len(), visible, picked.unwrap_or(0));
    let picker_lines: Vec<Line> = records[start..end]
        .iter()
        .enumerate()
        .map(|(offset, record)| {
            let idx = start + offset;
            if Some(idx) == picked {
                Line::from(Span::styled(
                    format!("> {}", record.picker_label()),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ))
            } else {
                Line::from(format!("  {}", record.picker_label()))
            }
        })
        .collect();
    let picker = Paragraph::new(Text::from(picker_lines)).block(
        Block::default()
            .title(format!("{}'s Performance", player.name))
            .borders(Borders::ALL),
    );
    frame.render_widget(picker, left[0]);

    let Some(record) = state.selected_analysis() else {
        return;
    };
    render_radar(frame, left[1], record);

    let details = Paragraph::new(record_detail_text(record))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!("{} | {}", record.summary, record.date_label()))
                .borders(Borders::ALL),
        );
    frame.render_widget(details, columns[1]);
}

/// Rows `start..end` of the record picker, scrolled so `selected` stays visible.
fn picker_window(total: usize, visible: usize, selected: usize) -> (usize, usize) {
    if visible == 0 {
        return (0, 0);
    }
    let max_start = total.saturating_sub(visible);
    let start = selected.saturating_sub(visible - 1).min(max_start);
    let end = (start + visible).min(total);
    (start, end)
}

fn record_detail_text(record: &AnalysisRecord) -> Text<'static> {
    let mut lines = vec![section_heading("Statistics:", Color::Reset)];
    lines.extend(
        record
            .stats
            .iter()
            .map(|(label, score)| Line::from(format!("  {label}: {score:.0}"))),
    );

    lines.push(section_heading("Good Points:", Color::Green));
    lines.extend(record.good_points.iter().map(|p| bullet(p)));

    lines.push(section_heading("Areas for Improvement:", Color::Red));
    for (priority, points) in group_by_priority(&record.bad_points) {
        lines.push(Line::from(Span::styled(
            format!("  {}", priority_heading(priority)),
            Style::default().fg(Color::LightRed),
        )));
        lines.extend(points.iter().map(|p| bullet(&format!("  {}", p.text))));
    }

    lines.push(section_heading("Improved Points:", Color::Blue));
    lines.extend(record.improved_points.iter().map(|p| bullet(p)));

    if !record.coach_notes.is_empty() {
        lines.push(section_heading("Coach's Notes:", Color::Yellow));
        lines.push(Line::from(record.coach_notes.clone()));
    }
    Text::from(lines)
}

fn render_radar(frame: &mut Frame, area: Rect, record: &AnalysisRecord) {
    let block = Block::default()
        .title("Performance Chart")
        .borders(Borders::ALL);
    let layout = match radar::radar_layout(&record.stats) {
        Ok(layout) => layout,
        Err(err) => {
            let msg = Paragraph::new(err.to_string())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }
    };

    const X_BOUNDS: [f64; 2] = [-45.0, 145.0];
    let inner = block.inner(area);
    let units_per_cell = if inner.width == 0 {
        0.0
    } else {
        (X_BOUNDS[1] - X_BOUNDS[0]) / inner.width as f64
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(X_BOUNDS)
        .y_bounds([0.0, 100.0])
        .paint(|ctx| paint_radar(ctx, &layout, units_per_cell));
    frame.render_widget(canvas, area);
}

fn paint_radar(
    ctx: &mut ratatui::widgets::canvas::Context,
    layout: &RadarLayout,
    units_per_cell: f64,
) {
    for seg in layout.grid_outline().iter().chain(layout.spokes.iter()) {
        ctx.draw(&canvas_line(seg.from, seg.to, Color::DarkGray));
    }
    ctx.layer();
    for seg in layout.closed_outline() {
        ctx.draw(&canvas_line(seg.from, seg.to, Color::Cyan));
    }
    for label in &layout.labels {
        let width = label.text.chars().count() as f64 * units_per_cell;
        let x = match label.align {
            TextAlign::Start => label.anchor.x,
            TextAlign::Middle => label.anchor.x - width / 2.0,
            TextAlign::End => label.anchor.x - width,
        };
        ctx.print(
            x,
            flip_y(label.anchor.y),
            Span::styled(
                label.text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        );
    }
}

// Layout y grows downward; the canvas y grows upward.
fn flip_y(y: f64) -> f64 {
    100.0 - y
}

fn canvas_line(from: Point, to: Point, color: Color) -> CanvasLine {
    CanvasLine {
        x1: from.x,
        y1: flip_y(from.y),
        x2: to.x,
        y2: flip_y(to.y),
        color,
    }
}

fn section_heading(title: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn bullet(text: &str) -> Line<'static> {
    Line::from(format!("  • {text}"))
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_modal(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);

    let text = Text::from(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter ] OK",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
    ]);
    let modal = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Alert").borders(Borders::ALL));
    frame.render_widget(modal, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Padel Analyst - Help",
        "",
        "Global:",
        "  1            Upload",
        "  2            Team",
        "  ?            Toggle help",
        "  q / Ctrl-c   Quit",
        "",
        "Upload:",
        "  o            Attach a video by path",
        "  Enter / a    Start analysis",
        "",
        "Review:",
        "  Tab / ↑/↓    Move between fields",
        "  ←/→          Pick player",
        "  Ctrl-s       Save",
        "  Esc          Discard and go back",
        "",
        "Team / Performance:",
        "  j/k or ↑/↓   Move",
        "  Enter        View performance",
        "  b / Esc      Back",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
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
