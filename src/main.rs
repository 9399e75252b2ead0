use std::io;
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

use hoops_terminal::render::render_report;
use hoops_terminal::report::{EnrichConfig, ReportBuilder};
use hoops_terminal::state::{AppState, DEFAULT_SEASON, InputFocus, RenderedReport};

struct App {
    state: AppState,
    builder: ReportBuilder,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            builder: ReportBuilder::new(EnrichConfig::from_env()),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab => self.state.cycle_focus(),
            KeyCode::Enter => self.run_query(),
            KeyCode::Backspace => {
                self.state.focused_input_mut().pop();
            }
            KeyCode::Up => self.state.scroll_up(),
            KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char(c) => self.state.focused_input_mut().push(c),
            _ => {}
        }
    }

    fn run_query(&mut self) {
        let name = self.state.name_input.trim().to_string();
        if name.is_empty() {
            self.state.push_log("[WARN] Enter a player name first");
            return;
        }
        let season = {
            let raw = self.state.season_input.trim();
            if raw.is_empty() {
                DEFAULT_SEASON.to_string()
            } else {
                raw.to_string()
            }
        };

        self.state
            .push_log(format!("[INFO] Building report for {name} ({season})"));
        // Blocking on purpose: the pipeline, politeness delays included, runs
        // to completion before the UI reflects the result.
        let report = self.builder.build(&name, &season);
        let failed = report.error.is_some();
        let text = render_report(&report);
        if failed {
            self.state.push_log("[WARN] Report finished with an error");
        } else {
            self.state.push_log("[INFO] Report ready");
        }
        self.state.store_report(RenderedReport {
            player: name,
            season,
            text,
            failed,
        });
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return run_once(&args);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app);

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

// One-shot mode: `hoops_terminal "Full Name" [season]` prints the report and
// exits, no TUI.
fn run_once(args: &[String]) -> io::Result<()> {
    let name = args[0].as_str();
    let season = args.get(1).map(String::as_str).unwrap_or(DEFAULT_SEASON);
    let builder = ReportBuilder::new(EnrichConfig::from_env());
    let report = builder.build(name, season);
    println!("{}", render_report(&report));
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
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
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new("HOOPS TERMINAL | player status reports")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_form(frame, chunks[1], &app.state);
    render_report_pane(frame, chunks[2], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer =
        Paragraph::new("Tab Switch field | Enter Generate | Up/Down Scroll | F1 Help | Esc Quit")
            .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_input(
        frame,
        cols[0],
        "Player name",
        &state.name_input,
        state.focus == InputFocus::Name,
    );
    render_input(
        frame,
        cols[1],
        "Season (YYYY-YY)",
        &state.season_input,
        state.focus == InputFocus::Season,
    );
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let text = if focused {
        format!("{value}_")
    } else {
        value.to_string()
    };
    let input = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

fn render_report_pane(frame: &mut Frame, area: Rect, state: &AppState) {
    let (title, body) = match &state.last_report {
        Some(report) => {
            let marker = if report.failed { " [error]" } else { "" };
            (
                format!("Report: {} ({}){marker}", report.player, report.season),
                report.text.clone(),
            )
        }
        None => (
            "Report".to_string(),
            "No report yet. Fill in the form and press Enter.".to_string(),
        ),
    };

    let pane = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .scroll((state.report_scroll, 0))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(pane, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Hoops Terminal - Help",
        "",
        "Form:",
        "  Tab          Switch between name and season",
        "  Enter        Build the report (blocks while fetching)",
        "  Backspace    Delete",
        "",
        "Report:",
        "  Up/Down      Scroll",
        "",
        "Global:",
        "  F1           Toggle help",
        "  Esc          Close help / quit",
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
