use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchstats::chart::{self, GAMES_AXIS_TITLE, LineSeries};
use matchstats::checks;
use matchstats::config::Settings;
use matchstats::filter;
use matchstats::matches::{MatchRecord, Venue};
use matchstats::perspective::{Outcome, TeamEvent, extract_team_perspective};
use matchstats::seasons;
use matchstats::stats::{self, Metric};
use matchstats::table;

const MAX_LOGS: usize = 6;

#[derive(Parser)]
#[command(author, version, about = "Compare two teams' match statistics in the terminal")]
struct Cli {
    first: String,
    second: String,

    /// Last two digits of the first season's start year.
    #[arg(long)]
    start: u32,

    /// Last two digits of the year after the final season starts (exclusive).
    #[arg(long)]
    end: u32,

    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartView {
    Games,
    Seasons,
}

struct TeamLog {
    name: String,
    events: Vec<TeamEvent>,
}

struct App {
    first: TeamLog,
    second: TeamLog,
    head_to_head: usize,
    metric: Metric,
    view: ChartView,
    tick_step: usize,
    help_overlay: bool,
    logs: Vec<String>,
    should_quit: bool,
}

impl App {
    fn new(first: TeamLog, second: TeamLog, head_to_head: usize, tick_step: usize) -> Self {
        Self {
            first,
            second,
            head_to_head,
            metric: Metric::Shots,
            view: ChartView::Games,
            tick_step,
            help_overlay: false,
            logs: Vec::new(),
            should_quit: false,
        }
    }

    fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
        if self.logs.len() > MAX_LOGS {
            let excess = self.logs.len() - MAX_LOGS;
            self.logs.drain(..excess);
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('m') | KeyCode::Right => {
                self.metric = self.metric.next();
                self.push_log(format!("[INFO] Metric: {}", self.metric.label()));
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.view = match self.view {
                    ChartView::Games => ChartView::Seasons,
                    ChartView::Seasons => ChartView::Games,
                };
                self.push_log(format!("[INFO] View: {}", view_label(self.view)));
            }
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            _ => {}
        }
    }

    /// Series for the current view and the x categories they are plotted against.
    fn series(&self) -> (Vec<LineSeries>, Vec<String>) {
        let categories = match self.view {
            ChartView::Games => Vec::new(),
            ChartView::Seasons => {
                chart::season_axis(&[self.first.events.as_slice(), self.second.events.as_slice()])
            }
        };
        let series = [&self.first, &self.second]
            .into_iter()
            .map(|team| match self.view {
                ChartView::Games => LineSeries::from_games(&team.name, &team.events, self.metric),
                ChartView::Seasons => {
                    LineSeries::from_seasons(&team.name, &team.events, self.metric, &categories)
                }
            })
            .collect();
        (series, categories)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        settings.data_dir = dir;
    }

    let tables = seasons::load_seasons(&settings.data_dir, cli.start, cli.end)
        .context("load season files")?;
    let drift = table::disjoint_columns(&tables);
    let matches = table::concat_matches(&tables).context("type season tables")?;
    let report = checks::check_table(&matches, settings.check_mode).context("consistency checks")?;

    let mut app = build_app(&cli, &matches, settings.tick_step)?;
    app.push_log(format!(
        "[INFO] Loaded {} seasons, {} matches",
        tables.len(),
        matches.len()
    ));
    if !drift.is_empty() {
        app.push_log(format!("[WARN] Columns drift between seasons: {}", drift.join(", ")));
    }
    if !report.is_clean() {
        app.push_log(format!(
            "[WARN] {} rows flagged ({} score, {} shot issues)",
            report.flagged.len(),
            report.score_violations,
            report.shot_violations
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn build_app(cli: &Cli, matches: &[MatchRecord], tick_step: usize) -> Result<App> {
    let first = TeamLog {
        name: cli.first.clone(),
        events: extract_team_perspective(matches, &cli.first).context("extract first team")?,
    };
    let second = TeamLog {
        name: cli.second.clone(),
        events: extract_team_perspective(matches, &cli.second).context("extract second team")?,
    };
    let h2h = filter::head_to_head(matches, &cli.first, &cli.second).len();
    let mut app = App::new(first, second, h2h, tick_step);
    for team in [&cli.first, &cli.second] {
        if !matches.iter().any(|m| m.involves(team)) {
            app.push_log(format!("[WARN] {team} does not appear in the loaded seasons"));
        }
    }
    Ok(app)
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
            Constraint::Min(8),
            Constraint::Length(MAX_LOGS as u16 + 1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(format!(
        "  {} vs {} | {} | {}",
        app.first.name,
        app.second.name,
        view_label(app.view),
        app.metric.label()
    ))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);
    render_chart(frame, body[0], app);
    render_summary(frame, body[1], app);

    let logs = Paragraph::new(app.logs.join("\n"))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP).title("Log"));
    frame.render_widget(logs, chunks[2]);

    let footer = Paragraph::new("m/→ Metric | v Games/Seasons | ? Help | q Quit");
    frame.render_widget(footer, chunks[3]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let (series, categories) = app.series();
    if series.iter().all(|s| s.is_empty()) {
        let empty = Paragraph::new("No matches for these teams")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }
    let title = match app.view {
        ChartView::Games => {
            chart::game_chart_title(&app.first.name, &app.second.name, app.metric.label())
                .replace('\n', " | ")
        }
        ChartView::Seasons => chart::season_chart_title(app.metric.label()),
    };
    let x_title = match app.view {
        ChartView::Games => GAMES_AXIS_TITLE,
        ChartView::Seasons => "Season",
    };
    let widget = chart::line_chart(
        &series,
        &categories,
        &title,
        x_title,
        app.metric.label(),
        app.tick_step,
    );
    frame.render_widget(widget, area);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for team in [&app.first, &app.second] {
        lines.push(team.name.clone());
        lines.push(format!("  Record  {}", record_line(&team.events)));
        for venue in [Venue::Home, Venue::Away] {
            let shots = stats::venue_shots(&team.events, venue, &team.name);
            lines.push(format!(
                "  {:<5} {:>4} shots {:>4} on target ({:.0}%)",
                venue.label(),
                shots.shots,
                shots.shots_target,
                shots.accuracy() * 100.0
            ));
        }
        lines.push(String::new());
    }
    lines.push(format!("Head to head: {} matches", app.head_to_head));

    let summary = Paragraph::new(lines.join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    frame.render_widget(summary, area);
}

fn record_line(events: &[TeamEvent]) -> String {
    let count = |outcome: Outcome| events.iter().filter(|e| e.ft_result == outcome).count();
    format!(
        "W{} D{} L{}",
        count(Outcome::Won),
        count(Outcome::Drew),
        count(Outcome::Lost)
    )
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 40, area);
    let text = [
        "m / →   next metric",
        "v       toggle per-game / per-season",
        "?       toggle this help",
        "q / Esc quit",
    ]
    .join("\n");
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help")),
        popup,
    );
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
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn view_label(view: ChartView) -> &'static str {
    match view {
        ChartView::Games => "Per game",
        ChartView::Seasons => "Per season",
    }
}
