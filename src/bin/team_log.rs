use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use matchstats::chart::{self, LineSeries, TeamSeries};
use matchstats::checks::{self, CheckMode};
use matchstats::config::Settings;
use matchstats::filter;
use matchstats::matches::Venue;
use matchstats::perspective::{TeamEvent, extract_team_perspective};
use matchstats::seasons;
use matchstats::stats::{self, Metric};
use matchstats::table;

#[derive(Parser)]
#[command(author, version, about = "Per-team event log from season match files")]
struct Cli {
    /// Team whose log is written.
    #[arg(long)]
    team: String,

    /// Second team for head-to-head numbers and charts.
    #[arg(long)]
    rival: Option<String>,

    /// Last two digits of the first season's start year.
    #[arg(long)]
    start: u32,

    /// Last two digits of the year after the final season starts (exclusive).
    #[arg(long)]
    end: u32,

    /// Directory holding the `20YY-YY.csv` files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Where chart workbooks are written.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Abort on the first row that fails a consistency check.
    #[arg(long)]
    strict: bool,

    /// Print the log as JSON instead of CSV.
    #[arg(long)]
    json: bool,

    /// Column charted with --chart.
    #[arg(long, default_value = "shots")]
    metric: String,

    /// Export game and season charts for --team against --rival.
    #[arg(long)]
    chart: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        settings.data_dir = dir;
    }
    if let Some(dir) = cli.out_dir.clone() {
        settings.out_dir = dir;
    }
    if cli.strict {
        settings.check_mode = CheckMode::Strict;
    }
    let metric = Metric::from_column(&cli.metric)
        .ok_or_else(|| anyhow!("unknown metric column {:?}", cli.metric))?;

    let tables = seasons::load_seasons(&settings.data_dir, cli.start, cli.end)
        .context("load season files")?;
    let drift = table::disjoint_columns(&tables);
    if !drift.is_empty() {
        info!(columns = ?drift, "columns not shared by consecutive seasons");
    }
    let matches = table::concat_matches(&tables).context("type season tables")?;

    let report = checks::check_table(&matches, settings.check_mode).context("consistency checks")?;
    info!(
        rows = report.rows_checked,
        score_violations = report.score_violations,
        shot_violations = report.shot_violations,
        "consistency checks done"
    );

    let events = extract_team_perspective(&matches, &cli.team).context("extract team log")?;
    if events.is_empty() {
        info!(team = %cli.team, "team not found in any loaded match");
    }
    for venue in [Venue::Home, Venue::Away] {
        let totals = stats::venue_shots(&events, venue, &cli.team);
        info!(
            team = %totals.team,
            venue = %venue,
            games = totals.games,
            shots = totals.shots,
            shots_target = totals.shots_target,
            accuracy = totals.accuracy(),
            "venue shots"
        );
    }

    if let Some(rival) = cli.rival.as_deref() {
        let subset = filter::subset_teams(&matches, &cli.team, rival);
        let h2h = filter::head_to_head(&matches, &cli.team, rival);
        info!(
            team = %cli.team,
            rival,
            involving_either = subset.len(),
            head_to_head = h2h.len(),
            "fixtures"
        );

        if cli.chart {
            let rival_events =
                extract_team_perspective(&matches, rival).context("extract rival log")?;
            export_charts(&settings, &cli.team, &events, rival, &rival_events, metric)?;
        }
    } else if cli.chart {
        return Err(anyhow!("--chart needs --rival"));
    }

    write_events(&events, cli.json)
}

fn export_charts(
    settings: &Settings,
    team: &str,
    events: &[TeamEvent],
    rival: &str,
    rival_events: &[TeamEvent],
    metric: Metric,
) -> Result<()> {
    std::fs::create_dir_all(&settings.out_dir)
        .with_context(|| format!("create {}", settings.out_dir.display()))?;
    let stem = format!("{}_vs_{}_{}", slug(team), slug(rival), metric.column());

    let first = LineSeries::from_games(team, events, metric);
    let second = LineSeries::from_games(rival, rival_events, metric);
    let games_path = chart::export_game_chart(
        &settings.out_dir.join(format!("{stem}_games")),
        &first,
        &second,
        metric.label(),
        metric.label(),
        settings.tick_step,
    )
    .context("export game chart")?;

    let seasons_path = chart::export_season_chart(
        &settings.out_dir.join(format!("{stem}_seasons")),
        TeamSeries {
            label: team,
            events,
        },
        TeamSeries {
            label: rival,
            events: rival_events,
        },
        metric,
    )
    .context("export season chart")?;

    info!(games = %games_path.display(), seasons = %seasons_path.display(), "charts written");
    Ok(())
}

fn write_events(events: &[TeamEvent], json: bool) -> Result<()> {
    let stdout = io::stdout();
    if json {
        serde_json::to_writer_pretty(stdout.lock(), events).context("write json")?;
        println!();
        return Ok(());
    }
    let mut writer = csv::Writer::from_writer(stdout.lock());
    for event in events {
        writer.serialize(event).context("write csv row")?;
    }
    writer.flush().context("flush csv")?;
    Ok(())
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '_' })
        .collect()
}
