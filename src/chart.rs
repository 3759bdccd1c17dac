use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition};
use rust_xlsxwriter::{Chart as XlsxChart, ChartLegendPosition, ChartType, Workbook};
use tracing::info;

use crate::error::{Error, Result};
use crate::perspective::TeamEvent;
use crate::stats::{Metric, season_totals};

pub const GAMES_AXIS_TITLE: &str = "Games in succession";
pub const DEFAULT_TICK_STEP: usize = 4;

const DATA_SHEET: &str = "Data";
const SERIES_COLORS: [Color; 2] = [Color::Cyan, Color::Yellow];

/// A labelled series of `(x, y)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl LineSeries {
    /// One point per game, x being the position in the log.
    pub fn from_games(label: &str, events: &[TeamEvent], metric: Metric) -> Self {
        let points = events
            .iter()
            .enumerate()
            .map(|(idx, event)| (idx as f64, metric.value(event) as f64))
            .collect();
        Self {
            label: label.to_string(),
            points,
        }
    }

    /// One point per season the team played, x being the season's position in `axis`.
    pub fn from_seasons(
        label: &str,
        events: &[TeamEvent],
        metric: Metric,
        axis: &[String],
    ) -> Self {
        let points = season_totals(events, metric)
            .into_iter()
            .filter_map(|(season, total)| {
                let idx = axis.iter().position(|s| *s == season)?;
                Some((idx as f64, total as f64))
            })
            .collect();
        Self {
            label: label.to_string(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A team's label and event log.
#[derive(Debug, Clone, Copy)]
pub struct TeamSeries<'a> {
    pub label: &'a str,
    pub events: &'a [TeamEvent],
}

/// Every season appearing in any of `logs`, ascending.
pub fn season_axis(logs: &[&[TeamEvent]]) -> Vec<String> {
    logs.iter()
        .flat_map(|log| log.iter())
        .map(|event| event.season.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn game_ticks(len: usize, step: usize) -> Vec<usize> {
    (0..len).step_by(step.max(1)).collect()
}

pub fn game_chart_title(first: &str, second: &str, title: &str) -> String {
    format!("{first} vs {second}\n{title}")
}

pub fn season_chart_title(metric_label: &str) -> String {
    format!("Total {metric_label} per Season")
}

/// Writes both series and a line chart of them to `<path>.xlsx`.
pub fn export_game_chart(
    path: &Path,
    first: &LineSeries,
    second: &LineSeries,
    y_label: &str,
    title: &str,
    tick_step: usize,
) -> Result<PathBuf> {
    if first.is_empty() && second.is_empty() {
        return Err(Error::InvalidInput("nothing to chart".to_string()));
    }
    let out = path.with_extension("xlsx");
    let rows = first.points.len().max(second.points.len());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(DATA_SHEET)?;
    sheet.write_string(0, 0, "Game")?;
    sheet.write_string(0, 1, first.label.as_str())?;
    sheet.write_string(0, 2, second.label.as_str())?;
    for idx in 0..rows {
        sheet.write_number(idx as u32 + 1, 0, idx as f64)?;
    }
    for (col, series) in [(1u16, first), (2u16, second)] {
        for (idx, (_, y)) in series.points.iter().enumerate() {
            sheet.write_number(idx as u32 + 1, col, *y)?;
        }
    }

    let mut chart = XlsxChart::new(ChartType::Line);
    for (col, series) in [(1u16, first), (2u16, second)] {
        if series.is_empty() {
            continue;
        }
        let last = series.points.len() as u32;
        chart
            .add_series()
            .set_name(series.label.as_str())
            .set_categories((DATA_SHEET, 1, 0, last, 0))
            .set_values((DATA_SHEET, 1, col, last, col));
    }
    chart
        .title()
        .set_name(&game_chart_title(&first.label, &second.label, title));
    chart
        .x_axis()
        .set_name(GAMES_AXIS_TITLE)
        .set_label_interval(tick_step.clamp(1, u16::MAX as usize) as u16);
    chart.y_axis().set_name(y_label);
    chart.legend().set_position(ChartLegendPosition::Top);
    sheet.insert_chart(1, 4, &chart)?;

    workbook.save(&out)?;
    info!(path = %out.display(), games = rows, "exported game chart");
    Ok(out)
}

/// One data row of the season chart. A team that did not play the season has no total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub season: String,
    pub first: Option<i64>,
    pub second: Option<i64>,
}

/// Per-season totals of both teams over their shared season axis.
pub fn season_rows(
    first: TeamSeries<'_>,
    second: TeamSeries<'_>,
    metric: Metric,
) -> Vec<SeasonRow> {
    let first_totals = season_totals(first.events, metric);
    let second_totals = season_totals(second.events, metric);
    let total_in = |totals: &[(String, i64)], season: &str| {
        totals
            .iter()
            .find(|(s, _)| s == season)
            .map(|(_, total)| *total)
    };
    season_axis(&[first.events, second.events])
        .into_iter()
        .map(|season| SeasonRow {
            first: total_in(&first_totals, &season),
            second: total_in(&second_totals, &season),
            season,
        })
        .collect()
}

/// Writes per-season totals of `metric` for both teams and a line chart to `<path>.xlsx`.
pub fn export_season_chart(
    path: &Path,
    first: TeamSeries<'_>,
    second: TeamSeries<'_>,
    metric: Metric,
) -> Result<PathBuf> {
    let rows = season_rows(first, second, metric);
    if rows.is_empty() {
        return Err(Error::InvalidInput("nothing to chart".to_string()));
    }
    let out = path.with_extension("xlsx");
    let label = metric.label();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(DATA_SHEET)?;
    sheet.write_string(0, 0, "season")?;
    sheet.write_string(0, 1, first.label)?;
    sheet.write_string(0, 2, second.label)?;
    for (idx, season_row) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, season_row.season.as_str())?;
        for (col, total) in [(1u16, season_row.first), (2u16, season_row.second)] {
            if let Some(total) = total {
                sheet.write_number(row, col, total as f64)?;
            }
        }
    }

    let last = rows.len() as u32;
    let mut chart = XlsxChart::new(ChartType::Line);
    for (col, team) in [(1u16, first), (2u16, second)] {
        chart
            .add_series()
            .set_name(team.label)
            .set_categories((DATA_SHEET, 1, 0, last, 0))
            .set_values((DATA_SHEET, 1, col, last, col));
    }
    chart.title().set_name(&season_chart_title(label));
    chart.y_axis().set_name(&format!("Total {label}"));
    sheet.insert_chart(1, 4, &chart)?;

    workbook.save(&out)?;
    info!(path = %out.display(), seasons = rows.len(), "exported season chart");
    Ok(out)
}

/// Terminal line chart of the given series.
///
/// With `categories` empty the x axis is numbered every `tick_step` points,
/// otherwise each category labels the x position of its index.
pub fn line_chart<'a>(
    series: &'a [LineSeries],
    categories: &'a [String],
    title: &'a str,
    x_title: &'a str,
    y_title: &'a str,
    tick_step: usize,
) -> Chart<'a> {
    let datasets = series
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            Dataset::default()
                .name(s.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]))
                .data(&s.points)
        })
        .collect::<Vec<_>>();

    let (x_max, y_min, y_max) = bounds(series);
    let (x_max, x_labels) = if categories.is_empty() {
        let len = x_max as usize + 1;
        // Keep the axis readable on long logs.
        let step = tick_step.max(1).max(len.div_ceil(8));
        let labels = game_ticks(len, step)
            .into_iter()
            .map(|tick| Span::raw(tick.to_string()))
            .collect::<Vec<_>>();
        (x_max, labels)
    } else {
        let labels = categories
            .iter()
            .map(|category| Span::raw(category.as_str()))
            .collect::<Vec<_>>();
        (x_max.max(categories.len().saturating_sub(1) as f64), labels)
    };
    let y_labels = vec![
        Span::raw(format!("{y_min:.0}")),
        Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
        Span::raw(format!("{y_max:.0}")),
    ];

    Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title(x_title)
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max.max(1.0)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        )
        .legend_position(Some(LegendPosition::TopLeft))
}

/// `(x_max, y_min, y_max)` over all points, y padded so flat lines stay visible.
pub fn bounds(series: &[LineSeries]) -> (f64, f64, f64) {
    let mut x_max = 0.0_f64;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (x, y) in series.iter().flat_map(|s| s.points.iter()) {
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return (0.0, 0.0, 1.0);
    }
    (x_max, y_min.min(0.0), y_max.max(y_min + 1.0))
}
