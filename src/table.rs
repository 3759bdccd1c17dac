use std::collections::BTreeSet;
use std::io;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::matches::{MatchRecord, MatchResult, SideStats};

/// Short football-data.co.uk headers and the canonical names used across the crate.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("FTHG", "Final_HomeGoals"),
    ("HG", "Final_HomeGoals"),
    ("FTAG", "Final_AwayGoals"),
    ("AG", "Final_AwayGoals"),
    ("FTR", "Final_Result"),
    ("Res", "Final_Result"),
    ("HTHG", "Half_HomeGoals"),
    ("HTAG", "Half_AwayGoals"),
    ("HTR", "Half_Result"),
    ("HS", "Home_Shots"),
    ("AS", "Away_Shots"),
    ("HST", "HomeShots_Target"),
    ("AST", "AwayShots_Target"),
    ("HF", "Home_Fouls"),
    ("AF", "Away_Fouls"),
    ("HC", "Home_Corner"),
    ("AC", "Away_Corner"),
    ("HY", "Home_Yellows"),
    ("AY", "Away_Yellows"),
    ("HR", "Home_Reds"),
    ("AR", "Away_Reds"),
    ("Home", "HomeTeam"),
    ("Away", "AwayTeam"),
];

pub fn canonical_column(name: &str) -> &str {
    let name = name.trim();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// One season file as read, before any typing.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTable {
    pub season: String,
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl SeasonTable {
    pub fn from_reader<R: io::Read>(reader: R, season: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            // Trailing blank lines in the published files come through as one empty field.
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            rows.push(record);
        }
        debug!(season, columns = headers.len(), rows = rows.len(), "read season table");
        Ok(Self {
            season: season.to_string(),
            headers,
            rows,
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = canonical_column(name);
        self.headers
            .iter()
            .position(|h| canonical_column(h) == wanted)
    }

    /// Typed matches of this table.
    pub fn to_matches(&self) -> Result<Vec<MatchRecord>> {
        let cols = MatchColumns::resolve(self)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| cols.parse_row(row, idx, &self.season))
            .collect()
    }
}

/// Resolved position of a required column.
struct Col {
    idx: usize,
    name: String,
}

struct MatchColumns {
    home_team: Col,
    away_team: Col,
    result: Col,
    half_result: Col,
    referee: Col,
    season: Option<usize>,
    home: SideColumns,
    away: SideColumns,
}

struct SideColumns {
    goals: Col,
    half_goals: Col,
    shots: Col,
    shots_target: Col,
    fouls: Col,
    corners: Col,
    yellows: Col,
    reds: Col,
}

impl SideColumns {
    fn resolve(table: &SeasonTable, side: &str) -> Result<Self> {
        Ok(Self {
            goals: required(table, &format!("Final_{side}Goals"))?,
            half_goals: required(table, &format!("Half_{side}Goals"))?,
            shots: required(table, &format!("{side}_Shots"))?,
            shots_target: required(table, &format!("{side}Shots_Target"))?,
            fouls: required(table, &format!("{side}_Fouls"))?,
            corners: required(table, &format!("{side}_Corner"))?,
            yellows: required(table, &format!("{side}_Yellows"))?,
            reds: required(table, &format!("{side}_Reds"))?,
        })
    }

    fn parse(&self, row: &StringRecord, idx: usize) -> Result<SideStats> {
        Ok(SideStats {
            goals: count(row, &self.goals, idx)?,
            half_goals: count(row, &self.half_goals, idx)?,
            shots: count(row, &self.shots, idx)?,
            shots_target: count(row, &self.shots_target, idx)?,
            fouls: count(row, &self.fouls, idx)?,
            corners: count(row, &self.corners, idx)?,
            yellows: count(row, &self.yellows, idx)?,
            reds: count(row, &self.reds, idx)?,
        })
    }
}

impl MatchColumns {
    fn resolve(table: &SeasonTable) -> Result<Self> {
        Ok(Self {
            home_team: required(table, "HomeTeam")?,
            away_team: required(table, "AwayTeam")?,
            result: required(table, "Final_Result")?,
            half_result: required(table, "Half_Result")?,
            referee: required(table, "Referee")?,
            season: table.position("Season"),
            home: SideColumns::resolve(table, "Home")?,
            away: SideColumns::resolve(table, "Away")?,
        })
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        idx: usize,
        fallback_season: &str,
    ) -> Result<MatchRecord> {
        let season = self
            .season
            .and_then(|col| row.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_season);
        Ok(MatchRecord {
            home_team: text(row, &self.home_team, idx)?.to_string(),
            away_team: text(row, &self.away_team, idx)?.to_string(),
            result: result_code(row, &self.result, idx)?,
            half_result: result_code(row, &self.half_result, idx)?,
            home: self.home.parse(row, idx)?,
            away: self.away.parse(row, idx)?,
            referee: text(row, &self.referee, idx)?.to_string(),
            season: season.to_string(),
        })
    }
}

fn required(table: &SeasonTable, name: &str) -> Result<Col> {
    let idx = table.position(name).ok_or_else(|| {
        Error::schema(name, format!("missing from season {} table", table.season))
    })?;
    Ok(Col {
        idx,
        name: canonical_column(name).to_string(),
    })
}

fn text<'r>(row: &'r StringRecord, col: &Col, idx: usize) -> Result<&'r str> {
    row.get(col.idx)
        .map(str::trim)
        .ok_or_else(|| Error::schema(col.name.as_str(), format!("row {idx} is too short")))
}

fn count(row: &StringRecord, col: &Col, idx: usize) -> Result<u32> {
    let raw = text(row, col, idx)?;
    parse_count(raw).ok_or_else(|| {
        Error::schema(col.name.as_str(), format!("row {idx}: {raw:?} is not a count"))
    })
}

fn result_code(row: &StringRecord, col: &Col, idx: usize) -> Result<MatchResult> {
    let raw = text(row, col, idx)?;
    MatchResult::from_code(raw).ok_or_else(|| {
        Error::schema(col.name.as_str(), format!("row {idx}: unknown result {raw:?}"))
    })
}

// Counts sometimes come through as "3.0" when a column had blanks upstream.
fn parse_count(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

/// Columns present in `a` but not in `b`.
pub fn column_difference(a: &SeasonTable, b: &SeasonTable) -> BTreeSet<String> {
    let theirs: BTreeSet<&str> = b.headers.iter().map(String::as_str).collect();
    a.headers
        .iter()
        .filter(|h| !theirs.contains(h.as_str()))
        .cloned()
        .collect()
}

/// Canonical names of columns in `a` with no counterpart in `b`, so `FTHG` and
/// `Final_HomeGoals` count as the same column.
pub fn canonical_difference(a: &SeasonTable, b: &SeasonTable) -> BTreeSet<String> {
    let theirs: BTreeSet<&str> = b.headers.iter().map(|h| canonical_column(h)).collect();
    a.headers
        .iter()
        .map(|h| canonical_column(h))
        .filter(|h| !theirs.contains(h))
        .map(str::to_string)
        .collect()
}

/// For each consecutive pair of tables, the columns of the first missing from the second.
pub fn disjoint_columns(tables: &[SeasonTable]) -> Vec<String> {
    tables
        .windows(2)
        .flat_map(|pair| column_difference(&pair[0], &pair[1]))
        .collect()
}

/// Keeps the columns from `start_col` through `end_col` (inclusive) in every table.
pub fn subset_columns(
    tables: &[SeasonTable],
    start_col: &str,
    end_col: &str,
) -> Result<Vec<SeasonTable>> {
    tables
        .iter()
        .map(|table| {
            let start = required(table, start_col)?.idx;
            let end = required(table, end_col)?.idx;
            let keep = if start <= end { start..end + 1 } else { 0..0 };
            let rows = table
                .rows
                .iter()
                .map(|row| {
                    keep.clone()
                        .map(|col| row.get(col).unwrap_or_default())
                        .collect::<StringRecord>()
                })
                .collect();
            Ok(SeasonTable {
                season: table.season.clone(),
                headers: table.headers[keep.clone()].to_vec(),
                rows,
            })
        })
        .collect()
}

/// Typed matches of every table in order, warning about columns that drift between seasons.
pub fn concat_matches(tables: &[SeasonTable]) -> Result<Vec<MatchRecord>> {
    for pair in tables.windows(2) {
        let dropped = canonical_difference(&pair[0], &pair[1]);
        let added = canonical_difference(&pair[1], &pair[0]);
        if !dropped.is_empty() || !added.is_empty() {
            warn!(
                from = %pair[0].season,
                to = %pair[1].season,
                ?dropped,
                ?added,
                "season schemas differ"
            );
        }
    }
    let mut out = Vec::with_capacity(tables.iter().map(|t| t.rows.len()).sum());
    for table in tables {
        out.extend(table.to_matches()?);
    }
    Ok(out)
}
