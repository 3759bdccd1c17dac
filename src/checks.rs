use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::matches::{MatchRecord, MatchResult, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Collect every violation and carry on.
    #[default]
    Advisory,
    /// Stop at the first offending row.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Violation {
    FullTimeResultMismatch {
        result: char,
        home_goals: u32,
        away_goals: u32,
    },
    HalfTimeResultMismatch {
        result: char,
        home_goals: u32,
        away_goals: u32,
    },
    HalfTimeGoalsExceedFinal {
        half_away: u32,
        final_away: u32,
    },
    TargetExceedsShots {
        venue: Venue,
        shots: u32,
        shots_target: u32,
    },
}

impl Violation {
    pub fn is_shot_violation(&self) -> bool {
        matches!(self, Violation::TargetExceedsShots { .. })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::FullTimeResultMismatch {
                result,
                home_goals,
                away_goals,
            } => write!(f, "full-time result {result} contradicts {home_goals}-{away_goals}"),
            Violation::HalfTimeResultMismatch {
                result,
                home_goals,
                away_goals,
            } => write!(f, "half-time result {result} contradicts {home_goals}-{away_goals}"),
            Violation::HalfTimeGoalsExceedFinal {
                half_away,
                final_away,
            } => write!(
                f,
                "away side had {half_away} at half time but {final_away} at full time"
            ),
            Violation::TargetExceedsShots {
                venue,
                shots,
                shots_target,
            } => write!(f, "{venue} side has {shots_target} on target from {shots} shots"),
        }
    }
}

/// Result codes against scorelines, plus the half-time away goals bound.
pub fn check_scores(m: &MatchRecord) -> Vec<Violation> {
    let mut out = Vec::new();
    if MatchResult::from_score(m.home.goals, m.away.goals) != m.result {
        out.push(Violation::FullTimeResultMismatch {
            result: m.result.code(),
            home_goals: m.home.goals,
            away_goals: m.away.goals,
        });
    }
    if MatchResult::from_score(m.home.half_goals, m.away.half_goals) != m.half_result {
        out.push(Violation::HalfTimeResultMismatch {
            result: m.half_result.code(),
            home_goals: m.home.half_goals,
            away_goals: m.away.half_goals,
        });
    }
    if m.away.half_goals > m.away.goals {
        out.push(Violation::HalfTimeGoalsExceedFinal {
            half_away: m.away.half_goals,
            final_away: m.away.goals,
        });
    }
    out
}

/// Shots on target never exceed total shots, per side.
pub fn check_shots(m: &MatchRecord) -> Vec<Violation> {
    [Venue::Home, Venue::Away]
        .into_iter()
        .filter_map(|venue| {
            let side = m.side(venue);
            (side.shots_target > side.shots).then_some(Violation::TargetExceedsShots {
                venue,
                shots: side.shots,
                shots_target: side.shots_target,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FlaggedRow {
    pub row: usize,
    pub home_team: String,
    pub away_team: String,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConsistencyReport {
    pub rows_checked: usize,
    pub score_violations: usize,
    pub shot_violations: usize,
    pub flagged: Vec<FlaggedRow>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }
}

pub fn check_table(matches: &[MatchRecord], mode: CheckMode) -> Result<ConsistencyReport> {
    let mut report = ConsistencyReport {
        rows_checked: matches.len(),
        ..ConsistencyReport::default()
    };
    for (row, m) in matches.iter().enumerate() {
        let mut violations = check_scores(m);
        violations.extend(check_shots(m));
        if violations.is_empty() {
            continue;
        }
        for violation in &violations {
            warn!(
                row,
                home = %m.home_team,
                away = %m.away_team,
                season = %m.season,
                "{violation}"
            );
        }
        if mode == CheckMode::Strict {
            let detail = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Consistency { row, detail });
        }
        let shots = violations.iter().filter(|v| v.is_shot_violation()).count();
        report.shot_violations += shots;
        report.score_violations += violations.len() - shots;
        report.flagged.push(FlaggedRow {
            row,
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            violations,
        });
    }
    Ok(report)
}
