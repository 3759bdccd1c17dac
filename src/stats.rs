use std::collections::BTreeMap;

use serde::Serialize;

use crate::matches::{MatchRecord, MatchResult, Venue};
use crate::perspective::TeamEvent;

/// Winning margin from the winner's side, 0 for a draw.
pub fn goal_differential(m: &MatchRecord) -> i32 {
    let home = i64::from(m.home.goals);
    let away = i64::from(m.away.goals);
    let diff = match m.result {
        MatchResult::HomeWin => home - away,
        MatchResult::AwayWin => away - home,
        MatchResult::Draw => 0,
    };
    diff as i32
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

pub fn shot_accuracy(event: &TeamEvent) -> f64 {
    safe_ratio(f64::from(event.shots_target), f64::from(event.shots))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner<'a> {
    Team(&'a str),
    Draw,
}

impl Winner<'_> {
    pub fn label(&self) -> &str {
        match self {
            Winner::Team(name) => *name,
            Winner::Draw => "Draw",
        }
    }
}

pub fn winner(m: &MatchRecord) -> Winner<'_> {
    match m.result.leader() {
        Some(venue) => Winner::Team(m.team(venue)),
        None => Winner::Draw,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShots {
    pub team: String,
    pub venue: Venue,
    pub games: usize,
    pub shots: u32,
    pub shots_target: u32,
}

impl VenueShots {
    pub fn accuracy(&self) -> f64 {
        safe_ratio(f64::from(self.shots_target), f64::from(self.shots))
    }
}

/// Shot totals of a team log restricted to one venue.
pub fn venue_shots(events: &[TeamEvent], venue: Venue, team: &str) -> VenueShots {
    let mut out = VenueShots {
        team: team.to_string(),
        venue,
        games: 0,
        shots: 0,
        shots_target: 0,
    };
    for event in events.iter().filter(|e| e.venue == venue) {
        out.games += 1;
        out.shots += event.shots;
        out.shots_target += event.shots_target;
    }
    out
}

/// Numeric columns of a team log that can be charted or summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Goals,
    GoalDiff,
    HalfGoals,
    HalfGoalDiff,
    Shots,
    ShotsTarget,
    Fouls,
    Corners,
    Yellows,
    Reds,
    ShotsDiff,
    ShotsTargetDiff,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Goals,
        Metric::GoalDiff,
        Metric::HalfGoals,
        Metric::HalfGoalDiff,
        Metric::Shots,
        Metric::ShotsTarget,
        Metric::Fouls,
        Metric::Corners,
        Metric::Yellows,
        Metric::Reds,
        Metric::ShotsDiff,
        Metric::ShotsTargetDiff,
    ];

    pub fn value(self, event: &TeamEvent) -> i64 {
        match self {
            Metric::Goals => i64::from(event.ft_goals),
            Metric::GoalDiff => i64::from(event.ft_goal_diff),
            Metric::HalfGoals => i64::from(event.ht_goals),
            Metric::HalfGoalDiff => i64::from(event.ht_goal_diff),
            Metric::Shots => i64::from(event.shots),
            Metric::ShotsTarget => i64::from(event.shots_target),
            Metric::Fouls => i64::from(event.fouls),
            Metric::Corners => i64::from(event.corners),
            Metric::Yellows => i64::from(event.yellows),
            Metric::Reds => i64::from(event.reds),
            Metric::ShotsDiff => i64::from(event.shots_diff),
            Metric::ShotsTargetDiff => i64::from(event.shots_targ_diff),
        }
    }

    /// Column name in the exported team log.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Goals => "ft_goals",
            Metric::GoalDiff => "ft_goal_diff",
            Metric::HalfGoals => "ht_goals",
            Metric::HalfGoalDiff => "ht_goal_diff",
            Metric::Shots => "shots",
            Metric::ShotsTarget => "shots_target",
            Metric::Fouls => "fouls",
            Metric::Corners => "corners",
            Metric::Yellows => "yellows",
            Metric::Reds => "reds",
            Metric::ShotsDiff => "shots_diff",
            Metric::ShotsTargetDiff => "shots_targ_diff",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Goals => "Goals",
            Metric::GoalDiff => "Goal difference",
            Metric::HalfGoals => "Half-time goals",
            Metric::HalfGoalDiff => "Half-time goal difference",
            Metric::Shots => "Shots",
            Metric::ShotsTarget => "Shots on target",
            Metric::Fouls => "Fouls",
            Metric::Corners => "Corners",
            Metric::Yellows => "Yellow cards",
            Metric::Reds => "Red cards",
            Metric::ShotsDiff => "Shot difference",
            Metric::ShotsTargetDiff => "Shots on target difference",
        }
    }

    pub fn from_column(raw: &str) -> Option<Self> {
        let key = raw.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.column().eq_ignore_ascii_case(key))
    }

    pub fn next(self) -> Self {
        let idx = Metric::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Metric::ALL[(idx + 1) % Metric::ALL.len()]
    }
}

/// Sum of `metric` per season, seasons in ascending order.
pub fn season_totals(events: &[TeamEvent], metric: Metric) -> Vec<(String, i64)> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for event in events {
        *totals.entry(event.season.as_str()).or_default() += metric.value(event);
    }
    totals
        .into_iter()
        .map(|(season, total)| (season.to_string(), total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(5.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(-3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn metric_columns_round_trip_by_name() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_column(metric.column()), Some(metric));
        }
        assert_eq!(Metric::from_column("SHOTS"), Some(Metric::Shots));
        assert_eq!(Metric::from_column("possession"), None);
    }

    #[test]
    fn metric_next_wraps() {
        assert_eq!(Metric::ShotsTargetDiff.next(), Metric::Goals);
        assert_eq!(Metric::Goals.next(), Metric::GoalDiff);
    }
}
