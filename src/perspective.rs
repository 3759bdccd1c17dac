use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::matches::{MatchRecord, MatchResult, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
    Drew,
}

impl Outcome {
    pub fn for_venue(result: MatchResult, venue: Venue) -> Self {
        match (result, venue) {
            (MatchResult::HomeWin, Venue::Home) => Outcome::Won,
            (MatchResult::HomeWin, Venue::Away) => Outcome::Lost,
            (MatchResult::AwayWin, Venue::Home) => Outcome::Lost,
            (MatchResult::AwayWin, Venue::Away) => Outcome::Won,
            (MatchResult::Draw, _) => Outcome::Drew,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Won => "Won",
            Outcome::Lost => "Lost",
            Outcome::Drew => "Drew",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfTimeState {
    Winning,
    Losing,
    Draw,
}

impl HalfTimeState {
    pub fn for_venue(result: MatchResult, venue: Venue) -> Self {
        match (result, venue) {
            (MatchResult::HomeWin, Venue::Home) => HalfTimeState::Winning,
            (MatchResult::HomeWin, Venue::Away) => HalfTimeState::Losing,
            (MatchResult::AwayWin, Venue::Home) => HalfTimeState::Losing,
            (MatchResult::AwayWin, Venue::Away) => HalfTimeState::Winning,
            (MatchResult::Draw, _) => HalfTimeState::Draw,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HalfTimeState::Winning => "Winning",
            HalfTimeState::Losing => "Losing",
            HalfTimeState::Draw => "Draw",
        }
    }
}

/// One team's view of one match. Field names follow the exported column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEvent {
    pub rival: String,
    pub ft_result: Outcome,
    pub ft_goals: u32,
    pub ft_goal_diff: i32,
    pub ht_result: HalfTimeState,
    pub ht_goals: u32,
    pub ht_goal_diff: i32,
    pub mr_ref: String,
    pub shots: u32,
    pub shots_target: u32,
    pub fouls: u32,
    pub corners: u32,
    pub yellows: u32,
    pub reds: u32,
    pub season: String,
    pub venue: Venue,
    pub shots_diff: i32,
    pub shots_targ_diff: i32,
}

/// Which side of a match counts as "mine".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Perspective {
    mine: Venue,
}

impl Perspective {
    fn of(mine: Venue) -> Self {
        Self { mine }
    }

    fn event(self, m: &MatchRecord) -> TeamEvent {
        let theirs = self.mine.opposite();
        let own = m.side(self.mine);
        let rival = m.side(theirs);
        TeamEvent {
            rival: m.team(theirs).to_string(),
            ft_result: Outcome::for_venue(m.result, self.mine),
            ft_goals: own.goals,
            ft_goal_diff: signed_diff(own.goals, rival.goals),
            ht_result: HalfTimeState::for_venue(m.half_result, self.mine),
            ht_goals: own.half_goals,
            ht_goal_diff: signed_diff(own.half_goals, rival.half_goals),
            mr_ref: m.referee.clone(),
            shots: own.shots,
            shots_target: own.shots_target,
            fouls: own.fouls,
            corners: own.corners,
            yellows: own.yellows,
            reds: own.reds,
            season: m.season.clone(),
            venue: self.mine,
            shots_diff: signed_diff(own.shots, rival.shots),
            shots_targ_diff: signed_diff(own.shots_target, rival.shots_target),
        }
    }
}

fn signed_diff(mine: u32, theirs: u32) -> i32 {
    (i64::from(mine) - i64::from(theirs)) as i32
}

fn require_team_name(team: &str) -> Result<()> {
    if team.trim().is_empty() {
        return Err(Error::InvalidInput("team name must not be empty".to_string()));
    }
    Ok(())
}

/// Event log of `team` across `matches`, one record per match it played, in input order.
pub fn extract_team_perspective(matches: &[MatchRecord], team: &str) -> Result<Vec<TeamEvent>> {
    require_team_name(team)?;
    let events: Vec<TeamEvent> = matches
        .iter()
        .filter_map(|m| m.venue_of(team).map(|venue| Perspective::of(venue).event(m)))
        .collect();
    debug!(team, matches = matches.len(), events = events.len(), "extracted team log");
    Ok(events)
}

/// Both participants of every match, home record first.
pub fn extract_all_perspectives(matches: &[MatchRecord]) -> Vec<TeamEvent> {
    matches
        .par_iter()
        .flat_map_iter(|m| {
            [
                Perspective::of(Venue::Home).event(m),
                Perspective::of(Venue::Away).event(m),
            ]
        })
        .collect()
}

/// Logs for several teams, computed in parallel and returned in the order given.
pub fn team_logs(matches: &[MatchRecord], teams: &[&str]) -> Result<Vec<(String, Vec<TeamEvent>)>> {
    teams
        .par_iter()
        .map(|team| {
            let events = extract_team_perspective(matches, team)?;
            Ok((team.to_string(), events))
        })
        .collect()
}
