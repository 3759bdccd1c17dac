use std::fmt;

use serde::{Deserialize, Serialize};

/// Full-time or half-time result as recorded in the season files (`H`, `A`, `D`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "H")]
    HomeWin,
    #[serde(rename = "A")]
    AwayWin,
    #[serde(rename = "D")]
    Draw,
}

impl MatchResult {
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim() {
            "H" => Some(MatchResult::HomeWin),
            "A" => Some(MatchResult::AwayWin),
            "D" => Some(MatchResult::Draw),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            MatchResult::HomeWin => 'H',
            MatchResult::AwayWin => 'A',
            MatchResult::Draw => 'D',
        }
    }

    /// Side that was ahead, `None` for a draw.
    pub fn leader(self) -> Option<Venue> {
        match self {
            MatchResult::HomeWin => Some(Venue::Home),
            MatchResult::AwayWin => Some(Venue::Away),
            MatchResult::Draw => None,
        }
    }

    /// Result implied by a scoreline.
    pub fn from_score(home: u32, away: u32) -> Self {
        if home > away {
            MatchResult::HomeWin
        } else if home < away {
            MatchResult::AwayWin
        } else {
            MatchResult::Draw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn opposite(self) -> Self {
        match self {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Venue::Home => "Home",
            Venue::Away => "Away",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-side counters of one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    pub goals: u32,
    pub half_goals: u32,
    pub shots: u32,
    pub shots_target: u32,
    pub fouls: u32,
    pub corners: u32,
    pub yellows: u32,
    pub reds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub result: MatchResult,
    pub half_result: MatchResult,
    pub home: SideStats,
    pub away: SideStats,
    pub referee: String,
    pub season: String,
}

impl MatchRecord {
    pub fn team(&self, venue: Venue) -> &str {
        match venue {
            Venue::Home => &self.home_team,
            Venue::Away => &self.away_team,
        }
    }

    pub fn side(&self, venue: Venue) -> &SideStats {
        match venue {
            Venue::Home => &self.home,
            Venue::Away => &self.away,
        }
    }

    /// Venue the team played at, away checked first.
    pub fn venue_of(&self, team: &str) -> Option<Venue> {
        if self.away_team == team {
            Some(Venue::Away)
        } else if self.home_team == team {
            Some(Venue::Home)
        } else {
            None
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.venue_of(team).is_some()
    }
}
