pub mod chart;
pub mod checks;
pub mod config;
pub mod error;
pub mod filter;
pub mod matches;
pub mod perspective;
pub mod seasons;
pub mod stats;
pub mod table;

pub use error::{Error, Result};
pub use matches::{MatchRecord, MatchResult, SideStats, Venue};
pub use perspective::{
    HalfTimeState, Outcome, TeamEvent, extract_all_perspectives, extract_team_perspective,
};
