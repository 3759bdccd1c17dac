use crate::matches::MatchRecord;

/// Matches in which either team played.
pub fn subset_teams<'a>(
    matches: &'a [MatchRecord],
    team_a: &str,
    team_b: &str,
) -> Vec<&'a MatchRecord> {
    matches
        .iter()
        .filter(|m| m.involves(team_a) || m.involves(team_b))
        .collect()
}

/// Matches played between the two teams, either way round.
pub fn head_to_head<'a>(
    matches: &'a [MatchRecord],
    team_a: &str,
    team_b: &str,
) -> Vec<&'a MatchRecord> {
    matches
        .iter()
        .filter(|m| {
            (m.home_team == team_a && m.away_team == team_b)
                || (m.home_team == team_b && m.away_team == team_a)
        })
        .collect()
}
