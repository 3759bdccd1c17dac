use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use matchstats::matches::{MatchRecord, MatchResult, SideStats, Venue};
use matchstats::perspective::{
    HalfTimeState, Outcome, extract_all_perspectives, extract_team_perspective, team_logs,
};
use matchstats::stats::goal_differential;
use matchstats::Error;

const TEAMS: [&str; 6] = ["Arsenal", "Chelsea", "Everton", "Fulham", "Leeds", "Wolves"];

fn arsenal_chelsea() -> MatchRecord {
    MatchRecord {
        home_team: "Arsenal".to_string(),
        away_team: "Chelsea".to_string(),
        result: MatchResult::HomeWin,
        half_result: MatchResult::Draw,
        home: SideStats {
            goals: 3,
            half_goals: 1,
            shots: 10,
            shots_target: 5,
            fouls: 11,
            corners: 6,
            yellows: 2,
            reds: 0,
        },
        away: SideStats {
            goals: 1,
            half_goals: 1,
            shots: 8,
            shots_target: 3,
            fouls: 12,
            corners: 4,
            yellows: 1,
            reds: 0,
        },
        referee: "M Oliver".to_string(),
        season: "2021".to_string(),
    }
}

fn random_side(rng: &mut StdRng) -> SideStats {
    let goals = rng.gen_range(0..5);
    let shots = rng.gen_range(0..25);
    SideStats {
        goals,
        half_goals: rng.gen_range(0..=goals),
        shots,
        shots_target: rng.gen_range(0..=shots),
        fouls: rng.gen_range(0..20),
        corners: rng.gen_range(0..12),
        yellows: rng.gen_range(0..5),
        reds: rng.gen_range(0..2),
    }
}

fn random_table(seed: u64, len: usize) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|idx| {
            let home_idx = rng.gen_range(0..TEAMS.len());
            let away_idx = (home_idx + rng.gen_range(1..TEAMS.len())) % TEAMS.len();
            let home = random_side(&mut rng);
            let away = random_side(&mut rng);
            MatchRecord {
                home_team: TEAMS[home_idx].to_string(),
                away_team: TEAMS[away_idx].to_string(),
                result: MatchResult::from_score(home.goals, away.goals),
                half_result: MatchResult::from_score(home.half_goals, away.half_goals),
                home,
                away,
                referee: format!("Ref {}", idx % 7),
                season: format!("20{:02}", 10 + idx / 38),
            }
        })
        .collect()
}

#[test]
fn chelsea_view_of_home_defeat() {
    let events = extract_team_perspective(&[arsenal_chelsea()], "Chelsea").unwrap();
    assert_eq!(events.len(), 1);
    let e = &events[0];
    assert_eq!(e.rival, "Arsenal");
    assert_eq!(e.ft_result, Outcome::Lost);
    assert_eq!(e.ft_goals, 1);
    assert_eq!(e.ft_goal_diff, -2);
    assert_eq!(e.ht_result, HalfTimeState::Draw);
    assert_eq!(e.ht_goals, 1);
    assert_eq!(e.ht_goal_diff, 0);
    assert_eq!(e.shots, 8);
    assert_eq!(e.shots_target, 3);
    assert_eq!(e.venue, Venue::Away);
    assert_eq!(e.shots_diff, -2);
    assert_eq!(e.shots_targ_diff, -2);
    assert_eq!(e.mr_ref, "M Oliver");
    assert_eq!(e.season, "2021");
    assert_eq!(e.fouls, 12);
    assert_eq!(e.corners, 4);
    assert_eq!(e.yellows, 1);
    assert_eq!(e.reds, 0);
}

#[test]
fn home_and_away_views_are_mirrored() {
    let m = arsenal_chelsea();
    let home = extract_team_perspective(std::slice::from_ref(&m), "Arsenal").unwrap();
    let away = extract_team_perspective(std::slice::from_ref(&m), "Chelsea").unwrap();
    assert_eq!(home[0].ft_result, Outcome::Won);
    assert_eq!(away[0].ft_result, Outcome::Lost);
    assert_eq!(home[0].venue, Venue::Home);
    assert_eq!(home[0].ft_goal_diff, -away[0].ft_goal_diff);
    assert_eq!(home[0].ht_goal_diff, -away[0].ht_goal_diff);
    assert_eq!(home[0].shots_diff, -away[0].shots_diff);
    assert_eq!(home[0].shots_targ_diff, -away[0].shots_targ_diff);
    assert_eq!(home[0].rival, "Chelsea");
}

#[test]
fn absent_team_gives_empty_log() {
    let events = extract_team_perspective(&[arsenal_chelsea()], "Spurs").unwrap();
    assert!(events.is_empty());
}

#[test]
fn empty_team_name_is_invalid_input() {
    let err = extract_team_perspective(&[arsenal_chelsea()], "").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn log_length_matches_appearances() {
    let table = random_table(11, 200);
    for team in TEAMS {
        let events = extract_team_perspective(&table, team).unwrap();
        let played = table.iter().filter(|m| m.involves(team)).count();
        assert_eq!(events.len(), played, "{team}");
    }
    let total: usize = TEAMS
        .iter()
        .map(|team| extract_team_perspective(&table, team).unwrap().len())
        .sum();
    assert_eq!(total, 2 * table.len());
}

#[test]
fn outcomes_mirror_results_for_the_venue() {
    let table = random_table(3, 150);
    let events = extract_team_perspective(&table, "Everton").unwrap();
    let source: Vec<&MatchRecord> = table.iter().filter(|m| m.involves("Everton")).collect();
    for (event, m) in events.iter().zip(source) {
        let expected = match (m.result, event.venue) {
            (MatchResult::Draw, _) => Outcome::Drew,
            (MatchResult::HomeWin, Venue::Home) | (MatchResult::AwayWin, Venue::Away) => {
                Outcome::Won
            }
            _ => Outcome::Lost,
        };
        assert_eq!(event.ft_result, expected);
        assert_eq!(m.team(event.venue), "Everton");
        assert_eq!(event.rival, m.team(event.venue.opposite()));
    }
}

#[test]
fn extraction_is_idempotent_and_leaves_input_alone() {
    let table = random_table(5, 120);
    let before = table.clone();
    let first = extract_team_perspective(&table, "Leeds").unwrap();
    let second = extract_team_perspective(&table, "Leeds").unwrap();
    assert_eq!(first, second);
    assert_eq!(table, before);
}

#[test]
fn all_perspectives_emit_two_records_per_match_in_order() {
    let table = random_table(9, 90);
    let events = extract_all_perspectives(&table);
    assert_eq!(events.len(), 2 * table.len());
    for (pair, m) in events.chunks(2).zip(&table) {
        assert_eq!(pair[0].venue, Venue::Home);
        assert_eq!(pair[0].rival, m.away_team);
        assert_eq!(pair[1].venue, Venue::Away);
        assert_eq!(pair[1].rival, m.home_team);
        assert_eq!(pair[0].ft_goal_diff, -pair[1].ft_goal_diff);
    }
}

#[test]
fn goal_differential_agrees_with_winning_side() {
    let table = random_table(21, 200);
    for m in &table {
        let expected = match m.result.leader() {
            Some(venue) => {
                let events = extract_all_perspectives(std::slice::from_ref(m));
                events
                    .into_iter()
                    .find(|e| e.venue == venue)
                    .map(|e| e.ft_goal_diff)
                    .unwrap()
            }
            None => 0,
        };
        assert_eq!(goal_differential(m), expected);
        assert!(goal_differential(m) >= 0);
    }
}

#[test]
fn team_logs_keep_requested_order() {
    let table = random_table(13, 100);
    let logs = team_logs(&table, &["Wolves", "Arsenal", "Nobody"]).unwrap();
    let names: Vec<&str> = logs.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["Wolves", "Arsenal", "Nobody"]);
    assert_eq!(logs[1].1, extract_team_perspective(&table, "Arsenal").unwrap());
    assert!(logs[2].1.is_empty());
    assert!(team_logs(&table, &["Wolves", " "]).is_err());
}
