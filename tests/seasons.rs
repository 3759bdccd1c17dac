use std::path::PathBuf;

use matchstats::checks::{CheckMode, Violation, check_table};
use matchstats::filter::{head_to_head, subset_teams};
use matchstats::matches::{MatchResult, Venue};
use matchstats::perspective::extract_team_perspective;
use matchstats::seasons::{load_seasons, read_season_csv};
use matchstats::stats::{Metric, season_totals, shot_accuracy, venue_shots, winner};
use matchstats::table::{column_difference, concat_matches, disjoint_columns, subset_columns};
use matchstats::{Error, MatchRecord};

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn load_fixture_matches() -> Vec<MatchRecord> {
    let tables = load_seasons(&fixtures_dir(), 19, 21).expect("fixture seasons should load");
    concat_matches(&tables).expect("fixture seasons should type")
}

#[test]
fn loads_both_fixture_seasons() {
    let tables = load_seasons(&fixtures_dir(), 19, 21).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].season, "2019");
    assert_eq!(tables[1].season, "2020");
    assert_eq!(tables[0].rows.len(), 4);
    assert_eq!(tables[1].rows.len(), 3);
}

#[test]
fn missing_season_file_fails_whole_load() {
    let err = load_seasons(&fixtures_dir(), 19, 22).unwrap_err();
    match err {
        Error::MissingSeasonFile(path) => assert!(path.ends_with("2021-22.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_drift_between_seasons() {
    let tables = load_seasons(&fixtures_dir(), 19, 21).unwrap();
    assert_eq!(disjoint_columns(&tables), vec!["B365H".to_string()]);
    let added = column_difference(&tables[1], &tables[0]);
    assert_eq!(added.into_iter().collect::<Vec<_>>(), vec!["Time".to_string()]);
    assert!(column_difference(&tables[0], &tables[0]).is_empty());
}

#[test]
fn subset_columns_keeps_inclusive_range() {
    let tables = load_seasons(&fixtures_dir(), 19, 21).unwrap();
    let subset = subset_columns(&tables, "HomeTeam", "AR").unwrap();
    assert_eq!(subset[0].headers.first().map(String::as_str), Some("HomeTeam"));
    assert_eq!(subset[0].headers.last().map(String::as_str), Some("AR"));
    assert_eq!(subset[0].headers.len(), 21);
    assert!(disjoint_columns(&subset).is_empty());
    assert_eq!(subset[1].rows[0].get(0), Some("Chelsea"));
    // Canonical names resolve against short headers.
    let by_canonical = subset_columns(&tables, "Final_HomeGoals", "Final_Result").unwrap();
    assert_eq!(by_canonical[0].headers, ["FTHG", "FTAG", "FTR"]);

    let err = subset_columns(&tables, "HomeTeam", "Possession").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn concatenated_matches_keep_file_order() {
    let matches = load_fixture_matches();
    assert_eq!(matches.len(), 7);
    assert_eq!(matches[0].home_team, "Arsenal");
    assert_eq!(matches[4].home_team, "Chelsea");
    assert_eq!(matches[4].season, "2020");
    assert_eq!(matches[4].result, MatchResult::AwayWin);
}

#[test]
fn canonical_headers_and_season_column() {
    let table = read_season_csv(&fixtures_dir().join("canonical.csv"), "fallback").unwrap();
    let matches = table.to_matches().unwrap();
    assert_eq!(matches[0].season, "2021");
    let chelsea = extract_team_perspective(&matches, "Chelsea").unwrap();
    assert_eq!(chelsea[0].ft_goal_diff, -2);
    assert_eq!(chelsea[0].shots_targ_diff, -2);
}

#[test]
fn unknown_result_code_is_schema_error() {
    let table = read_season_csv(&fixtures_dir().join("bad_result.csv"), "2021").unwrap();
    match table.to_matches().unwrap_err() {
        Error::Schema { column, detail } => {
            assert_eq!(column, "Final_Result");
            assert!(detail.contains("\"X\""));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_column_is_schema_error() {
    let table = read_season_csv(&fixtures_dir().join("missing_column.csv"), "2021").unwrap();
    match table.to_matches().unwrap_err() {
        Error::Schema { column, .. } => assert_eq!(column, "HomeShots_Target"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn advisory_checks_flag_offending_rows() {
    let matches = load_fixture_matches();
    let report = check_table(&matches, CheckMode::Advisory).unwrap();
    assert_eq!(report.rows_checked, 7);
    assert_eq!(report.score_violations, 1);
    assert_eq!(report.shot_violations, 1);
    let rows: Vec<usize> = report.flagged.iter().map(|f| f.row).collect();
    assert_eq!(rows, [5, 6]);
    assert_eq!(
        report.flagged[0].violations,
        [Violation::TargetExceedsShots {
            venue: Venue::Away,
            shots: 11,
            shots_target: 12,
        }]
    );
    assert!(matches!(
        report.flagged[1].violations[0],
        Violation::FullTimeResultMismatch { result: 'D', .. }
    ));
}

#[test]
fn strict_checks_stop_at_first_offender() {
    let matches = load_fixture_matches();
    match check_table(&matches, CheckMode::Strict).unwrap_err() {
        Error::Consistency { row, detail } => {
            assert_eq!(row, 5);
            assert!(detail.contains("on target"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(check_table(&matches[..5], CheckMode::Strict).unwrap().is_clean());
}

#[test]
fn team_filters() {
    let matches = load_fixture_matches();
    assert_eq!(subset_teams(&matches, "Arsenal", "Everton").len(), 6);
    let h2h = head_to_head(&matches, "Arsenal", "Chelsea");
    assert_eq!(h2h.len(), 2);
    assert_eq!(h2h[0].home_team, "Arsenal");
    assert_eq!(h2h[1].home_team, "Chelsea");
    assert!(head_to_head(&matches, "Everton", "Leeds").is_empty());
}

#[test]
fn winners_and_venue_aggregates() {
    let matches = load_fixture_matches();
    assert_eq!(winner(&matches[0]).label(), "Arsenal");
    assert_eq!(winner(&matches[1]).label(), "Draw");
    assert_eq!(winner(&matches[2]).label(), "Everton");

    let arsenal = extract_team_perspective(&matches, "Arsenal").unwrap();
    assert_eq!(arsenal.len(), 4);
    assert_eq!(shot_accuracy(&arsenal[0]), 0.5);
    let home = venue_shots(&arsenal, Venue::Home, "Arsenal");
    assert_eq!((home.games, home.shots, home.shots_target), (2, 19, 8));
    let away = venue_shots(&arsenal, Venue::Away, "Arsenal");
    assert_eq!((away.games, away.shots, away.shots_target), (2, 19, 10));

    let totals = season_totals(&arsenal, Metric::Goals);
    assert_eq!(totals, [("2019".to_string(), 5), ("2020".to_string(), 3)]);
}

#[test]
fn team_log_writes_as_csv_with_expected_header() {
    let matches = load_fixture_matches();
    let events = extract_team_perspective(&matches, "Chelsea").unwrap();
    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in &events {
        writer.serialize(event).unwrap();
    }
    let raw = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let mut lines = raw.lines();
    assert_eq!(
        lines.next(),
        Some(
            "rival,ft_result,ft_goals,ft_goal_diff,ht_result,ht_goals,ht_goal_diff,mr_ref,shots,\
             shots_target,fouls,corners,yellows,reds,season,venue,shots_diff,shots_targ_diff"
        )
    );
    assert_eq!(
        lines.next(),
        Some("Arsenal,Lost,1,-2,Draw,1,0,M Oliver,8,3,12,4,1,0,2019,Away,-2,-2")
    );
    assert_eq!(raw.lines().count(), 1 + events.len());
}
