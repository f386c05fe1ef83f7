use std::fs;
use std::path::PathBuf;

use scout_terminal::scouting_api::{
    parse_chat_json, parse_comparison_json, parse_history_json, parse_map_stats_json,
    parse_report_json, parse_search_json, parse_strategy_json, parse_threats_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_search_results_fixture() {
    let raw = read_fixture("search_results.json");
    let hits = parse_search_json(&raw).expect("fixture should parse");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].team_id, "1001");
    assert_eq!(hits[0].team_name, "Nightfall Esports");
}

#[test]
fn search_null_is_empty() {
    assert!(parse_search_json("null").expect("null should parse").is_empty());
    assert!(parse_search_json("  ").expect("blank should parse").is_empty());
}

#[test]
fn parses_scouting_report_fixture() {
    let raw = read_fixture("scouting_report.json");
    let report = parse_report_json(&raw).expect("fixture should parse");
    assert_eq!(report.report_id, "rep-42");
    assert_eq!(report.opponent_name, "Nightfall Esports");
    let profile = report.team_profile.expect("profile should be present");
    assert_eq!(profile.strengths.len(), 2);
    assert_eq!(profile.weaknesses.len(), 1);
    assert!(profile.mid_game_patterns.is_empty());
    assert_eq!(report.player_profiles.len(), 2);
    // Optional fields the backend may omit per player.
    assert!(report.player_profiles[1].role.is_none());
    assert!(report.player_profiles[1].primary_picks.is_empty());
    assert_eq!(report.key_findings.len(), 2);
    assert_eq!(report.matches_analyzed, Some(10));
}

#[test]
fn sparse_report_parses_with_defaults() {
    let report = parse_report_json(r#"{"report_id":"rep-1"}"#).expect("sparse should parse");
    assert_eq!(report.report_id, "rep-1");
    assert!(report.team_profile.is_none());
    assert!(report.key_findings.is_empty());
    assert!(report.how_to_win.is_none());
}

#[test]
fn parses_counter_strategy_fixture() {
    let raw = read_fixture("counter_strategy.json");
    let strategy = parse_strategy_json(&raw).expect("fixture should parse");
    assert_eq!(strategy.win_conditions.len(), 2);
    assert_eq!(strategy.recommendations.len(), 1);
    assert_eq!(strategy.recommendations[0].execution_steps.len(), 2);
    assert_eq!(strategy.key_matchups[0].their_player, "frostbyte");
    assert!(strategy.draft_recommendations.is_empty());
}

#[test]
fn parses_threat_rankings_in_server_order() {
    let raw = read_fixture("threat_rankings.json");
    let threats = parse_threats_json(&raw).expect("fixture should parse");
    assert_eq!(threats.len(), 3);
    // Order comes from the backend and must be preserved as-is.
    let names: Vec<&str> = threats.iter().map(|t| t.player_name.as_str()).collect();
    assert_eq!(names, ["frostbyte", "zenith", "marrow"]);
    assert_eq!(threats[0].threat_score, 9.2);
    assert!(threats[1].counter_tips.is_empty());
}

#[test]
fn parses_map_stats_fixture() {
    let raw = read_fixture("map_stats.json");
    let maps = parse_map_stats_json(&raw).expect("fixture should parse");
    assert_eq!(maps.len(), 3);
    assert_eq!(maps[0].map_name, "Ascent");
    assert_eq!(maps[0].games_played, 9);
    // Attack/defense splits are optional.
    assert!(maps[2].attack_win_rate.is_none());
}

#[test]
fn parses_report_history_fixture() {
    let raw = read_fixture("report_history.json");
    let reports = parse_history_json(&raw).expect("fixture should parse");
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].report_id, "rep-44");
    assert_eq!(reports[1].matches_analyzed, None);
}

#[test]
fn parses_chat_response_fixture() {
    let raw = read_fixture("chat_response.json");
    let reply = parse_chat_json(&raw).expect("fixture should parse");
    assert!(reply.starts_with("Their early aggression"));
}

#[test]
fn chat_without_response_field_is_an_error() {
    assert!(parse_chat_json(r#"{"detail":"boom"}"#).is_err());
}

#[test]
fn parses_comparison_as_opaque_value() {
    let raw = read_fixture("comparison.json");
    let value = parse_comparison_json(&raw).expect("fixture should parse");
    assert_eq!(value["team_b"], "Nightfall Esports");
    assert_eq!(value["advantages"].as_array().map(|a| a.len()), Some(2));

    assert!(parse_comparison_json("null").expect("null should parse").is_null());
}

#[test]
fn threats_and_maps_null_are_empty() {
    assert!(parse_threats_json("null").expect("null should parse").is_empty());
    assert!(parse_map_stats_json("").expect("blank should parse").is_empty());
    assert!(parse_history_json("null").expect("null should parse").is_empty());
}
