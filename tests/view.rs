use scout_terminal::state::{ChatLog, GameMode, HistoryEntry, ScoutingReport, TeamProfile};
use scout_terminal::view::{
    chat_lines, comparison_lines, history_line, map_lines, report_lines, strategy_lines,
    team_profile_lines, wrap_plain,
};
use serde_json::json;

fn profile_with(strengths: &[&str], weaknesses: &[&str]) -> TeamProfile {
    TeamProfile {
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        weaknesses: weaknesses.iter().map(|s| s.to_string()).collect(),
        ..TeamProfile::default()
    }
}

#[test]
fn empty_weaknesses_section_is_omitted_entirely() {
    let lines = team_profile_lines(&profile_with(&["A", "B"], &[]));

    let strengths_header = lines
        .iter()
        .position(|l| l == "Strengths:")
        .expect("strengths header should render");
    assert_eq!(lines[strengths_header + 1], "  - A");
    assert_eq!(lines[strengths_header + 2], "  - B");
    // No header with zero rows.
    assert!(!lines.iter().any(|l| l.contains("Weaknesses")));
}

#[test]
fn report_with_empty_sections_renders_only_populated_ones() {
    let mut report: ScoutingReport =
        serde_json::from_str(r#"{"opponent_name":"Nightfall Esports","game":"Valorant"}"#)
            .expect("report should build");
    report.team_profile = Some(profile_with(&["A", "B"], &[]));

    let lines = report_lines(&report);
    assert_eq!(lines.iter().filter(|l| l.trim_start().starts_with("- A") || l.trim_start().starts_with("- B")).count(), 2);
    assert!(!lines.iter().any(|l| l.contains("Weaknesses")));
    assert!(!lines.iter().any(|l| l.contains("Key findings")));
    assert!(!lines.iter().any(|l| l.contains("Preparation priorities")));
}

#[test]
fn strategy_sections_follow_the_game() {
    let strategy = serde_json::from_str(
        r#"{
            "map_recommendations": ["Veto Ascent"],
            "draft_recommendations": ["Ban their engage"],
            "win_conditions": ["Win opening duels"]
        }"#,
    )
    .expect("strategy should build");

    let valorant = strategy_lines(&strategy, GameMode::Valorant);
    assert!(valorant.iter().any(|l| l.contains("Map veto strategy")));
    assert!(!valorant.iter().any(|l| l.contains("Draft priority")));

    let league = strategy_lines(&strategy, GameMode::LeagueOfLegends);
    assert!(league.iter().any(|l| l.contains("Draft priority")));
    assert!(!league.iter().any(|l| l.contains("Map veto strategy")));
}

#[test]
fn map_verdicts_track_win_rate_bands() {
    let maps = serde_json::from_str::<Vec<scout_terminal::state::MapStat>>(
        r#"[
            {"map_name": "Ascent", "games_played": 9, "win_rate": 0.67},
            {"map_name": "Bind", "games_played": 5, "win_rate": 0.35},
            {"map_name": "Haven", "games_played": 7, "win_rate": 0.5}
        ]"#,
    )
    .expect("maps should build");

    let lines = map_lines(&maps);
    assert!(lines[0].contains("prioritize in veto"));
    assert!(lines[1].contains("consider banning"));
    assert!(lines[2].contains("neutral map"));
    assert!(lines[0].contains("WR  67%"));
}

#[test]
fn comparison_renders_scalars_and_lists() {
    let lines = comparison_lines(&json!({
        "summary": "Close matchup.",
        "advantages": ["Deeper map pool"],
        "win_probability": 0.54,
        "empty_list": [],
    }));
    assert!(lines.iter().any(|l| l == "summary: Close matchup."));
    assert!(lines.iter().any(|l| l == "advantages:"));
    assert!(lines.iter().any(|l| l == "  - Deeper map pool"));
    assert!(lines.iter().any(|l| l == "win probability: 0.54"));
    assert!(!lines.iter().any(|l| l.contains("empty list")));

    assert_eq!(comparison_lines(&json!(null)), vec!["No comparison data"]);
}

#[test]
fn chat_transcript_marks_roles_and_pending_state() {
    let mut chat = ChatLog::new();
    chat.push_user("how do we beat them?");
    chat.pending = true;

    let lines = chat_lines(&chat);
    assert!(lines.iter().any(|l| l.ends_with("coach:")));
    assert!(lines.iter().any(|l| l.ends_with("you:")));
    assert_eq!(lines.last().map(String::as_str), Some("coach is typing ..."));
}

#[test]
fn history_line_fills_missing_match_counts() {
    let entry = HistoryEntry {
        report_id: "rep-1".to_string(),
        opponent_team_name: "Ember Five".to_string(),
        game: "lol".to_string(),
        generated_at: "2026-07-31T11:00:00Z".to_string(),
        matches_analyzed: None,
    };
    let line = history_line(&entry);
    assert!(line.contains("Ember Five"));
    assert!(line.contains("2026-07-31"));
    assert!(line.contains("- matches"));
}

#[test]
fn wrap_plain_respects_width_and_breaks_long_words() {
    assert_eq!(wrap_plain("short", 10), vec!["short"]);
    let wrapped = wrap_plain("alpha beta gamma", 7);
    assert_eq!(wrapped, vec!["alpha", "beta", "gamma"]);
    let hard = wrap_plain("abcdefghij", 4);
    assert_eq!(hard, vec!["abcd", "efgh", "ij"]);
    for line in wrap_plain("a longer sentence that must wrap cleanly", 12) {
        assert!(line.chars().count() <= 12);
    }
}
