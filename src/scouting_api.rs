use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http_client::{delete, get_text, post_text};
use crate::state::{
    CounterStrategy, GameMode, HistoryEntry, MapStat, ScoutingReport, TeamHit, ThreatRanking,
};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TeamHit>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    reports: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct ThreatsResponse {
    #[serde(default)]
    players: Vec<ThreatRanking>,
}

#[derive(Debug, Deserialize)]
struct MapStatsResponse {
    #[serde(default)]
    maps: Vec<MapStat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

fn is_null_body(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "null"
}

pub fn parse_search_json(raw: &str) -> Result<Vec<TeamHit>> {
    if is_null_body(raw) {
        return Ok(Vec::new());
    }
    let data: SearchResponse = serde_json::from_str(raw.trim()).context("invalid search json")?;
    Ok(data.results)
}

pub fn parse_report_json(raw: &str) -> Result<ScoutingReport> {
    serde_json::from_str(raw.trim()).context("invalid report json")
}

pub fn parse_strategy_json(raw: &str) -> Result<CounterStrategy> {
    serde_json::from_str(raw.trim()).context("invalid counter-strategy json")
}

pub fn parse_threats_json(raw: &str) -> Result<Vec<ThreatRanking>> {
    if is_null_body(raw) {
        return Ok(Vec::new());
    }
    let data: ThreatsResponse = serde_json::from_str(raw.trim()).context("invalid threats json")?;
    Ok(data.players)
}

pub fn parse_map_stats_json(raw: &str) -> Result<Vec<MapStat>> {
    if is_null_body(raw) {
        return Ok(Vec::new());
    }
    let data: MapStatsResponse =
        serde_json::from_str(raw.trim()).context("invalid map stats json")?;
    Ok(data.maps)
}

pub fn parse_history_json(raw: &str) -> Result<Vec<HistoryEntry>> {
    if is_null_body(raw) {
        return Ok(Vec::new());
    }
    let data: HistoryResponse = serde_json::from_str(raw.trim()).context("invalid history json")?;
    Ok(data.reports)
}

pub fn parse_chat_json(raw: &str) -> Result<String> {
    let data: ChatResponse = serde_json::from_str(raw.trim()).context("invalid chat json")?;
    Ok(data.response)
}

pub fn parse_comparison_json(raw: &str) -> Result<Value> {
    if is_null_body(raw) {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw.trim()).context("invalid comparison json")
}

pub fn search_teams(name: &str, game: GameMode) -> Result<Vec<TeamHit>> {
    let body = get_text(
        "/report/teams/search",
        &[
            ("name", name.to_string()),
            ("game", game.wire().to_string()),
        ],
    )?;
    parse_search_json(&body)
}

pub fn generate_report(
    opponent_team_id: &str,
    game: GameMode,
    num_recent_matches: u32,
) -> Result<ScoutingReport> {
    let body = post_text(
        "/report/generate",
        &json!({
            "opponent_team_id": opponent_team_id,
            "game": game.wire(),
            "num_recent_matches": num_recent_matches,
        }),
    )?;
    parse_report_json(&body)
}

pub fn get_report(report_id: &str) -> Result<ScoutingReport> {
    let body = get_text(&format!("/report/{report_id}"), &[])?;
    parse_report_json(&body)
}

pub fn get_report_history(limit: u32) -> Result<Vec<HistoryEntry>> {
    let body = get_text(
        "/report/reports/history",
        &[("limit", limit.to_string())],
    )?;
    parse_history_json(&body)
}

pub fn get_counter_strategy(
    opponent_team_id: &str,
    our_team_id: &str,
    game: GameMode,
) -> Result<CounterStrategy> {
    let body = post_text(
        "/report/counter-strategy",
        &json!({
            "opponent_team_id": opponent_team_id,
            "our_team_id": our_team_id,
            "game": game.wire(),
        }),
    )?;
    parse_strategy_json(&body)
}

/// `context_data` is a previously fetched report forwarded verbatim so the
/// assistant can ground its answers.
pub fn chat_with_coach(
    message: &str,
    context_data: Option<&Value>,
    team_id: Option<&str>,
    game: GameMode,
) -> Result<String> {
    let body = post_text(
        "/coach/chat",
        &json!({
            "message": message,
            "context_data": context_data,
            "team_id": team_id,
            "game": game.wire(),
        }),
    )?;
    parse_chat_json(&body)
}

pub fn compare_teams(
    team_a_id: &str,
    team_b_id: &str,
    game: GameMode,
    num_matches: u32,
) -> Result<Value> {
    let body = post_text(
        "/report/compare",
        &json!({
            "team_a_id": team_a_id,
            "team_b_id": team_b_id,
            "game": game.wire(),
            "num_matches": num_matches,
        }),
    )?;
    parse_comparison_json(&body)
}

pub fn get_map_stats(team_id: &str, limit: u32) -> Result<Vec<MapStat>> {
    let body = get_text(
        &format!("/report/maps/stats/{team_id}"),
        &[("limit", limit.to_string())],
    )?;
    parse_map_stats_json(&body)
}

pub fn get_threat_rankings(team_id: &str, game: GameMode, limit: u32) -> Result<Vec<ThreatRanking>> {
    let body = get_text(
        &format!("/report/threats/{team_id}"),
        &[
            ("game", game.wire().to_string()),
            ("limit", limit.to_string()),
        ],
    )?;
    parse_threats_json(&body)
}

pub fn delete_report(report_id: &str) -> Result<()> {
    delete(&format!("/report/{report_id}"))
}

/// Startup readiness probe. The API has no dedicated health route, so a
/// one-row history fetch stands in for it.
pub fn probe_backend() -> Result<()> {
    get_report_history(1).map(|_| ())
}
