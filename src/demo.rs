use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Value, json};

use crate::state::{
    CommonStrategy, Composition, CounterStrategy, GameMode, HistoryEntry, KeyMatchup, MapStat,
    PlayerProfile, PrimaryPick, ScoutingReport, StrategyRecommendation, TeamHit, ThreatRanking,
};

const ROSTER: &[(&str, &str)] = &[
    ("t-101", "Nightfall Esports"),
    ("t-102", "Ember Five"),
    ("t-103", "Static Wolves"),
    ("t-104", "Harbor Kings"),
    ("t-105", "Violet Crown"),
    ("t-106", "Iron Pulse"),
    ("t-107", "Northlight"),
    ("t-108", "Quarry Gaming"),
];

const PLAYERS: &[&str] = &["frostbyte", "zenith", "marrow", "katla", "ossuary"];

const COACH_LINES: &[&str] = &[
    "Their early aggression falls off hard after the first few rounds. Stay patient, trade slow, and punish over-extensions.",
    "Watch their star player's default positions. Once you take that space early, their whole structure collapses.",
    "Force them off their comfort picks in the veto and their win rate drops sharply. That's where I'd start.",
    "They rotate on sound cues more than info. Fake presence on one site and you'll catch the stack every time.",
];

/// Canned provider state for offline runs. Mutable so deletions and freshly
/// generated reports show up in history, the way the real backend would.
pub struct DemoFeed {
    history: Vec<HistoryEntry>,
    next_report: u32,
    rng: ThreadRng,
}

impl DemoFeed {
    pub fn new() -> Self {
        let mut feed = Self {
            history: Vec::new(),
            next_report: 1,
            rng: rand::thread_rng(),
        };
        feed.history = vec![
            feed.history_entry("Static Wolves", GameMode::Valorant, "2026-07-28T14:02:00Z", 10),
            feed.history_entry("Ember Five", GameMode::Valorant, "2026-07-30T09:41:00Z", 15),
            feed.history_entry("Harbor Kings", GameMode::LeagueOfLegends, "2026-08-01T18:10:00Z", 10),
        ];
        feed
    }

    fn history_entry(
        &mut self,
        opponent: &str,
        game: GameMode,
        generated_at: &str,
        matches: u32,
    ) -> HistoryEntry {
        let id = format!("demo-report-{}", self.next_report);
        self.next_report += 1;
        HistoryEntry {
            report_id: id,
            opponent_team_name: opponent.to_string(),
            game: game.wire().to_string(),
            generated_at: generated_at.to_string(),
            matches_analyzed: Some(matches),
        }
    }

    pub fn search(&self, query: &str) -> Vec<TeamHit> {
        let needle = query.to_lowercase();
        ROSTER
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(id, name)| TeamHit {
                team_id: (*id).to_string(),
                team_name: (*name).to_string(),
            })
            .collect()
    }

    fn team_name(team_id: &str) -> String {
        ROSTER
            .iter()
            .find(|(id, _)| *id == team_id)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| team_id.to_string())
    }

    /// Generating a report also files it in history, like the real backend.
    pub fn report(&mut self, team_id: &str, game: GameMode, num_matches: u32) -> ScoutingReport {
        let report = self.build_report(team_id, game, num_matches);
        let entry = self.history_entry(&report.opponent_name, game, &report.generated_at, num_matches);
        let mut report = report;
        report.report_id = entry.report_id.clone();
        self.history.insert(0, entry);
        report
    }

    fn build_report(&mut self, team_id: &str, game: GameMode, num_matches: u32) -> ScoutingReport {
        let name = Self::team_name(team_id);
        ScoutingReport {
            report_id: format!("demo-report-{}", self.next_report),
            opponent_team_id: team_id.to_string(),
            opponent_name: name.clone(),
            game: game.wire().to_string(),
            generated_at: "2026-08-04T12:00:00Z".to_string(),
            executive_summary: format!(
                "{name} lean on fast, rehearsed openings and struggle when the first engagement goes badly. \
                 Across the last {num_matches} matches they won 64% of games where they took the opening duel \
                 and only 31% where they lost it."
            ),
            team_profile: Some(crate::state::TeamProfile {
                playstyle: "Aggressive tempo, map-control first".to_string(),
                identity: "Win the opening fight, snowball the round".to_string(),
                strengths: vec![
                    "Coordinated executes with tight utility timing".to_string(),
                    "Strong opening-duel specialists".to_string(),
                ],
                weaknesses: vec![
                    "Predictable defaults after lost rounds".to_string(),
                    "Weak retake discipline under economy pressure".to_string(),
                ],
                early_game_patterns: vec!["Five-man hit on the same site two rounds in a row".to_string()],
                mid_game_patterns: vec!["Mid control conceded after two lost duels".to_string()],
                late_game_patterns: vec!["Save-heavy closes when ahead".to_string()],
            }),
            common_strategies: vec![CommonStrategy {
                name: "A-split default".to_string(),
                frequency: Some(42.0),
                description: "Double lurk toward A with utility held for a late split.".to_string(),
            }],
            recent_compositions: vec![Composition {
                games_played: 6,
                win_rate: 0.67,
                champions: Vec::new(),
                agents: vec!["Jett".to_string(), "Omen".to_string(), "Sova".to_string()],
            }],
            player_profiles: PLAYERS
                .iter()
                .take(3)
                .map(|p| self.player_profile(p))
                .collect(),
            key_findings: vec![
                "Opening duel win rate is the single best predictor of their round wins".to_string(),
                "They never re-veto a map they just lost on".to_string(),
            ],
            how_to_win: Some(
                "Deny the opening pick, force slow rounds, and make them play retakes.".to_string(),
            ),
            preparation_priorities: vec![
                "Drill anti-rush setups for the first three rounds".to_string(),
                "Prepare a counter-call for their A-split default".to_string(),
            ],
            matches_analyzed: Some(num_matches),
        }
    }

    /// Same payload shape as a full report, minus the history side effect.
    pub fn context_report(&mut self, team_id: &str, game: GameMode, num_matches: u32) -> ScoutingReport {
        self.build_report(team_id, game, num_matches)
    }

    fn player_profile(&mut self, player: &str) -> PlayerProfile {
        let score: f64 = self.rng.gen_range(5.5..9.5);
        PlayerProfile {
            player_id: format!("p-{player}"),
            player_name: player.trim().to_string(),
            role: Some("Duelist".to_string()),
            threat_level: if score > 8.0 { "High" } else { "Medium" }.to_string(),
            primary_picks: vec![PrimaryPick {
                name: "Jett".to_string(),
            }],
            primary_agents: vec!["Jett".to_string(), "Raze".to_string()],
            tendencies: vec!["Peeks wide on round start".to_string()],
            stats: [
                ("acs".to_string(), (score * 30.0).round()),
                ("kd".to_string(), (score / 7.0 * 100.0).round() / 100.0),
            ]
            .into_iter()
            .collect(),
        }
    }

    pub fn strategy(&mut self, opponent_id: &str, our_id: &str, game: GameMode) -> CounterStrategy {
        let _ = game;
        CounterStrategy {
            opponent_team_id: opponent_id.to_string(),
            our_team_id: our_id.to_string(),
            summary: Some(
                "Slow the tempo, win the utility war, and starve their opening-duel players."
                    .to_string(),
            ),
            draft_recommendations: vec!["Ban their comfort engage picks early".to_string()],
            map_recommendations: vec!["Veto their two most-played maps".to_string()],
            win_conditions: vec![
                "Win 60% of opening duels or trade within two seconds".to_string(),
                "Reach round nine with an economy lead".to_string(),
            ],
            recommendations: vec![StrategyRecommendation {
                priority: "High".to_string(),
                category: "Defense".to_string(),
                title: "Anti-rush setups rounds 1-3".to_string(),
                description: "Stack utility on their favored hit site for the opening rounds."
                    .to_string(),
                execution_steps: vec![
                    "Double utility on the choke".to_string(),
                    "Keep one late rotator".to_string(),
                ],
            }],
            key_matchups: vec![KeyMatchup {
                our_player: "anchor".to_string(),
                their_player: PLAYERS[0].trim().to_string(),
                advantage: "Even".to_string(),
                tips: vec!["Never take the first dry peek".to_string()],
            }],
        }
    }

    pub fn threats(&mut self, team_id: &str) -> Vec<ThreatRanking> {
        let _ = team_id;
        let mut score: f64 = self.rng.gen_range(8.6..9.8);
        PLAYERS
            .iter()
            .map(|p| {
                let this = score;
                score -= self.rng.gen_range(0.4..1.2);
                ThreatRanking {
                    player_id: format!("p-{p}"),
                    player_name: p.trim().to_string(),
                    threat_level: if this > 8.0 {
                        "High"
                    } else if this > 6.0 {
                        "Medium"
                    } else {
                        "Low"
                    }
                    .to_string(),
                    threat_score: (this * 10.0).round() / 10.0,
                    reasoning: "Consistently wins the first engagement of the round".to_string(),
                    key_stats: [
                        ("first_kills_per_game".to_string(), (this / 3.0 * 10.0).round() / 10.0),
                        ("acs".to_string(), (this * 28.0).round()),
                    ]
                    .into_iter()
                    .collect(),
                    counter_tips: vec!["Hold close angles, deny the wide swing".to_string()],
                }
            })
            .collect()
    }

    pub fn map_stats(&mut self, team_id: &str) -> Vec<MapStat> {
        let _ = team_id;
        ["Ascent", "Bind", "Haven", "Lotus", "Split"]
            .iter()
            .map(|name| {
                let win_rate: f64 = self.rng.gen_range(0.25..0.75);
                MapStat {
                    map_name: (*name).to_string(),
                    games_played: self.rng.gen_range(4..14),
                    win_rate: (win_rate * 100.0).round() / 100.0,
                    attack_win_rate: Some((self.rng.gen_range(0.3f64..0.7) * 100.0).round() / 100.0),
                    defense_win_rate: Some((self.rng.gen_range(0.3f64..0.7) * 100.0).round() / 100.0),
                }
            })
            .collect()
    }

    pub fn chat_reply(&mut self) -> String {
        let idx = self.rng.gen_range(0..COACH_LINES.len());
        COACH_LINES[idx].to_string()
    }

    pub fn comparison(&mut self, team_a: &str, team_b: &str) -> Value {
        json!({
            "team_a": Self::team_name(team_a),
            "team_b": Self::team_name(team_b),
            "summary": "Close matchup on paper; the edge comes from veto discipline.",
            "advantages": [
                "Better structured defense",
                "Deeper map pool",
            ],
            "risks": [
                "Weaker opening duels",
            ],
        })
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.clone()
    }

    pub fn find_report(&mut self, report_id: &str, game: GameMode) -> Option<ScoutingReport> {
        let entry = self.history.iter().find(|e| e.report_id == report_id)?;
        let opponent = entry.opponent_team_name.clone();
        let matches = entry.matches_analyzed.unwrap_or(10);
        let id = ROSTER
            .iter()
            .find(|(_, name)| *name == opponent)
            .map(|(id, _)| (*id).to_string())
            .unwrap_or_else(|| "t-000".to_string());
        let mut report = self.build_report(&id, game, matches);
        report.report_id = report_id.to_string();
        report.opponent_name = opponent;
        Some(report)
    }

    pub fn delete(&mut self, report_id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|e| e.report_id != report_id);
        self.history.len() != before
    }
}

impl Default for DemoFeed {
    fn default() -> Self {
        Self::new()
    }
}
