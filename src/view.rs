use serde_json::Value;

use crate::state::{
    ChatLog, ChatRole, CounterStrategy, GameMode, HistoryEntry, MapStat, ScoutingReport,
    TeamProfile, ThreatRanking,
};

pub fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

fn stat_value(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn date_of(timestamp: &str) -> &str {
    if timestamp.len() >= 10 {
        &timestamp[..10]
    } else {
        timestamp
    }
}

/// Appends a titled bullet section, or nothing at all when the list is
/// empty. Empty arrays must not leave a header with zero rows behind.
fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("  - {item}"));
    }
}

fn push_numbered(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("{title}:"));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("  {}. {item}", i + 1));
    }
}

pub fn team_profile_lines(profile: &TeamProfile) -> Vec<String> {
    let mut lines = Vec::new();
    if !profile.playstyle.is_empty() {
        lines.push(format!("Playstyle: {}", profile.playstyle));
    }
    if !profile.identity.is_empty() {
        lines.push(format!("Identity: {}", profile.identity));
    }
    push_section(&mut lines, "Strengths", &profile.strengths);
    push_section(&mut lines, "Weaknesses", &profile.weaknesses);
    push_section(&mut lines, "Early game", &profile.early_game_patterns);
    push_section(&mut lines, "Mid game", &profile.mid_game_patterns);
    push_section(&mut lines, "Late game", &profile.late_game_patterns);
    lines
}

pub fn report_lines(report: &ScoutingReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} | {} | {}",
        report.opponent_name,
        report.game,
        date_of(&report.generated_at)
    ));
    if let Some(matches) = report.matches_analyzed {
        lines.push(format!("Matches analyzed: {matches}"));
    }
    if !report.executive_summary.is_empty() {
        lines.push(String::new());
        lines.push("Executive summary:".to_string());
        lines.push(format!("  {}", report.executive_summary));
    }

    if let Some(profile) = &report.team_profile {
        let profile_lines = team_profile_lines(profile);
        if !profile_lines.is_empty() {
            lines.push(String::new());
            lines.push("Team profile:".to_string());
            for line in profile_lines {
                if line.is_empty() {
                    lines.push(line);
                } else {
                    lines.push(format!("  {line}"));
                }
            }
        }
    }

    if !report.common_strategies.is_empty() {
        lines.push(String::new());
        lines.push("Common strategies:".to_string());
        for strat in &report.common_strategies {
            match strat.frequency {
                Some(freq) => lines.push(format!("  - {} ({freq:.0}% of games)", strat.name)),
                None => lines.push(format!("  - {}", strat.name)),
            }
            if !strat.description.is_empty() {
                lines.push(format!("      {}", strat.description));
            }
        }
    }

    if !report.recent_compositions.is_empty() {
        lines.push(String::new());
        lines.push("Recent compositions:".to_string());
        for comp in report.recent_compositions.iter().take(5) {
            let mut picks = comp.champions.clone();
            picks.extend(comp.agents.iter().cloned());
            lines.push(format!(
                "  - {} games ({} WR): {}",
                comp.games_played,
                percent(comp.win_rate),
                picks.join(", ")
            ));
        }
    }

    if !report.player_profiles.is_empty() {
        lines.push(String::new());
        lines.push("Player tendencies:".to_string());
        for player in &report.player_profiles {
            let role = player.role.as_deref().unwrap_or("-");
            lines.push(format!(
                "  - {} [{}] threat {}",
                player.player_name, role, player.threat_level
            ));
            let mut picks: Vec<String> =
                player.primary_picks.iter().map(|p| p.name.clone()).collect();
            if picks.is_empty() {
                picks = player.primary_agents.clone();
            }
            if !picks.is_empty() {
                lines.push(format!("      picks: {}", picks.iter().take(3).cloned().collect::<Vec<_>>().join(", ")));
            }
            for tendency in player.tendencies.iter().take(2) {
                lines.push(format!("      . {tendency}"));
            }
            if !player.stats.is_empty() {
                let stats = player
                    .stats
                    .iter()
                    .map(|(key, value)| format!("{}={}", key.replace('_', " "), stat_value(*value)))
                    .collect::<Vec<_>>()
                    .join("  ");
                lines.push(format!("      {stats}"));
            }
        }
    }

    push_numbered(&mut lines, "Key findings", &report.key_findings);

    if let Some(how) = &report.how_to_win {
        if !how.is_empty() {
            lines.push(String::new());
            lines.push("How to win:".to_string());
            lines.push(format!("  {how}"));
        }
    }

    push_section(
        &mut lines,
        "Preparation priorities",
        &report.preparation_priorities,
    );
    lines
}

pub fn strategy_lines(strategy: &CounterStrategy, game: GameMode) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(summary) = &strategy.summary {
        if !summary.is_empty() {
            lines.push("Strategy summary:".to_string());
            lines.push(format!("  {summary}"));
        }
    }

    match game {
        GameMode::LeagueOfLegends => {
            push_section(&mut lines, "Draft priority", &strategy.draft_recommendations)
        }
        GameMode::Valorant => {
            push_section(&mut lines, "Map veto strategy", &strategy.map_recommendations)
        }
    }

    push_numbered(&mut lines, "Win conditions", &strategy.win_conditions);

    if !strategy.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Detailed recommendations:".to_string());
        for rec in &strategy.recommendations {
            lines.push(format!(
                "  [{}/{}] {}",
                rec.priority, rec.category, rec.title
            ));
            if !rec.description.is_empty() {
                lines.push(format!("      {}", rec.description));
            }
            for step in &rec.execution_steps {
                lines.push(format!("      . {step}"));
            }
        }
    }

    if !strategy.key_matchups.is_empty() {
        lines.push(String::new());
        lines.push("Key matchups:".to_string());
        for matchup in &strategy.key_matchups {
            lines.push(format!(
                "  {} vs {} ({})",
                matchup.our_player, matchup.their_player, matchup.advantage
            ));
            for tip in &matchup.tips {
                lines.push(format!("      . {tip}"));
            }
        }
    }
    lines
}

/// The comparison payload has no schema on the client side; render its
/// top-level fields generically.
pub fn comparison_lines(comparison: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(map) = comparison.as_object() else {
        lines.push("No comparison data".to_string());
        return lines;
    };
    for (key, value) in map {
        let label = key.replace('_', " ");
        match value {
            Value::String(s) => lines.push(format!("{label}: {s}")),
            Value::Number(n) => lines.push(format!("{label}: {n}")),
            Value::Bool(b) => lines.push(format!("{label}: {b}")),
            Value::Array(items) => {
                if items.is_empty() {
                    continue;
                }
                lines.push(format!("{label}:"));
                for item in items {
                    match item {
                        Value::String(s) => lines.push(format!("  - {s}")),
                        other => lines.push(format!("  - {other}")),
                    }
                }
            }
            Value::Object(inner) => {
                if inner.is_empty() {
                    continue;
                }
                lines.push(format!("{label}:"));
                for (inner_key, inner_value) in inner {
                    lines.push(format!("  {}: {inner_value}", inner_key.replace('_', " ")));
                }
            }
            Value::Null => {}
        }
    }
    if lines.is_empty() {
        lines.push("No comparison data".to_string());
    }
    lines
}

pub fn threat_lines(threats: &[ThreatRanking]) -> Vec<String> {
    let mut lines = Vec::new();
    // Server order is the ranking; never re-sort.
    for (i, threat) in threats.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "#{} {}  score {:.1}  [{}]",
            i + 1,
            threat.player_name,
            threat.threat_score,
            threat.threat_level
        ));
        if !threat.reasoning.is_empty() {
            lines.push(format!("   {}", threat.reasoning));
        }
        if !threat.key_stats.is_empty() {
            let stats = threat
                .key_stats
                .iter()
                .map(|(key, value)| format!("{}={}", key.replace('_', " "), stat_value(*value)))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(format!("   {stats}"));
        }
        for tip in &threat.counter_tips {
            lines.push(format!("   . {tip}"));
        }
    }
    lines
}

pub fn map_lines(maps: &[MapStat]) -> Vec<String> {
    let mut lines = Vec::new();
    for map in maps {
        let verdict = if map.win_rate >= 0.6 {
            "strong map, prioritize in veto"
        } else if map.win_rate < 0.4 {
            "weak map, consider banning"
        } else {
            "neutral map"
        };
        let attack = map.attack_win_rate.map(percent).unwrap_or_else(|| "-".to_string());
        let defense = map.defense_win_rate.map(percent).unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<10} {:>2} games  WR {:>4}  ATK {:>4} / DEF {:>4}  {verdict}",
            map.map_name,
            map.games_played,
            percent(map.win_rate),
            attack,
            defense
        ));
    }
    lines
}

pub fn history_line(entry: &HistoryEntry) -> String {
    let matches = entry
        .matches_analyzed
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<24} {:<10} {:<12} {matches} matches",
        entry.opponent_team_name,
        entry.game,
        date_of(&entry.generated_at)
    )
}

/// Greedy word wrap. Keeping this exact (instead of the widget's own wrap)
/// lets the chat view compute a true bottom offset for auto-scroll.
pub fn wrap_plain(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }
    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in line.split(' ') {
        let word_len = word.chars().count();
        if current_len == 0 {
            // A single over-long word is hard-broken.
            if word_len > width {
                let mut chars = word.chars().peekable();
                while chars.peek().is_some() {
                    let chunk: String = chars.by_ref().take(width).collect();
                    wrapped.push(chunk);
                }
                continue;
            }
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
            if word_len > width {
                let mut chars = word.chars().peekable();
                while chars.peek().is_some() {
                    let chunk: String = chars.by_ref().take(width).collect();
                    wrapped.push(chunk);
                }
            } else {
                current.push_str(word);
                current_len = word_len;
            }
        }
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

pub fn chat_lines(chat: &ChatLog) -> Vec<String> {
    let mut lines = Vec::new();
    for message in &chat.messages {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "coach",
        };
        lines.push(format!(
            "[{}] {who}:",
            message.sent_at.format("%H:%M")
        ));
        for text_line in message.text.lines() {
            lines.push(format!("  {text_line}"));
        }
    }
    if chat.pending {
        lines.push(String::new());
        lines.push("coach is typing ...".to_string());
    }
    lines
}
