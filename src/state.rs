use std::collections::{BTreeMap, VecDeque};
use std::env;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::debounce::Debouncer;

pub const MIN_SEARCH_LEN: usize = 2;
pub const DEFAULT_NUM_MATCHES: u32 = 10;
pub const CHAT_CONTEXT_MATCHES: u32 = 5;
pub const THREAT_LIMIT: u32 = 10;
pub const MAP_STATS_LIMIT: u32 = 10;

pub const CHAT_GREETING: &str =
    "Hello! I'm the scouting coach. Select a team for context, or just ask me anything about the game.";
pub const CHAT_FALLBACK: &str =
    "Sorry, I had trouble connecting to the strategy room. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Report,
    Counter,
    Coach,
    Threats,
    Maps,
    History,
}

impl Tab {
    pub fn next(self) -> Tab {
        match self {
            Tab::Report => Tab::Counter,
            Tab::Counter => Tab::Coach,
            Tab::Coach => Tab::Threats,
            Tab::Threats => Tab::Maps,
            Tab::Maps => Tab::History,
            Tab::History => Tab::Report,
        }
    }
}

pub fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Report => "REPORT",
        Tab::Counter => "COUNTER",
        Tab::Coach => "COACH",
        Tab::Threats => "THREATS",
        Tab::Maps => "MAPS",
        Tab::History => "HISTORY",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Valorant,
    LeagueOfLegends,
}

impl GameMode {
    /// Value the backend expects in `game` params.
    pub fn wire(self) -> &'static str {
        match self {
            GameMode::Valorant => "Valorant",
            GameMode::LeagueOfLegends => "lol",
        }
    }

    pub fn toggle(self) -> GameMode {
        match self {
            GameMode::Valorant => GameMode::LeagueOfLegends,
            GameMode::LeagueOfLegends => GameMode::Valorant,
        }
    }
}

pub fn game_label(game: GameMode) -> &'static str {
    match game {
        GameMode::Valorant => "VALORANT",
        GameMode::LeagueOfLegends => "LEAGUE",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Normal,
    Search,
    Compose,
}

/// Normalized team selection shared by every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

/// One row of the search endpoint's `results` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamHit {
    pub team_id: String,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Loading,
    Failed(String),
}

/// Autocomplete control: query text, trailing-edge debounce, dropdown.
/// Dropdown visibility is its own flag, never derived from the query, so the
/// programmatic fill-in after a selection cannot reopen it.
#[derive(Debug, Clone)]
pub struct SearchBox {
    pub query: String,
    pub open: bool,
    pub searching: bool,
    pub results: Vec<TeamHit>,
    pub highlighted: usize,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    pub fn new(delay: Duration) -> Self {
        Self {
            query: String::new(),
            open: false,
            searching: false,
            results: Vec::new(),
            highlighted: 0,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn input_char(&mut self, ch: char, now: Instant) {
        self.query.push(ch);
        self.open = true;
        self.debouncer.update(self.query.clone(), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.open = true;
            self.debouncer.update(self.query.clone(), now);
        }
    }

    /// Settled query ready to be searched, if any. Queries shorter than the
    /// minimum are swallowed without a request.
    pub fn take_settled(&mut self, now: Instant) -> Option<String> {
        let settled = self.debouncer.poll(now)?;
        let trimmed = settled.trim();
        if trimmed.chars().count() < MIN_SEARCH_LEN {
            return None;
        }
        self.searching = true;
        Some(trimmed.to_string())
    }

    pub fn set_results(&mut self, hits: Vec<TeamHit>) {
        self.searching = false;
        self.results = hits;
        self.highlighted = 0;
    }

    pub fn search_failed(&mut self) {
        self.searching = false;
        self.results.clear();
    }

    pub fn highlight_next(&mut self) {
        if !self.results.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.results.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.results.is_empty() {
            self.highlighted = self
                .highlighted
                .checked_sub(1)
                .unwrap_or(self.results.len() - 1);
        }
    }

    /// Confirm the highlighted row: fills the input with the team name,
    /// closes the dropdown and cancels any pending debounce so the fill-in
    /// never fires a search of its own.
    pub fn select_highlighted(&mut self) -> Option<TeamRef> {
        let hit = self.results.get(self.highlighted)?.clone();
        self.query = hit.team_name.clone();
        self.open = false;
        self.searching = false;
        self.debouncer.cancel();
        Some(TeamRef {
            id: hit.team_id,
            name: hit.team_name,
        })
    }

    /// Re-focusing reopens the dropdown only when there is something to show.
    pub fn focus(&mut self) {
        if self.query.trim().chars().count() >= MIN_SEARCH_LEN && !self.results.is_empty() {
            self.open = true;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

/// Append-only transcript. `pending` gates sends; the view sticks to the
/// newest message whenever the list mutates.
#[derive(Debug, Clone)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
    pub stick_to_bottom: bool,
}

impl ChatLog {
    pub fn new() -> Self {
        let mut log = Self {
            messages: Vec::new(),
            pending: false,
            stick_to_bottom: true,
        };
        log.push_assistant(CHAT_GREETING);
        log
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.into(),
            sent_at: Local::now(),
        });
        self.stick_to_bottom = true;
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: text.into(),
            sent_at: Local::now(),
        });
        self.stick_to_bottom = true;
    }

    /// Optimistic send: appends the user entry and flips `pending`. Returns
    /// the message to dispatch, or None for whitespace input or while a
    /// reply is still outstanding.
    pub fn send(&mut self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() || self.pending {
            return None;
        }
        let message = trimmed.to_string();
        self.push_user(message.clone());
        self.pending = true;
        Some(message)
    }

    pub fn reply(&mut self, text: String) {
        if self.pending {
            self.push_assistant(text);
            self.pending = false;
        }
    }

    /// Failure path keeps the conversational illusion: one fixed fallback
    /// line, never the raw error.
    pub fn reply_failed(&mut self) {
        if self.pending {
            self.push_assistant(CHAT_FALLBACK);
            self.pending = false;
        }
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

// --- backend payloads -------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamProfile {
    #[serde(default)]
    pub playstyle: String,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub early_game_patterns: Vec<String>,
    #[serde(default)]
    pub mid_game_patterns: Vec<String>,
    #[serde(default)]
    pub late_game_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryPick {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub player_id: String,
    pub player_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub threat_level: String,
    #[serde(default)]
    pub primary_picks: Vec<PrimaryPick>,
    #[serde(default)]
    pub primary_agents: Vec<String>,
    #[serde(default)]
    pub tendencies: Vec<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonStrategy {
    pub name: String,
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub champions: Vec<String>,
    #[serde(default)]
    pub agents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutingReport {
    #[serde(default)]
    pub report_id: String,
    #[serde(default)]
    pub opponent_team_id: String,
    #[serde(default)]
    pub opponent_name: String,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub team_profile: Option<TeamProfile>,
    #[serde(default)]
    pub common_strategies: Vec<CommonStrategy>,
    #[serde(default)]
    pub recent_compositions: Vec<Composition>,
    #[serde(default)]
    pub player_profiles: Vec<PlayerProfile>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub how_to_win: Option<String>,
    #[serde(default)]
    pub preparation_priorities: Vec<String>,
    #[serde(default)]
    pub matches_analyzed: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub execution_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMatchup {
    #[serde(default)]
    pub our_player: String,
    #[serde(default)]
    pub their_player: String,
    #[serde(default)]
    pub advantage: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterStrategy {
    #[serde(default)]
    pub opponent_team_id: String,
    #[serde(default)]
    pub our_team_id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub draft_recommendations: Vec<String>,
    #[serde(default)]
    pub map_recommendations: Vec<String>,
    #[serde(default)]
    pub win_conditions: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<StrategyRecommendation>,
    #[serde(default)]
    pub key_matchups: Vec<KeyMatchup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatRanking {
    #[serde(default)]
    pub player_id: String,
    pub player_name: String,
    #[serde(default)]
    pub threat_level: String,
    #[serde(default)]
    pub threat_score: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub key_stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub counter_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapStat {
    pub map_name: String,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub attack_win_rate: Option<f64>,
    #[serde(default)]
    pub defense_win_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub report_id: String,
    #[serde(default)]
    pub opponent_team_name: String,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub matches_analyzed: Option<u32>,
}

// --- pages ------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReportPage {
    pub search: SearchBox,
    pub team: Option<TeamRef>,
    pub num_matches: u32,
    pub phase: RequestPhase,
    pub report: Option<ScoutingReport>,
    pub token: u64,
    pub scroll: u16,
}

impl ReportPage {
    pub fn new(delay: Duration) -> Self {
        Self {
            search: SearchBox::new(delay),
            team: None,
            num_matches: DEFAULT_NUM_MATCHES,
            phase: RequestPhase::Idle,
            report: None,
            token: 0,
            scroll: 0,
        }
    }

    pub fn adjust_matches(&mut self, delta: i64) {
        let next = self.num_matches as i64 + delta;
        self.num_matches = next.clamp(5, 20) as u32;
    }
}

#[derive(Debug, Clone)]
pub struct CounterPage {
    pub search: SearchBox,
    pub team: Option<TeamRef>,
    pub phase: RequestPhase,
    pub strategy: Option<CounterStrategy>,
    pub compare_phase: RequestPhase,
    pub comparison: Option<Value>,
    pub token: u64,
    pub compare_token: u64,
    pub scroll: u16,
}

impl CounterPage {
    pub fn new(delay: Duration) -> Self {
        Self {
            search: SearchBox::new(delay),
            team: None,
            phase: RequestPhase::Idle,
            strategy: None,
            compare_phase: RequestPhase::Idle,
            comparison: None,
            token: 0,
            compare_token: 0,
            scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoachPage {
    pub search: SearchBox,
    pub team: Option<TeamRef>,
    pub chat: ChatLog,
    pub input: String,
    pub context_report: Option<Value>,
    pub context_token: u64,
    pub scroll: u16,
}

impl CoachPage {
    pub fn new(delay: Duration) -> Self {
        Self {
            search: SearchBox::new(delay),
            team: None,
            chat: ChatLog::new(),
            input: String::new(),
            context_report: None,
            context_token: 0,
            scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThreatsPage {
    pub search: SearchBox,
    pub team: Option<TeamRef>,
    pub phase: RequestPhase,
    pub threats: Option<Vec<ThreatRanking>>,
    pub token: u64,
    pub scroll: u16,
}

impl ThreatsPage {
    pub fn new(delay: Duration) -> Self {
        Self {
            search: SearchBox::new(delay),
            team: None,
            phase: RequestPhase::Idle,
            threats: None,
            token: 0,
            scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapsPage {
    pub search: SearchBox,
    pub team: Option<TeamRef>,
    pub phase: RequestPhase,
    pub maps: Option<Vec<MapStat>>,
    pub token: u64,
    pub scroll: u16,
}

impl MapsPage {
    pub fn new(delay: Duration) -> Self {
        Self {
            search: SearchBox::new(delay),
            team: None,
            phase: RequestPhase::Idle,
            maps: None,
            token: 0,
            scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub phase: RequestPhase,
    pub reports: Vec<HistoryEntry>,
    pub selected: usize,
    pub needs_refresh: bool,
    pub token: u64,
}

impl HistoryPage {
    pub fn new() -> Self {
        Self {
            phase: RequestPhase::Idle,
            reports: Vec::new(),
            selected: 0,
            needs_refresh: false,
            token: 0,
        }
    }

    pub fn select_next(&mut self) {
        if !self.reports.is_empty() {
            self.selected = (self.selected + 1) % self.reports.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.reports.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.reports.len() - 1);
        }
    }
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self::new()
    }
}

// --- channel vocabulary -----------------------------------------------------

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    ProbeBackend,
    SearchTeams {
        tab: Tab,
        query: String,
        game: GameMode,
    },
    GenerateReport {
        token: u64,
        team_id: String,
        game: GameMode,
        num_matches: u32,
    },
    FetchReport {
        token: u64,
        report_id: String,
    },
    FetchCounterStrategy {
        token: u64,
        opponent_id: String,
        our_id: String,
        game: GameMode,
    },
    CompareTeams {
        token: u64,
        team_a: String,
        team_b: String,
        game: GameMode,
        num_matches: u32,
    },
    FetchThreats {
        token: u64,
        team_id: String,
        game: GameMode,
        limit: u32,
    },
    FetchMapStats {
        token: u64,
        team_id: String,
        limit: u32,
    },
    FetchChatContext {
        token: u64,
        team_id: String,
        game: GameMode,
    },
    SendChat {
        message: String,
        context: Option<Value>,
        team_id: Option<String>,
        game: GameMode,
    },
    FetchHistory {
        token: u64,
        limit: u32,
    },
    DeleteReport {
        report_id: String,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    BackendReady {
        ok: bool,
    },
    SearchResults {
        tab: Tab,
        hits: Vec<TeamHit>,
    },
    SearchFailed {
        tab: Tab,
    },
    ReportReady {
        token: u64,
        report: ScoutingReport,
    },
    ReportFailed {
        token: u64,
        message: String,
    },
    StrategyReady {
        token: u64,
        strategy: CounterStrategy,
    },
    StrategyFailed {
        token: u64,
        message: String,
    },
    CompareReady {
        token: u64,
        comparison: Value,
    },
    CompareFailed {
        token: u64,
        message: String,
    },
    ThreatsReady {
        token: u64,
        threats: Vec<ThreatRanking>,
    },
    ThreatsFailed {
        token: u64,
        message: String,
    },
    MapStatsReady {
        token: u64,
        maps: Vec<MapStat>,
    },
    MapStatsFailed {
        token: u64,
        message: String,
    },
    ChatReply {
        text: String,
    },
    ChatFailed,
    ChatContextReady {
        token: u64,
        report: Value,
    },
    ChatContextFailed {
        token: u64,
    },
    HistoryReady {
        token: u64,
        reports: Vec<HistoryEntry>,
    },
    HistoryFailed {
        token: u64,
        message: String,
    },
    ReportDeleted {
        report_id: String,
    },
    DeleteFailed {
        report_id: String,
        message: String,
    },
    Log(String),
}

// --- app state --------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub game: GameMode,
    pub focus: Focus,
    pub report: ReportPage,
    pub counter: CounterPage,
    pub coach: CoachPage,
    pub threats: ThreatsPage,
    pub maps: MapsPage,
    pub history: HistoryPage,
    pub logs: VecDeque<String>,
    pub booting: bool,
    pub backend_ok: Option<bool>,
    pub help_overlay: bool,
    pub home_valorant: String,
    pub home_lol: String,
    pub history_limit: u32,
    pub search_delay: Duration,
    next_token: u64,
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl AppState {
    pub fn new() -> Self {
        let search_delay_ms = env::var("SCOUT_SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(400)
            .clamp(50, 2_000);
        let history_limit = env::var("SCOUT_HISTORY_LIMIT")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(20)
            .clamp(1, 100);
        let search_delay = Duration::from_millis(search_delay_ms);
        Self {
            tab: Tab::Report,
            game: GameMode::Valorant,
            focus: Focus::Normal,
            report: ReportPage::new(search_delay),
            counter: CounterPage::new(search_delay),
            coach: CoachPage::new(search_delay),
            threats: ThreatsPage::new(search_delay),
            maps: MapsPage::new(search_delay),
            history: HistoryPage::new(),
            logs: VecDeque::with_capacity(200),
            booting: true,
            backend_ok: None,
            help_overlay: false,
            home_valorant: env_or_default("SCOUT_HOME_TEAM_VALORANT", "79"),
            home_lol: env_or_default("SCOUT_HOME_TEAM_LOL", "125560"),
            history_limit,
            search_delay,
            next_token: 0,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    pub fn home_team_id(&self) -> String {
        match self.game {
            GameMode::Valorant => self.home_valorant.clone(),
            GameMode::LeagueOfLegends => self.home_lol.clone(),
        }
    }

    /// Leaving a tab drops its transient state; nothing outlives the page
    /// it belongs to. Entering History kicks off its fetch.
    pub fn set_tab(&mut self, tab: Tab) -> Option<ProviderCommand> {
        if tab == self.tab {
            return None;
        }
        let delay = self.search_delay;
        match self.tab {
            Tab::Report => self.report = ReportPage::new(delay),
            Tab::Counter => self.counter = CounterPage::new(delay),
            Tab::Coach => self.coach = CoachPage::new(delay),
            Tab::Threats => self.threats = ThreatsPage::new(delay),
            Tab::Maps => self.maps = MapsPage::new(delay),
            Tab::History => self.history = HistoryPage::new(),
        }
        self.tab = tab;
        self.focus = Focus::Normal;
        if tab == Tab::History {
            return Some(self.request_history());
        }
        None
    }

    pub fn toggle_game(&mut self) -> Option<ProviderCommand> {
        self.game = self.game.toggle();
        let delay = self.search_delay;
        self.report = ReportPage::new(delay);
        self.counter = CounterPage::new(delay);
        self.coach = CoachPage::new(delay);
        self.threats = ThreatsPage::new(delay);
        self.maps = MapsPage::new(delay);
        self.history = HistoryPage::new();
        self.focus = Focus::Normal;
        self.push_log(format!("[INFO] Game: {}", game_label(self.game)));
        if self.tab == Tab::History {
            return Some(self.request_history());
        }
        None
    }

    pub fn active_search_mut(&mut self) -> Option<&mut SearchBox> {
        match self.tab {
            Tab::Report => Some(&mut self.report.search),
            Tab::Counter => Some(&mut self.counter.search),
            Tab::Coach => Some(&mut self.coach.search),
            Tab::Threats => Some(&mut self.threats.search),
            Tab::Maps => Some(&mut self.maps.search),
            Tab::History => None,
        }
    }

    /// Polls the active tab's debouncer. At most one search request per
    /// settled value.
    pub fn poll_search(&mut self, now: Instant) -> Option<ProviderCommand> {
        let tab = self.tab;
        let game = self.game;
        let search = self.active_search_mut()?;
        let query = search.take_settled(now)?;
        Some(ProviderCommand::SearchTeams { tab, query, game })
    }

    /// Confirm the highlighted search result on the active tab. A selection
    /// made while that page's request is pending invalidates the in-flight
    /// token so the stale response is discarded on arrival.
    pub fn select_team(&mut self) -> Option<ProviderCommand> {
        match self.tab {
            Tab::Report => {
                let team = self.report.search.select_highlighted()?;
                self.report.team = Some(team);
                if self.report.phase == RequestPhase::Loading {
                    self.report.token = self.next_token();
                    self.report.phase = RequestPhase::Idle;
                }
                None
            }
            Tab::Counter => {
                let team = self.counter.search.select_highlighted()?;
                self.counter.team = Some(team);
                if self.counter.phase == RequestPhase::Loading {
                    self.counter.token = self.next_token();
                    self.counter.phase = RequestPhase::Idle;
                }
                if self.counter.compare_phase == RequestPhase::Loading {
                    self.counter.compare_token = self.next_token();
                    self.counter.compare_phase = RequestPhase::Idle;
                }
                None
            }
            Tab::Coach => {
                let team = self.coach.search.select_highlighted()?;
                self.coach.chat.push_assistant(format!(
                    "I've pulled up the data for {}. What would you like to know?",
                    team.name
                ));
                self.coach.team = Some(team.clone());
                self.coach.context_report = None;
                let token = self.next_token();
                self.coach.context_token = token;
                Some(ProviderCommand::FetchChatContext {
                    token,
                    team_id: team.id,
                    game: self.game,
                })
            }
            Tab::Threats => {
                let team = self.threats.search.select_highlighted()?;
                self.threats.team = Some(team);
                if self.threats.phase == RequestPhase::Loading {
                    self.threats.token = self.next_token();
                    self.threats.phase = RequestPhase::Idle;
                }
                None
            }
            Tab::Maps => {
                let team = self.maps.search.select_highlighted()?;
                self.maps.team = Some(team);
                if self.maps.phase == RequestPhase::Loading {
                    self.maps.token = self.next_token();
                    self.maps.phase = RequestPhase::Idle;
                }
                None
            }
            Tab::History => None,
        }
    }

    /// User-triggered primary action for the active tab. Ignored while a
    /// request is already in flight or without a selection.
    pub fn trigger_primary(&mut self) -> Option<ProviderCommand> {
        match self.tab {
            Tab::Report => {
                let team = self.report.team.clone()?;
                if self.report.phase == RequestPhase::Loading {
                    return None;
                }
                let token = self.next_token();
                self.report.token = token;
                self.report.phase = RequestPhase::Loading;
                self.report.scroll = 0;
                Some(ProviderCommand::GenerateReport {
                    token,
                    team_id: team.id,
                    game: self.game,
                    num_matches: self.report.num_matches,
                })
            }
            Tab::Counter => {
                let team = self.counter.team.clone()?;
                if self.counter.phase == RequestPhase::Loading {
                    return None;
                }
                let token = self.next_token();
                self.counter.token = token;
                self.counter.phase = RequestPhase::Loading;
                self.counter.scroll = 0;
                Some(ProviderCommand::FetchCounterStrategy {
                    token,
                    opponent_id: team.id,
                    our_id: self.home_team_id(),
                    game: self.game,
                })
            }
            Tab::Threats => {
                let team = self.threats.team.clone()?;
                if self.threats.phase == RequestPhase::Loading {
                    return None;
                }
                let token = self.next_token();
                self.threats.token = token;
                self.threats.phase = RequestPhase::Loading;
                self.threats.scroll = 0;
                Some(ProviderCommand::FetchThreats {
                    token,
                    team_id: team.id,
                    game: self.game,
                    limit: THREAT_LIMIT,
                })
            }
            Tab::Maps => {
                if self.game != GameMode::Valorant {
                    return None;
                }
                let team = self.maps.team.clone()?;
                if self.maps.phase == RequestPhase::Loading {
                    return None;
                }
                let token = self.next_token();
                self.maps.token = token;
                self.maps.phase = RequestPhase::Loading;
                self.maps.scroll = 0;
                Some(ProviderCommand::FetchMapStats {
                    token,
                    team_id: team.id,
                    limit: MAP_STATS_LIMIT,
                })
            }
            Tab::Coach | Tab::History => None,
        }
    }

    /// Head-to-head comparison on the counter page.
    pub fn trigger_compare(&mut self) -> Option<ProviderCommand> {
        if self.tab != Tab::Counter {
            return None;
        }
        let team = self.counter.team.clone()?;
        if self.counter.compare_phase == RequestPhase::Loading {
            return None;
        }
        let token = self.next_token();
        self.counter.compare_token = token;
        self.counter.compare_phase = RequestPhase::Loading;
        Some(ProviderCommand::CompareTeams {
            token,
            team_a: self.home_team_id(),
            team_b: team.id,
            game: self.game,
            num_matches: DEFAULT_NUM_MATCHES,
        })
    }

    pub fn send_chat(&mut self) -> Option<ProviderCommand> {
        let input = self.coach.input.clone();
        let message = self.coach.chat.send(&input)?;
        self.coach.input.clear();
        Some(ProviderCommand::SendChat {
            message,
            context: self.coach.context_report.clone(),
            team_id: self.coach.team.as_ref().map(|t| t.id.clone()),
            game: self.game,
        })
    }

    pub fn clear_coach_team(&mut self) {
        self.coach.team = None;
        self.coach.context_report = None;
        // Invalidate any context fetch still in flight.
        self.coach.context_token = self.next_token();
    }

    pub fn request_history(&mut self) -> ProviderCommand {
        let token = self.next_token();
        self.history.token = token;
        self.history.phase = RequestPhase::Loading;
        self.history.needs_refresh = false;
        ProviderCommand::FetchHistory {
            token,
            limit: self.history_limit,
        }
    }

    /// Fire-and-forget deletion; the list is only updated by the re-fetch
    /// that follows a successful delete.
    pub fn delete_history_selected(&mut self) -> Option<ProviderCommand> {
        let entry = self.history.reports.get(self.history.selected)?;
        Some(ProviderCommand::DeleteReport {
            report_id: entry.report_id.clone(),
        })
    }

    /// Enter on a history row pulls the stored report onto the report page.
    pub fn view_history_selected(&mut self) -> Option<ProviderCommand> {
        let entry = self.history.reports.get(self.history.selected)?.clone();
        let delay = self.search_delay;
        self.history = HistoryPage::new();
        self.tab = Tab::Report;
        self.focus = Focus::Normal;
        self.report = ReportPage::new(delay);
        let token = self.next_token();
        self.report.token = token;
        self.report.phase = RequestPhase::Loading;
        Some(ProviderCommand::FetchReport {
            token,
            report_id: entry.report_id,
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn search_box_mut(state: &mut AppState, tab: Tab) -> Option<&mut SearchBox> {
    match tab {
        Tab::Report => Some(&mut state.report.search),
        Tab::Counter => Some(&mut state.counter.search),
        Tab::Coach => Some(&mut state.coach.search),
        Tab::Threats => Some(&mut state.threats.search),
        Tab::Maps => Some(&mut state.maps.search),
        Tab::History => None,
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::BackendReady { ok } => {
            state.booting = false;
            state.backend_ok = Some(ok);
            if !ok {
                state.push_log("[WARN] Backend unreachable, requests will fail until it is up");
            }
        }
        Delta::SearchResults { tab, hits } => {
            if let Some(search) = search_box_mut(state, tab) {
                search.set_results(hits);
            }
        }
        Delta::SearchFailed { tab } => {
            if let Some(search) = search_box_mut(state, tab) {
                search.search_failed();
            }
        }
        Delta::ReportReady { token, report } => {
            if token == state.report.token {
                state.report.phase = RequestPhase::Idle;
                state.report.report = Some(report);
                state.report.scroll = 0;
            }
        }
        Delta::ReportFailed { token, message } => {
            if token == state.report.token {
                state.report.phase = RequestPhase::Failed(message);
            }
        }
        Delta::StrategyReady { token, strategy } => {
            if token == state.counter.token {
                state.counter.phase = RequestPhase::Idle;
                state.counter.strategy = Some(strategy);
                state.counter.scroll = 0;
            }
        }
        Delta::StrategyFailed { token, message } => {
            if token == state.counter.token {
                state.counter.phase = RequestPhase::Failed(message);
            }
        }
        Delta::CompareReady { token, comparison } => {
            if token == state.counter.compare_token {
                state.counter.compare_phase = RequestPhase::Idle;
                state.counter.comparison = Some(comparison);
            }
        }
        Delta::CompareFailed { token, message } => {
            if token == state.counter.compare_token {
                state.counter.compare_phase = RequestPhase::Failed(message);
            }
        }
        Delta::ThreatsReady { token, threats } => {
            if token == state.threats.token {
                state.threats.phase = RequestPhase::Idle;
                state.threats.threats = Some(threats);
                state.threats.scroll = 0;
            }
        }
        Delta::ThreatsFailed { token, message } => {
            if token == state.threats.token {
                state.threats.phase = RequestPhase::Failed(message);
            }
        }
        Delta::MapStatsReady { token, maps } => {
            if token == state.maps.token {
                state.maps.phase = RequestPhase::Idle;
                state.maps.maps = Some(maps);
                state.maps.scroll = 0;
            }
        }
        Delta::MapStatsFailed { token, message } => {
            if token == state.maps.token {
                state.maps.phase = RequestPhase::Failed(message);
            }
        }
        Delta::ChatReply { text } => {
            state.coach.chat.reply(text);
        }
        Delta::ChatFailed => {
            state.coach.chat.reply_failed();
        }
        Delta::ChatContextReady { token, report } => {
            if token == state.coach.context_token {
                state.coach.context_report = Some(report);
            }
        }
        Delta::ChatContextFailed { token } => {
            if token == state.coach.context_token {
                state.push_log("[WARN] Coach context fetch failed, chatting without it");
            }
        }
        Delta::HistoryReady { token, reports } => {
            if token == state.history.token {
                state.history.phase = RequestPhase::Idle;
                state.history.reports = reports;
                if state.history.selected >= state.history.reports.len() {
                    state.history.selected = state.history.reports.len().saturating_sub(1);
                }
            }
        }
        Delta::HistoryFailed { token, message } => {
            if token == state.history.token {
                state.history.phase = RequestPhase::Failed(message);
            }
        }
        Delta::ReportDeleted { report_id } => {
            state.push_log(format!("[INFO] Deleted report {report_id}"));
            state.history.needs_refresh = true;
        }
        Delta::DeleteFailed { report_id, message } => {
            state.push_log(format!("[WARN] Delete {report_id} failed: {message}"));
        }
        Delta::Log(line) => state.push_log(line),
    }
}
