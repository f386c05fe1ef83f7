use scout_terminal::state::{
    AppState, Delta, HistoryEntry, ProviderCommand, RequestPhase, ScoutingReport, Tab, TeamHit,
    ThreatRanking, apply_delta,
};

fn entry(id: &str, opponent: &str) -> HistoryEntry {
    HistoryEntry {
        report_id: id.to_string(),
        opponent_team_name: opponent.to_string(),
        game: "Valorant".to_string(),
        generated_at: "2026-08-01T10:00:00Z".to_string(),
        matches_analyzed: Some(10),
    }
}

fn report(id: &str) -> ScoutingReport {
    serde_json::from_str(&format!(r#"{{"report_id":"{id}"}}"#)).expect("report should build")
}

fn threat(name: &str, score: f64) -> ThreatRanking {
    serde_json::from_str(&format!(
        r#"{{"player_name":"{name}","threat_score":{score}}}"#
    ))
    .expect("threat should build")
}

fn select_report_team(state: &mut AppState, id: &str, name: &str) {
    let search = state.active_search_mut().expect("search box");
    search.set_results(vec![TeamHit {
        team_id: id.to_string(),
        team_name: name.to_string(),
    }]);
    let _ = state.select_team();
}

fn history_token(cmd: &ProviderCommand) -> u64 {
    match cmd {
        ProviderCommand::FetchHistory { token, .. } => *token,
        other => panic!("expected history fetch, got {other:?}"),
    }
}

#[test]
fn backend_probe_dismisses_the_boot_overlay() {
    let mut state = AppState::new();
    assert!(state.booting);
    apply_delta(&mut state, Delta::BackendReady { ok: true });
    assert!(!state.booting);
    assert_eq!(state.backend_ok, Some(true));

    let mut state = AppState::new();
    apply_delta(&mut state, Delta::BackendReady { ok: false });
    assert!(!state.booting);
    assert!(state.logs.iter().any(|l| l.contains("unreachable")));
}

#[test]
fn report_failure_surfaces_as_a_failed_phase() {
    let mut state = AppState::new();
    select_report_team(&mut state, "1001", "Nightfall Esports");
    let cmd = state.trigger_primary().expect("generation should fire");
    let token = match cmd {
        ProviderCommand::GenerateReport { token, .. } => token,
        other => panic!("expected generate command, got {other:?}"),
    };
    assert_eq!(state.report.phase, RequestPhase::Loading);

    apply_delta(
        &mut state,
        Delta::ReportFailed {
            token,
            message: "http 502: bad gateway".to_string(),
        },
    );
    assert_eq!(
        state.report.phase,
        RequestPhase::Failed("http 502: bad gateway".to_string())
    );
}

#[test]
fn trigger_is_ignored_while_a_request_is_pending() {
    let mut state = AppState::new();
    select_report_team(&mut state, "1001", "Nightfall Esports");
    assert!(state.trigger_primary().is_some());
    assert!(state.trigger_primary().is_none());
}

#[test]
fn reselecting_mid_flight_discards_the_stale_response() {
    let mut state = AppState::new();
    select_report_team(&mut state, "1001", "Nightfall Esports");
    let stale_token = match state.trigger_primary().expect("generation fires") {
        ProviderCommand::GenerateReport { token, .. } => token,
        other => panic!("expected generate command, got {other:?}"),
    };

    // New selection while the request is in flight invalidates the token.
    select_report_team(&mut state, "1002", "Night Owls");
    assert_eq!(state.report.phase, RequestPhase::Idle);

    apply_delta(
        &mut state,
        Delta::ReportReady {
            token: stale_token,
            report: report("rep-stale"),
        },
    );
    assert!(state.report.report.is_none());

    // The next trigger works normally.
    let fresh_token = match state.trigger_primary().expect("generation fires") {
        ProviderCommand::GenerateReport { token, team_id, .. } => {
            assert_eq!(team_id, "1002");
            token
        }
        other => panic!("expected generate command, got {other:?}"),
    };
    apply_delta(
        &mut state,
        Delta::ReportReady {
            token: fresh_token,
            report: report("rep-fresh"),
        },
    );
    assert_eq!(
        state.report.report.as_ref().map(|r| r.report_id.as_str()),
        Some("rep-fresh")
    );
    assert_eq!(state.report.phase, RequestPhase::Idle);
}

#[test]
fn threats_keep_server_order() {
    let mut state = AppState::new();
    let _ = state.set_tab(Tab::Threats);
    let search = state.active_search_mut().expect("search box");
    search.set_results(vec![TeamHit {
        team_id: "1001".to_string(),
        team_name: "Nightfall Esports".to_string(),
    }]);
    let _ = state.select_team();
    let token = match state.trigger_primary().expect("analysis fires") {
        ProviderCommand::FetchThreats { token, .. } => token,
        other => panic!("expected threats command, got {other:?}"),
    };

    // Deliberately not sorted by score: the client must not re-rank.
    apply_delta(
        &mut state,
        Delta::ThreatsReady {
            token,
            threats: vec![threat("zenith", 7.4), threat("frostbyte", 9.2)],
        },
    );
    let names: Vec<String> = state
        .threats
        .threats
        .as_ref()
        .expect("threats stored")
        .iter()
        .map(|t| t.player_name.clone())
        .collect();
    assert_eq!(names, ["zenith", "frostbyte"]);
}

#[test]
fn entering_history_fetches_and_fills_the_list() {
    let mut state = AppState::new();
    let cmd = state.set_tab(Tab::History).expect("entering history fetches");
    let token = history_token(&cmd);
    assert_eq!(state.history.phase, RequestPhase::Loading);

    apply_delta(
        &mut state,
        Delta::HistoryReady {
            token,
            reports: vec![entry("rep-1", "A"), entry("rep-2", "B")],
        },
    );
    assert_eq!(state.history.phase, RequestPhase::Idle);
    assert_eq!(state.history.reports.len(), 2);
}

#[test]
fn stale_history_response_is_discarded() {
    let mut state = AppState::new();
    let first = state.set_tab(Tab::History).expect("fetch fires");
    let stale = history_token(&first);
    // Manual refresh supersedes the first fetch.
    let second = state.request_history();
    let fresh = history_token(&second);

    apply_delta(
        &mut state,
        Delta::HistoryReady {
            token: stale,
            reports: vec![entry("rep-old", "Old")],
        },
    );
    assert!(state.history.reports.is_empty());

    apply_delta(
        &mut state,
        Delta::HistoryReady {
            token: fresh,
            reports: vec![entry("rep-new", "New")],
        },
    );
    assert_eq!(state.history.reports[0].report_id, "rep-new");
}

#[test]
fn deleting_the_second_of_three_reports_refetches_without_it() {
    let mut state = AppState::new();
    let cmd = state.set_tab(Tab::History).expect("fetch fires");
    let token = history_token(&cmd);
    apply_delta(
        &mut state,
        Delta::HistoryReady {
            token,
            reports: vec![entry("rep-1", "A"), entry("rep-2", "B"), entry("rep-3", "C")],
        },
    );

    state.history.select_next();
    let cmd = state.delete_history_selected().expect("delete fires");
    match &cmd {
        ProviderCommand::DeleteReport { report_id } => assert_eq!(report_id, "rep-2"),
        other => panic!("expected delete command, got {other:?}"),
    }

    // No optimistic removal: the row stays until the refetch lands.
    assert_eq!(state.history.reports.len(), 3);

    apply_delta(
        &mut state,
        Delta::ReportDeleted {
            report_id: "rep-2".to_string(),
        },
    );
    assert!(state.history.needs_refresh);

    // The main loop reacts to the flag with an immediate re-fetch.
    let refetch = state.request_history();
    assert!(!state.history.needs_refresh);
    let token = history_token(&refetch);
    apply_delta(
        &mut state,
        Delta::HistoryReady {
            token,
            reports: vec![entry("rep-1", "A"), entry("rep-3", "C")],
        },
    );

    assert_eq!(state.history.reports.len(), 2);
    assert!(
        !state
            .history
            .reports
            .iter()
            .any(|r| r.report_id == "rep-2")
    );
}

#[test]
fn failed_delete_does_not_trigger_a_refetch() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::DeleteFailed {
            report_id: "rep-1".to_string(),
            message: "http 404: not found".to_string(),
        },
    );
    assert!(!state.history.needs_refresh);
    assert!(state.logs.iter().any(|l| l.contains("rep-1")));
}

#[test]
fn viewing_a_history_row_moves_to_the_report_page() {
    let mut state = AppState::new();
    let cmd = state.set_tab(Tab::History).expect("fetch fires");
    let token = history_token(&cmd);
    apply_delta(
        &mut state,
        Delta::HistoryReady {
            token,
            reports: vec![entry("rep-9", "Nightfall Esports")],
        },
    );

    let cmd = state.view_history_selected().expect("view fires");
    let token = match cmd {
        ProviderCommand::FetchReport { token, report_id } => {
            assert_eq!(report_id, "rep-9");
            token
        }
        other => panic!("expected report fetch, got {other:?}"),
    };
    assert_eq!(state.tab, Tab::Report);
    assert_eq!(state.report.phase, RequestPhase::Loading);

    apply_delta(
        &mut state,
        Delta::ReportReady {
            token,
            report: report("rep-9"),
        },
    );
    assert_eq!(
        state.report.report.as_ref().map(|r| r.report_id.as_str()),
        Some("rep-9")
    );
}

#[test]
fn leaving_a_tab_clears_its_selection() {
    let mut state = AppState::new();
    select_report_team(&mut state, "1001", "Nightfall Esports");
    assert!(state.report.team.is_some());

    let _ = state.set_tab(Tab::Counter);
    let _ = state.set_tab(Tab::Report);
    assert!(state.report.team.is_none());
    assert!(state.report.search.query.is_empty());
}

#[test]
fn toggling_the_game_resets_every_page() {
    let mut state = AppState::new();
    select_report_team(&mut state, "1001", "Nightfall Esports");
    let _ = state.toggle_game();
    assert!(state.report.team.is_none());
    assert!(state.logs.iter().any(|l| l.contains("LEAGUE")));
}

#[test]
fn logs_are_bounded() {
    let mut state = AppState::new();
    for i in 0..500 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert!(state.logs.back().expect("log tail").contains("499"));
}
