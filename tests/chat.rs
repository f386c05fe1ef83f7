use scout_terminal::state::{
    AppState, CHAT_FALLBACK, CHAT_GREETING, ChatRole, Delta, ProviderCommand, Tab, TeamHit,
    apply_delta,
};
use serde_json::json;

fn coach_state() -> AppState {
    let mut state = AppState::new();
    let _ = state.set_tab(Tab::Coach);
    state
}

fn select_team(state: &mut AppState) -> u64 {
    let search = state.active_search_mut().expect("coach tab has a search box");
    search.set_results(vec![TeamHit {
        team_id: "1001".to_string(),
        team_name: "Nightfall Esports".to_string(),
    }]);
    match state.select_team() {
        Some(ProviderCommand::FetchChatContext { token, team_id, .. }) => {
            assert_eq!(team_id, "1001");
            token
        }
        other => panic!("expected a context fetch, got {other:?}"),
    }
}

#[test]
fn transcript_is_seeded_with_a_greeting() {
    let state = coach_state();
    assert_eq!(state.coach.chat.messages.len(), 1);
    assert_eq!(state.coach.chat.messages[0].role, ChatRole::Assistant);
    assert_eq!(state.coach.chat.messages[0].text, CHAT_GREETING);
}

#[test]
fn whitespace_send_is_a_noop() {
    let mut state = coach_state();
    state.coach.input = "   \n ".to_string();
    assert!(state.send_chat().is_none());
    assert_eq!(state.coach.chat.messages.len(), 1);
    assert!(!state.coach.chat.pending);
}

#[test]
fn send_appends_user_message_optimistically() {
    let mut state = coach_state();
    state.coach.input = "how do we beat them?".to_string();
    let cmd = state.send_chat().expect("send should fire");
    match cmd {
        ProviderCommand::SendChat {
            message,
            context,
            team_id,
            ..
        } => {
            assert_eq!(message, "how do we beat them?");
            assert!(context.is_none());
            assert!(team_id.is_none());
        }
        other => panic!("expected chat command, got {other:?}"),
    }
    assert_eq!(state.coach.chat.messages.len(), 2);
    assert_eq!(state.coach.chat.messages[1].role, ChatRole::User);
    assert!(state.coach.chat.pending);
    assert!(state.coach.input.is_empty());
}

#[test]
fn send_while_pending_is_a_noop() {
    let mut state = coach_state();
    state.coach.input = "first".to_string();
    state.send_chat().expect("first send fires");

    state.coach.input = "second".to_string();
    assert!(state.send_chat().is_none());
    assert_eq!(state.coach.chat.messages.len(), 2);
    assert_eq!(state.coach.input, "second");
}

#[test]
fn reply_appends_one_assistant_message() {
    let mut state = coach_state();
    state.coach.input = "hello".to_string();
    state.send_chat().expect("send fires");

    apply_delta(
        &mut state,
        Delta::ChatReply {
            text: "Trade slow, punish over-extensions.".to_string(),
        },
    );
    assert_eq!(state.coach.chat.messages.len(), 3);
    assert_eq!(state.coach.chat.messages[2].role, ChatRole::Assistant);
    assert!(!state.coach.chat.pending);
}

#[test]
fn failure_appends_exactly_one_fixed_fallback() {
    let mut state = coach_state();
    state.coach.input = "hello".to_string();
    state.send_chat().expect("send fires");

    apply_delta(&mut state, Delta::ChatFailed);
    assert_eq!(state.coach.chat.messages.len(), 3);
    assert_eq!(state.coach.chat.messages[2].text, CHAT_FALLBACK);
    assert!(!state.coach.chat.pending);

    // A duplicate failure delta must not append a second fallback.
    apply_delta(&mut state, Delta::ChatFailed);
    assert_eq!(state.coach.chat.messages.len(), 3);
}

#[test]
fn selecting_a_team_injects_an_acknowledgement_and_fetches_context() {
    let mut state = coach_state();
    let token = select_team(&mut state);

    assert_eq!(state.coach.context_token, token);
    assert_eq!(state.coach.team.as_ref().map(|t| t.id.as_str()), Some("1001"));
    let last = state.coach.chat.messages.last().expect("ack message");
    assert_eq!(last.role, ChatRole::Assistant);
    assert!(last.text.contains("Nightfall Esports"));
    // Prior messages are kept.
    assert_eq!(state.coach.chat.messages[0].text, CHAT_GREETING);
}

#[test]
fn context_report_is_stored_and_forwarded() {
    let mut state = coach_state();
    let token = select_team(&mut state);

    let report = json!({"report_id": "rep-1", "opponent_name": "Nightfall Esports"});
    apply_delta(
        &mut state,
        Delta::ChatContextReady {
            token,
            report: report.clone(),
        },
    );
    assert!(state.coach.context_report.is_some());

    state.coach.input = "what do they do on eco rounds?".to_string();
    match state.send_chat().expect("send fires") {
        ProviderCommand::SendChat {
            context, team_id, ..
        } => {
            assert_eq!(context, Some(report));
            assert_eq!(team_id.as_deref(), Some("1001"));
        }
        other => panic!("expected chat command, got {other:?}"),
    }
}

#[test]
fn stale_context_response_is_discarded() {
    let mut state = coach_state();
    let token = select_team(&mut state);
    state.clear_coach_team();

    apply_delta(
        &mut state,
        Delta::ChatContextReady {
            token,
            report: json!({"report_id": "rep-1"}),
        },
    );
    assert!(state.coach.context_report.is_none());
    assert!(state.coach.team.is_none());
}

#[test]
fn leaving_the_coach_tab_resets_the_conversation() {
    let mut state = coach_state();
    state.coach.input = "hello".to_string();
    state.send_chat().expect("send fires");
    assert_eq!(state.coach.chat.messages.len(), 2);

    let _ = state.set_tab(Tab::Report);
    let _ = state.set_tab(Tab::Coach);
    assert_eq!(state.coach.chat.messages.len(), 1);
    assert_eq!(state.coach.chat.messages[0].text, CHAT_GREETING);
}
