use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::demo::DemoFeed;
use crate::scouting_api;
use crate::state::{Delta, ProviderCommand};

pub fn demo_mode() -> bool {
    env::var("SCOUT_DEMO")
        .map(|val| {
            let val = val.trim().to_lowercase();
            val == "1" || val == "true" || val == "yes"
        })
        .unwrap_or(false)
}

/// Worker owning all backend I/O. Commands are handled one at a time, so a
/// page's primary action can never have two requests racing each other.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    let demo = demo_mode();
    thread::spawn(move || {
        let mut feed = demo.then(DemoFeed::new);
        while let Ok(cmd) = cmd_rx.recv() {
            if let Some(feed) = feed.as_mut() {
                handle_demo(&tx, feed, cmd);
            } else {
                handle(&tx, cmd);
            }
        }
    });
}

fn handle(tx: &Sender<Delta>, cmd: ProviderCommand) {
    match cmd {
        ProviderCommand::ProbeBackend => {
            let ok = scouting_api::probe_backend().is_ok();
            let _ = tx.send(Delta::BackendReady { ok });
        }
        ProviderCommand::SearchTeams { tab, query, game } => {
            match scouting_api::search_teams(&query, game) {
                Ok(hits) => {
                    let _ = tx.send(Delta::SearchResults { tab, hits });
                }
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Team search error: {err}")));
                    let _ = tx.send(Delta::SearchFailed { tab });
                }
            }
        }
        ProviderCommand::GenerateReport {
            token,
            team_id,
            game,
            num_matches,
        } => match scouting_api::generate_report(&team_id, game, num_matches) {
            Ok(report) => {
                let _ = tx.send(Delta::ReportReady { token, report });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Report generation error: {err}")));
                let _ = tx.send(Delta::ReportFailed {
                    token,
                    message: err.to_string(),
                });
            }
        },
        ProviderCommand::FetchReport { token, report_id } => {
            match scouting_api::get_report(&report_id) {
                Ok(report) => {
                    let _ = tx.send(Delta::ReportReady { token, report });
                }
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Report fetch error: {err}")));
                    let _ = tx.send(Delta::ReportFailed {
                        token,
                        message: err.to_string(),
                    });
                }
            }
        }
        ProviderCommand::FetchCounterStrategy {
            token,
            opponent_id,
            our_id,
            game,
        } => match scouting_api::get_counter_strategy(&opponent_id, &our_id, game) {
            Ok(strategy) => {
                let _ = tx.send(Delta::StrategyReady { token, strategy });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Counter-strategy error: {err}")));
                let _ = tx.send(Delta::StrategyFailed {
                    token,
                    message: err.to_string(),
                });
            }
        },
        ProviderCommand::CompareTeams {
            token,
            team_a,
            team_b,
            game,
            num_matches,
        } => match scouting_api::compare_teams(&team_a, &team_b, game, num_matches) {
            Ok(comparison) => {
                let _ = tx.send(Delta::CompareReady { token, comparison });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Team compare error: {err}")));
                let _ = tx.send(Delta::CompareFailed {
                    token,
                    message: err.to_string(),
                });
            }
        },
        ProviderCommand::FetchThreats {
            token,
            team_id,
            game,
            limit,
        } => match scouting_api::get_threat_rankings(&team_id, game, limit) {
            Ok(threats) => {
                let _ = tx.send(Delta::ThreatsReady { token, threats });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Threat rankings error: {err}")));
                let _ = tx.send(Delta::ThreatsFailed {
                    token,
                    message: err.to_string(),
                });
            }
        },
        ProviderCommand::FetchMapStats {
            token,
            team_id,
            limit,
        } => match scouting_api::get_map_stats(&team_id, limit) {
            Ok(maps) => {
                let _ = tx.send(Delta::MapStatsReady { token, maps });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Map stats error: {err}")));
                let _ = tx.send(Delta::MapStatsFailed {
                    token,
                    message: err.to_string(),
                });
            }
        },
        ProviderCommand::FetchChatContext {
            token,
            team_id,
            game,
        } => {
            // Lightweight report, forwarded verbatim to the chat endpoint.
            match scouting_api::generate_report(&team_id, game, crate::state::CHAT_CONTEXT_MATCHES)
            {
                Ok(report) => match serde_json::to_value(&report) {
                    Ok(value) => {
                        let _ = tx.send(Delta::ChatContextReady {
                            token,
                            report: value,
                        });
                    }
                    Err(_) => {
                        let _ = tx.send(Delta::ChatContextFailed { token });
                    }
                },
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Coach context error: {err}")));
                    let _ = tx.send(Delta::ChatContextFailed { token });
                }
            }
        }
        ProviderCommand::SendChat {
            message,
            context,
            team_id,
            game,
        } => match scouting_api::chat_with_coach(
            &message,
            context.as_ref(),
            team_id.as_deref(),
            game,
        ) {
            Ok(text) => {
                let _ = tx.send(Delta::ChatReply { text });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Coach chat error: {err}")));
                let _ = tx.send(Delta::ChatFailed);
            }
        },
        ProviderCommand::FetchHistory { token, limit } => {
            match scouting_api::get_report_history(limit) {
                Ok(reports) => {
                    let _ = tx.send(Delta::HistoryReady { token, reports });
                }
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] History fetch error: {err}")));
                    let _ = tx.send(Delta::HistoryFailed {
                        token,
                        message: err.to_string(),
                    });
                }
            }
        }
        ProviderCommand::DeleteReport { report_id } => {
            match scouting_api::delete_report(&report_id) {
                Ok(()) => {
                    let _ = tx.send(Delta::ReportDeleted { report_id });
                }
                Err(err) => {
                    let _ = tx.send(Delta::DeleteFailed {
                        report_id,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

fn handle_demo(tx: &Sender<Delta>, feed: &mut DemoFeed, cmd: ProviderCommand) {
    // Small artificial latency so loading states are visible.
    let pause = rand::thread_rng().gen_range(150..450);
    thread::sleep(Duration::from_millis(pause));

    match cmd {
        ProviderCommand::ProbeBackend => {
            let _ = tx.send(Delta::BackendReady { ok: true });
            let _ = tx.send(Delta::Log("[INFO] Demo feed active".to_string()));
        }
        ProviderCommand::SearchTeams { tab, query, .. } => {
            let _ = tx.send(Delta::SearchResults {
                tab,
                hits: feed.search(&query),
            });
        }
        ProviderCommand::GenerateReport {
            token,
            team_id,
            game,
            num_matches,
        } => {
            let _ = tx.send(Delta::ReportReady {
                token,
                report: feed.report(&team_id, game, num_matches),
            });
        }
        ProviderCommand::FetchReport { token, report_id } => {
            match feed.find_report(&report_id, crate::state::GameMode::Valorant) {
                Some(report) => {
                    let _ = tx.send(Delta::ReportReady { token, report });
                }
                None => {
                    let _ = tx.send(Delta::ReportFailed {
                        token,
                        message: format!("report {report_id} not found"),
                    });
                }
            }
        }
        ProviderCommand::FetchCounterStrategy {
            token,
            opponent_id,
            our_id,
            game,
        } => {
            let _ = tx.send(Delta::StrategyReady {
                token,
                strategy: feed.strategy(&opponent_id, &our_id, game),
            });
        }
        ProviderCommand::CompareTeams {
            token,
            team_a,
            team_b,
            ..
        } => {
            let _ = tx.send(Delta::CompareReady {
                token,
                comparison: feed.comparison(&team_a, &team_b),
            });
        }
        ProviderCommand::FetchThreats { token, team_id, .. } => {
            let _ = tx.send(Delta::ThreatsReady {
                token,
                threats: feed.threats(&team_id),
            });
        }
        ProviderCommand::FetchMapStats { token, team_id, .. } => {
            let _ = tx.send(Delta::MapStatsReady {
                token,
                maps: feed.map_stats(&team_id),
            });
        }
        ProviderCommand::FetchChatContext {
            token,
            team_id,
            game,
        } => {
            let report = feed.context_report(&team_id, game, crate::state::CHAT_CONTEXT_MATCHES);
            match serde_json::to_value(&report) {
                Ok(value) => {
                    let _ = tx.send(Delta::ChatContextReady {
                        token,
                        report: value,
                    });
                }
                Err(_) => {
                    let _ = tx.send(Delta::ChatContextFailed { token });
                }
            }
        }
        ProviderCommand::SendChat { .. } => {
            let _ = tx.send(Delta::ChatReply {
                text: feed.chat_reply(),
            });
        }
        ProviderCommand::FetchHistory { token, limit } => {
            let mut reports = feed.history();
            reports.truncate(limit as usize);
            let _ = tx.send(Delta::HistoryReady { token, reports });
        }
        ProviderCommand::DeleteReport { report_id } => {
            if feed.delete(&report_id) {
                let _ = tx.send(Delta::ReportDeleted { report_id });
            } else {
                let _ = tx.send(Delta::DeleteFailed {
                    report_id,
                    message: "not found".to_string(),
                });
            }
        }
    }
}
