use crate::state::{Active, Session};
use crate::{Effect, JobState, Msg, PollerState, SessionOutcome};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages tagged with a session other than the active one are stale and
/// produce no effects.
pub fn update(mut state: PollerState, msg: Msg) -> (PollerState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start { job } => {
            let mut effects = end_active(&mut state, SessionOutcome::Replaced);
            let session = state.open_session(job.clone());
            let stage = state.settings().bootstrap.clone();
            effects.push(Effect::EmitStage { job, stage });
            effects.push(Effect::StartTimer {
                session,
                interval: state.settings().poll_interval,
            });
            effects
        }
        Msg::Tick { session } => match state.polling_mut(session) {
            // Skip the tick while the previous query is outstanding.
            Some(active) if !active.query_in_flight => {
                active.query_in_flight = true;
                vec![Effect::QueryStatus {
                    session,
                    job: active.job.clone(),
                }]
            }
            _ => Vec::new(),
        },
        Msg::StatusReceived { session, snapshot } => {
            let Some(active) = state.polling_mut(session) else {
                return (state, Vec::new());
            };
            active.query_in_flight = false;
            let job = active.job.clone();
            // Unrecognized statuses keep polling without a stage change.
            let Some(stage) = state.settings().stage_for(&snapshot) else {
                return (state, Vec::new());
            };

            let mut effects = vec![Effect::EmitStage {
                job: job.clone(),
                stage,
            }];
            match snapshot.state {
                JobState::Completed => {
                    if let Active::Polling(finished) = state.take_active() {
                        state.set_active(Active::Completing(finished));
                    }
                    effects.push(Effect::StopTimer);
                    effects.push(Effect::ScheduleCleanup {
                        session,
                        delay: state.settings().cleanup_delay,
                    });
                }
                JobState::Failed => {
                    state.take_active();
                    effects.push(Effect::StopTimer);
                    effects.push(Effect::SessionEnded {
                        job,
                        outcome: SessionOutcome::Failed,
                    });
                }
                JobState::Queued | JobState::Processing | JobState::Unrecognized(_) => {}
            }
            effects
        }
        Msg::QueryFailed { session, reason } => {
            if state.polling_mut(session).is_some() {
                end_active(&mut state, SessionOutcome::Stalled { reason })
            } else {
                Vec::new()
            }
        }
        Msg::CleanupElapsed { session } => {
            if state.is_completing(session) {
                end_active(&mut state, SessionOutcome::Completed)
            } else {
                Vec::new()
            }
        }
        Msg::Cancel => end_active(&mut state, SessionOutcome::Cancelled),
    };

    (state, effects)
}

/// Returns the poller to idle, stopping the timer if one is running.
///
/// A session already in its completed phase keeps its `Completed` outcome.
fn end_active(state: &mut PollerState, outcome: SessionOutcome) -> Vec<Effect> {
    match state.take_active() {
        Active::Idle => Vec::new(),
        Active::Polling(Session { job, .. }) => {
            vec![Effect::StopTimer, Effect::SessionEnded { job, outcome }]
        }
        Active::Completing(Session { job, .. }) => vec![Effect::SessionEnded {
            job,
            outcome: SessionOutcome::Completed,
        }],
    }
}
