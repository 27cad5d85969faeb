use keeper_core::{
    update, Effect, JobHandle, JobState, JobStatusSnapshot, Msg, Phase, PollerState,
    ProgressStage, SessionOutcome,
};

fn init_logging() {
    keeper_logging::initialize_for_tests();
}

fn job(id: u64) -> JobHandle {
    JobHandle::from(id)
}

#[test]
fn restart_while_polling_replaces_prior_session() {
    init_logging();
    let (state, _) = update(PollerState::default(), Msg::Start { job: job(1) });
    let old = state.active_session().unwrap();
    let (state, _) = update(state, Msg::Tick { session: old });

    let (state, effects) = update(state, Msg::Start { job: job(2) });
    let new = state.active_session().unwrap();
    assert_ne!(old, new);
    assert_eq!(effects[0], Effect::StopTimer);
    assert_eq!(
        effects[1],
        Effect::SessionEnded {
            job: job(1),
            outcome: SessionOutcome::Replaced,
        }
    );
    assert!(matches!(effects[2], Effect::EmitStage { job: ref emitted, .. } if *emitted == job(2)));
    assert!(matches!(effects[3], Effect::StartTimer { session, .. } if session == new));

    // The old session's in-flight response arrives late and is discarded.
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            session: old,
            snapshot: JobStatusSnapshot::new(JobState::Completed, "done"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Polling);
    assert_eq!(state.active_job(), Some(&job(2)));

    // Ticks from the old timer are ignored too.
    let (_state, effects) = update(state, Msg::Tick { session: old });
    assert!(effects.is_empty());
}

#[test]
fn stale_failure_does_not_end_new_session() {
    init_logging();
    let (state, _) = update(PollerState::default(), Msg::Start { job: job(1) });
    let old = state.active_session().unwrap();
    let (state, _) = update(state, Msg::Tick { session: old });
    let (state, _) = update(state, Msg::Start { job: job(2) });

    let (state, effects) = update(
        state,
        Msg::QueryFailed {
            session: old,
            reason: "timeout".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Polling);
}

#[test]
fn restart_during_cleanup_ends_completed_session_first() {
    init_logging();
    let (state, _) = update(PollerState::default(), Msg::Start { job: job(1) });
    let first = state.active_session().unwrap();
    let (state, _) = update(state, Msg::Tick { session: first });
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            session: first,
            snapshot: JobStatusSnapshot::new(JobState::Completed, "Processing completed"),
        },
    );
    assert_eq!(state.phase(), Phase::Completed);

    let (state, effects) = update(state, Msg::Start { job: job(2) });
    // Timer already stopped on completion, so only the session end is reported.
    assert_eq!(
        effects[0],
        Effect::SessionEnded {
            job: job(1),
            outcome: SessionOutcome::Completed,
        }
    );
    assert_eq!(effects.len(), 3);

    let (state, effects) = update(state, Msg::CleanupElapsed { session: first });
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Polling);
}

#[test]
fn accessors_reflect_active_session() {
    init_logging();
    let state = PollerState::default();
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.active_job(), None);
    assert_eq!(state.active_session(), None);

    let (state, effects) = update(state, Msg::Start { job: "abc".into() });
    assert_eq!(state.phase(), Phase::Polling);
    assert_eq!(state.active_job(), Some(&JobHandle::new("abc")));
    assert_eq!(state.active_session(), Some(1));
    assert_eq!(
        effects[0],
        Effect::EmitStage {
            job: JobHandle::new("abc"),
            stage: ProgressStage::new(25, "fetching content"),
        }
    );
}
