use std::time::Duration;

use crate::{JobHandle, ProgressStage, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    EmitStage { job: JobHandle, stage: ProgressStage },
    /// Replace the poller's timer with a recurring one for `session`.
    StartTimer { session: SessionId, interval: Duration },
    StopTimer,
    QueryStatus { session: SessionId, job: JobHandle },
    ScheduleCleanup { session: SessionId, delay: Duration },
    SessionEnded { job: JobHandle, outcome: SessionOutcome },
}

/// Why a session returned to idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Failed,
    Cancelled,
    /// A new `start` took over before this session finished.
    Replaced,
    /// Status query errored; polling stopped without a failure stage.
    Stalled { reason: String },
}
