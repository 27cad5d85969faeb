use crate::{JobHandle, JobStatusSnapshot, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin polling a freshly submitted job, replacing any active session.
    Start { job: JobHandle },
    /// Recurring poll timer fired.
    Tick { session: SessionId },
    /// Status query returned a snapshot.
    StatusReceived {
        session: SessionId,
        snapshot: JobStatusSnapshot,
    },
    /// Status query failed at the transport or protocol level.
    QueryFailed { session: SessionId, reason: String },
    /// Cosmetic delay after completion elapsed.
    CleanupElapsed { session: SessionId },
    /// User cancelled polling.
    Cancel,
}
