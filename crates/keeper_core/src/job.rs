use std::fmt;

/// Identifies one polling session of a poller instance.
///
/// Sessions are numbered from 1 and never reused, so a late timer tick or
/// query response can always be matched against the active session.
pub type SessionId = u64;

/// Opaque identifier the backend returns for a submitted URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for JobHandle {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for JobHandle {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
    /// Any other status string, e.g. `error` on a transient backend fault.
    /// Polling carries on without a stage change.
    Unrecognized(String),
}

impl JobState {
    /// Maps the backend's status string. Matching is case-sensitive.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "queued" | "prepared" => Self::Queued,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// One polled read of a job's backend-reported state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusSnapshot {
    pub state: JobState,
    /// Free-text hint; its content selects the processing sub-stage.
    pub message: String,
}

impl JobStatusSnapshot {
    pub fn new(state: JobState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_statuses_map_to_states() {
        assert_eq!(JobState::from_wire("prepared"), JobState::Queued);
        assert_eq!(JobState::from_wire("queued"), JobState::Queued);
        assert_eq!(JobState::from_wire("processing"), JobState::Processing);
        assert_eq!(JobState::from_wire("completed"), JobState::Completed);
        assert_eq!(JobState::from_wire("failed"), JobState::Failed);
        assert_eq!(
            JobState::from_wire("not_found"),
            JobState::Unrecognized("not_found".to_string())
        );
        assert_eq!(
            JobState::from_wire("Completed"),
            JobState::Unrecognized("Completed".to_string())
        );
    }

    #[test]
    fn numeric_ids_display_verbatim() {
        let handle = JobHandle::from(42_u64);
        assert_eq!(handle.as_str(), "42");
        assert_eq!(handle.to_string(), "42");
    }
}
