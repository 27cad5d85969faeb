use crate::{JobHandle, PollSettings, SessionId};

/// Coarse lifecycle phase of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Polling,
    /// Completed stage shown; waiting for the cleanup delay.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) id: SessionId,
    pub(crate) job: JobHandle,
    pub(crate) query_in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Active {
    #[default]
    Idle,
    Polling(Session),
    Completing(Session),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollerState {
    settings: PollSettings,
    last_session: SessionId,
    active: Active,
}

impl PollerState {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        match self.active {
            Active::Idle => Phase::Idle,
            Active::Polling(_) => Phase::Polling,
            Active::Completing(_) => Phase::Completed,
        }
    }

    pub fn active_job(&self) -> Option<&JobHandle> {
        self.session().map(|session| &session.job)
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.session().map(|session| session.id)
    }

    fn session(&self) -> Option<&Session> {
        match &self.active {
            Active::Idle => None,
            Active::Polling(session) | Active::Completing(session) => Some(session),
        }
    }

    pub(crate) fn open_session(&mut self, job: JobHandle) -> SessionId {
        self.last_session += 1;
        self.active = Active::Polling(Session {
            id: self.last_session,
            job,
            query_in_flight: false,
        });
        self.last_session
    }

    pub(crate) fn polling_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        match &mut self.active {
            Active::Polling(session) if session.id == id => Some(session),
            _ => None,
        }
    }

    pub(crate) fn is_completing(&self, id: SessionId) -> bool {
        matches!(&self.active, Active::Completing(session) if session.id == id)
    }

    pub(crate) fn take_active(&mut self) -> Active {
        std::mem::take(&mut self.active)
    }

    pub(crate) fn set_active(&mut self, active: Active) {
        self.active = active;
    }
}
