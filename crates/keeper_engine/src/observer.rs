use keeper_core::{JobHandle, ProgressStage, SessionOutcome};
use tokio::sync::mpsc;

/// Presentation-side receiver of poller notifications.
///
/// Called from the poller task; implementations must not block.
pub trait ProgressObserver: Send + Sync {
    fn on_stage_change(&self, job: &JobHandle, stage: &ProgressStage);
    fn on_session_end(&self, job: &JobHandle, outcome: &SessionOutcome);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerEvent {
    Stage {
        job: JobHandle,
        stage: ProgressStage,
    },
    SessionEnded {
        job: JobHandle,
        outcome: SessionOutcome,
    },
}

/// Forwards notifications to an async channel.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<PollerEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<PollerEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PollerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_stage_change(&self, job: &JobHandle, stage: &ProgressStage) {
        let _ = self.tx.send(PollerEvent::Stage {
            job: job.clone(),
            stage: stage.clone(),
        });
    }

    fn on_session_end(&self, job: &JobHandle, outcome: &SessionOutcome) {
        let _ = self.tx.send(PollerEvent::SessionEnded {
            job: job.clone(),
            outcome: outcome.clone(),
        });
    }
}
