use std::sync::Arc;
use std::time::Duration;

use keeper_core::{
    update, Effect, JobHandle, JobState, Msg, PollSettings, PollerState, SessionId,
};
use keeper_logging::{keeper_debug, keeper_info, keeper_warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{JobService, ProgressObserver};

/// Handle to a job-status poller running on the current tokio runtime.
///
/// All state lives in one driver task; `start` and `cancel` only enqueue
/// messages, so the handle can be cloned and used from anywhere.
#[derive(Clone)]
pub struct PollerHandle {
    msg_tx: mpsc::UnboundedSender<Msg>,
    shutdown: CancellationToken,
}

impl PollerHandle {
    /// Spawns the driver task. Must be called from within a tokio runtime.
    pub fn spawn(
        service: Arc<dyn JobService>,
        observer: Arc<dyn ProgressObserver>,
        settings: PollSettings,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let driver = PollerDriver {
            state: PollerState::new(settings),
            service,
            observer,
            msg_tx: msg_tx.clone(),
            timer: None,
            cleanup: None,
        };
        tokio::spawn(driver.run(msg_rx, shutdown.clone()));
        Self { msg_tx, shutdown }
    }

    /// Polls `job`, cancelling any session already in progress.
    pub fn start(&self, job: JobHandle) {
        self.send(Msg::Start { job });
    }

    pub fn cancel(&self) {
        self.send(Msg::Cancel);
    }

    /// Stops the driver task and its timers. No session-end is reported.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn send(&self, msg: Msg) {
        if self.msg_tx.send(msg).is_err() {
            keeper_warn!("poller driver has stopped; message dropped");
        }
    }
}

struct PollerDriver {
    state: PollerState,
    service: Arc<dyn JobService>,
    observer: Arc<dyn ProgressObserver>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    /// The single recurring timer of this poller.
    timer: Option<JoinHandle<()>>,
    cleanup: Option<JoinHandle<()>>,
}

impl PollerDriver {
    async fn run(mut self, mut msg_rx: mpsc::UnboundedReceiver<Msg>, shutdown: CancellationToken) {
        loop {
            let msg = tokio::select! {
                _ = shutdown.cancelled() => break,
                msg = msg_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };
            self.dispatch(msg);
        }

        self.stop_timer();
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.abort();
        }
        keeper_debug!("poller driver stopped");
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::EmitStage { job, stage } => {
                keeper_debug!(
                    "job {} stage {}% {:?} terminal={}",
                    job,
                    stage.percent,
                    stage.label,
                    stage.terminal
                );
                self.observer.on_stage_change(&job, &stage);
            }
            Effect::StartTimer { session, interval } => {
                self.stop_timer();
                self.timer = Some(self.spawn_timer(session, interval));
            }
            Effect::StopTimer => self.stop_timer(),
            Effect::QueryStatus { session, job } => self.spawn_query(session, job),
            Effect::ScheduleCleanup { session, delay } => {
                if let Some(previous) = self.cleanup.take() {
                    previous.abort();
                }
                let tx = self.msg_tx.clone();
                self.cleanup = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Msg::CleanupElapsed { session });
                }));
            }
            Effect::SessionEnded { job, outcome } => {
                keeper_info!("job {} polling ended: {:?}", job, outcome);
                self.observer.on_session_end(&job, &outcome);
            }
        }
    }

    fn spawn_timer(&self, session: SessionId, period: Duration) -> JoinHandle<()> {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            // First tick one period after start; the bootstrap stage covers the gap.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(Msg::Tick { session }).is_err() {
                    break;
                }
            }
        })
    }

    fn spawn_query(&self, session: SessionId, job: JobHandle) {
        let service = self.service.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = match service.query_status(&job).await {
                Ok(snapshot) => {
                    if let JobState::Unrecognized(status) = &snapshot.state {
                        keeper_warn!("job {} reported unrecognized status {:?}", job, status);
                    }
                    Msg::StatusReceived { session, snapshot }
                }
                Err(err) => {
                    keeper_warn!("status query for job {} failed: {}", job, err);
                    Msg::QueryFailed {
                        session,
                        reason: err.to_string(),
                    }
                }
            };
            let _ = tx.send(msg);
        });
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
