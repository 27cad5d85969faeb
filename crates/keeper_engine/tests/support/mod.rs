#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use keeper_core::{JobHandle, JobState, JobStatusSnapshot, SubmissionRequest};
use keeper_engine::{ClientError, JobService, PollerEvent, Submission};
use tokio::sync::mpsc::UnboundedReceiver;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(keeper_logging::initialize_for_tests);
}

pub fn job(id: u64) -> JobHandle {
    JobHandle::from(id)
}

pub struct Reply {
    pub delay: Duration,
    pub result: Result<JobStatusSnapshot, ClientError>,
}

impl Reply {
    pub fn status(state: JobState, message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(JobStatusSnapshot::new(state, message)),
        }
    }

    pub fn error(err: ClientError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(err),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// In-memory backend answering from per-job scripts.
///
/// Once a job's script runs out it keeps reporting `processing`.
#[derive(Default)]
pub struct ScriptedService {
    replies: Mutex<HashMap<JobHandle, VecDeque<Reply>>>,
    submissions: Mutex<VecDeque<Result<Submission, ClientError>>>,
    queried: Mutex<Vec<JobHandle>>,
    submitted: Mutex<Vec<SubmissionRequest>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, job: JobHandle, replies: Vec<Reply>) {
        self.replies.lock().unwrap().insert(job, replies.into());
    }

    pub fn push_submission(&self, result: Result<Submission, ClientError>) {
        self.submissions.lock().unwrap().push_back(result);
    }

    pub fn queries(&self) -> Vec<JobHandle> {
        self.queried.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<SubmissionRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl JobService for ScriptedService {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Submission, ClientError> {
        self.submitted.lock().unwrap().push(request.clone());
        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected submission")
    }

    async fn query_status(&self, job: &JobHandle) -> Result<JobStatusSnapshot, ClientError> {
        self.queried.lock().unwrap().push(job.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(job)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Reply::status(JobState::Processing, "Processing in progress"));
        tokio::time::sleep(reply.delay).await;
        reply.result
    }

    async fn health(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

pub async fn next_event(rx: &mut UnboundedReceiver<PollerEvent>) -> PollerEvent {
    tokio::time::timeout(Duration::from_secs(120), rx.recv())
        .await
        .expect("poller event within timeout")
        .expect("poller channel open")
}

/// Collects events up to and including the session end of `job`.
pub async fn events_until_end(
    rx: &mut UnboundedReceiver<PollerEvent>,
    job: &JobHandle,
) -> Vec<PollerEvent> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let done = matches!(&event, PollerEvent::SessionEnded { job: ended, .. } if ended == job);
        events.push(event);
        if done {
            return events;
        }
    }
}
