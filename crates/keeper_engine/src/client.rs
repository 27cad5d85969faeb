use std::time::Duration;

use keeper_core::{JobHandle, JobState, JobStatusSnapshot, SubmissionRequest};
use keeper_logging::keeper_debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::types::{ErrorReply, ProcessUrlBody, ProcessUrlReply, StatusReply};
use crate::{ClientError, Submission, SubmitStatus};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a single request, status queries included.
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Backend operations the registration flow and the poller depend on.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Submission, ClientError>;

    /// Latest known state of a job. Safe to call repeatedly.
    async fn query_status(&self, job: &JobHandle) -> Result<JobStatusSnapshot, ClientError>;

    async fn health(&self) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobService {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl ReqwestJobService {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = reqwest::Url::parse(&settings.base_url)
            .map_err(|err| ClientError::InvalidBaseUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(settings.base_url));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        // Cannot fail: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(http_status_error(status, response).await);
        }
        response.json::<T>().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl JobService for ReqwestJobService {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Submission, ClientError> {
        let body = ProcessUrlBody {
            url: &request.url,
            memo: request.memo.as_deref(),
        };
        let response = self
            .client
            .post(self.endpoint(&["api", "v1", "process-url"]))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let reply: ProcessUrlReply = Self::read_json(response).await?;
        keeper_debug!(
            "process-url page_id={} status={} message={}",
            reply.page_id,
            reply.status,
            reply.message
        );
        Ok(Submission {
            job: JobHandle::from(reply.page_id),
            status: SubmitStatus::from_wire(&reply.status),
            message: reply.message,
        })
    }

    async fn query_status(&self, job: &JobHandle) -> Result<JobStatusSnapshot, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "v1", "process-status", job.as_str()]))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let reply: StatusReply = Self::read_json(response).await?;
        keeper_debug!("process-status job={} status={}", job, reply.status);
        Ok(JobStatusSnapshot::new(
            JobState::from_wire(&reply.status),
            reply.message,
        ))
    }

    async fn health(&self) -> Result<(), ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["health"]))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(http_status_error(status, response).await)
        }
    }
}

/// Prefers the backend's `detail` field over the bare status line.
async fn http_status_error(status: StatusCode, response: reqwest::Response) -> ClientError {
    let detail = response
        .json::<ErrorReply>()
        .await
        .ok()
        .and_then(|reply| reply.detail)
        .map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
        .unwrap_or_else(|| status.to_string());

    ClientError::HttpStatus {
        status: status.as_u16(),
        detail,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Timeout;
    }
    if err.is_decode() {
        return ClientError::Decode(err.to_string());
    }
    ClientError::Transport(err.to_string())
}
