use keeper_core::{InputError, JobHandle, SubmissionRequest};
use keeper_logging::keeper_info;
use thiserror::Error;

use crate::{ClientError, JobService, PollerHandle, SubmitStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Accepted; the poller is now tracking the job.
    Started(JobHandle),
    /// The backend already knows this URL; no polling.
    AlreadyRegistered(JobHandle),
    /// Accepted with a status that needs no polling.
    Registered(JobHandle),
}

impl RegistrationOutcome {
    pub fn job(&self) -> &JobHandle {
        match self {
            Self::Started(job) | Self::AlreadyRegistered(job) | Self::Registered(job) => job,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("submission failed: {0}")]
    Submit(#[from] ClientError),
}

/// Submits `url` and starts polling when the backend begins processing.
///
/// Submission errors are returned before any polling session begins.
pub async fn register(
    service: &dyn JobService,
    poller: &PollerHandle,
    url: &str,
    memo: Option<&str>,
) -> Result<RegistrationOutcome, RegisterError> {
    let request = SubmissionRequest::parse(url, memo)?;
    let submission = service.submit(&request).await?;
    keeper_info!(
        "submitted {} as job {} ({:?})",
        request.url,
        submission.job,
        submission.status
    );

    if submission.status.needs_polling() {
        poller.start(submission.job.clone());
        Ok(RegistrationOutcome::Started(submission.job))
    } else if submission.status == SubmitStatus::AlreadyExists {
        Ok(RegistrationOutcome::AlreadyRegistered(submission.job))
    } else {
        Ok(RegistrationOutcome::Registered(submission.job))
    }
}
