//! Keeper engine: backend client and the async driver for the job poller.
mod client;
mod observer;
mod poller;
mod register;
mod types;

pub use client::{ClientSettings, JobService, ReqwestJobService};
pub use observer::{ChannelObserver, PollerEvent, ProgressObserver};
pub use poller::PollerHandle;
pub use register::{register, RegisterError, RegistrationOutcome};
pub use types::{ClientError, Submission, SubmitStatus};
