//! Keeper core: pure job-status poller state machine and stage mapping.
mod effect;
mod input;
mod job;
mod msg;
mod stage;
mod state;
mod update;

pub use effect::{Effect, SessionOutcome};
pub use input::{InputError, SubmissionRequest};
pub use job::{JobHandle, JobState, JobStatusSnapshot, SessionId};
pub use msg::Msg;
pub use stage::{PollSettings, ProgressStage, StageRule, StageTable};
pub use state::{Phase, PollerState};
pub use update::update;
