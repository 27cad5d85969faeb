use keeper_core::{JobHandle, JobStatusSnapshot, ProgressStage, SessionOutcome};

const BAR_WIDTH: usize = 20;

pub fn progress_line(stage: &ProgressStage) -> String {
    let filled = (usize::from(stage.percent) * BAR_WIDTH / 100).min(BAR_WIDTH);
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        stage.percent,
        stage.label
    )
}

/// Final line for a finished session, if one should be shown.
///
/// A stalled session prints nothing; the progress simply stops.
pub fn outcome_line(job: &JobHandle, outcome: &SessionOutcome) -> Option<String> {
    match outcome {
        SessionOutcome::Completed => Some(format!("job {job}: processing complete")),
        SessionOutcome::Failed => Some(format!("job {job}: processing failed")),
        SessionOutcome::Cancelled => Some(format!("job {job}: stopped watching")),
        SessionOutcome::Replaced | SessionOutcome::Stalled { .. } => None,
    }
}

pub fn snapshot_line(job: &JobHandle, snapshot: &JobStatusSnapshot) -> String {
    format!("job {job}: {:?} ({})", snapshot.state, snapshot.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_core::JobState;

    #[test]
    fn bar_scales_with_percent() {
        assert_eq!(
            progress_line(&ProgressStage::new(50, "generating summary")),
            "[##########----------]  50% generating summary"
        );
        assert_eq!(
            progress_line(&ProgressStage::terminal(100, "done")),
            "[####################] 100% done"
        );
        assert_eq!(
            progress_line(&ProgressStage::terminal(0, "bad url")),
            "[--------------------]   0% bad url"
        );
    }

    #[test]
    fn bar_saturates_above_one_hundred() {
        let stage = ProgressStage {
            percent: 180,
            label: "overshoot".to_string(),
            terminal: false,
        };
        assert_eq!(progress_line(&stage), "[####################] 180% overshoot");
    }

    #[test]
    fn stalled_session_prints_nothing() {
        let job = JobHandle::new("9");
        let stalled = SessionOutcome::Stalled {
            reason: "timeout".to_string(),
        };
        assert_eq!(outcome_line(&job, &stalled), None);
        assert_eq!(
            outcome_line(&job, &SessionOutcome::Completed).as_deref(),
            Some("job 9: processing complete")
        );
    }

    #[test]
    fn snapshot_line_shows_state_and_message() {
        let snapshot = JobStatusSnapshot::new(JobState::Processing, "Processing in progress");
        assert_eq!(
            snapshot_line(&JobHandle::new("3"), &snapshot),
            "job 3: Processing (Processing in progress)"
        );
    }
}
