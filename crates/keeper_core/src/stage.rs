use std::time::Duration;

use crate::{JobState, JobStatusSnapshot};

/// UI-facing progress derived from a single status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStage {
    pub percent: u8,
    pub label: String,
    pub terminal: bool,
}

impl ProgressStage {
    /// Non-terminal stage. Percentages above 100 are clamped.
    pub fn new(percent: u8, label: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            label: label.into(),
            terminal: false,
        }
    }

    pub fn terminal(percent: u8, label: impl Into<String>) -> Self {
        Self {
            terminal: true,
            ..Self::new(percent, label)
        }
    }
}

/// Maps a substring of the backend message to a progress bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRule {
    pub pattern: String,
    pub percent: u8,
    pub label: String,
}

impl StageRule {
    pub fn new(pattern: impl Into<String>, percent: u8, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            percent: percent.min(100),
            label: label.into(),
        }
    }
}

/// Ordered substring table for in-progress messages; first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTable {
    rules: Vec<StageRule>,
    fallback: ProgressStage,
}

impl StageTable {
    pub fn new(rules: Vec<StageRule>, fallback_percent: u8, fallback_label: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: ProgressStage::new(fallback_percent, fallback_label),
        }
    }

    pub fn rules(&self) -> &[StageRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &ProgressStage {
        &self.fallback
    }

    /// Non-terminal stage for an in-progress message.
    ///
    /// Matching is a case-sensitive substring test.
    pub fn classify(&self, message: &str) -> ProgressStage {
        self.rules
            .iter()
            .find(|rule| message.contains(rule.pattern.as_str()))
            .map(|rule| ProgressStage::new(rule.percent, rule.label.clone()))
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self::new(
            vec![
                StageRule::new("download", 50, "generating summary"),
                StageRule::new("llm", 75, "vectorizing"),
            ],
            25,
            "processing",
        )
    }
}

/// Timing and mapping parameters of a poller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    /// Delay between the completed stage and the end of the session.
    pub cleanup_delay: Duration,
    /// Emitted on `start`, before the first status query returns.
    pub bootstrap: ProgressStage,
    pub completed_label: String,
    pub stage_table: StageTable,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            cleanup_delay: Duration::from_millis(3000),
            bootstrap: ProgressStage::new(25, "fetching content"),
            completed_label: "done".to_string(),
            stage_table: StageTable::default(),
        }
    }
}

impl PollSettings {
    /// Stage to display for a snapshot; `None` for an unrecognized status.
    pub fn stage_for(&self, snapshot: &JobStatusSnapshot) -> Option<ProgressStage> {
        let stage = match &snapshot.state {
            JobState::Completed => ProgressStage::terminal(100, self.completed_label.clone()),
            JobState::Failed => ProgressStage::terminal(0, snapshot.message.clone()),
            // Queued shares the unmatched processing bucket.
            JobState::Queued => self.stage_table.fallback().clone(),
            JobState::Processing => self.stage_table.classify(&snapshot.message),
            JobState::Unrecognized(_) => return None,
        };
        Some(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(state: JobState, message: &str) -> ProgressStage {
        PollSettings::default()
            .stage_for(&JobStatusSnapshot::new(state, message))
            .expect("recognized state")
    }

    #[test]
    fn processing_messages_pick_buckets() {
        assert_eq!(
            stage(JobState::Processing, "download in progress"),
            ProgressStage::new(50, "generating summary")
        );
        assert_eq!(
            stage(JobState::Processing, "running llm summarization"),
            ProgressStage::new(75, "vectorizing")
        );
        assert_eq!(
            stage(JobState::Processing, "queued"),
            ProgressStage::new(25, "processing")
        );
    }

    #[test]
    fn queued_collapses_into_fallback() {
        assert_eq!(
            stage(JobState::Queued, "download in progress"),
            ProgressStage::new(25, "processing")
        );
    }

    #[test]
    fn terminal_states() {
        assert_eq!(stage(JobState::Completed, "whatever"), ProgressStage::terminal(100, "done"));
        assert_eq!(stage(JobState::Failed, "bad url"), ProgressStage::terminal(0, "bad url"));
    }

    #[test]
    fn unrecognized_status_has_no_stage() {
        let snapshot = JobStatusSnapshot::new(JobState::Unrecognized("error".to_string()), "db");
        assert_eq!(PollSettings::default().stage_for(&snapshot), None);
    }

    #[test]
    fn earlier_rule_wins_when_both_match() {
        assert_eq!(
            stage(JobState::Processing, "llm waiting on download").percent,
            50
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(stage(JobState::Processing, "DOWNLOAD").percent, 25);
    }

    #[test]
    fn custom_table_and_clamping() {
        let table = StageTable::new(vec![StageRule::new("embed", 180, "embedding")], 10, "waiting");
        assert_eq!(table.classify("embedding chunks"), ProgressStage::new(100, "embedding"));
        assert_eq!(table.classify("idle"), ProgressStage::new(10, "waiting"));
    }
}
