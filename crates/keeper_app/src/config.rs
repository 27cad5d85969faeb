//! RON configuration for the `keeper` binary.
//!
//! Every field is optional in the file; missing fields take the built-in
//! defaults, which mirror the backend client's and poller's own defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use keeper_core::{PollSettings, ProgressStage, StageRule, StageTable};
use keeper_engine::ClientSettings;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILENAME: &str = "keeper.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub percent: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub percent: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub cleanup_delay_ms: u64,
    pub log_level: String,
    pub bootstrap: StageConfig,
    pub completed_label: String,
    /// Checked in order against in-progress messages.
    pub stages: Vec<RuleConfig>,
    pub fallback: StageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let poll = PollSettings::default();
        let table = &poll.stage_table;
        Self {
            base_url: client.base_url,
            connect_timeout_ms: millis(client.connect_timeout),
            request_timeout_ms: millis(client.request_timeout),
            poll_interval_ms: millis(poll.poll_interval),
            cleanup_delay_ms: millis(poll.cleanup_delay),
            log_level: "info".to_string(),
            bootstrap: StageConfig {
                percent: poll.bootstrap.percent,
                label: poll.bootstrap.label.clone(),
            },
            completed_label: poll.completed_label.clone(),
            stages: table
                .rules()
                .iter()
                .map(|rule| RuleConfig {
                    pattern: rule.pattern.clone(),
                    percent: rule.percent,
                    label: rule.label.clone(),
                })
                .collect(),
            fallback: StageConfig {
                percent: table.fallback().percent,
                label: table.fallback().label.clone(),
            },
        }
    }
}

impl AppConfig {
    /// Explicit paths must exist; otherwise `./keeper.ron` is used when present.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
        if default.exists() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = ron::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.request_timeout_ms == 0 {
            bail!("request_timeout_ms must be greater than zero");
        }
        for rule in &self.stages {
            if rule.pattern.is_empty() {
                bail!("stage pattern for {:?} must not be empty", rule.label);
            }
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        let rules = self
            .stages
            .iter()
            .map(|rule| StageRule::new(rule.pattern.clone(), rule.percent, rule.label.clone()))
            .collect();
        PollSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            cleanup_delay: Duration::from_millis(self.cleanup_delay_ms),
            bootstrap: ProgressStage::new(self.bootstrap.percent, self.bootstrap.label.clone()),
            completed_label: self.completed_label.clone(),
            stage_table: StageTable::new(rules, self.fallback.percent, self.fallback.label.clone()),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
