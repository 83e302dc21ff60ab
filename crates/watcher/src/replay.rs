//! Scenario replay session adapter
//!
//! Stands at the session boundary in place of the platform arbitration
//! layer: a TOML scenario file scripts a sequence of timed disk events,
//! which are delivered through the real event bridge so the whole
//! reconciliation pipeline runs unmodified.

use anyhow::{Context, Result};
use common::{DiskEvent, EventSink};
use monitor::DiskSession;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use types::{DiskDescription, SessionError};

/// A scripted observation scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Observation steps, delivered in order
    #[serde(default, rename = "step")]
    pub steps: Vec<ScenarioStep>,
}

/// One scripted event delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Which lifecycle event to deliver
    pub event: ScenarioEvent,
    /// Delay before delivery, in milliseconds
    #[serde(default)]
    pub after_ms: u64,
    /// The raw description the event carries
    pub description: DiskDescription,
}

/// Lifecycle event kind in a scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioEvent {
    Appeared,
    Disappeared,
    Changed,
}

impl ScenarioStep {
    fn into_event(self) -> DiskEvent {
        match self.event {
            ScenarioEvent::Appeared => DiskEvent::Appeared(self.description),
            ScenarioEvent::Disappeared => DiskEvent::Disappeared(self.description),
            ScenarioEvent::Changed => DiskEvent::DescriptionChanged(self.description),
        }
    }
}

/// Session adapter that replays a scripted scenario
pub struct ReplaySession {
    scenario: Scenario,
    delivery: Option<JoinHandle<()>>,
}

impl ReplaySession {
    /// Create a session over an in-memory scenario
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            delivery: None,
        }
    }

    /// Load a scenario from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))?;

        info!(
            "Loaded scenario with {} step(s) from {}",
            scenario.steps.len(),
            path.display()
        );
        Ok(Self::new(scenario))
    }
}

impl DiskSession for ReplaySession {
    fn open(&mut self, sink: EventSink) -> std::result::Result<(), SessionError> {
        let steps = self.scenario.steps.clone();

        self.delivery = Some(tokio::spawn(async move {
            for step in steps {
                tokio::time::sleep(Duration::from_millis(step.after_ms)).await;
                if sink.deliver(step.into_event()).await.is_err() {
                    debug!("replay sink closed, stopping delivery");
                    return;
                }
            }
            info!("scenario replay complete");
        }));

        Ok(())
    }

    fn close(&mut self) {
        if let Some(delivery) = self.delivery.take() {
            delivery.abort();
        }
    }
}
