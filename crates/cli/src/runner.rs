//! Loads scenarios into a stowage service and runs their steps.

use crate::parser::{ScenarioError, ScenarioParser};
use crate::scenario::{Scenario, Step};
use u_stowage_core::{BatchResult, RestorePolicy, StowageConfig};
use u_stowage_engine::Stowage;

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Restore strategy for displaced items.
    pub restore_policy: RestorePolicy,
    /// Whether items may be rotated.
    pub allow_rotation: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerConfig {
    /// Creates a configuration with rotation enabled.
    pub fn new() -> Self {
        Self {
            restore_policy: RestorePolicy::default(),
            allow_rotation: true,
        }
    }

    /// Sets the restore policy.
    pub fn with_restore_policy(mut self, policy: RestorePolicy) -> Self {
        self.restore_policy = policy;
        self
    }

    /// Enables or disables rotation.
    pub fn with_rotation(mut self, allowed: bool) -> Self {
        self.allow_rotation = allowed;
        self
    }
}

/// Result of loading a scenario.
#[derive(Debug)]
pub struct Loaded {
    /// Service holding the placed scenario.
    pub stowage: Stowage,
    /// Outcome of the initial placement.
    pub placement: BatchResult,
}

/// Outcome of one scenario step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// The step that ran.
    pub step: Step,
    /// Error message if the step failed.
    pub error: Option<String>,
}

/// Drives a [`Stowage`] service from scenario files.
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    config: RunnerConfig,
    parser: ScenarioParser,
}

impl ScenarioRunner {
    /// Creates a new runner.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            parser: ScenarioParser::new(),
        }
    }

    /// Builds a service for the scenario and places its items.
    pub fn load(&self, scenario: &Scenario) -> Result<Loaded, ScenarioError> {
        let containers = self.parser.containers(scenario)?;
        let items = self.parser.items(scenario)?;

        let mut config = StowageConfig::new()
            .with_restore_policy(self.config.restore_policy)
            .with_rotation(self.config.allow_rotation);
        if let Some(date) = self.parser.start_date(scenario)? {
            config = config.with_start_date(date);
        }

        let mut stowage = Stowage::new(config);
        let placement = stowage.place_batch(items, containers)?;
        log::debug!(
            "scenario loaded: {} placed, {} failed",
            placement.placed_count(),
            placement.failed_count()
        );
        Ok(Loaded { stowage, placement })
    }

    /// Runs the scenario's steps in order. Failed steps are reported and do
    /// not stop the run.
    pub fn run_steps(&self, stowage: &mut Stowage, steps: &[Step]) -> Vec<StepOutcome> {
        steps
            .iter()
            .map(|step| {
                let error = match step {
                    Step::Retrieve { item_id } => stowage.retrieve(item_id).err().map(|e| e.to_string()),
                    Step::Simulate { num_of_days } => {
                        stowage.advance_time(*num_of_days).err().map(|e| e.to_string())
                    }
                    Step::Reclaim { item_id } => {
                        stowage.reclaim_waste(item_id).err().map(|e| e.to_string())
                    }
                    Step::ReclaimAll => stowage.reclaim_all_waste().err().map(|e| e.to_string()),
                };
                if let Some(message) = &error {
                    log::warn!("step {:?} failed: {}", step, message);
                }
                StepOutcome {
                    step: step.clone(),
                    error,
                }
            })
            .collect()
    }
}
