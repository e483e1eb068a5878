//! Engine configuration.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How displaced items are put back after a retrieval or reclamation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestorePolicy {
    /// Return each item to its original region; search only if that region is taken.
    #[default]
    Original,
    /// Re-place each item through the standard search, compacting toward the access face.
    Shallowest,
}

/// Configuration for a stowage engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StowageConfig {
    /// Initial simulated date. `None` reads the clock source.
    pub start_date: Option<NaiveDate>,

    /// Restore strategy for displaced items.
    pub restore_policy: RestorePolicy,

    /// Whether items may be rotated at all. Per-item rotation policies still apply.
    pub allow_rotation: bool,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            restore_policy: RestorePolicy::default(),
            allow_rotation: true,
        }
    }
}

impl StowageConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial simulated date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let config = StowageConfig::new()
            .with_start_date(date)
            .with_restore_policy(RestorePolicy::Shallowest)
            .with_rotation(false);

        assert_eq!(config.start_date, Some(date));
        assert_eq!(config.restore_policy, RestorePolicy::Shallowest);
        assert!(!config.allow_rotation);
    }

    #[test]
    fn test_defaults() {
        let config = StowageConfig::default();
        assert!(config.start_date.is_none());
        assert_eq!(config.restore_policy, RestorePolicy::Original);
        assert!(config.allow_rotation);
    }
}
