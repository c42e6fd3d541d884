// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration.
//!
//! The comparison epsilon, throttle and debounce intervals, and the tiered
//! durations are product-tuning constants, not correctness constants, so
//! they ship as configuration with the published defaults rather than being
//! hard-coded. Configs round-trip through RON.

use crate::catalog::{WatershedCatalog, WatershedId};
use crate::clock::{DurationPolicy, DurationTier, TierSelector};
use crate::range::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Error raised by config parsing or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// RON parse error
    #[error("Failed to parse engine config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Failed to serialize engine config: {0}")]
    Serialize(#[from] ron::Error),

    /// The catalog has no watersheds
    #[error("Watershed catalog is empty")]
    EmptyCatalog,

    /// A duration tier names a group the catalog does not define
    #[error("Duration tier references unknown group: {0}")]
    UnknownGroup(String),

    /// A watershed appears in more than one catalog group
    #[error("Watershed appears in multiple groups: {0}")]
    DuplicateWatershed(WatershedId),
}

/// Tunable parameters for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Watershed universe, groups, and global time bounds
    pub catalog: WatershedCatalog,
    /// Selection-shape duration tiers
    pub durations: DurationPolicy,
    /// Visual-continuity buffer added to the predicate bound, data seconds
    pub epsilon_secs: Timestamp,
    /// Minimum spacing of predicate pushes during playback, milliseconds
    pub throttle_ms: u64,
    /// Delay between a selection change and its range scan, milliseconds
    pub debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: WatershedCatalog::india_rivers(),
            durations: DurationPolicy {
                tiers: vec![
                    DurationTier {
                        selector: TierSelector::Full,
                        millis: 15_000,
                    },
                    DurationTier {
                        selector: TierSelector::Group("Coastal Rivers".to_string()),
                        millis: 5_000,
                    },
                    DurationTier {
                        selector: TierSelector::Group("Himalayan Rivers".to_string()),
                        millis: 13_000,
                    },
                ],
                default_millis: 10_000,
            },
            epsilon_secs: 100,
            throttle_ms: 60,
            debounce_ms: 100,
        }
    }
}

impl EngineConfig {
    /// Parse a config from RON text.
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for id in self.catalog.universe() {
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateWatershed(id.clone()));
            }
        }
        for tier in &self.durations.tiers {
            if let TierSelector::Group(name) = &tier.selector {
                if self.catalog.group(name).is_none() {
                    return Err(ConfigError::UnknownGroup(name.clone()));
                }
            }
        }
        Ok(())
    }
}
