//! Configuration management for AAT calculations
//!
//! The YAML file supplies defaults for every option; command-line
//! arguments override it.

mod args;

pub use args::Args;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Snapshot archive (YAML or JSON)
    pub snapshots: Option<String>,
    /// Plain-text tensor report
    pub report: Option<String>,
    #[serde(default)]
    pub aat: AatParams,
    pub parallel: Option<ParallelParams>,
}

/// Tensor assembly parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AatParams {
    pub method: Option<String>,        // "rhf", "cid" or "mp2"
    pub normalization: Option<String>, // "full" or "intermediate"
    pub orbitals: Option<String>,      // "spin" or "spatial"
    pub strategy: Option<String>,      // "restricted" or "full"
    pub nuclear_step: Option<f64>,
    pub field_step: Option<f64>,
    pub element: Option<[usize; 2]>,
}

impl Default for AatParams {
    fn default() -> Self {
        AatParams {
            method: Some("rhf".to_string()),
            normalization: Some("full".to_string()),
            orbitals: Some("spatial".to_string()),
            strategy: Some("restricted".to_string()),
            nuclear_step: Some(1e-4),
            field_step: Some(1e-4),
            element: None,
        }
    }
}

impl AatParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.method.is_none() {
            self.method = defaults.method;
        }
        if self.normalization.is_none() {
            self.normalization = defaults.normalization;
        }
        if self.orbitals.is_none() {
            self.orbitals = defaults.orbitals;
        }
        if self.strategy.is_none() {
            self.strategy = defaults.strategy;
        }
        if self.nuclear_step.is_none() {
            self.nuclear_step = defaults.nuclear_step;
        }
        if self.field_step.is_none() {
            self.field_step = defaults.field_step;
        }
        self
    }
}

/// Worker pool parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParallelParams {
    pub enabled: Option<bool>,
    pub num_workers: Option<usize>,
}

impl Default for ParallelParams {
    fn default() -> Self {
        ParallelParams {
            enabled: Some(false),
            num_workers: Some(
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1),
            ),
        }
    }
}

impl ParallelParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.num_workers.is_none() {
            self.num_workers = defaults.num_workers;
        }
        self
    }
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.aat = self.aat.with_defaults();
        self.parallel = Some(self.parallel.take().unwrap_or_default().with_defaults());
        self
    }

    /// Check if the worker pool is enabled
    pub fn is_parallel(&self) -> bool {
        self.parallel
            .as_ref()
            .and_then(|p| p.enabled)
            .unwrap_or(false)
    }

    /// Get the worker count
    pub fn num_workers(&self) -> usize {
        self.parallel
            .as_ref()
            .and_then(|p| p.num_workers)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_gets_defaults() {
        let yaml = "
snapshots: h2.yaml
aat:
  method: cid
  nuclear_step: 0.001
";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.snapshots.as_deref(), Some("h2.yaml"));
        assert_eq!(config.aat.method.as_deref(), Some("cid"));
        assert_eq!(config.aat.normalization.as_deref(), Some("full"));
        assert_eq!(config.aat.orbitals.as_deref(), Some("spatial"));
        assert_eq!(config.aat.nuclear_step, Some(0.001));
        assert_eq!(config.aat.field_step, Some(1e-4));
        assert!(config.aat.element.is_none());
        assert!(!config.is_parallel());
        assert!(config.num_workers() >= 1);
    }

    #[test]
    fn test_parallel_section() {
        let yaml = "
aat:
  element: [4, 2]
parallel:
  enabled: true
  num_workers: 3
";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert!(config.is_parallel());
        assert_eq!(config.num_workers(), 3);
        assert_eq!(config.aat.element, Some([4, 2]));
        assert_eq!(config.aat.method.as_deref(), Some("rhf"));
    }
}
