//! GeneticsConfig — tunable parameters of the genome engine
//!
//! Every section deserializes with defaults so a JSON file only needs to
//! name the values it overrides.

use crate::error::{GenomeError, Result};
use crate::regulation::FunctionCategory;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base mutation rate and structural limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationSettings {
    /// Per-call probability of attempting a mutation before adjustment
    pub base_rate: f64,
    /// Floor applied to the base rate (must stay strictly positive)
    pub min_rate: f64,
    /// Polyploidy is refused once a genome holds this many chromosomes
    pub max_chromosomes: usize,
    /// Oldest history events are dropped beyond this many (`None` keeps all)
    pub history_limit: Option<usize>,
}

impl Default for MutationSettings {
    fn default() -> Self {
        Self {
            base_rate: 0.01,
            min_rate: 1e-6,
            max_chromosomes: 6,
            history_limit: None,
        }
    }
}

/// Stress response and environmental memory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpigeneticSettings {
    /// Stress above this level demethylates stress-response genes
    pub stress_threshold: f64,
    /// Environmental memory capacity (oldest entries evicted first)
    pub memory_capacity: usize,
    /// Number of parental memories a child keeps
    pub inherited_memory: usize,
    /// Memory must hold more than this many entries before chronic effects apply
    pub chronic_entries: usize,
    /// Mean remembered stress above which adaptation genes are boosted
    pub chronic_stress: f64,
    /// Gene-name fragments identifying stress-response genes
    pub stress_keywords: Vec<String>,
    /// Gene-name fragments identifying adaptation genes
    pub adaptation_keywords: Vec<String>,
}

impl Default for EpigeneticSettings {
    fn default() -> Self {
        Self {
            stress_threshold: 0.7,
            memory_capacity: 100,
            inherited_memory: 50,
            chronic_entries: 10,
            chronic_stress: 0.6,
            stress_keywords: vec![
                "robustesse_defense".into(),
                "immunite".into(),
                "resistance_poison".into(),
            ],
            adaptation_keywords: vec!["adaptation".into()],
        }
    }
}

/// Keywords tagging a gene with a protected function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedFunction {
    pub category: FunctionCategory,
    pub keywords: Vec<String>,
}

/// Feasibility scoring of proposed mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSettings {
    /// Gene-name fragments marking developmentally essential genes
    pub essential_keywords: Vec<String>,
    /// Number of recent history events inspected for phylogenetic bias
    pub history_window: usize,
    /// More than this many same-kind events in the window halves feasibility
    pub similar_limit: usize,
    pub protected_functions: Vec<ProtectedFunction>,
}

impl Default for ConstraintSettings {
    fn default() -> Self {
        Self {
            essential_keywords: vec!["essential".into()],
            history_window: 10,
            similar_limit: 3,
            protected_functions: vec![
                ProtectedFunction {
                    category: FunctionCategory::Metabolism,
                    keywords: vec!["metabol".into(), "metabolism".into()],
                },
                ProtectedFunction {
                    category: FunctionCategory::Reproduction,
                    keywords: vec!["reproduc".into(), "fertil".into()],
                },
                ProtectedFunction {
                    category: FunctionCategory::Survival,
                    keywords: vec!["surviv".into(), "immun".into()],
                },
            ],
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticsConfig {
    pub mutation: MutationSettings,
    pub epigenetics: EpigeneticSettings,
    pub constraints: ConstraintSettings,
}

impl GeneticsConfig {
    /// Low mutation pressure and a tight chromosome cap
    pub fn stable() -> Self {
        Self {
            mutation: MutationSettings {
                base_rate: 0.005,
                max_chromosomes: 4,
                ..MutationSettings::default()
            },
            ..Self::default()
        }
    }

    /// High mutation pressure, earlier stress response, room for polyploidy
    pub fn volatile() -> Self {
        Self {
            mutation: MutationSettings {
                base_rate: 0.05,
                max_chromosomes: 8,
                ..MutationSettings::default()
            },
            epigenetics: EpigeneticSettings {
                stress_threshold: 0.5,
                ..EpigeneticSettings::default()
            },
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded genetics config from {}", path.display());
        Ok(config)
    }

    /// Check the ranges every operator relies on
    pub fn validate(&self) -> Result<()> {
        let m = &self.mutation;
        if !m.min_rate.is_finite() || m.min_rate <= 0.0 {
            return Err(GenomeError::InvalidConfig(format!(
                "mutation.min_rate must be > 0, got {}",
                m.min_rate
            )));
        }
        if !m.base_rate.is_finite() || m.base_rate < m.min_rate {
            return Err(GenomeError::InvalidConfig(format!(
                "mutation.base_rate must be >= min_rate ({}), got {}",
                m.min_rate, m.base_rate
            )));
        }
        if m.max_chromosomes == 0 {
            return Err(GenomeError::InvalidConfig(
                "mutation.max_chromosomes must be at least 1".into(),
            ));
        }
        if m.history_limit == Some(0) {
            return Err(GenomeError::InvalidConfig(
                "mutation.history_limit must be at least 1 when set".into(),
            ));
        }

        let e = &self.epigenetics;
        if !(0.0..=1.0).contains(&e.stress_threshold) {
            return Err(GenomeError::InvalidConfig(format!(
                "epigenetics.stress_threshold must be in [0, 1], got {}",
                e.stress_threshold
            )));
        }
        if e.memory_capacity == 0 || e.inherited_memory > e.memory_capacity {
            return Err(GenomeError::InvalidConfig(format!(
                "epigenetics memory sizes invalid: capacity={} inherited={}",
                e.memory_capacity, e.inherited_memory
            )));
        }

        if self.constraints.history_window == 0 {
            return Err(GenomeError::InvalidConfig(
                "constraints.history_window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
