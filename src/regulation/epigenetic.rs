//! EpigeneticController — environmental regulation of gene expression
//!
//! High stress demethylates stress-response genes and is remembered.
//! Chronic remembered stress boosts adaptation genes on every call,
//! which is how exposure carries across generations.

use crate::config::EpigeneticSettings;
use crate::genome::ChromosomeMap;
use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// One remembered stress exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalMemory {
    pub stress_level: f64,
    pub timestamp: DateTime<Utc>,
    pub response: String,
}

impl EnvironmentalMemory {
    pub fn new(stress_level: f64, response: impl Into<String>) -> Self {
        Self {
            stress_level,
            timestamp: Utc::now(),
            response: response.into(),
        }
    }

    /// Inheritance ranking key: stress × timestamp (seconds)
    pub fn significance(&self) -> f64 {
        self.stress_level * self.timestamp.timestamp_millis() as f64 / 1000.0
    }
}

/// Expression boost applied to demethylated stress-response genes
const STRESS_BOOST: f64 = 1.5;
/// Expression boost applied to adaptation genes under chronic stress
const CHRONIC_BOOST: f64 = 1.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpigeneticController {
    /// Methylation enzyme → activity level
    pub methylation_enzymes: BTreeMap<String, f64>,
    /// Bounded exposure history, oldest first
    pub environmental_memory: VecDeque<EnvironmentalMemory>,
    settings: EpigeneticSettings,
}

impl Default for EpigeneticController {
    fn default() -> Self {
        Self::new(EpigeneticSettings::default())
    }
}

impl EpigeneticController {
    pub fn new(settings: EpigeneticSettings) -> Self {
        let methylation_enzymes = [("DNMT1", 1.0), ("DNMT3A", 0.8), ("DNMT3B", 0.7)]
            .into_iter()
            .map(|(name, level)| (name.to_string(), level))
            .collect();
        Self {
            methylation_enzymes,
            environmental_memory: VecDeque::with_capacity(settings.memory_capacity),
            settings,
        }
    }

    pub fn settings(&self) -> &EpigeneticSettings {
        &self.settings
    }

    /// Regulate expression for one environmental exposure
    pub fn apply_environmental_regulation(&mut self, chromosomes: &mut ChromosomeMap, stress: f64) {
        let stress = if stress.is_nan() { 0.0 } else { stress.clamp(0.0, 1.0) };
        if stress > self.settings.stress_threshold {
            let activated = self.activate_stress_response_genes(chromosomes);
            self.remember(EnvironmentalMemory::new(stress, "stress_activation"));
            debug!("Stress {:.2}: activated {} stress-response genes", stress, activated);
        }
        self.apply_transgenerational_effects(chromosomes);
    }

    /// Append to memory, evicting the oldest entry at capacity.
    /// A zero capacity remembers nothing.
    pub fn remember(&mut self, entry: EnvironmentalMemory) {
        let capacity = self.settings.memory_capacity;
        if capacity == 0 {
            return;
        }
        while self.environmental_memory.len() >= capacity {
            self.environmental_memory.pop_front();
        }
        self.environmental_memory.push_back(entry);
    }

    /// Mean remembered stress, if anything is remembered
    pub fn mean_stress(&self) -> Option<f64> {
        if self.environmental_memory.is_empty() {
            return None;
        }
        let sum: f64 = self.environmental_memory.iter().map(|m| m.stress_level).sum();
        Some(sum / self.environmental_memory.len() as f64)
    }

    /// Whether the remembered history counts as chronic stress
    pub fn is_chronically_stressed(&self) -> bool {
        self.environmental_memory.len() > self.settings.chronic_entries
            && self.mean_stress().is_some_and(|m| m > self.settings.chronic_stress)
    }

    fn activate_stress_response_genes(&self, chromosomes: &mut ChromosomeMap) -> usize {
        let mut activated = 0;
        for gene in chromosomes.values_mut().flat_map(|c| c.genes.values_mut()) {
            if matches_any(&gene.name, &self.settings.stress_keywords) {
                gene.clear_methylation();
                gene.scale_expression(STRESS_BOOST);
                activated += 1;
            }
        }
        activated
    }

    fn apply_transgenerational_effects(&self, chromosomes: &mut ChromosomeMap) {
        if !self.is_chronically_stressed() {
            return;
        }
        for gene in chromosomes.values_mut().flat_map(|c| c.genes.values_mut()) {
            if matches_any(&gene.name, &self.settings.adaptation_keywords) {
                gene.scale_expression(CHRONIC_BOOST);
            }
        }
        trace!("Chronic stress boosted adaptation genes");
    }

    /// Controller of a child: enzyme levels averaged over the first parent's
    /// enzymes, memory = the most significant entries of both parents
    pub fn inherit(parent1: &Self, parent2: &Self, settings: EpigeneticSettings) -> Self {
        let mut child = Self::new(settings);
        child.methylation_enzymes = parent1
            .methylation_enzymes
            .iter()
            .map(|(enzyme, &level1)| {
                let level2 = parent2.methylation_enzymes.get(enzyme).copied().unwrap_or(0.0);
                (enzyme.clone(), (level1 + level2) / 2.0)
            })
            .collect();

        let mut combined: Vec<EnvironmentalMemory> = parent1
            .environmental_memory
            .iter()
            .chain(parent2.environmental_memory.iter())
            .cloned()
            .collect();
        combined.sort_by(|a, b| b.significance().total_cmp(&a.significance()));
        combined.truncate(child.settings.inherited_memory);
        for entry in combined {
            child.remember(entry);
        }
        child
    }
}

fn matches_any(name: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| name.contains(k.as_str()))
}
