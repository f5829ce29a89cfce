//! Phenotype projector
//!
//! Expressed genes named `<category>_<trait>` contribute
//! `mean(sequence) × expression` to their trait; biological limits and a
//! global energy budget are applied afterwards.

use crate::genome::Genome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Categories a phenotype is made of; genes in any other category are ignored
pub const PHENOTYPE_CATEGORIES: [&str; 6] = [
    "physique",
    "alimentation",
    "social",
    "cerveau",
    "adaptation",
    "biologie",
];

/// Upper bound on the total energy cost of all traits
pub const ENERGY_BUDGET: f64 = 2.0;
/// Energy cost per unit of absolute trait value
pub const ENERGY_COST_PER_UNIT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    /// Category → trait → value
    pub traits: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Default for Phenotype {
    fn default() -> Self {
        let traits = PHENOTYPE_CATEGORIES
            .iter()
            .map(|c| (c.to_string(), BTreeMap::new()))
            .collect();
        Self { traits }
    }
}

impl Phenotype {
    pub fn get(&self, category: &str, name: &str) -> Option<f64> {
        self.traits.get(category)?.get(name).copied()
    }

    pub fn category(&self, category: &str) -> Option<&BTreeMap<String, f64>> {
        self.traits.get(category)
    }

    pub fn trait_count(&self) -> usize {
        self.traits.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trait_count() == 0
    }

    /// Σ |value| × 0.1 over all traits
    pub fn energy_cost(&self) -> f64 {
        self.traits
            .values()
            .flat_map(BTreeMap::values)
            .map(|v| v.abs() * ENERGY_COST_PER_UNIT)
            .sum()
    }

    fn clamp_trait(&mut self, category: &str, name: &str, lo: f64, hi: f64) {
        if let Some(v) = self.traits.get_mut(category).and_then(|t| t.get_mut(name)) {
            *v = v.clamp(lo, hi);
        }
    }

    fn apply_constraints(&mut self) {
        self.clamp_trait("physique", "taille", 0.3, 3.0);
        self.clamp_trait("physique", "vitesse", 0.1, 2.0);

        // Intelligence needs metabolic support
        let max_intelligence = self.get("physique", "metabolisme").unwrap_or(1.0) * 1.5;
        if let Some(v) = self.traits.get_mut("cerveau").and_then(|t| t.get_mut("intelligence")) {
            *v = v.min(max_intelligence);
        }

        let cost = self.energy_cost();
        if cost > ENERGY_BUDGET {
            let factor = ENERGY_BUDGET / cost;
            self.traits
                .values_mut()
                .flat_map(BTreeMap::values_mut)
                .for_each(|v| *v *= factor);
        }
    }
}

/// Project a genome onto its phenotype.
///
/// Several genes feeding the same trait are folded pairwise in chromosome
/// then gene-name order: each new value is averaged with the running value.
pub fn get_phenotype(genome: &Genome) -> Phenotype {
    let mut phenotype = Phenotype::default();
    for gene in genome.chromosomes.values().flat_map(|c| c.active_genes()) {
        let (category, name) = gene.name.split_once('_').unwrap_or((gene.name.as_str(), ""));
        let Some(traits) = phenotype.traits.get_mut(category) else {
            continue;
        };
        let value = gene.mean_value() * gene.expression_level();
        traits
            .entry(name.to_string())
            .and_modify(|old| *old = (*old + value) / 2.0)
            .or_insert(value);
    }
    phenotype.apply_constraints();
    phenotype
}
