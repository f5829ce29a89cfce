//! Gene — the atomic heritable unit
//!
//! A gene carries a numeric sequence and a methylation pattern of the same
//! length. Both are private: every operator goes through the methods below,
//! which keep the two in lockstep and keep expression inside [0, 1].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Named expression levels used when founding genomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneExpression {
    Silenced,
    Low,
    Moderate,
    High,
    Overexpressed,
}

impl GeneExpression {
    pub fn level(&self) -> f64 {
        match self {
            GeneExpression::Silenced => 0.0,
            GeneExpression::Low => 0.25,
            GeneExpression::Moderate => 0.5,
            GeneExpression::High => 0.75,
            GeneExpression::Overexpressed => 1.0,
        }
    }
}

/// A single gene with its epigenetic state and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeneRecord")]
pub struct Gene {
    /// Unique within its chromosome
    pub name: String,
    sequence: Vec<f64>,
    expression_level: f64,
    methylation_pattern: Vec<bool>,
    /// Number of executed mutations that targeted this gene
    pub evolutionary_age: u32,
    /// Regulator name → binding weight
    pub regulatory_sites: BTreeMap<String, f64>,
    pub dominant: bool,
    pub fitness_contribution: f64,
    /// Partner genes by name, resolved through the owning genome
    pub interaction_partners: BTreeSet<String>,
}

/// Unchecked wire shape; converted into a `Gene` with invariants restored
#[derive(Deserialize)]
struct GeneRecord {
    name: String,
    sequence: Vec<f64>,
    expression_level: f64,
    methylation_pattern: Vec<bool>,
    #[serde(default)]
    evolutionary_age: u32,
    #[serde(default)]
    regulatory_sites: BTreeMap<String, f64>,
    #[serde(default = "default_dominant")]
    dominant: bool,
    #[serde(default)]
    fitness_contribution: f64,
    #[serde(default)]
    interaction_partners: BTreeSet<String>,
}

fn default_dominant() -> bool {
    true
}

impl From<GeneRecord> for Gene {
    fn from(r: GeneRecord) -> Self {
        let mut gene = Gene::with_methylation(r.name, r.sequence, r.methylation_pattern);
        gene.set_expression(r.expression_level);
        gene.evolutionary_age = r.evolutionary_age;
        gene.regulatory_sites = r.regulatory_sites;
        gene.dominant = r.dominant;
        gene.fitness_contribution = r.fitness_contribution;
        gene.interaction_partners = r.interaction_partners;
        gene
    }
}

impl Gene {
    /// Create a fully expressed, dominant gene with a random methylation pattern
    pub fn new<R: Rng>(name: impl Into<String>, sequence: Vec<f64>, rng: &mut R) -> Self {
        let len = sequence.len().max(1);
        let methylation = (0..len).map(|_| rng.gen_bool(0.5)).collect();
        Self::with_methylation(name, sequence, methylation)
    }

    /// Create a gene from an explicit methylation pattern.
    ///
    /// An empty sequence becomes `[0.0]`; the pattern is truncated or padded
    /// with unmethylated loci to match the sequence length.
    pub fn with_methylation(
        name: impl Into<String>,
        mut sequence: Vec<f64>,
        mut methylation: Vec<bool>,
    ) -> Self {
        if sequence.is_empty() {
            sequence.push(0.0);
        }
        methylation.resize(sequence.len(), false);
        Self {
            name: name.into(),
            sequence,
            expression_level: 1.0,
            methylation_pattern: methylation,
            evolutionary_age: 0,
            regulatory_sites: BTreeMap::new(),
            dominant: true,
            fitness_contribution: 0.0,
            interaction_partners: BTreeSet::new(),
        }
    }

    pub fn with_expression(mut self, level: f64) -> Self {
        self.set_expression(level);
        self
    }

    pub fn with_fitness(mut self, contribution: f64) -> Self {
        self.fitness_contribution = contribution;
        self
    }

    pub fn with_dominance(mut self, dominant: bool) -> Self {
        self.dominant = dominant;
        self
    }

    pub fn with_partners<I, S>(mut self, partners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interaction_partners.extend(partners.into_iter().map(Into::into));
        self
    }

    pub fn with_regulatory_site(mut self, regulator: impl Into<String>, weight: f64) -> Self {
        self.regulatory_sites.insert(regulator.into(), weight);
        self
    }

    /// Clone under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut gene = self.clone();
        gene.name = name.into();
        gene
    }

    pub fn sequence(&self) -> &[f64] {
        &self.sequence
    }

    pub fn methylation_pattern(&self) -> &[bool] {
        &self.methylation_pattern
    }

    pub fn expression_level(&self) -> f64 {
        self.expression_level
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Expressed genes contribute to the phenotype
    pub fn is_expressed(&self) -> bool {
        self.expression_level > 0.1
    }

    pub fn set_expression(&mut self, level: f64) {
        self.expression_level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
    }

    pub fn scale_expression(&mut self, factor: f64) {
        self.set_expression(self.expression_level * factor);
    }

    /// Replace the sequence, resizing the methylation pattern to match
    pub fn set_sequence(&mut self, mut sequence: Vec<f64>) {
        if sequence.is_empty() {
            sequence.push(0.0);
        }
        self.methylation_pattern.resize(sequence.len(), false);
        self.sequence = sequence;
    }

    /// Add `delta` to one locus and clamp it into `[lo, hi]`
    pub fn nudge_locus(&mut self, index: usize, delta: f64, lo: f64, hi: f64) {
        if let Some(v) = self.sequence.get_mut(index) {
            *v = (*v + delta).clamp(lo, hi);
        }
    }

    /// Insert a locus in both the sequence and the methylation pattern
    pub fn insert_locus(&mut self, index: usize, value: f64, methylated: bool) {
        let index = index.min(self.sequence.len());
        self.sequence.insert(index, value);
        self.methylation_pattern.insert(index, methylated);
    }

    /// Remove a locus from both tracks. Refused when only one locus is left.
    pub fn remove_locus(&mut self, index: usize) -> bool {
        if self.sequence.len() <= 1 || index >= self.sequence.len() {
            return false;
        }
        self.sequence.remove(index);
        self.methylation_pattern.remove(index);
        true
    }

    pub fn flip_methylation(&mut self, index: usize) {
        if let Some(bit) = self.methylation_pattern.get_mut(index) {
            *bit = !*bit;
        }
    }

    pub fn clear_methylation(&mut self) {
        self.methylation_pattern.iter_mut().for_each(|bit| *bit = false);
    }

    /// Fraction of methylated loci
    pub fn methylation_ratio(&self) -> f64 {
        if self.methylation_pattern.is_empty() {
            return 0.0;
        }
        let set = self.methylation_pattern.iter().filter(|&&b| b).count();
        set as f64 / self.methylation_pattern.len() as f64
    }

    pub fn mean_value(&self) -> f64 {
        if self.sequence.is_empty() {
            return 0.0;
        }
        self.sequence.iter().sum::<f64>() / self.sequence.len() as f64
    }

    /// Population standard deviation of the sequence (0 for a single locus)
    pub fn std_dev(&self) -> f64 {
        if self.sequence.len() < 2 {
            return 0.0;
        }
        let mean = self.mean_value();
        let var = self.sequence.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / self.sequence.len() as f64;
        var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_gene_has_parity() {
        let mut rng = StdRng::seed_from_u64(1);
        let gene = Gene::new("physique_taille", vec![0.5, 1.0, 1.5], &mut rng);
        assert_eq!(gene.sequence().len(), gene.methylation_pattern().len());
        assert!((gene.expression_level() - 1.0).abs() < 1e-12);
        assert!(gene.dominant);
    }

    #[test]
    fn test_empty_sequence_gets_one_locus() {
        let gene = Gene::with_methylation("x", vec![], vec![true, true]);
        assert_eq!(gene.sequence(), &[0.0]);
        assert_eq!(gene.methylation_pattern(), &[true]);
    }

    #[test]
    fn test_expression_is_clamped() {
        let mut gene = Gene::with_methylation("x", vec![1.0], vec![false]).with_expression(3.0);
        assert!((gene.expression_level() - 1.0).abs() < 1e-12);
        gene.scale_expression(-2.0);
        assert_eq!(gene.expression_level(), 0.0);
        gene.set_expression(f64::NAN);
        assert_eq!(gene.expression_level(), 0.0);
    }

    #[test]
    fn test_insert_and_remove_keep_parity() {
        let mut gene = Gene::with_methylation("x", vec![1.0, 2.0], vec![false, false]);
        gene.insert_locus(1, 9.0, true);
        assert_eq!(gene.sequence(), &[1.0, 9.0, 2.0]);
        assert_eq!(gene.methylation_pattern(), &[false, true, false]);

        assert!(gene.remove_locus(0));
        assert!(gene.remove_locus(0));
        assert!(!gene.remove_locus(0), "last locus must survive");
        assert_eq!(gene.len(), 1);
        assert_eq!(gene.methylation_pattern().len(), 1);
    }

    #[test]
    fn test_set_sequence_resizes_methylation() {
        let mut gene = Gene::with_methylation("x", vec![1.0], vec![true]);
        gene.set_sequence(vec![1.0, 2.0, 3.0]);
        assert_eq!(gene.methylation_pattern(), &[true, false, false]);
        gene.set_sequence(vec![4.0]);
        assert_eq!(gene.methylation_pattern(), &[true]);
    }

    #[test]
    fn test_methylation_ratio_and_stats() {
        let gene = Gene::with_methylation("x", vec![1.0, 3.0], vec![true, false]);
        assert!((gene.methylation_ratio() - 0.5).abs() < 1e-12);
        assert!((gene.mean_value() - 2.0).abs() < 1e-12);
        assert!((gene.std_dev() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_repairs_invariants() {
        let json = r#"{"name":"g","sequence":[1.0,2.0],"expression_level":4.2,"methylation_pattern":[true]}"#;
        let gene: Gene = serde_json::from_str(json).unwrap();
        assert_eq!(gene.methylation_pattern(), &[true, false]);
        assert!((gene.expression_level() - 1.0).abs() < 1e-12);
        assert!(gene.dominant);
    }
}
