//! Chromosome — a named container of uniquely-named genes

use super::Gene;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Packing state of the chromatin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromatinState {
    Euchromatin,
    Heterochromatin,
}

/// Ordered collection of genes plus structural metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    /// Gene name → gene (names unique per chromosome)
    pub genes: BTreeMap<String, Gene>,
    /// Relative centromere position in [0, 1]
    pub centromere_position: f64,
    pub telomere_length: f64,
    pub chromatin_state: ChromatinState,
    /// Opaque structural records (no operator reads them yet)
    pub structural_variants: Vec<serde_json::Value>,
}

impl Default for Chromosome {
    fn default() -> Self {
        Self {
            genes: BTreeMap::new(),
            centromere_position: 0.5,
            telomere_length: 1.0,
            chromatin_state: ChromatinState::Euchromatin,
            structural_variants: Vec::new(),
        }
    }
}

impl Chromosome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a gene under its own name, replacing any gene of that name
    pub fn add_gene(&mut self, gene: Gene) {
        self.genes.insert(gene.name.clone(), gene);
    }

    /// Insert a gene, renaming it with a numeric suffix if its name is taken.
    /// Returns the name it was stored under.
    pub fn add_gene_unique(&mut self, mut gene: Gene) -> String {
        let name = self.unique_name(&gene.name);
        gene.name = name.clone();
        self.genes.insert(name.clone(), gene);
        name
    }

    /// `base` if free, otherwise `base_2`, `base_3`, ...
    pub fn unique_name(&self, base: &str) -> String {
        if !self.genes.contains_key(base) {
            return base.to_string();
        }
        (2..)
            .map(|i| format!("{}_{}", base, i))
            .find(|candidate| !self.genes.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.genes.get(name)
    }

    pub fn gene_mut(&mut self, name: &str) -> Option<&mut Gene> {
        self.genes.get_mut(name)
    }

    /// Genes with expression above the phenotype threshold
    pub fn active_genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values().filter(|g| g.is_expressed())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(name: &str, expression: f64) -> Gene {
        Gene::with_methylation(name, vec![1.0], vec![false]).with_expression(expression)
    }

    #[test]
    fn test_default_structure() {
        let chrom = Chromosome::new();
        assert!(chrom.is_empty());
        assert!((chrom.centromere_position - 0.5).abs() < 1e-12);
        assert_eq!(chrom.chromatin_state, ChromatinState::Euchromatin);
    }

    #[test]
    fn test_unique_names() {
        let mut chrom = Chromosome::new();
        assert_eq!(chrom.add_gene_unique(gene("a", 1.0)), "a");
        assert_eq!(chrom.add_gene_unique(gene("a", 1.0)), "a_2");
        assert_eq!(chrom.add_gene_unique(gene("a", 1.0)), "a_3");
        assert_eq!(chrom.len(), 3);
        assert_eq!(chrom.gene("a_2").map(|g| g.name.as_str()), Some("a_2"));
    }

    #[test]
    fn test_active_genes() {
        let mut chrom = Chromosome::new();
        chrom.add_gene(gene("on", 0.5));
        chrom.add_gene(gene("off", 0.05));
        let active: Vec<&str> = chrom.active_genes().map(|g| g.name.as_str()).collect();
        assert_eq!(active, vec!["on"]);
    }
}
