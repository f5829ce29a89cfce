//! Genome — chromosomes, lineage metadata and the three regulatory subsystems
//!
//! Genes are looked up by name across chromosomes in key order; when paralogs
//! share a name the first chromosome wins, consistently for every lookup.

use super::{founder_chromosomes, founder_lineage_id, Chromosome, Gene};
use crate::config::GeneticsConfig;
use crate::evolution::{self, MutagenicFactors, MutationEvent, Phenotype};
use crate::regulation::{EpigeneticController, EvolutionaryConstraints, NetworkEvolution};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Chromosome name → chromosome
pub type ChromosomeMap = BTreeMap<String, Chromosome>;

/// Events inspected when recomputing genome stability
const STABILITY_WINDOW: usize = 10;

/// A complete heritable genome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    pub chromosomes: ChromosomeMap,
    /// Increases by one per recombination
    pub generation: u64,
    pub lineage_id: String,
    /// Lineage ids of the two parents (empty for founders)
    pub parent_lineages: Vec<String>,
    mutation_rate: f64,
    pub genome_stability: f64,
    /// Fraction of genes with negative fitness contribution
    pub mutational_load: f64,
    /// Fraction of silenced genes available for later activation
    pub adaptive_potential: f64,
    /// Executed mutations, oldest first (bounded by `mutation.history_limit`)
    pub evolutionary_history: Vec<MutationEvent>,
    pub epigenetics: EpigeneticController,
    pub constraints: EvolutionaryConstraints,
    pub network: NetworkEvolution,
    pub config: GeneticsConfig,
}

impl Genome {
    /// Founder genome with default configuration and the thread-local rng
    pub fn founder() -> Self {
        Self::founder_with(GeneticsConfig::default(), &mut rand::thread_rng())
    }

    /// Founder genome with the given configuration and randomness source
    pub fn founder_with<R: Rng>(config: GeneticsConfig, rng: &mut R) -> Self {
        let chromosomes = founder_chromosomes(rng);
        Self::from_chromosomes(chromosomes, config, rng)
    }

    /// Found a genome on an explicit chromosome set
    pub fn from_chromosomes<R: Rng>(
        chromosomes: ChromosomeMap,
        config: GeneticsConfig,
        rng: &mut R,
    ) -> Self {
        let mut network = NetworkEvolution::new();
        network.build_interaction_network(&chromosomes);
        let lineage_id = founder_lineage_id(rng);
        let epigenetics = EpigeneticController::new(config.epigenetics.clone());
        let genome = Self::from_parts(chromosomes, config, lineage_id, epigenetics, network, rng);
        info!("Founded genome {}", genome.summary());
        genome
    }

    /// Assemble a generation-0 genome around already-built subsystems
    pub(crate) fn from_parts<R: Rng>(
        chromosomes: ChromosomeMap,
        config: GeneticsConfig,
        lineage_id: String,
        epigenetics: EpigeneticController,
        network: NetworkEvolution,
        rng: &mut R,
    ) -> Self {
        Self {
            chromosomes,
            generation: 0,
            lineage_id,
            parent_lineages: Vec::new(),
            mutation_rate: config.mutation.base_rate.max(config.mutation.min_rate),
            genome_stability: 1.0,
            mutational_load: 0.0,
            adaptive_potential: rng.gen_range(0.5..1.0),
            evolutionary_history: Vec::new(),
            epigenetics,
            constraints: EvolutionaryConstraints::new(config.constraints.clone()),
            network,
            config,
        }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Set the base mutation rate, floored at the configured minimum
    pub fn set_mutation_rate(&mut self, rate: f64) {
        let floor = self.config.mutation.min_rate;
        self.mutation_rate = if rate.is_nan() { floor } else { rate.max(floor) };
    }

    /// First gene with this name, in chromosome key order
    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.chromosomes.values().find_map(|c| c.gene(name))
    }

    pub fn gene_mut(&mut self, name: &str) -> Option<&mut Gene> {
        self.chromosomes.values_mut().find_map(|c| c.gene_mut(name))
    }

    /// Name of the chromosome holding the gene `gene(name)` resolves to
    pub fn locate_gene(&self, name: &str) -> Option<&str> {
        self.chromosomes
            .iter()
            .find(|(_, c)| c.genes.contains_key(name))
            .map(|(k, _)| k.as_str())
    }

    /// Every gene, including paralogs that share a name
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.chromosomes.values().flat_map(|c| c.genes.values())
    }

    /// Name → gene view with the same resolution as `gene()`
    pub fn all_genes(&self) -> BTreeMap<&str, &Gene> {
        let mut all = BTreeMap::new();
        for gene in self.genes() {
            all.entry(gene.name.as_str()).or_insert(gene);
        }
        all
    }

    pub fn all_gene_names(&self) -> BTreeSet<String> {
        self.genes().map(|g| g.name.clone()).collect()
    }

    pub fn total_genes(&self) -> usize {
        self.chromosomes.values().map(Chromosome::len).sum()
    }

    pub fn chromosome_count(&self) -> usize {
        self.chromosomes.len()
    }

    /// The last `window` recorded mutation events
    pub fn recent_history(&self, window: usize) -> &[MutationEvent] {
        let start = self.evolutionary_history.len().saturating_sub(window);
        &self.evolutionary_history[start..]
    }

    /// Append an executed event, dropping the oldest beyond `mutation.history_limit`
    pub fn record_event(&mut self, event: MutationEvent) {
        self.evolutionary_history.push(event);
        if let Some(limit) = self.config.mutation.history_limit {
            let excess = self.evolutionary_history.len().saturating_sub(limit.max(1));
            self.evolutionary_history.drain(..excess);
        }
    }

    /// Recompute mutational load, adaptive potential and stability
    pub fn update_genome_metrics(&mut self) {
        let total = self.total_genes().max(1) as f64;
        let deleterious = self.genes().filter(|g| g.fitness_contribution < 0.0).count();
        let silent = self.genes().filter(|g| g.expression_level() < 0.1).count();
        self.mutational_load = deleterious as f64 / total;
        self.adaptive_potential = silent as f64 / total;

        let recent = self
            .recent_history(STABILITY_WINDOW)
            .iter()
            .filter(|e| e.executed)
            .count();
        self.genome_stability = (1.0 - recent as f64 * 0.1).max(0.0);
    }

    /// One mutation tick: see [`evolution::advanced_mutation`]
    pub fn advanced_mutation<R: Rng>(
        &mut self,
        environmental_pressure: f64,
        mutagenic_factors: &MutagenicFactors,
        rng: &mut R,
    ) -> Vec<MutationEvent> {
        evolution::advanced_mutation(self, environmental_pressure, mutagenic_factors, rng)
    }

    pub fn apply_environmental_regulation(&mut self, environmental_stress: f64) {
        self.epigenetics
            .apply_environmental_regulation(&mut self.chromosomes, environmental_stress);
    }

    pub fn evolve_network<R: Rng>(&mut self, rng: &mut R) {
        self.network.evolve_network_properties(&mut self.chromosomes, rng);
    }

    pub fn phenotype(&self) -> Phenotype {
        evolution::get_phenotype(self)
    }

    pub fn distance_to(&self, other: &Genome) -> f64 {
        evolution::calculate_genetic_distance(self, other)
    }

    pub fn summary(&self) -> String {
        format!(
            "Genome '{}' | gen={} | chromosomes={} | genes={} | rate={:.4} | stability={:.2} | load={:.2} | potential={:.2}",
            self.lineage_id,
            self.generation,
            self.chromosomes.len(),
            self.total_genes(),
            self.mutation_rate,
            self.genome_stability,
            self.mutational_load,
            self.adaptive_potential,
        )
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self::founder()
    }
}
