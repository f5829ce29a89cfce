//! Sexual recombination of two parent genomes
//!
//! Parents are only read. The child gets the union of both chromosome sets,
//! homologous chromosomes and genes recombined, inherited epigenetic
//! memory and network, and one de novo mutation tick at low pressure.

use super::MutagenicFactors;
use crate::error::{GenomeError, Result};
use crate::genome::{child_lineage_id, Chromosome, ChromosomeMap, Gene, Genome};
use crate::regulation::{EpigeneticController, NetworkEvolution};
use log::info;
use rand::Rng;
use std::collections::BTreeSet;

pub const DEFAULT_RECOMBINATION_RATE: f64 = 0.5;

/// Pressure of the de novo mutation tick applied to every child
const DE_NOVO_PRESSURE: f64 = 0.1;

/// Produce one child of `parent1` and `parent2`.
///
/// `recombination_rate` is the per-locus probability of copying a locus
/// verbatim from one parent instead of blending both.
pub fn advanced_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    recombination_rate: f64,
    rng: &mut R,
) -> Result<Genome> {
    if !recombination_rate.is_finite() || !(0.0..=1.0).contains(&recombination_rate) {
        return Err(GenomeError::InvalidArgument(format!(
            "recombination rate must be in [0, 1], got {}",
            recombination_rate
        )));
    }
    for (label, parent) in [("parent1", parent1), ("parent2", parent2)] {
        if parent.chromosomes.is_empty() {
            return Err(GenomeError::InvalidArgument(format!(
                "{} '{}' has no chromosomes",
                label, parent.lineage_id
            )));
        }
    }

    let keys: BTreeSet<&String> = parent1.chromosomes.keys().chain(parent2.chromosomes.keys()).collect();
    let mut chromosomes = ChromosomeMap::new();
    for key in keys {
        let chromosome = match (parent1.chromosomes.get(key), parent2.chromosomes.get(key)) {
            (Some(c1), Some(c2)) => recombine_chromosomes(c1, c2, recombination_rate, rng),
            (Some(c), None) | (None, Some(c)) => c.clone(),
            (None, None) => continue,
        };
        chromosomes.insert(key.clone(), chromosome);
    }

    let config = parent1.config.clone();
    let epigenetics = EpigeneticController::inherit(
        &parent1.epigenetics,
        &parent2.epigenetics,
        config.epigenetics.clone(),
    );
    let network = NetworkEvolution::inherit(&parent1.network, &parent2.network, &chromosomes, rng);
    let lineage_id = child_lineage_id(&parent1.lineage_id, &parent2.lineage_id);
    let mut child = Genome::from_parts(chromosomes, config, lineage_id, epigenetics, network, rng);
    child.generation = parent1.generation.max(parent2.generation) + 1;
    child.parent_lineages = vec![parent1.lineage_id.clone(), parent2.lineage_id.clone()];

    child.advanced_mutation(DE_NOVO_PRESSURE, &MutagenicFactors::new(), rng);
    info!(
        "Crossover {} x {} -> {} (generation {}, {} genes)",
        parent1.lineage_id,
        parent2.lineage_id,
        child.lineage_id,
        child.generation,
        child.total_genes()
    );
    Ok(child)
}

fn recombine_chromosomes<R: Rng>(c1: &Chromosome, c2: &Chromosome, rate: f64, rng: &mut R) -> Chromosome {
    let mut child = Chromosome {
        genes: Default::default(),
        centromere_position: (c1.centromere_position + c2.centromere_position) / 2.0,
        telomere_length: (c1.telomere_length + c2.telomere_length) / 2.0,
        chromatin_state: if rng.gen_bool(0.5) { c1.chromatin_state } else { c2.chromatin_state },
        structural_variants: c1.structural_variants.clone(),
    };

    let names: BTreeSet<&String> = c1.genes.keys().chain(c2.genes.keys()).collect();
    for name in names {
        let gene = match (c1.gene(name), c2.gene(name)) {
            (Some(g1), Some(g2)) => recombine_genes(g1, g2, rate, rng),
            (Some(g), None) | (None, Some(g)) => g.clone(),
            (None, None) => continue,
        };
        child.add_gene(gene);
    }
    child
}

/// Recombine two alleles of the same gene
pub fn recombine_genes<R: Rng>(gene1: &Gene, gene2: &Gene, rate: f64, rng: &mut R) -> Gene {
    let (e1, e2) = (gene1.expression_level(), gene2.expression_level());
    let mut child = if e1 >= e2 { gene1.clone() } else { gene2.clone() };

    if gene1.len() == gene2.len() {
        let w1 = e1 / (e1 + e2 + 1e-6);
        let sequence = gene1
            .sequence()
            .iter()
            .zip(gene2.sequence())
            .map(|(&a, &b)| {
                if rng.gen::<f64>() < rate {
                    if rng.gen_bool(0.5) {
                        a
                    } else {
                        b
                    }
                } else {
                    a * w1 + b * (1.0 - w1)
                }
            })
            .collect();
        child.set_sequence(sequence);
    }

    let expression = match (gene1.dominant, gene2.dominant) {
        (true, false) => e1,
        (false, true) => e2,
        _ => (e1 + e2) / 2.0,
    };
    child.set_expression(expression);
    child.interaction_partners = gene1
        .interaction_partners
        .union(&gene2.interaction_partners)
        .cloned()
        .collect();
    child.fitness_contribution = (gene1.fitness_contribution + gene2.fitness_contribution) / 2.0;
    child
}
