//! Evolution operators — free functions over genomes
//!
//! - **Mutation**: adaptive, constraint-checked mutation ticks (nine kinds)
//! - **Recombination**: two parents → one child
//! - **Phenotype**: category/trait projection of expressed genes
//! - **Distance**: genetic distance for clustering and speciation

mod distance;
mod mutation;
mod phenotype;
mod recombination;

pub use distance::{calculate_genetic_distance, epigenetic_distance, sequence_distance};
pub use mutation::{
    adjusted_mutation_rate, advanced_mutation, attempt_mutation, execute_mutation, mutation_weights,
    propose_mutation, select_mutation_type, MutagenicFactors, MutationEffects, MutationEvent, MutationProposal,
    MutationType, HIGH_PRESSURE,
};
pub use phenotype::{get_phenotype, Phenotype, ENERGY_BUDGET, ENERGY_COST_PER_UNIT, PHENOTYPE_CATEGORIES};
pub use recombination::{advanced_crossover, recombine_genes, DEFAULT_RECOMBINATION_RATE};
