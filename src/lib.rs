//! genome-core — evolutionary genome engine
//!
//! Heritable genomes as multi-chromosome structures subject to mutation,
//! epigenetic regulation, constrained evolution, gene-interaction network
//! evolution, sexual recombination and phenotype derivation.

pub mod config;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod regulation;

pub use config::GeneticsConfig;
pub use error::{GenomeError, Result};
pub use evolution::{
    advanced_crossover, advanced_mutation, calculate_genetic_distance, get_phenotype,
    MutagenicFactors, MutationEvent, MutationType, Phenotype,
};
pub use genome::{Chromosome, Gene, Genome};
