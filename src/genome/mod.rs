//! Genome data model — genes, chromosomes and the genome that owns them
//!
//! A genome exclusively owns its chromosomes, which exclusively own their
//! genes. Cross-gene references (interaction partners, regulatory sites)
//! are plain names resolved through the owning genome.

mod chromosome;
mod founder;
mod gene;
mod lineage;
mod organism;

pub use chromosome::{ChromatinState, Chromosome};
pub use founder::founder_chromosomes;
pub use gene::{Gene, GeneExpression};
pub use lineage::{child_lineage_id, founder_lineage_id};
pub use organism::{ChromosomeMap, Genome};
