//! Regulatory subsystems owned by every genome
//!
//! - **Epigenetics**: stress-driven expression regulation with environmental memory
//! - **Constraints**: feasibility scoring of proposed mutations
//! - **Network**: evolution of the gene-interaction graph

mod constraints;
mod epigenetic;
mod network;

pub use constraints::{EvolutionaryConstraints, FunctionCategory};
pub use epigenetic::{EnvironmentalMemory, EpigeneticController};
pub use network::NetworkEvolution;
