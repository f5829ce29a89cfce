//! EvolutionaryConstraints — feasibility scoring of proposed mutations
//!
//! Feasibility is the product of three independent factors:
//! developmental (essential genes resist deletion), phylogenetic (recent
//! history resists repeating the same kind) and functional (protected
//! functions resist being deleted or silenced).

use crate::config::ConstraintSettings;
use crate::evolution::{MutationProposal, MutationType};
use crate::genome::Genome;
use serde::{Deserialize, Serialize};

/// Functions a genome may not lose cheaply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FunctionCategory {
    Metabolism,
    Reproduction,
    Survival,
}

const DEVELOPMENTAL_PENALTY: f64 = 0.1;
const PHYLOGENETIC_PENALTY: f64 = 0.5;
const FUNCTIONAL_PENALTY: f64 = 0.2;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionaryConstraints {
    settings: ConstraintSettings,
}

impl EvolutionaryConstraints {
    pub fn new(settings: ConstraintSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConstraintSettings {
        &self.settings
    }

    /// Probability in [0, 1] that the proposal is allowed to execute
    pub fn evaluate_mutation_feasibility(&self, genome: &Genome, proposal: &MutationProposal) -> f64 {
        let score = self.developmental(proposal) * self.phylogenetic(genome, proposal) * self.functional(proposal);
        score.clamp(0.0, 1.0)
    }

    /// Protected function a gene is tagged with, by name keyword
    pub fn classify_function(&self, gene_name: &str) -> Option<FunctionCategory> {
        self.settings
            .protected_functions
            .iter()
            .find(|f| f.keywords.iter().any(|k| gene_name.contains(k.as_str())))
            .map(|f| f.category)
    }

    /// Essential genes are flagged by name keyword
    pub fn is_essential(&self, gene_name: &str) -> bool {
        self.settings
            .essential_keywords
            .iter()
            .any(|k| gene_name.contains(k.as_str()))
    }

    fn developmental(&self, proposal: &MutationProposal) -> f64 {
        if proposal.kind == MutationType::Deletion && self.is_essential(&proposal.target_gene) {
            DEVELOPMENTAL_PENALTY
        } else {
            1.0
        }
    }

    fn phylogenetic(&self, genome: &Genome, proposal: &MutationProposal) -> f64 {
        let similar = genome
            .recent_history(self.settings.history_window)
            .iter()
            .filter(|e| e.kind == proposal.kind)
            .count();
        if similar > self.settings.similar_limit {
            PHYLOGENETIC_PENALTY
        } else {
            1.0
        }
    }

    fn functional(&self, proposal: &MutationProposal) -> f64 {
        let loses_function = matches!(proposal.kind, MutationType::Deletion | MutationType::Epigenetic);
        if loses_function && proposal.affects_function.is_some() {
            FUNCTIONAL_PENALTY
        } else {
            1.0
        }
    }
}
