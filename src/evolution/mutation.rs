//! Mutation engine — one adaptive, constraint-checked mutation per tick
//!
//! A tick draws against the adjusted rate, picks a kind by weighted choice,
//! targets a random gene, and asks the genome's constraints whether the
//! proposal may proceed. Epigenetic regulation and network evolution then
//! run on every tick whether or not anything mutated.

use crate::genome::{Chromosome, Genome};
use crate::regulation::FunctionCategory;
use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The nine mutation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Perturb one locus
    Point,
    /// Insert a locus
    Insertion,
    /// Remove a locus (never the last one)
    Deletion,
    /// Copy the gene within its chromosome
    Duplication,
    Inversion,
    Translocation,
    /// Flip methylation bits and re-derive expression
    Epigenetic,
    /// Copy a gene between chromosomes
    HorizontalTransfer,
    /// Copy a whole chromosome
    Polyploidy,
}

impl MutationType {
    pub const ALL: [MutationType; 9] = [
        MutationType::Point,
        MutationType::Insertion,
        MutationType::Deletion,
        MutationType::Duplication,
        MutationType::Inversion,
        MutationType::Translocation,
        MutationType::Epigenetic,
        MutationType::HorizontalTransfer,
        MutationType::Polyploidy,
    ];

    /// Selection weight before pressure adjustment (not normalised)
    pub fn base_weight(self) -> f64 {
        match self {
            MutationType::Point => 0.6,
            MutationType::Insertion => 0.1,
            MutationType::Deletion => 0.05,
            MutationType::Duplication => 0.08,
            MutationType::Inversion => 0.03,
            MutationType::Translocation => 0.0,
            MutationType::Epigenetic => 0.1,
            MutationType::HorizontalTransfer => 0.02,
            MutationType::Polyploidy => 0.01,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MutationType::Point => "point",
            MutationType::Insertion => "insertion",
            MutationType::Deletion => "deletion",
            MutationType::Duplication => "duplication",
            MutationType::Inversion => "inversion",
            MutationType::Translocation => "translocation",
            MutationType::Epigenetic => "epigenetic",
            MutationType::HorizontalTransfer => "horizontal_transfer",
            MutationType::Polyploidy => "polyploidy",
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named external mutagens and their intensities, recorded with each event
pub type MutagenicFactors = BTreeMap<String, f64>;

/// Pressure above which duplication, epigenetic change and transfer are favoured
pub const HIGH_PRESSURE: f64 = 0.7;

/// A mutation awaiting the feasibility check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationProposal {
    pub kind: MutationType,
    pub target_chromosome: String,
    pub target_gene: String,
    /// Protected function the target gene is tagged with, if any
    pub affects_function: Option<FunctionCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationEffects {
    pub fitness_change: f64,
    /// Target expression after the mutation minus before
    pub expression_change: f64,
}

/// Record of one executed mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEvent {
    pub id: Uuid,
    pub kind: MutationType,
    pub target_chromosome: String,
    pub target_gene: String,
    pub timestamp: DateTime<Utc>,
    pub mutagenic_factors: MutagenicFactors,
    /// Passed the feasibility check and ran
    pub executed: bool,
    /// The operator changed the genome (false for no-op kinds and refused edits)
    pub applied: bool,
    pub effects: MutationEffects,
}

impl MutationEvent {
    pub fn from_proposal(proposal: &MutationProposal, factors: &MutagenicFactors) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: proposal.kind,
            target_chromosome: proposal.target_chromosome.clone(),
            target_gene: proposal.target_gene.clone(),
            timestamp: Utc::now(),
            mutagenic_factors: factors.clone(),
            executed: true,
            applied: false,
            effects: MutationEffects::default(),
        }
    }
}

fn sanitize_pressure(pressure: f64) -> f64 {
    if pressure.is_nan() {
        0.0
    } else {
        pressure.clamp(0.0, 1.0)
    }
}

/// Per-tick mutation probability for the genome under `pressure`
pub fn adjusted_mutation_rate(genome: &Genome, pressure: f64) -> f64 {
    let pressure = sanitize_pressure(pressure);
    let stress_multiplier = 1.0 + 2.0 * pressure;
    let load_reducer = (1.0 - genome.mutational_load).max(0.1);
    let adaptation_booster = 1.0 + 0.5 * (1.0 - genome.adaptive_potential);
    genome.mutation_rate() * stress_multiplier * load_reducer * adaptation_booster
}

/// Normalised selection weights, in `MutationType::ALL` order
pub fn mutation_weights(pressure: f64) -> Vec<(MutationType, f64)> {
    let high = sanitize_pressure(pressure) > HIGH_PRESSURE;
    let raw: Vec<(MutationType, f64)> = MutationType::ALL
        .iter()
        .map(|&kind| {
            let boost = match kind {
                MutationType::Duplication if high => 2.0,
                MutationType::Epigenetic if high => 3.0,
                MutationType::HorizontalTransfer if high => 1.5,
                _ => 1.0,
            };
            (kind, kind.base_weight() * boost)
        })
        .collect();
    let total: f64 = raw.iter().map(|(_, w)| w).sum();
    raw.into_iter().map(|(kind, w)| (kind, w / total)).collect()
}

pub fn select_mutation_type<R: Rng>(pressure: f64, rng: &mut R) -> MutationType {
    let weights = mutation_weights(pressure);
    match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(_) => MutationType::Point,
    }
}

/// Target a random gene of a random chromosome. `None` when the chosen
/// chromosome has no genes.
pub fn propose_mutation<R: Rng>(genome: &Genome, kind: MutationType, rng: &mut R) -> Option<MutationProposal> {
    let (chrom_name, chrom) = genome.chromosomes.iter().choose(rng)?;
    let gene_name = chrom.genes.keys().choose(rng)?;
    Some(MutationProposal {
        kind,
        target_chromosome: chrom_name.clone(),
        target_gene: gene_name.clone(),
        affects_function: genome.constraints.classify_function(gene_name),
    })
}

/// Run the proposal's operator, refresh the metrics and record the event.
/// The metrics do not yet count this event. `None` when the target no
/// longer exists.
pub fn execute_mutation<R: Rng>(
    genome: &mut Genome,
    proposal: &MutationProposal,
    factors: &MutagenicFactors,
    rng: &mut R,
) -> Option<MutationEvent> {
    let chrom_key = proposal.target_chromosome.as_str();
    let gene_name = proposal.target_gene.as_str();
    let expression_before = genome.chromosomes.get(chrom_key)?.gene(gene_name)?.expression_level();

    let applied = match proposal.kind {
        MutationType::Point => point_mutation(genome, chrom_key, gene_name, rng),
        MutationType::Insertion => insertion_mutation(genome, chrom_key, gene_name, rng),
        MutationType::Deletion => deletion_mutation(genome, chrom_key, gene_name, rng),
        MutationType::Duplication => duplication_mutation(genome, chrom_key, gene_name, rng),
        MutationType::Epigenetic => epigenetic_mutation(genome, chrom_key, gene_name, rng),
        MutationType::HorizontalTransfer => horizontal_transfer(genome, rng),
        MutationType::Polyploidy => polyploidy(genome, rng),
        MutationType::Inversion | MutationType::Translocation => {
            debug!("{} has no operator; recorded without effect", proposal.kind);
            false
        }
    };

    let gene = genome.chromosomes.get_mut(chrom_key)?.gene_mut(gene_name)?;
    gene.evolutionary_age += 1;
    let effects = MutationEffects {
        fitness_change: gene.fitness_contribution * gene.std_dev() * rng.gen_range(-0.1..0.1),
        expression_change: gene.expression_level() - expression_before,
    };

    let mut event = MutationEvent::from_proposal(proposal, factors);
    event.applied = applied;
    event.effects = effects;
    genome.update_genome_metrics();
    genome.record_event(event.clone());

    debug!(
        "Mutation {} on {}/{} (applied={})",
        event.kind, event.target_chromosome, event.target_gene, applied
    );
    Some(event)
}

/// Draw against the proposal's feasibility and execute it on success.
/// A rejected proposal leaves the genome untouched.
pub fn attempt_mutation<R: Rng>(
    genome: &mut Genome,
    proposal: &MutationProposal,
    factors: &MutagenicFactors,
    rng: &mut R,
) -> Option<MutationEvent> {
    let feasibility = genome.constraints.evaluate_mutation_feasibility(genome, proposal);
    if rng.gen::<f64>() < feasibility {
        return execute_mutation(genome, proposal, factors, rng);
    }
    trace!(
        "Rejected {} on {} (feasibility {:.2})",
        proposal.kind,
        proposal.target_gene,
        feasibility
    );
    None
}

/// One mutation tick: returns the executed events (zero or one)
pub fn advanced_mutation<R: Rng>(
    genome: &mut Genome,
    environmental_pressure: f64,
    mutagenic_factors: &MutagenicFactors,
    rng: &mut R,
) -> Vec<MutationEvent> {
    let pressure = sanitize_pressure(environmental_pressure);
    let mut events = Vec::new();

    if rng.gen::<f64>() < adjusted_mutation_rate(genome, pressure) {
        let kind = select_mutation_type(pressure, rng);
        if let Some(proposal) = propose_mutation(genome, kind, rng) {
            events.extend(attempt_mutation(genome, &proposal, mutagenic_factors, rng));
        }
    }

    genome.apply_environmental_regulation(pressure);
    genome.evolve_network(rng);
    events
}

fn point_mutation<R: Rng>(genome: &mut Genome, chrom: &str, name: &str, rng: &mut R) -> bool {
    let Some(gene) = genome.chromosomes.get_mut(chrom).and_then(|c| c.gene_mut(name)) else {
        return false;
    };
    let index = rng.gen_range(0..gene.len());
    gene.nudge_locus(index, rng.gen_range(-0.2..0.2), -2.0, 2.0);
    true
}

fn insertion_mutation<R: Rng>(genome: &mut Genome, chrom: &str, name: &str, rng: &mut R) -> bool {
    let Some(gene) = genome.chromosomes.get_mut(chrom).and_then(|c| c.gene_mut(name)) else {
        return false;
    };
    let index = rng.gen_range(0..=gene.len());
    gene.insert_locus(index, rng.gen_range(-1.0..1.0), rng.gen_bool(0.5));
    true
}

fn deletion_mutation<R: Rng>(genome: &mut Genome, chrom: &str, name: &str, rng: &mut R) -> bool {
    let Some(gene) = genome.chromosomes.get_mut(chrom).and_then(|c| c.gene_mut(name)) else {
        return false;
    };
    if gene.len() <= 1 {
        return false;
    }
    let index = rng.gen_range(0..gene.len());
    gene.remove_locus(index)
}

fn duplication_mutation<R: Rng>(genome: &mut Genome, chrom: &str, name: &str, rng: &mut R) -> bool {
    let Some(chromosome) = genome.chromosomes.get_mut(chrom) else {
        return false;
    };
    let Some(gene) = chromosome.gene(name) else {
        return false;
    };
    let mut copy = gene.renamed(format!("{}_dup_{}", name, chromosome.len()));
    copy.scale_expression(rng.gen_range(0.5..1.5));
    chromosome.add_gene_unique(copy);
    true
}

fn epigenetic_mutation<R: Rng>(genome: &mut Genome, chrom: &str, name: &str, rng: &mut R) -> bool {
    let Some(gene) = genome.chromosomes.get_mut(chrom).and_then(|c| c.gene_mut(name)) else {
        return false;
    };
    for index in 0..gene.methylation_pattern().len() {
        if rng.gen_bool(0.1) {
            gene.flip_methylation(index);
        }
    }
    gene.set_expression((1.0 - gene.methylation_ratio() * 0.8).max(0.0));
    true
}

fn horizontal_transfer<R: Rng>(genome: &mut Genome, rng: &mut R) -> bool {
    if genome.chromosomes.len() < 2 {
        return false;
    }
    let Some(source) = genome.chromosomes.keys().choose(rng).cloned() else {
        return false;
    };
    let Some(target) = genome.chromosomes.keys().filter(|k| **k != source).choose(rng).cloned() else {
        return false;
    };
    let Some(gene) = genome.chromosomes[&source].genes.values().choose(rng) else {
        return false;
    };
    let mut copy = gene.renamed(format!("{}_transferred", gene.name));
    copy.scale_expression(rng.gen_range(0.3..0.8));
    match genome.chromosomes.get_mut(&target) {
        Some(chromosome) => {
            chromosome.add_gene_unique(copy);
            true
        }
        None => false,
    }
}

fn polyploidy<R: Rng>(genome: &mut Genome, rng: &mut R) -> bool {
    let limit = genome.config.mutation.max_chromosomes;
    if genome.chromosomes.len() >= limit {
        warn!("Polyploidy refused: genome already holds {} chromosomes", genome.chromosomes.len());
        return false;
    }
    let Some(key) = genome.chromosomes.keys().choose(rng).cloned() else {
        return false;
    };
    let source = &genome.chromosomes[&key];
    let mut copy = Chromosome {
        genes: BTreeMap::new(),
        ..source.clone()
    };
    for gene in source.genes.values() {
        let mut polyploid = gene.renamed(format!("{}_polyploid", gene.name));
        polyploid.scale_expression(rng.gen_range(0.7..1.3));
        copy.add_gene_unique(polyploid);
    }
    let new_key = unique_chromosome_key(genome, &format!("{}_duplicate", key));
    genome.chromosomes.insert(new_key, copy);
    true
}

fn unique_chromosome_key(genome: &Genome, base: &str) -> String {
    if !genome.chromosomes.contains_key(base) {
        return base.to_string();
    }
    (2..)
        .map(|i| format!("{}_{}", base, i))
        .find(|candidate| !genome.chromosomes.contains_key(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneticsConfig;
    use crate::genome::{ChromosomeMap, Gene};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn founder(seed: u64) -> Genome {
        Genome::founder_with(GeneticsConfig::default(), &mut StdRng::seed_from_u64(seed))
    }

    fn proposal(kind: MutationType, chrom: &str, gene: &str) -> MutationProposal {
        MutationProposal {
            kind,
            target_chromosome: chrom.into(),
            target_gene: gene.into(),
            affects_function: None,
        }
    }

    fn assert_invariants(genome: &Genome) {
        for gene in genome.genes() {
            assert_eq!(gene.sequence().len(), gene.methylation_pattern().len(), "{}", gene.name);
            assert!(!gene.is_empty());
            assert!((0.0..=1.0).contains(&gene.expression_level()), "{}", gene.name);
        }
        for metric in [genome.mutational_load, genome.adaptive_potential, genome.genome_stability] {
            assert!((0.0..=1.0).contains(&metric));
        }
    }

    #[test]
    fn test_weights_normalised_and_boosted() {
        let calm = mutation_weights(0.0);
        let total: f64 = calm.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(calm.len(), 9);

        fn weight(ws: &[(MutationType, f64)], kind: MutationType) -> f64 {
            ws.iter().find(|(m, _)| *m == kind).map(|(_, w)| *w).unwrap()
        }
        let stressed = mutation_weights(0.9);
        assert!(weight(&stressed, MutationType::Epigenetic) > weight(&calm, MutationType::Epigenetic));
        assert!(weight(&stressed, MutationType::Point) < weight(&calm, MutationType::Point));
        assert_eq!(weight(&calm, MutationType::Translocation), 0.0);
    }

    #[test]
    fn test_high_pressure_boost_ratios() {
        fn ratio(ws: &[(MutationType, f64)], kind: MutationType) -> f64 {
            let of = |k: MutationType| ws.iter().find(|(m, _)| *m == k).map(|(_, w)| *w).unwrap();
            of(kind) / of(MutationType::Point)
        }
        let calm = mutation_weights(0.5);
        let stressed = mutation_weights(0.9);
        for (kind, boost) in [
            (MutationType::Duplication, 2.0),
            (MutationType::Epigenetic, 3.0),
            (MutationType::HorizontalTransfer, 1.5),
            (MutationType::Insertion, 1.0),
            (MutationType::Polyploidy, 1.0),
        ] {
            let expected = boost * kind.base_weight() / MutationType::Point.base_weight();
            assert!((ratio(&stressed, kind) - expected).abs() < 1e-12, "{}", kind);
            assert!((ratio(&calm, kind) - expected / boost).abs() < 1e-12, "{}", kind);
        }
        // 0.7 itself is not high pressure
        assert_eq!(mutation_weights(HIGH_PRESSURE), mutation_weights(0.0));
    }

    #[test]
    fn test_regulation_and_network_run_without_mutation() {
        let mut rng = StdRng::seed_from_u64(52);
        let mut config = GeneticsConfig::default();
        config.mutation.base_rate = 1e-9;
        config.mutation.min_rate = 1e-9;
        let mut genome = Genome::founder_with(config, &mut rng);
        let defense = Gene::with_methylation("physique_robustesse_defense", vec![1.0; 4], vec![true; 4]);
        genome.chromosomes.get_mut("autosome_1").unwrap().add_gene(defense);
        genome.network.gene_networks.clear();

        for _ in 0..20 {
            assert!(genome.advanced_mutation(0.9, &MutagenicFactors::new(), &mut rng).is_empty());
        }
        assert!(genome.evolutionary_history.is_empty());
        assert_eq!(genome.epigenetics.environmental_memory.len(), 20);
        assert!(genome.network.edge_count() > 0);
        let defense = genome.gene("physique_robustesse_defense").unwrap();
        assert!(defense.methylation_pattern().iter().all(|m| !m));
    }

    #[test]
    fn test_rejected_proposal_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(53);
        let mut genome = founder(53);
        let target = Gene::with_methylation("essential_metabolism", vec![1.0; 8], vec![false; 8]);
        genome.chromosomes.get_mut("autosome_1").unwrap().add_gene(target);
        let mut p = proposal(MutationType::Deletion, "autosome_1", "essential_metabolism");
        p.affects_function = genome.constraints.classify_function("essential_metabolism");
        let feasibility = genome.constraints.evaluate_mutation_feasibility(&genome, &p);
        assert!((feasibility - 0.02).abs() < 1e-12);

        let mut rejected = 0;
        for _ in 0..200 {
            let chromosomes = serde_json::to_string(&genome.chromosomes).unwrap();
            let history = genome.evolutionary_history.len();
            let stability = genome.genome_stability;
            match attempt_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng) {
                Some(event) => assert_eq!(event.kind, MutationType::Deletion),
                None => {
                    rejected += 1;
                    assert_eq!(serde_json::to_string(&genome.chromosomes).unwrap(), chromosomes);
                    assert_eq!(genome.evolutionary_history.len(), history);
                    assert_eq!(genome.genome_stability, stability);
                }
            }
        }
        assert!(rejected >= 180, "only {} of 200 rejected", rejected);
    }

    #[test]
    fn test_selection_never_picks_zero_weight() {
        let mut rng = StdRng::seed_from_u64(41);
        for _ in 0..2000 {
            assert_ne!(select_mutation_type(0.5, &mut rng), MutationType::Translocation);
        }
    }

    #[test]
    fn test_adjusted_rate_formula() {
        let mut genome = founder(42);
        genome.set_mutation_rate(0.02);
        genome.mutational_load = 0.0;
        genome.adaptive_potential = 1.0;
        assert!((adjusted_mutation_rate(&genome, 0.0) - 0.02).abs() < 1e-12);

        genome.adaptive_potential = 0.0;
        assert!((adjusted_mutation_rate(&genome, 0.0) - 0.03).abs() < 1e-12);

        genome.adaptive_potential = 1.0;
        genome.mutational_load = 1.0;
        assert!((adjusted_mutation_rate(&genome, 1.0) - 0.02 * 3.0 * 0.1).abs() < 1e-12);
        // Out-of-range pressure is clamped
        assert!((adjusted_mutation_rate(&genome, 7.0) - adjusted_mutation_rate(&genome, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_point_mutation_clamped() {
        let mut rng = StdRng::seed_from_u64(43);
        let mut genome = founder(43);
        let gene = genome.gene_mut("physique_taille").unwrap();
        gene.set_sequence(vec![1.99]);
        let p = proposal(MutationType::Point, "autosome_1", "physique_taille");
        for _ in 0..50 {
            execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
        }
        let value = genome.gene("physique_taille").unwrap().sequence()[0];
        assert!((-2.0..=2.0).contains(&value));
        assert_eq!(genome.gene("physique_taille").unwrap().evolutionary_age, 50);
    }

    #[test]
    fn test_insertion_and_deletion_keep_parity() {
        let mut rng = StdRng::seed_from_u64(44);
        let mut genome = founder(44);
        let insert = proposal(MutationType::Insertion, "autosome_1", "physique_vitesse");
        let delete = proposal(MutationType::Deletion, "autosome_1", "physique_vitesse");
        for _ in 0..5 {
            execute_mutation(&mut genome, &insert, &MutagenicFactors::new(), &mut rng);
        }
        assert_eq!(genome.gene("physique_vitesse").unwrap().len(), 6);
        for _ in 0..10 {
            execute_mutation(&mut genome, &delete, &MutagenicFactors::new(), &mut rng);
        }
        let gene = genome.gene("physique_vitesse").unwrap();
        assert_eq!(gene.len(), 1, "deletion stops at one locus");
        assert_eq!(gene.methylation_pattern().len(), 1);
        let last = genome.evolutionary_history.last().unwrap();
        assert!(last.executed);
        assert!(!last.applied);
    }

    #[test]
    fn test_duplication_disambiguates() {
        let mut rng = StdRng::seed_from_u64(45);
        let mut genome = founder(45);
        let p = proposal(MutationType::Duplication, "autosome_1", "physique_taille");
        execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng);
        let chrom = &genome.chromosomes["autosome_1"];
        assert_eq!(chrom.len(), 6);
        assert!(chrom.gene("physique_taille_dup_5").is_some());
    }

    #[test]
    fn test_epigenetic_mutation_derives_expression() {
        let mut rng = StdRng::seed_from_u64(46);
        let mut genome = founder(46);
        let p = proposal(MutationType::Epigenetic, "sex_chromosome", "social_tribu_id");
        execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng);
        let gene = genome.gene("social_tribu_id").unwrap();
        let expected = (1.0 - gene.methylation_ratio() * 0.8).max(0.0);
        assert!((gene.expression_level() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_horizontal_transfer_needs_two_chromosomes() {
        let mut rng = StdRng::seed_from_u64(47);
        let mut chromosomes = ChromosomeMap::new();
        let mut chrom = Chromosome::new();
        chrom.add_gene(Gene::with_methylation("solo_gene", vec![1.0], vec![false]));
        chromosomes.insert("only".into(), chrom);
        let mut genome = Genome::from_chromosomes(chromosomes, GeneticsConfig::default(), &mut rng);
        let p = proposal(MutationType::HorizontalTransfer, "only", "solo_gene");
        let event = execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
        assert!(!event.applied);
        assert_eq!(genome.total_genes(), 1);

        let mut genome = founder(47);
        let p = proposal(MutationType::HorizontalTransfer, "autosome_1", "physique_taille");
        execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng);
        assert_eq!(genome.total_genes(), 21);
        assert!(genome.genes().any(|g| g.name.ends_with("_transferred")));
    }

    #[test]
    fn test_polyploidy_capped_at_six() {
        let mut rng = StdRng::seed_from_u64(48);
        let mut genome = founder(48);
        let p = proposal(MutationType::Polyploidy, "autosome_1", "physique_taille");
        for _ in 0..2 {
            let event = execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
            assert!(event.applied);
        }
        assert_eq!(genome.chromosome_count(), 6);
        let genes_before = genome.total_genes();

        let event = execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
        assert!(!event.applied);
        assert_eq!(genome.chromosome_count(), 6);
        assert_eq!(genome.total_genes(), genes_before);
        assert!(genome.chromosomes.keys().any(|k| k.ends_with("_duplicate")));
        assert!(genome.genes().any(|g| g.name.ends_with("_polyploid")));
        assert_invariants(&genome);
    }

    #[test]
    fn test_inversion_is_recorded_noop() {
        let mut rng = StdRng::seed_from_u64(49);
        let mut genome = founder(49);
        let before = genome.gene("physique_taille").unwrap().sequence().to_vec();
        let p = proposal(MutationType::Inversion, "autosome_1", "physique_taille");
        let event = execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
        assert!(!event.applied);
        assert_eq!(genome.gene("physique_taille").unwrap().sequence(), before.as_slice());
        assert_eq!(genome.evolutionary_history.len(), 1);
        assert!((genome.genome_stability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stability_lags_one_event() {
        let mut rng = StdRng::seed_from_u64(54);
        let mut genome = founder(54);
        let p = proposal(MutationType::Point, "autosome_1", "physique_taille");
        execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
        assert!((genome.genome_stability - 1.0).abs() < 1e-12);
        execute_mutation(&mut genome, &p, &MutagenicFactors::new(), &mut rng).unwrap();
        assert!((genome.genome_stability - 0.9).abs() < 1e-12);
        assert_eq!(genome.evolutionary_history.len(), 2);
    }

    #[test]
    fn test_hundred_ticks_under_pressure() {
        let mut rng = StdRng::seed_from_u64(50);
        let mut genome = founder(50);
        assert_eq!(genome.chromosome_count(), 4);
        for _ in 0..100 {
            genome.advanced_mutation(0.8, &MutagenicFactors::new(), &mut rng);
            assert_invariants(&genome);
        }
    }

    #[test]
    fn test_volatile_genome_mutates() {
        let mut rng = StdRng::seed_from_u64(51);
        let mut config = GeneticsConfig::volatile();
        config.mutation.base_rate = 0.5;
        let mut genome = Genome::founder_with(config, &mut rng);
        let mut factors = MutagenicFactors::new();
        factors.insert("uv".into(), 0.3);

        let mut executed = 0;
        for _ in 0..200 {
            let events = genome.advanced_mutation(0.9, &factors, &mut rng);
            assert!(events.len() <= 1);
            executed += events.len();
            assert_invariants(&genome);
        }
        assert!(executed > 0);
        assert_eq!(genome.evolutionary_history.len(), executed);
        assert!(genome.chromosome_count() <= 8);
        let event = genome.evolutionary_history.last().unwrap();
        assert_eq!(event.mutagenic_factors.get("uv"), Some(&0.3));
    }
}
