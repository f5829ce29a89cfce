//! NetworkEvolution — the gene-interaction graph
//!
//! The adjacency map is undirected and name-keyed. It is rebuilt (merge-only)
//! from the genes' partner sets and regulatory sites at the start of every
//! evolution step, then three passes run: connectivity, modularity and
//! robustness. Edits to gene partner sets are mirrored into the adjacency.

use crate::genome::{ChromosomeMap, Gene};
use log::trace;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-gene chance of gaining a partner in the connectivity pass
const GAIN_PROBABILITY: f64 = 0.05;
/// Per-gene chance of losing a partner (only with more than one)
const LOSS_PROBABILITY: f64 = 0.02;
/// Per ordered pair chance of reinforcing a module
const MODULE_PROBABILITY: f64 = 0.1;
/// Per critical gene chance of a redundant copy
const REDUNDANCY_PROBABILITY: f64 = 0.03;
/// Per inherited node chance of a novel edge
const INNOVATION_PROBABILITY: f64 = 0.05;

const CRITICAL_PARTNERS: usize = 5;
const CRITICAL_FITNESS: f64 = 0.7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkEvolution {
    /// Gene name → partner names (undirected)
    pub gene_networks: BTreeMap<String, BTreeSet<String>>,
    /// Regulator name → regulated gene → binding weight
    pub regulatory_networks: BTreeMap<String, BTreeMap<String, f64>>,
}

impl NetworkEvolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.gene_networks.entry(a.to_string()).or_default().insert(b.to_string());
        self.gene_networks.entry(b.to_string()).or_default().insert(a.to_string());
    }

    pub fn remove_edge(&mut self, a: &str, b: &str) {
        if let Some(partners) = self.gene_networks.get_mut(a) {
            partners.remove(b);
        }
        if let Some(partners) = self.gene_networks.get_mut(b) {
            partners.remove(a);
        }
    }

    pub fn neighbours(&self, gene: &str) -> Option<&BTreeSet<String>> {
        self.gene_networks.get(gene)
    }

    pub fn edge_count(&self) -> usize {
        self.gene_networks.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Merge every gene's partners and regulatory sites into the graph
    pub fn build_interaction_network(&mut self, chromosomes: &ChromosomeMap) {
        for gene in chromosomes.values().flat_map(|c| c.genes.values()) {
            for partner in &gene.interaction_partners {
                self.add_edge(&gene.name, partner);
            }
            for (regulator, &weight) in &gene.regulatory_sites {
                self.regulatory_networks
                    .entry(regulator.clone())
                    .or_default()
                    .insert(gene.name.clone(), weight);
                self.add_edge(regulator, &gene.name);
            }
        }
    }

    /// One network evolution step over the genome's chromosomes
    pub fn evolve_network_properties<R: Rng>(&mut self, chromosomes: &mut ChromosomeMap, rng: &mut R) {
        self.build_interaction_network(chromosomes);
        self.evolve_connectivity(chromosomes, rng);
        self.evolve_modularity(chromosomes, rng);
        self.evolve_robustness(chromosomes, rng);
        trace!("Network has {} edges", self.edge_count());
    }

    fn evolve_connectivity<R: Rng>(&mut self, chromosomes: &mut ChromosomeMap, rng: &mut R) {
        let keys: Vec<String> = chromosomes.keys().cloned().collect();
        for key in &keys {
            let names: Vec<String> = match chromosomes.get(key) {
                Some(chrom) => chrom.genes.keys().cloned().collect(),
                None => continue,
            };
            for name in &names {
                if rng.gen::<f64>() < GAIN_PROBABILITY {
                    let partner = chromosomes.get(key).and_then(|chrom| {
                        let gene = chrom.gene(name)?;
                        chrom
                            .genes
                            .keys()
                            .filter(|g| *g != name && !gene.interaction_partners.contains(*g))
                            .choose(rng)
                            .cloned()
                    });
                    if let Some(partner) = partner {
                        if let Some(gene) = chromosomes.get_mut(key).and_then(|c| c.gene_mut(name)) {
                            gene.interaction_partners.insert(partner.clone());
                        }
                        self.add_edge(name, &partner);
                    }
                }

                let partner_count = chromosomes
                    .get(key)
                    .and_then(|c| c.gene(name))
                    .map_or(0, |g| g.interaction_partners.len());
                if partner_count > 1 && rng.gen::<f64>() < LOSS_PROBABILITY {
                    let lost = chromosomes
                        .get(key)
                        .and_then(|c| c.gene(name))
                        .and_then(|g| g.interaction_partners.iter().choose(rng).cloned());
                    if let Some(lost) = lost {
                        if let Some(gene) = chromosomes.get_mut(key).and_then(|c| c.gene_mut(name)) {
                            gene.interaction_partners.remove(&lost);
                        }
                        if let Some(other) = first_gene_mut(chromosomes, &lost) {
                            other.interaction_partners.remove(name);
                        }
                        self.remove_edge(name, &lost);
                    }
                }
            }
        }
    }

    /// Connected components with more than one member, seeded from every gene name
    pub fn detect_functional_modules(&self, chromosomes: &ChromosomeMap) -> Vec<BTreeSet<String>> {
        let names: BTreeSet<&str> = chromosomes
            .values()
            .flat_map(|c| c.genes.keys().map(String::as_str))
            .collect();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut modules = Vec::new();
        for name in names {
            if visited.contains(name) {
                continue;
            }
            let component = self.connected_component(name, &mut visited);
            if component.len() > 1 {
                modules.push(component);
            }
        }
        modules
    }

    fn connected_component(&self, start: &str, visited: &mut BTreeSet<String>) -> BTreeSet<String> {
        let mut component = BTreeSet::new();
        let mut stack = vec![start.to_string()];
        while let Some(node) = stack.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            if let Some(neighbours) = self.gene_networks.get(&node) {
                stack.extend(neighbours.iter().filter(|n| !visited.contains(*n)).cloned());
            }
            component.insert(node);
        }
        component
    }

    fn evolve_modularity<R: Rng>(&mut self, chromosomes: &mut ChromosomeMap, rng: &mut R) {
        for module in self.detect_functional_modules(chromosomes) {
            if module.len() <= 2 {
                continue;
            }
            for a in &module {
                for b in &module {
                    if a == b || rng.gen::<f64>() >= MODULE_PROBABILITY {
                        continue;
                    }
                    if let Some(gene) = first_gene_mut(chromosomes, a) {
                        gene.interaction_partners.insert(b.clone());
                        self.add_edge(a, b);
                    }
                }
            }
        }
    }

    /// Highly connected or high-fitness genes, each listed once
    pub fn identify_critical_genes(&self, chromosomes: &ChromosomeMap) -> Vec<String> {
        let mut critical: Vec<String> = Vec::new();
        for gene in chromosomes.values().flat_map(|c| c.genes.values()) {
            let is_critical = gene.interaction_partners.len() > CRITICAL_PARTNERS
                || gene.fitness_contribution > CRITICAL_FITNESS;
            if is_critical && !critical.contains(&gene.name) {
                critical.push(gene.name.clone());
            }
        }
        critical
    }

    fn evolve_robustness<R: Rng>(&mut self, chromosomes: &mut ChromosomeMap, rng: &mut R) {
        for name in self.identify_critical_genes(chromosomes) {
            if rng.gen::<f64>() >= REDUNDANCY_PROBABILITY {
                continue;
            }
            if let Some(copy) = duplicate_gene_function(chromosomes, &name, rng) {
                for partner in &copy.interaction_partners {
                    self.add_edge(&copy.name, partner);
                }
            }
        }
    }

    /// Network of a child: the child's own genes, the union of both parents'
    /// graphs, and occasional novel edges to random child genes
    pub fn inherit<R: Rng>(
        parent1: &Self,
        parent2: &Self,
        child_chromosomes: &ChromosomeMap,
        rng: &mut R,
    ) -> Self {
        let mut network = Self::new();
        network.build_interaction_network(child_chromosomes);
        let child_genes: BTreeSet<&str> = child_chromosomes
            .values()
            .flat_map(|c| c.genes.keys().map(String::as_str))
            .collect();

        for parent in [parent1, parent2] {
            for (node, partners) in &parent.gene_networks {
                for partner in partners {
                    network.add_edge(node, partner);
                }
                if rng.gen::<f64>() < INNOVATION_PROBABILITY {
                    let novel = child_genes
                        .iter()
                        .filter(|g| **g != node.as_str())
                        .choose(rng)
                        .map(|g| g.to_string());
                    if let Some(novel) = novel {
                        network.add_edge(node, &novel);
                    }
                }
            }
            for (regulator, targets) in &parent.regulatory_networks {
                let entry = network.regulatory_networks.entry(regulator.clone()).or_default();
                for (gene, &weight) in targets {
                    entry.entry(gene.clone()).or_insert(weight);
                }
            }
        }
        network
    }
}

fn first_gene_mut<'a>(chromosomes: &'a mut ChromosomeMap, name: &str) -> Option<&'a mut Gene> {
    chromosomes.values_mut().find_map(|c| c.gene_mut(name))
}

/// Copy a critical gene, with jittered expression, into a random chromosome.
/// Returns the stored copy.
fn duplicate_gene_function<R: Rng>(chromosomes: &mut ChromosomeMap, name: &str, rng: &mut R) -> Option<Gene> {
    let original = chromosomes.values().find_map(|c| c.gene(name))?;
    let mut duplicate = original.renamed(format!("{}_duplicate", name));
    duplicate.scale_expression(rng.gen_range(0.8..1.2));
    let target = chromosomes.values_mut().choose(rng)?;
    let stored = target.add_gene_unique(duplicate);
    trace!("Redundant copy {} of critical gene {}", stored, name);
    target.gene(&stored).cloned()
}
