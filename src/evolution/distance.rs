//! Genetic distance between two genomes, in [0, 1]

use crate::genome::{Gene, Genome};

/// Mean per-gene distance over the gene names both genomes carry.
/// Genomes with no gene name in common are maximally distant.
pub fn calculate_genetic_distance(g1: &Genome, g2: &Genome) -> f64 {
    let genes1 = g1.all_genes();
    let genes2 = g2.all_genes();

    let mut shared = 0usize;
    let mut total = 0.0;
    for (name, a) in &genes1 {
        if let Some(b) = genes2.get(name) {
            let seq = sequence_distance(a.sequence(), b.sequence());
            let epi = epigenetic_distance(a, b);
            total += (seq + epi) / 2.0;
            shared += 1;
        }
    }
    if shared == 0 {
        return 1.0;
    }
    (total / shared as f64).clamp(0.0, 1.0)
}

/// Mean absolute locus difference over the common prefix, plus a length
/// penalty, halved and capped at 1
pub fn sequence_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 1.0;
    }
    let min_len = a.len().min(b.len());
    let max_len = a.len().max(b.len());
    let differences: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    let length_penalty = (a.len() as f64 - b.len() as f64).abs() / max_len as f64;
    let distance = (differences / min_len as f64 + length_penalty) / 2.0;
    if distance.is_nan() {
        return 1.0;
    }
    distance.clamp(0.0, 1.0)
}

/// Expression difference and methylation Hamming fraction, averaged.
/// Patterns of different length count as fully different methylation.
pub fn epigenetic_distance(a: &Gene, b: &Gene) -> f64 {
    let expression = (a.expression_level() - b.expression_level()).abs();
    let (ma, mb) = (a.methylation_pattern(), b.methylation_pattern());
    let methylation = if ma.len() == mb.len() && !ma.is_empty() {
        let differing = ma.iter().zip(mb).filter(|(x, y)| x != y).count();
        differing as f64 / ma.len() as f64
    } else {
        1.0
    };
    (expression + methylation) / 2.0
}
