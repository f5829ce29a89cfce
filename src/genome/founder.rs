//! Founder gene catalogue
//!
//! The four founding chromosomes: physical/metabolic traits, cognition,
//! social traits and dormant environmental adaptations. Most behavioural
//! and adaptation genes start silenced so later activation has room to act.

use super::GeneExpression::{Low, Moderate, Overexpressed, Silenced};
use super::{Chromosome, Gene, GeneExpression};
use rand::Rng;
use std::collections::BTreeMap;

/// One founder gene: name, sequence value range, fitness contribution, expression
struct GeneSpec {
    name: &'static str,
    range: (f64, f64),
    fitness: f64,
    expression: GeneExpression,
}

const fn spec(
    name: &'static str,
    range: (f64, f64),
    fitness: f64,
    expression: GeneExpression,
) -> GeneSpec {
    GeneSpec { name, range, fitness, expression }
}

const AUTOSOME_1: &[GeneSpec] = &[
    spec("physique_taille", (0.8, 1.2), 0.3, Overexpressed),
    spec("physique_vitesse", (0.8, 1.2), 0.4, Overexpressed),
    spec("physique_robustesse", (0.8, 1.2), 0.5, Overexpressed),
    spec("physique_endurance", (0.5, 1.5), 0.3, Moderate),
    spec("physique_metabolisme", (0.7, 1.3), 0.6, Overexpressed),
];

const AUTOSOME_2: &[GeneSpec] = &[
    spec("cerveau_intelligence", (0.0, 0.5), 0.8, Low),
    spec("cerveau_memoire", (0.2, 0.8), 0.6, Overexpressed),
    spec("cerveau_apprentissage", (0.1, 0.6), 0.7, Silenced),
    spec("cerveau_creativite", (0.0, 0.3), 0.5, Silenced),
    spec("cerveau_plasticite", (0.3, 0.9), 0.7, Overexpressed),
];

const SEX_CHROMOSOME: &[GeneSpec] = &[
    spec("social_cooperation", (0.0, 0.4), 0.4, Silenced),
    spec("social_leadership", (0.0, 0.2), 0.3, Silenced),
    spec("social_empathie", (0.0, 0.3), 0.4, Silenced),
    spec("social_communication", (0.0, 0.1), 0.9, Silenced),
];

const ADAPTATION_CHROMOSOME: &[GeneSpec] = &[
    spec("adaptation_froid", (0.0, 0.2), 0.3, Silenced),
    spec("adaptation_chaleur", (0.0, 0.2), 0.3, Silenced),
    spec("adaptation_vision_nuit", (0.0, 0.1), 0.4, Silenced),
    spec("adaptation_toxines", (0.0, 0.1), 0.5, Silenced),
    spec("adaptation_regeneration", (0.0, 0.05), 0.6, Silenced),
];

fn build_chromosome<R: Rng>(specs: &[GeneSpec], rng: &mut R) -> Chromosome {
    let mut chrom = Chromosome::new();
    for s in specs {
        let value = rng.gen_range(s.range.0..s.range.1);
        let gene = Gene::new(s.name, vec![value], rng)
            .with_expression(s.expression.level())
            .with_fitness(s.fitness);
        chrom.add_gene(gene);
    }
    chrom
}

/// Build the founding chromosome set
pub fn founder_chromosomes<R: Rng>(rng: &mut R) -> BTreeMap<String, Chromosome> {
    let mut chromosomes = BTreeMap::new();
    chromosomes.insert("autosome_1".to_string(), build_chromosome(AUTOSOME_1, rng));
    chromosomes.insert("autosome_2".to_string(), build_chromosome(AUTOSOME_2, rng));

    let mut sex = build_chromosome(SEX_CHROMOSOME, rng);
    // Tribe marker: one random locus followed by two fixed ones
    let tribe = Gene::new("social_tribu_id", vec![rng.gen::<f64>(), 0.9, 1.0], rng).with_fitness(0.2);
    sex.add_gene(tribe);
    chromosomes.insert("sex_chromosome".to_string(), sex);

    chromosomes.insert(
        "adaptation_chromosome".to_string(),
        build_chromosome(ADAPTATION_CHROMOSOME, rng),
    );
    chromosomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_founder_layout() {
        let mut rng = StdRng::seed_from_u64(11);
        let chromosomes = founder_chromosomes(&mut rng);
        let names: Vec<&str> = chromosomes.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["adaptation_chromosome", "autosome_1", "autosome_2", "sex_chromosome"]
        );
        let total: usize = chromosomes.values().map(Chromosome::len).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_founder_gene_values() {
        let mut rng = StdRng::seed_from_u64(12);
        let chromosomes = founder_chromosomes(&mut rng);

        let taille = chromosomes["autosome_1"].gene("physique_taille").unwrap();
        assert!((0.8..1.2).contains(&taille.sequence()[0]));
        assert!((taille.fitness_contribution - 0.3).abs() < 1e-12);

        let intelligence = chromosomes["autosome_2"].gene("cerveau_intelligence").unwrap();
        assert!((intelligence.expression_level() - 0.25).abs() < 1e-12);

        let tribe = chromosomes["sex_chromosome"].gene("social_tribu_id").unwrap();
        assert_eq!(tribe.len(), 3);
        assert_eq!(tribe.methylation_pattern().len(), 3);

        assert!(chromosomes["adaptation_chromosome"]
            .genes
            .values()
            .all(|g| g.expression_level() == 0.0));
    }
}
