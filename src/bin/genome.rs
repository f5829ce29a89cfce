//! genome CLI — found, evolve and cross evolutionary genomes
//!
//! Commands:
//!   genome founder  — print a founder genome and its phenotype
//!   genome evolve   — run mutation ticks on a founder
//!   genome cross    — cross two founders and compare the child
//!   genome demo     — run the full walkthrough

use genome_core::evolution::{advanced_crossover, MutagenicFactors, MutationType, DEFAULT_RECOMBINATION_RATE};
use genome_core::{GeneticsConfig, Genome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::env;

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        genome v0.1 — Evolutionary Genome Engine              ║
║        Mutation + Epigenetics + Networks + Recombination     ║
╚══════════════════════════════════════════════════════════════╝

Usage: genome [--config <file.json>] <command> [options]

Commands:
  founder                             Print a founder genome and its phenotype
  evolve  <ticks> [pressure] [seed]   Run mutation ticks on a founder
  cross   [seed]                      Cross two founders and compare the child
  demo                                Run the full walkthrough

Examples:
  genome founder
  genome evolve 500 0.8 42
  genome --config volatile.json evolve 200
  genome cross 7
  genome demo
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = match take_config(&mut args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  Invalid config: {}", e);
            return;
        }
    };
    if args.is_empty() {
        print_usage();
        return;
    }

    match args[0].as_str() {
        "founder" => cmd_founder(config),
        "evolve" => cmd_evolve(config, &args[1..]),
        "cross" => cmd_cross(config, &args[1..]),
        "demo" => cmd_demo(config),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}

/// Strip `--config <path>` from the arguments and load it
fn take_config(args: &mut Vec<String>) -> genome_core::Result<GeneticsConfig> {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(GeneticsConfig::default());
    };
    if pos + 1 >= args.len() {
        return Err(genome_core::GenomeError::InvalidArgument(
            "--config needs a file path".into(),
        ));
    }
    let path = args.remove(pos + 1);
    args.remove(pos);
    GeneticsConfig::from_json_file(path)
}

fn rng_from(arg: Option<&String>) -> StdRng {
    match arg.and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("  Failed to serialize: {}", e),
    }
}

fn cmd_founder(config: GeneticsConfig) {
    let genome = Genome::founder_with(config, &mut rand::thread_rng());
    println!("  {}", genome.summary());
    print_json(&genome.phenotype());
}

fn cmd_evolve(config: GeneticsConfig, args: &[String]) {
    let Some(ticks) = args.first().and_then(|s| s.parse::<usize>().ok()) else {
        eprintln!("Usage: genome evolve <ticks> [pressure] [seed]");
        return;
    };
    let pressure: f64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0.5);
    let mut rng = rng_from(args.get(2));

    let mut genome = Genome::founder_with(config, &mut rng);
    println!("  Before: {}", genome.summary());
    let mut counts: BTreeMap<MutationType, usize> = BTreeMap::new();
    for _ in 0..ticks {
        for event in genome.advanced_mutation(pressure, &MutagenicFactors::new(), &mut rng) {
            *counts.entry(event.kind).or_default() += 1;
        }
    }
    println!("  After:  {}", genome.summary());
    println!("\n  Executed mutations ({} ticks, pressure {:.2})", ticks, pressure);
    println!("  {}", "=".repeat(40));
    for (kind, count) in &counts {
        println!("  {:<22}{}", kind.name(), count);
    }
    print_json(&genome.phenotype());
}

fn cmd_cross(config: GeneticsConfig, args: &[String]) {
    let mut rng = rng_from(args.first());
    let p1 = Genome::founder_with(config.clone(), &mut rng);
    let p2 = Genome::founder_with(config, &mut rng);
    match advanced_crossover(&p1, &p2, DEFAULT_RECOMBINATION_RATE, &mut rng) {
        Ok(child) => {
            println!("  Parent 1: {}", p1.summary());
            println!("  Parent 2: {}", p2.summary());
            println!("  Child:    {}", child.summary());
            println!("  Generation:          {}", child.generation);
            println!("  Lineage:             {}", child.lineage_id);
            println!("  Distance parent 1:   {:.4}", child.distance_to(&p1));
            println!("  Distance parent 2:   {:.4}", child.distance_to(&p2));
            println!("  Distance parents:    {:.4}", p1.distance_to(&p2));
        }
        Err(e) => eprintln!("  Crossover failed: {}", e),
    }
}

fn cmd_demo(config: GeneticsConfig) {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║              genome v0.1 — Full Demo                         ║
║       Founding + Mutation + Recombination + Phenotype        ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
    let mut rng = StdRng::seed_from_u64(2024);

    println!("Step 1: Founding two genomes...");
    println!("{}", "-".repeat(60));
    let mut adam = Genome::founder_with(config.clone(), &mut rng);
    let mut eve = Genome::founder_with(config, &mut rng);
    println!("  {}", adam.summary());
    println!("  {}", eve.summary());

    println!("\nStep 2: 200 ticks under rising pressure...");
    println!("{}", "-".repeat(60));
    let mut factors = MutagenicFactors::new();
    factors.insert("radiation".into(), 0.2);
    let mut executed = 0;
    for tick in 0..200 {
        let pressure = tick as f64 / 200.0;
        executed += adam.advanced_mutation(pressure, &factors, &mut rng).len();
        executed += eve.advanced_mutation(pressure, &factors, &mut rng).len();
    }
    println!("  {} mutations executed", executed);
    println!("  {}", adam.summary());
    println!("  {}", eve.summary());

    println!("\nStep 3: Recombination...");
    println!("{}", "-".repeat(60));
    let child = match advanced_crossover(&adam, &eve, DEFAULT_RECOMBINATION_RATE, &mut rng) {
        Ok(child) => child,
        Err(e) => {
            eprintln!("  Crossover failed: {}", e);
            return;
        }
    };
    println!("  {}", child.summary());
    println!("  Distance to parents: {:.4} / {:.4}", child.distance_to(&adam), child.distance_to(&eve));

    println!("\nStep 4: Child phenotype");
    println!("{}", "-".repeat(60));
    let phenotype = child.phenotype();
    println!("  Energy cost: {:.3}", phenotype.energy_cost());
    print_json(&phenotype);
}
