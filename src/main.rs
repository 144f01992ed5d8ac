//! Pareto-seq CLI - Run the optimizer from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use pareto_seq::{EvolutionConfig, EvolutionEngine, SequenceEvaluator};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Run the multi-objective sequence optimizer from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to optimizer configuration file");
        eprintln!();
        eprintln!("An example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Pareto Sequence Optimizer");
    println!("=========================");
    println!(
        "Population: {} for {} generations (seed {})",
        config.population_size, config.generation_count, config.random_seed
    );
    println!(
        "Genome: up to {} genes in [0, {}], blocks of {} actions",
        config.max_genes, config.gene_range, config.block_action_size
    );
    println!();

    let mut engine = EvolutionEngine::new(config, SequenceEvaluator).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let start = Instant::now();
    let report = engine.run().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    println!("gen    best_reward    best_cost    avg_reward    avg_cost    mut_rate");
    for summary in &report.summaries {
        println!(
            "{:<6} {:<14.4} {:<12.1} {:<13.4} {:<11.2} {:.3e}",
            summary.generation,
            summary.best_reward,
            summary.best_cost,
            summary.avg_reward,
            summary.avg_cost,
            summary.best_mutation_rate
        );
    }

    println!();
    let front: Vec<_> = report.pareto_front().collect();
    println!("Pareto front ({} members):", front.len());
    for member in front {
        println!(
            "  {} actions, cost {:.1}, reward {:.4}",
            member.genome.len() / 2,
            member.objectives[0],
            member.objectives[1]
        );
    }
    println!();
    println!("Completed in {:.2}s", elapsed.as_secs_f64());
}

fn print_example_config() {
    let config = EvolutionConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing example config: {}", e);
            std::process::exit(1);
        }
    }
}
