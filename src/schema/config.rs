//! Configuration types for the evolutionary optimizer.

use serde::{Deserialize, Serialize};

fn default_population_size() -> usize {
    20
}
fn default_generation_count() -> usize {
    50
}
fn default_random_seed() -> u64 {
    42
}
fn default_crossover_fraction() -> f64 {
    0.8
}
fn default_max_genes() -> usize {
    100
}
fn default_gene_range() -> f64 {
    512.0
}
fn default_block_action_size() -> usize {
    5
}
fn default_num_tries_per_mutation() -> usize {
    10
}
fn default_min_mutation_rate() -> f64 {
    1e-100
}
fn default_max_mutation_rate() -> f64 {
    1.0
}
fn default_objectives() -> Vec<ObjectiveDirection> {
    vec![ObjectiveDirection::Minimize, ObjectiveDirection::Maximize]
}

/// Top-level optimizer configuration.
///
/// All individuals share one configuration; operations borrow it rather than
/// carrying per-instance copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Population size N. The pool transiently grows to 2N during the
    /// combine step and is truncated back to N every generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of generations to run.
    #[serde(default = "default_generation_count")]
    pub generation_count: usize,
    /// Seed for both random streams.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// Probability that an adjacent mating-pool pair undergoes crossover.
    #[serde(default = "default_crossover_fraction")]
    pub crossover_fraction: f64,
    /// Maximum genome length in genes. Must be even; one action is two genes.
    #[serde(default = "default_max_genes")]
    pub max_genes: usize,
    /// Upper bound for a gene value; genes live in `[0, gene_range]`.
    #[serde(default = "default_gene_range")]
    pub gene_range: f64,
    /// Actions per extension block. Initial genomes hold one block.
    #[serde(default = "default_block_action_size")]
    pub block_action_size: usize,
    /// Candidate extensions tried by the trial-and-keep-best policy.
    #[serde(default = "default_num_tries_per_mutation")]
    pub num_tries_per_mutation: usize,
    /// Lower clamp for the self-adaptive mutation rate.
    #[serde(default = "default_min_mutation_rate")]
    pub min_mutation_rate: f64,
    /// Upper clamp for the self-adaptive mutation rate.
    #[serde(default = "default_max_mutation_rate")]
    pub max_mutation_rate: f64,
    /// Optimization direction per objective index.
    #[serde(default = "default_objectives")]
    pub objectives: Vec<ObjectiveDirection>,
    /// Mutation operator selection.
    #[serde(default)]
    pub mutation: MutationPolicy,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generation_count: default_generation_count(),
            random_seed: default_random_seed(),
            crossover_fraction: default_crossover_fraction(),
            max_genes: default_max_genes(),
            gene_range: default_gene_range(),
            block_action_size: default_block_action_size(),
            num_tries_per_mutation: default_num_tries_per_mutation(),
            min_mutation_rate: default_min_mutation_rate(),
            max_mutation_rate: default_max_mutation_rate(),
            objectives: default_objectives(),
            mutation: MutationPolicy::default(),
        }
    }
}

impl EvolutionConfig {
    /// Genes per extension block (two genes per action).
    #[inline]
    pub fn genes_per_block(&self) -> usize {
        2 * self.block_action_size
    }

    /// Self-adaptation learning rate, fixed population-wide.
    #[inline]
    pub fn learning_rate(&self) -> f64 {
        1.0 / (self.max_genes as f64).sqrt()
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if !self.crossover_fraction.is_finite() || !(0.0..=1.0).contains(&self.crossover_fraction)
        {
            return Err(ConfigError::InvalidCrossoverFraction(self.crossover_fraction));
        }
        if self.block_action_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.max_genes % 2 != 0 {
            return Err(ConfigError::OddMaxGenes(self.max_genes));
        }
        if self.max_genes < self.genes_per_block() {
            return Err(ConfigError::MaxGenesTooSmall {
                max_genes: self.max_genes,
                minimum: self.genes_per_block(),
            });
        }
        if !self.gene_range.is_finite() || self.gene_range <= 0.0 {
            return Err(ConfigError::InvalidGeneRange(self.gene_range));
        }
        if self.objectives.len() < 2 {
            return Err(ConfigError::TooFewObjectives(self.objectives.len()));
        }
        if self.min_mutation_rate <= 0.0 || self.min_mutation_rate > self.max_mutation_rate {
            return Err(ConfigError::InvalidMutationBounds {
                min: self.min_mutation_rate,
                max: self.max_mutation_rate,
            });
        }
        Ok(())
    }
}

/// Optimization direction for one objective index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveDirection {
    /// Lower is better.
    Minimize,
    /// Higher is better.
    Maximize,
}

/// Mutation operator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum MutationPolicy {
    /// Perturb existing genes with the self-adapted rate, otherwise append
    /// fresh action blocks.
    #[default]
    HybridPerturbExtend,
    /// Always append fresh action blocks, with no internal selection.
    BlindExtend,
    /// Evaluate candidate extensions through the objective evaluator and
    /// adopt the best one only if it improves on the current objectives.
    TrialExtend,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    ZeroPopulation,
    #[error("Crossover fraction must be in [0, 1], got {0}")]
    InvalidCrossoverFraction(f64),
    #[error("Block action size must be non-zero")]
    ZeroBlockSize,
    #[error("Maximum genome length must be even, got {0}")]
    OddMaxGenes(usize),
    #[error("Maximum genome length {max_genes} is below one block ({minimum} genes)")]
    MaxGenesTooSmall { max_genes: usize, minimum: usize },
    #[error("Gene range must be positive and finite, got {0}")]
    InvalidGeneRange(f64),
    #[error("At least 2 objectives are required, got {0}")]
    TooFewObjectives(usize),
    #[error("Mutation rate bounds must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidMutationBounds { min: f64, max: f64 },
}
