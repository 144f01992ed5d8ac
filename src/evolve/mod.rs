//! The evolutionary optimizer: individuals, populations, and the engine.
//!
//! # Overview
//!
//! - **Random streams** (`rng`): the two seeded variate streams shared by
//!   every operator
//! - **Evaluator boundary** (`evaluator`): the external collaborator that
//!   scores genomes
//! - **Individuals** (`individual`): variable-length genomes with
//!   self-adaptive mutation rates and ranking metadata
//! - **Mutation policies** (`mutation`): the pluggable mutation operators
//! - **Populations** (`population`): selection, variation, non-dominated
//!   sorting, crowding, and elitist truncation
//! - **Engine** (`engine`): the generational (μ+μ) loop

mod engine;
mod evaluator;
mod individual;
mod mutation;
mod population;
mod rng;

pub use engine::EvolutionEngine;
pub use evaluator::{EvalError, ObjectiveEvaluator, SequenceEvaluator};
pub use individual::{Individual, Ranking};
pub use population::Population;
pub use rng::EvolutionRng;

/// Errors surfaced by population and engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] crate::schema::ConfigError),
    /// The external evaluator failed; fatal to the run.
    #[error(transparent)]
    Evaluation(#[from] EvalError),
    /// An operation requiring members ran on an empty population.
    #[error("population is empty")]
    EmptyPopulation,
    /// Selection or truncation ran before a ranking pass.
    #[error("ranking metadata is stale; run update_ranking first")]
    UnrankedPopulation,
    /// A dominance comparison or summary ran on invalidated objectives.
    #[error("objectives are stale; run evaluate_objectives first")]
    StaleObjectives,
    /// The evaluator produced the wrong number of objectives.
    #[error("evaluator produced {got} objectives, expected {expected}")]
    ObjectiveArity { expected: usize, got: usize },
    /// More survivors were requested than the pool holds.
    #[error("cannot keep {requested} survivors from a population of {available}")]
    TruncationOverflow { requested: usize, available: usize },
}
