//! Elitist multi-objective evolutionary optimizer for variable-length action
//! sequences.
//!
//! A (μ+μ) generational evolutionary algorithm over genomes encoding
//! sequences of two-valued actions. Candidates are scored by an external
//! objective evaluator, ranked by Pareto dominance (non-dominated sorting),
//! diversified by crowding distance, and selected through binary tournaments
//! and elitist truncation over the combined parent/offspring pool. Mutation
//! step sizes self-adapt per individual via log-normal perturbation.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and report types
//! - `evolve`: The optimizer (individuals, populations, engine)
//!
//! # Example
//!
//! ```rust,no_run
//! use pareto_seq::{EvolutionConfig, EvolutionEngine, SequenceEvaluator};
//!
//! let config = EvolutionConfig {
//!     population_size: 16,
//!     generation_count: 30,
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, SequenceEvaluator).unwrap();
//! let report = engine.run().unwrap();
//!
//! for member in report.pareto_front() {
//!     println!(
//!         "cost {:.0}, reward {:.3}",
//!         member.objectives[0], member.objectives[1]
//!     );
//! }
//! ```
//!
//! Runs are deterministic: the same seed, configuration, and a pure
//! evaluator reproduce identical per-generation summaries.

pub mod evolve;
pub mod schema;

// Re-export commonly used types
pub use evolve::{
    EvalError, EvolutionEngine, EvolveError, ObjectiveEvaluator, Population, SequenceEvaluator,
};
pub use schema::{EvolutionConfig, EvolutionReport, GenerationSummary};
