//! Configuration and report types for the optimizer.

mod config;
mod report;

pub use config::{ConfigError, EvolutionConfig, MutationPolicy, ObjectiveDirection};
pub use report::{EvolutionReport, FrontMember, GenerationSummary};
