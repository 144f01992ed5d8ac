//! Plain-data report types consumed by external logging and plotting.

use serde::Serialize;

/// Per-generation summary record.
///
/// "Best" refers to the member with the highest reward objective; its cost
/// and mutation rate are reported alongside population averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    /// Generation index; 0 is the initial random population.
    pub generation: usize,
    /// Reward objective of the best member.
    pub best_reward: f64,
    /// Cost objective of the best member.
    pub best_cost: f64,
    /// Mean reward across the population.
    pub avg_reward: f64,
    /// Mean cost across the population.
    pub avg_cost: f64,
    /// Self-adapted mutation rate of the best member.
    pub best_mutation_rate: f64,
}

/// One member of the final population, with its ranking metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMember {
    /// The action sequence (two genes per action).
    pub genome: Vec<f64>,
    /// Objective vector at the end of the run.
    pub objectives: Vec<f64>,
    /// Self-adapted mutation rate.
    pub mutation_rate: f64,
    /// Non-dominated front index; 0 is the Pareto-optimal front.
    pub front_rank: usize,
    /// Crowding distance within the front; boundary members are infinite.
    pub crowding_distance: f64,
}

/// Full result of an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionReport {
    /// One summary per recorded generation, including generation 0.
    pub summaries: Vec<GenerationSummary>,
    /// The final ranked population of size N.
    pub final_population: Vec<FrontMember>,
}

impl EvolutionReport {
    /// Members of the final Pareto-optimal front.
    pub fn pareto_front(&self) -> impl Iterator<Item = &FrontMember> {
        self.final_population.iter().filter(|m| m.front_rank == 0)
    }
}
