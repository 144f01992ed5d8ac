//! Generational (μ+μ) evolution loop.

use log::debug;

use crate::schema::{EvolutionConfig, EvolutionReport, FrontMember, GenerationSummary};

use super::EvolveError;
use super::evaluator::ObjectiveEvaluator;
use super::population::Population;
use super::rng::EvolutionRng;

/// Index of the cost objective in summary records.
const COST_INDEX: usize = 0;
/// Index of the reward objective in summary records.
const REWARD_INDEX: usize = 1;

/// Drives the elitist generational loop over a population.
///
/// The engine exclusively owns the population and both random streams for
/// its lifetime; evaluator calls are synchronous and happen once per stale
/// individual per generation.
pub struct EvolutionEngine<E> {
    config: EvolutionConfig,
    rng: EvolutionRng,
    evaluator: E,
    population: Population,
    summaries: Vec<GenerationSummary>,
    generation: usize,
}

impl<E: ObjectiveEvaluator> EvolutionEngine<E> {
    /// Validate the configuration and build an engine with both random
    /// streams seeded from it.
    pub fn new(config: EvolutionConfig, evaluator: E) -> Result<Self, EvolveError> {
        config.validate()?;
        if evaluator.objective_count() != config.objectives.len() {
            return Err(EvolveError::ObjectiveArity {
                expected: config.objectives.len(),
                got: evaluator.objective_count(),
            });
        }
        let rng = EvolutionRng::new(config.random_seed);
        Ok(Self {
            config,
            rng,
            evaluator,
            population: Population::default(),
            summaries: Vec::new(),
            generation: 0,
        })
    }

    /// The current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Summaries recorded so far, including generation 0.
    pub fn summaries(&self) -> &[GenerationSummary] {
        &self.summaries
    }

    /// Random initial population of size N, ranked once so generation-0
    /// statistics and the first mating selection see valid metadata.
    fn initialize(&mut self) -> Result<(), EvolveError> {
        self.generation = 0;
        self.summaries.clear();
        self.population = Population::random(
            self.config.population_size,
            &self.config,
            &mut self.rng,
            &self.evaluator,
        )?;
        self.population.update_ranking(&self.config.objectives)?;
        self.record_summary()
    }

    /// One (μ+μ) generation: clone parents as offspring, select a mating
    /// pool, cross and mutate it, refresh objectives, merge back to 2N, rank
    /// the combined pool, and truncate to N.
    fn step(&mut self) -> Result<(), EvolveError> {
        let mut offspring = self.population.clone();
        offspring.binary_tournament(&mut self.rng)?;
        offspring.crossover(&self.config, &mut self.rng);
        offspring.mutate(&self.config, &mut self.rng, &self.evaluator)?;
        offspring.evaluate_objectives(&self.evaluator)?;

        self.population.combine(offspring);
        self.population.update_ranking(&self.config.objectives)?;
        self.population.mo_truncation(self.config.population_size)?;

        self.generation += 1;
        self.record_summary()
    }

    /// Record per-generation statistics: the max-reward member's objectives
    /// and mutation rate, plus population averages.
    fn record_summary(&mut self) -> Result<(), EvolveError> {
        let members = self.population.members();
        let first = match members.first() {
            Some(member) => member,
            None => return Err(EvolveError::EmptyPopulation),
        };

        let first_objectives = first.fresh_objectives()?;
        let mut best_cost = first_objectives[COST_INDEX];
        let mut best_reward = first_objectives[REWARD_INDEX];
        let mut best_rate = first.mutation_rate();
        let mut sum_cost = 0.0;
        let mut sum_reward = 0.0;

        for member in members {
            let objectives = member.fresh_objectives()?;
            sum_cost += objectives[COST_INDEX];
            sum_reward += objectives[REWARD_INDEX];
            if objectives[REWARD_INDEX] > best_reward {
                best_reward = objectives[REWARD_INDEX];
                best_cost = objectives[COST_INDEX];
                best_rate = member.mutation_rate();
            }
        }

        let count = members.len() as f64;
        let summary = GenerationSummary {
            generation: self.generation,
            best_reward,
            best_cost,
            avg_reward: sum_reward / count,
            avg_cost: sum_cost / count,
            best_mutation_rate: best_rate,
        };
        debug!(
            "generation {}: best reward {:.4} (cost {:.1}), avg reward {:.4}",
            summary.generation, summary.best_reward, summary.best_cost, summary.avg_reward
        );
        self.summaries.push(summary);
        Ok(())
    }

    /// Run the full generational loop and assemble the report. The final
    /// population is the ranked, truncated survivor set of size N.
    pub fn run(&mut self) -> Result<EvolutionReport, EvolveError> {
        self.initialize()?;
        for _ in 0..self.config.generation_count {
            self.step()?;
        }

        let final_population = self
            .population
            .members()
            .iter()
            .map(|member| {
                let objectives = member.fresh_objectives()?.to_vec();
                let ranking = member.ranking().ok_or(EvolveError::UnrankedPopulation)?;
                Ok(FrontMember {
                    genome: member.genome().to_vec(),
                    objectives,
                    mutation_rate: member.mutation_rate(),
                    front_rank: ranking.front,
                    crowding_distance: ranking.crowding,
                })
            })
            .collect::<Result<Vec<_>, EvolveError>>()?;

        Ok(EvolutionReport {
            summaries: self.summaries.clone(),
            final_population,
        })
    }
}
