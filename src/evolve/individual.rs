//! Genome representation with self-adaptive mutation step size.

use std::cmp::Ordering;

use crate::schema::{EvolutionConfig, ObjectiveDirection};

use super::EvolveError;
use super::evaluator::ObjectiveEvaluator;
use super::rng::EvolutionRng;

/// Population-relative ranking metadata assigned by non-dominated sorting.
///
/// Becomes stale whenever population membership or objectives change and is
/// cleared until the next ranking pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranking {
    /// Front index; 0 is the Pareto-optimal front.
    pub front: usize,
    /// Crowding distance within the front; boundary members get infinity.
    pub crowding: f64,
}

impl Ranking {
    /// Selection preference: lower front first, then larger crowding
    /// distance. `Greater` means `self` is preferred.
    pub fn compare(&self, other: &Ranking) -> Ordering {
        match other.front.cmp(&self.front) {
            Ordering::Equal => self.crowding.total_cmp(&other.crowding),
            ord => ord,
        }
    }
}

/// One candidate solution: a variable-length action sequence plus its search
/// state.
///
/// The genome always has even length (each consecutive pair encodes one
/// action) and every gene lies in `[0, gene_range]`. Objectives are memoized
/// and invalidated by any genome change.
#[derive(Debug, Clone)]
pub struct Individual {
    genome: Vec<f64>,
    objectives: Option<Vec<f64>>,
    mutation_rate: f64,
    ranking: Option<Ranking>,
}

impl Individual {
    /// Random individual holding one action block, with fresh objectives and
    /// a mutation rate drawn uniformly from `[0.1, 0.9]`.
    pub fn random(
        config: &EvolutionConfig,
        rng: &mut EvolutionRng,
        evaluator: &dyn ObjectiveEvaluator,
    ) -> Result<Self, EvolveError> {
        let mut genome = Vec::with_capacity(config.genes_per_block());
        for _ in 0..config.genes_per_block() {
            genome.push(rng.uniform(0.0, config.gene_range));
        }
        let mutation_rate = rng.uniform(0.1, 0.9);
        let mut individual = Self {
            genome,
            objectives: None,
            mutation_rate,
            ranking: None,
        };
        individual.evaluate_objectives(evaluator)?;
        Ok(individual)
    }

    /// The gene vector.
    pub fn genome(&self) -> &[f64] {
        &self.genome
    }

    /// Current self-adapted mutation rate.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Cached objectives, if fresh.
    pub fn objectives(&self) -> Option<&[f64]> {
        self.objectives.as_deref()
    }

    /// Ranking metadata, if a ranking pass has run since the last change.
    pub fn ranking(&self) -> Option<Ranking> {
        self.ranking
    }

    pub(crate) fn set_ranking(&mut self, ranking: Ranking) {
        self.ranking = Some(ranking);
    }

    /// Cached objectives, failing loudly when stale.
    pub(crate) fn fresh_objectives(&self) -> Result<&[f64], EvolveError> {
        self.objectives
            .as_deref()
            .ok_or(EvolveError::StaleObjectives)
    }

    pub(crate) fn genome_mut(&mut self) -> &mut Vec<f64> {
        &mut self.genome
    }

    /// Mark objectives stale and drop the population-relative ranking
    /// metadata, which goes stale with them.
    pub(crate) fn invalidate_objectives(&mut self) {
        self.objectives = None;
        self.ranking = None;
    }

    /// Adopt a genome whose objectives were just measured (trial mutation).
    pub(crate) fn adopt(&mut self, genome: Vec<f64>, objectives: Vec<f64>) {
        self.genome = genome;
        self.objectives = Some(objectives);
        self.ranking = None;
    }

    /// Recompute objectives if the cache is stale; otherwise a no-op.
    pub fn evaluate_objectives(
        &mut self,
        evaluator: &dyn ObjectiveEvaluator,
    ) -> Result<(), EvolveError> {
        if self.objectives.is_none() {
            let objectives = evaluator.evaluate(&self.genome)?;
            if objectives.len() != evaluator.objective_count() {
                return Err(EvolveError::ObjectiveArity {
                    expected: evaluator.objective_count(),
                    got: objectives.len(),
                });
            }
            self.objectives = Some(objectives);
        }
        Ok(())
    }

    /// Log-normal self-adaptation of the mutation step size, clamped to the
    /// configured bounds.
    pub fn adapt_mutation_rate(&mut self, config: &EvolutionConfig, rng: &mut EvolutionRng) {
        let step = (config.learning_rate() * rng.standard_normal()).exp();
        self.mutation_rate =
            (self.mutation_rate * step).clamp(config.min_mutation_rate, config.max_mutation_rate);
    }

    /// Pareto comparison under the per-index direction table.
    ///
    /// `Greater` means `self` dominates `other` (better-or-equal everywhere,
    /// strictly better somewhere), `Less` the reverse, and `Equal` that the
    /// two are mutually non-dominating (including exact equality).
    pub fn dominates(
        &self,
        other: &Individual,
        directions: &[ObjectiveDirection],
    ) -> Result<Ordering, EvolveError> {
        let a = self.fresh_objectives()?;
        let b = other.fresh_objectives()?;
        let mut better = 0usize;
        let mut worse = 0usize;
        for ((&va, &vb), direction) in a.iter().zip(b).zip(directions) {
            let cmp = match direction {
                ObjectiveDirection::Minimize => vb.total_cmp(&va),
                ObjectiveDirection::Maximize => va.total_cmp(&vb),
            };
            match cmp {
                Ordering::Greater => better += 1,
                Ordering::Less => worse += 1,
                Ordering::Equal => {}
            }
        }
        Ok(if better > 0 && worse == 0 {
            Ordering::Greater
        } else if worse > 0 && better == 0 {
            Ordering::Less
        } else {
            Ordering::Equal
        })
    }

    /// Selection preference by front rank, then crowding distance. Fails when
    /// either side is unranked.
    pub fn compare_rank_and_crowding(&self, other: &Individual) -> Result<Ordering, EvolveError> {
        let a = self.ranking.ok_or(EvolveError::UnrankedPopulation)?;
        let b = other.ranking.ok_or(EvolveError::UnrankedPopulation)?;
        Ok(a.compare(&b))
    }

    /// Normalized Euclidean distance between the two objective vectors.
    /// Normalization defaults to 1.0 per objective.
    pub fn objective_distance(
        &self,
        other: &Individual,
        normalization: Option<&[f64]>,
    ) -> Result<f64, EvolveError> {
        if std::ptr::eq(self, other) {
            return Ok(0.0);
        }
        let a = self.fresh_objectives()?;
        let b = other.fresh_objectives()?;
        let sum: f64 = a
            .iter()
            .zip(b)
            .enumerate()
            .map(|(i, (&va, &vb))| {
                let scale = normalization.and_then(|n| n.get(i)).copied().unwrap_or(1.0);
                let d = (va - vb) / scale;
                d * d
            })
            .sum();
        Ok(sum.sqrt())
    }

    /// Uniform crossover performed destructively in place: each gene index is
    /// swapped with probability 0.5. Swaps are restricted to indices valid in
    /// both genomes, so unequal lengths never reach past the shorter one.
    /// Both participants' objectives and ranking metadata are invalidated.
    pub fn crossover(&mut self, other: &mut Individual, rng: &mut EvolutionRng) {
        let span = self.genome.len().min(other.genome.len());
        for i in 0..span {
            if rng.coin(0.5) {
                std::mem::swap(&mut self.genome[i], &mut other.genome[i]);
            }
        }
        self.invalidate_objectives();
        other.invalidate_objectives();
    }

    /// Apply the configured mutation policy. The mutation rate is self-adapted
    /// first; the policy then gates its behavior on the adapted rate.
    pub fn mutate(
        &mut self,
        config: &EvolutionConfig,
        rng: &mut EvolutionRng,
        evaluator: &dyn ObjectiveEvaluator,
    ) -> Result<(), EvolveError> {
        self.adapt_mutation_rate(config, rng);
        super::mutation::apply(self, config, rng, evaluator)
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        genome: Vec<f64>,
        objectives: Option<Vec<f64>>,
        mutation_rate: f64,
    ) -> Self {
        Self {
            genome,
            objectives,
            mutation_rate,
            ranking: None,
        }
    }
}
