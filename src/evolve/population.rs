//! Population-level operators: mating selection, variation, non-dominated
//! sorting, crowding distance, and elitist truncation.

use std::cmp::Ordering;

use crate::schema::{EvolutionConfig, ObjectiveDirection};

use super::EvolveError;
use super::evaluator::ObjectiveEvaluator;
use super::individual::{Individual, Ranking};
use super::rng::EvolutionRng;

/// An ordered collection of individuals. Size varies transiently to 2N
/// during the combine step and is restored to N by truncation.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Individual>,
}

impl Population {
    /// Create `size` random individuals with fresh objectives.
    pub fn random(
        size: usize,
        config: &EvolutionConfig,
        rng: &mut EvolutionRng,
        evaluator: &dyn ObjectiveEvaluator,
    ) -> Result<Self, EvolveError> {
        let mut members = Vec::with_capacity(size);
        for _ in 0..size {
            members.push(Individual::random(config, rng, evaluator)?);
        }
        Ok(Self { members })
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Read-only view of the members.
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Collected rankings, failing loudly when any member is unranked.
    fn rankings(&self) -> Result<Vec<Ranking>, EvolveError> {
        self.members
            .iter()
            .map(|m| m.ranking().ok_or(EvolveError::UnrankedPopulation))
            .collect()
    }

    /// Replace the members with a mating pool of the same size, chosen by
    /// binary tournament on rank and crowding. Requires a prior ranking pass.
    pub fn binary_tournament(&mut self, rng: &mut EvolutionRng) -> Result<(), EvolveError> {
        if self.members.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }
        let rankings = self.rankings()?;
        let size = self.members.len();
        let mut pool = Vec::with_capacity(size);
        for _ in 0..size {
            let a = rng.index(size);
            let b = rng.index(size);
            // Ties keep the first contestant drawn.
            let winner = match rankings[a].compare(&rankings[b]) {
                Ordering::Less => b,
                _ => a,
            };
            pool.push(self.members[winner].clone());
        }
        self.members = pool;
        Ok(())
    }

    /// Cross adjacent pairs of the mating pool, each with probability
    /// `crossover_fraction`. A trailing unpaired member is left untouched.
    pub fn crossover(&mut self, config: &EvolutionConfig, rng: &mut EvolutionRng) {
        for pair in self.members.chunks_exact_mut(2) {
            if rng.coin(config.crossover_fraction) {
                let (a, b) = pair.split_at_mut(1);
                a[0].crossover(&mut b[0], rng);
            }
        }
    }

    /// Mutate every member; each gates internally on its own self-adapted
    /// mutation rate.
    pub fn mutate(
        &mut self,
        config: &EvolutionConfig,
        rng: &mut EvolutionRng,
        evaluator: &dyn ObjectiveEvaluator,
    ) -> Result<(), EvolveError> {
        for member in &mut self.members {
            member.mutate(config, rng, evaluator)?;
        }
        Ok(())
    }

    /// Refresh stale objective caches; fresh members incur no evaluator cost.
    pub fn evaluate_objectives(
        &mut self,
        evaluator: &dyn ObjectiveEvaluator,
    ) -> Result<(), EvolveError> {
        for member in &mut self.members {
            member.evaluate_objectives(evaluator)?;
        }
        Ok(())
    }

    /// Absorb another population's members (the 2N combine step). Ownership
    /// transfers to `self`.
    pub fn combine(&mut self, other: Population) {
        self.members.extend(other.members);
    }

    /// Two-phase ranking over the whole population: fast non-dominated sort
    /// into fronts, then crowding distances within each front. Must run on
    /// the combined pool before truncation.
    pub fn update_ranking(
        &mut self,
        directions: &[ObjectiveDirection],
    ) -> Result<(), EvolveError> {
        let n = self.members.len();
        if n == 0 {
            return Err(EvolveError::EmptyPopulation);
        }

        // Pairwise dominance bookkeeping: for each member, how many dominate
        // it and the set it dominates.
        let mut dominated_by = vec![0usize; n];
        let mut dominates_list: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 0..n {
            for j in (i + 1)..n {
                match self.members[i].dominates(&self.members[j], directions)? {
                    Ordering::Greater => {
                        dominates_list[i].push(j);
                        dominated_by[j] += 1;
                    }
                    Ordering::Less => {
                        dominates_list[j].push(i);
                        dominated_by[i] += 1;
                    }
                    Ordering::Equal => {}
                }
            }
        }

        // Peel fronts: front 0 is everyone with a zero domination count.
        let mut fronts: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = (0..n).filter(|&i| dominated_by[i] == 0).collect();
        while !current.is_empty() {
            let mut next = Vec::new();
            for &i in &current {
                for &j in &dominates_list[i] {
                    dominated_by[j] -= 1;
                    if dominated_by[j] == 0 {
                        next.push(j);
                    }
                }
            }
            fronts.push(std::mem::replace(&mut current, next));
        }

        let mut rankings = vec![
            Ranking {
                front: 0,
                crowding: 0.0,
            };
            n
        ];
        for (front_index, front) in fronts.iter().enumerate() {
            for &i in front {
                rankings[i].front = front_index;
            }
            self.crowding_distances(front, directions.len(), &mut rankings)?;
        }
        for (member, ranking) in self.members.iter_mut().zip(rankings) {
            member.set_ranking(ranking);
        }
        Ok(())
    }

    /// Accumulate crowding distances for one front. For each objective the
    /// two extreme members get an infinite increment; interior members sum
    /// normalized gaps to their neighbors.
    fn crowding_distances(
        &self,
        front: &[usize],
        num_objectives: usize,
        rankings: &mut [Ranking],
    ) -> Result<(), EvolveError> {
        let k = front.len();
        if k < 2 {
            // A lone member is its own boundary on every objective.
            for &i in front {
                rankings[i].crowding = f64::INFINITY;
            }
            return Ok(());
        }

        let values: Vec<&[f64]> = front
            .iter()
            .map(|&i| self.members[i].fresh_objectives())
            .collect::<Result<_, _>>()?;

        for obj in 0..num_objectives {
            let mut order: Vec<usize> = (0..k).collect();
            order.sort_by(|&a, &b| values[a][obj].total_cmp(&values[b][obj]));

            rankings[front[order[0]]].crowding = f64::INFINITY;
            rankings[front[order[k - 1]]].crowding = f64::INFINITY;

            let range = values[order[k - 1]][obj] - values[order[0]][obj];
            if range == 0.0 {
                continue;
            }
            for w in 1..k - 1 {
                let idx = front[order[w]];
                if rankings[idx].crowding.is_finite() {
                    let gap = (values[order[w + 1]][obj] - values[order[w - 1]][obj]) / range;
                    rankings[idx].crowding += gap;
                }
            }
        }
        Ok(())
    }

    /// Elitist survivor selection: accept whole fronts in rank order while
    /// they fit, then fill the remainder from the overflowing front by
    /// descending crowding distance. Restores the population to exactly `n`.
    pub fn mo_truncation(&mut self, n: usize) -> Result<(), EvolveError> {
        if self.members.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }
        if n > self.members.len() {
            return Err(EvolveError::TruncationOverflow {
                requested: n,
                available: self.members.len(),
            });
        }
        let rankings = self.rankings()?;

        let max_front = rankings.iter().map(|r| r.front).max().unwrap_or(0);
        let mut fronts: Vec<Vec<usize>> = vec![Vec::new(); max_front + 1];
        for (i, ranking) in rankings.iter().enumerate() {
            fronts[ranking.front].push(i);
        }

        let mut keep: Vec<usize> = Vec::with_capacity(n);
        for mut front in fronts {
            if keep.len() == n {
                break;
            }
            if keep.len() + front.len() <= n {
                keep.extend(front);
            } else {
                // Stable sort keeps ties deterministic.
                front.sort_by(|&a, &b| rankings[b].crowding.total_cmp(&rankings[a].crowding));
                keep.extend(front.into_iter().take(n - keep.len()));
                break;
            }
        }

        let mut slots: Vec<Option<Individual>> = self.members.drain(..).map(Some).collect();
        self.members = keep.into_iter().filter_map(|i| slots[i].take()).collect();
        debug_assert_eq!(self.members.len(), n);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIONS: [ObjectiveDirection; 2] =
        [ObjectiveDirection::Minimize, ObjectiveDirection::Maximize];

    fn pool(objectives: &[(f64, f64)]) -> Population {
        Population {
            members: objectives
                .iter()
                .map(|&(cost, reward)| {
                    Individual::from_parts(vec![0.0, 0.0], Some(vec![cost, reward]), 0.5)
                })
                .collect(),
        }
    }

    #[test]
    fn ranking_partitions_into_valid_fronts() {
        // (1,9) and (2,12) are the trade-off front; the rest are dominated.
        let mut population = pool(&[(1.0, 9.0), (2.0, 12.0), (2.0, 9.0), (3.0, 8.0), (1.0, 9.0)]);
        population.update_ranking(&DIRECTIONS).unwrap();

        let ranks: Vec<usize> = population
            .members()
            .iter()
            .map(|m| m.ranking().unwrap().front)
            .collect();
        assert_eq!(ranks, vec![0, 0, 1, 2, 0]);

        // No front-0 member is dominated by any other member.
        for (i, a) in population.members().iter().enumerate() {
            if ranks[i] != 0 {
                continue;
            }
            for b in population.members() {
                assert_ne!(a.dominates(b, &DIRECTIONS).unwrap(), Ordering::Less);
            }
        }
    }

    #[test]
    fn boundary_members_get_infinite_crowding() {
        let mut population = pool(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0), (4.0, 8.0)]);
        population.update_ranking(&DIRECTIONS).unwrap();

        // All four are mutually non-dominating (cost and reward both rise).
        let rankings: Vec<Ranking> = population
            .members()
            .iter()
            .map(|m| m.ranking().unwrap())
            .collect();
        assert!(rankings.iter().all(|r| r.front == 0));
        assert!(rankings[0].crowding.is_infinite());
        assert!(rankings[3].crowding.is_infinite());
        assert!(rankings[1].crowding.is_finite());
        assert!(rankings[2].crowding.is_finite());
        // Interior members sum normalized neighbor gaps over both objectives.
        assert!((rankings[1].crowding - (2.0 / 3.0 + 2.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn zero_range_objective_skips_division() {
        // Identical objective vectors: one front with zero range everywhere.
        let mut population = pool(&[(2.0, 5.0), (2.0, 5.0), (2.0, 5.0)]);
        population.update_ranking(&DIRECTIONS).unwrap();
        let rankings: Vec<Ranking> = population
            .members()
            .iter()
            .map(|m| m.ranking().unwrap())
            .collect();
        assert!(rankings.iter().all(|r| r.front == 0));
        // Boundary marks still land; the interior member accumulates nothing.
        assert!(rankings[0].crowding.is_infinite());
        assert!(rankings[2].crowding.is_infinite());
        assert_eq!(rankings[1].crowding, 0.0);
    }

    #[test]
    fn truncation_is_exact_and_elitist() {
        // Fronts: {(1,9),(2,12)}, then {(2,9)}, {(2,8)}, {(3,7)} in a chain.
        let mut population = pool(&[(3.0, 7.0), (1.0, 9.0), (2.0, 9.0), (2.0, 12.0), (2.0, 8.0)]);
        population.update_ranking(&DIRECTIONS).unwrap();
        population.mo_truncation(3).unwrap();

        assert_eq!(population.len(), 3);
        let mut ranks: Vec<usize> = population
            .members()
            .iter()
            .map(|m| m.ranking().unwrap().front)
            .collect();
        ranks.sort_unstable();
        // Both front-0 members survive before any front-1 member.
        assert_eq!(ranks, vec![0, 0, 1]);
    }

    #[test]
    fn overflow_front_is_trimmed_by_crowding() {
        // Single front of four; the two boundary members must survive a cut
        // to three.
        let mut population = pool(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0), (4.0, 8.0)]);
        population.update_ranking(&DIRECTIONS).unwrap();
        population.mo_truncation(3).unwrap();

        assert_eq!(population.len(), 3);
        let survivors: Vec<f64> = population
            .members()
            .iter()
            .map(|m| m.objectives().unwrap()[0])
            .collect();
        assert!(survivors.contains(&1.0));
        assert!(survivors.contains(&4.0));
    }

    #[test]
    fn truncation_larger_than_population_fails() {
        let mut population = pool(&[(1.0, 1.0), (2.0, 2.0)]);
        population.update_ranking(&DIRECTIONS).unwrap();
        assert!(matches!(
            population.mo_truncation(5),
            Err(EvolveError::TruncationOverflow {
                requested: 5,
                available: 2
            })
        ));
    }

    #[test]
    fn unranked_population_fails_loudly() {
        let mut population = pool(&[(1.0, 1.0), (2.0, 2.0)]);
        let mut rng = EvolutionRng::new(1);
        assert!(matches!(
            population.binary_tournament(&mut rng),
            Err(EvolveError::UnrankedPopulation)
        ));
        assert!(matches!(
            population.mo_truncation(1),
            Err(EvolveError::UnrankedPopulation)
        ));
    }

    #[test]
    fn empty_population_operations_fail() {
        let mut population = Population::default();
        let mut rng = EvolutionRng::new(1);
        assert!(matches!(
            population.binary_tournament(&mut rng),
            Err(EvolveError::EmptyPopulation)
        ));
        assert!(matches!(
            population.update_ranking(&DIRECTIONS),
            Err(EvolveError::EmptyPopulation)
        ));
        assert!(matches!(
            population.mo_truncation(0),
            Err(EvolveError::EmptyPopulation)
        ));
    }

    #[test]
    fn tournament_preserves_size_and_prefers_better_ranks() {
        let mut population = pool(&[(1.0, 9.0), (2.0, 12.0), (5.0, 1.0), (6.0, 0.5)]);
        population.update_ranking(&DIRECTIONS).unwrap();
        let mut rng = EvolutionRng::new(17);
        population.binary_tournament(&mut rng).unwrap();
        assert_eq!(population.len(), 4);
        // Every pool entry carries ranking metadata cloned from a parent.
        assert!(population.members().iter().all(|m| m.ranking().is_some()));
    }

    #[test]
    fn combine_transfers_members() {
        let mut parents = pool(&[(1.0, 1.0), (2.0, 2.0)]);
        let offspring = pool(&[(3.0, 3.0)]);
        parents.combine(offspring);
        assert_eq!(parents.len(), 3);
    }
}
