//! Mutation policies for variable-length genomes.
//!
//! Three operators from the project's history live behind one dispatch: the
//! canonical hybrid perturb-or-extend, a blind extension, and a
//! trial-and-keep-best extension that consults the evaluator. The caller
//! self-adapts the mutation rate before dispatching here.

use crate::schema::{EvolutionConfig, MutationPolicy};

use super::EvolveError;
use super::evaluator::ObjectiveEvaluator;
use super::individual::Individual;
use super::rng::EvolutionRng;

/// Gaussian perturbation strength as a fraction of `gene_range`.
const PERTURB_STRENGTH: f64 = 0.05;

/// Per-gene perturbation probability at the earliest mutable gene; falls off
/// linearly to zero at the last gene.
const PERTURB_PEAK: f64 = 0.05;

/// Index of the first gene the perturbation mode may touch. The first action
/// pair is protected.
const FIRST_MUTABLE_GENE: usize = 2;

/// Apply the configured policy to one individual.
pub(crate) fn apply(
    individual: &mut Individual,
    config: &EvolutionConfig,
    rng: &mut EvolutionRng,
    evaluator: &dyn ObjectiveEvaluator,
) -> Result<(), EvolveError> {
    match config.mutation {
        MutationPolicy::HybridPerturbExtend => {
            hybrid(individual, config, rng);
            Ok(())
        }
        MutationPolicy::BlindExtend => {
            extend(individual, config, rng);
            individual.invalidate_objectives();
            Ok(())
        }
        MutationPolicy::TrialExtend => trial_extend(individual, config, rng, evaluator),
    }
}

/// With probability `mutation_rate`, perturb existing genes; otherwise append
/// fresh action blocks. Objectives are invalidated either way.
fn hybrid(individual: &mut Individual, config: &EvolutionConfig, rng: &mut EvolutionRng) {
    if rng.coin(individual.mutation_rate()) {
        perturb(individual, config, rng);
    } else {
        extend(individual, config, rng);
    }
    individual.invalidate_objectives();
}

/// Positional Gaussian perturbation. The perturbation probability decreases
/// linearly from `PERTURB_PEAK` at the earliest mutable gene to zero at the
/// last gene, keeping the tail (most recently added actions) stable.
fn perturb(individual: &mut Individual, config: &EvolutionConfig, rng: &mut EvolutionRng) {
    let len = individual.genome().len();
    if len <= FIRST_MUTABLE_GENE {
        return;
    }
    let last = len - 1;
    let span = (last - FIRST_MUTABLE_GENE) as f64;
    let strength = PERTURB_STRENGTH * config.gene_range;
    let gene_range = config.gene_range;
    let genome = individual.genome_mut();
    for i in FIRST_MUTABLE_GENE..len {
        let p = if span == 0.0 {
            PERTURB_PEAK
        } else {
            PERTURB_PEAK * (last - i) as f64 / span
        };
        if rng.coin(p) {
            let noise = rng.standard_normal();
            genome[i] = (genome[i] + noise * strength).clamp(0.0, gene_range);
        }
    }
}

/// Append a random number of whole actions (up to one block), capped so the
/// genome never exceeds `max_genes`.
fn extend(individual: &mut Individual, config: &EvolutionConfig, rng: &mut EvolutionRng) {
    let drawn = rng.count(config.block_action_size);
    let room = config.max_genes.saturating_sub(individual.genome().len()) / 2;
    let actions = drawn.min(room);
    let gene_range = config.gene_range;
    let genome = individual.genome_mut();
    for _ in 0..actions {
        let a = rng.uniform(0.0, gene_range);
        let b = rng.uniform(0.0, gene_range);
        genome.push(a);
        genome.push(b);
    }
}

/// Try `num_tries_per_mutation` candidate extensions of one full block each,
/// measuring every candidate through the evaluator, and adopt the best
/// candidate only if it strictly improves on the current objectives (higher
/// reward, then lower cost). Adopted objectives are stored directly since
/// they were just measured.
fn trial_extend(
    individual: &mut Individual,
    config: &EvolutionConfig,
    rng: &mut EvolutionRng,
    evaluator: &dyn ObjectiveEvaluator,
) -> Result<(), EvolveError> {
    individual.evaluate_objectives(evaluator)?;
    if individual.genome().len() >= config.max_genes {
        return Ok(());
    }

    let genes_to_add = config.genes_per_block();
    let mut best_objectives = individual.fresh_objectives()?.to_vec();
    let mut best_genome: Option<Vec<f64>> = None;

    for _ in 0..config.num_tries_per_mutation {
        if individual.genome().len() + genes_to_add > config.max_genes {
            continue;
        }
        let mut candidate = individual.genome().to_vec();
        for _ in 0..genes_to_add {
            candidate.push(rng.uniform(0.0, config.gene_range));
        }
        let objectives = evaluator.evaluate(&candidate)?;
        if objectives.len() != evaluator.objective_count() {
            return Err(EvolveError::ObjectiveArity {
                expected: evaluator.objective_count(),
                got: objectives.len(),
            });
        }
        if improves(&objectives, &best_objectives) {
            best_objectives = objectives;
            best_genome = Some(candidate);
        }
    }

    if let Some(genome) = best_genome {
        individual.adopt(genome, best_objectives);
    }
    Ok(())
}

/// Reward (index 1) decides; cost (index 0) breaks ties.
fn improves(candidate: &[f64], incumbent: &[f64]) -> bool {
    candidate[1] > incumbent[1] || (candidate[1] == incumbent[1] && candidate[0] < incumbent[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::evaluator::SequenceEvaluator;

    fn small_config(policy: MutationPolicy) -> EvolutionConfig {
        EvolutionConfig {
            max_genes: 12,
            block_action_size: 2,
            gene_range: 10.0,
            num_tries_per_mutation: 4,
            mutation: policy,
            ..Default::default()
        }
    }

    #[test]
    fn extension_never_exceeds_genome_cap() {
        let config = small_config(MutationPolicy::BlindExtend);
        let mut rng = EvolutionRng::new(9);
        let mut individual =
            Individual::random(&config, &mut rng, &SequenceEvaluator).unwrap();

        for _ in 0..50 {
            apply(&mut individual, &config, &mut rng, &SequenceEvaluator).unwrap();
            assert!(individual.genome().len() <= config.max_genes);
            assert_eq!(individual.genome().len() % 2, 0);
        }
    }

    #[test]
    fn hybrid_keeps_genes_in_range_and_protects_first_action() {
        let mut config = small_config(MutationPolicy::HybridPerturbExtend);
        config.min_mutation_rate = 1.0; // force the perturbation branch
        let mut rng = EvolutionRng::new(4);
        let mut individual =
            Individual::random(&config, &mut rng, &SequenceEvaluator).unwrap();
        // Grow the genome so several genes are mutable.
        extend(&mut individual, &config, &mut rng);
        extend(&mut individual, &config, &mut rng);
        let first_action = [individual.genome()[0], individual.genome()[1]];

        for _ in 0..50 {
            individual.mutate(&config, &mut rng, &SequenceEvaluator).unwrap();
            assert!(
                individual
                    .genome()
                    .iter()
                    .all(|&g| (0.0..=config.gene_range).contains(&g))
            );
            assert_eq!(individual.genome()[0], first_action[0]);
            assert_eq!(individual.genome()[1], first_action[1]);
        }
    }

    #[test]
    fn trial_extend_only_adopts_improvements() {
        let config = small_config(MutationPolicy::TrialExtend);
        let mut rng = EvolutionRng::new(2);
        let mut individual =
            Individual::random(&config, &mut rng, &SequenceEvaluator).unwrap();
        let base_reward = individual.objectives().unwrap()[1];

        apply(&mut individual, &config, &mut rng, &SequenceEvaluator).unwrap();

        // Objectives stay fresh under this policy.
        let objectives = individual.objectives().unwrap();
        assert!(objectives[1] >= base_reward);
        // Reward is the gene sum, so any adopted extension must raise it.
        if individual.genome().len() > config.genes_per_block() {
            assert!(objectives[1] > base_reward);
        }
    }

    #[test]
    fn trial_extend_is_a_no_op_at_the_cap() {
        let config = small_config(MutationPolicy::TrialExtend);
        let mut rng = EvolutionRng::new(2);
        let mut individual = Individual::from_parts(vec![1.0; 12], None, 0.5);
        individual.evaluate_objectives(&SequenceEvaluator).unwrap();

        apply(&mut individual, &config, &mut rng, &SequenceEvaluator).unwrap();
        assert_eq!(individual.genome().len(), 12);
    }
}
