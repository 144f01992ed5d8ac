//! The objective evaluator boundary.

/// Error raised by an objective evaluator. Evaluator failures are fatal to a
/// run; no retry or partial-result recovery happens at the engine layer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("objective evaluation failed: {message}")]
pub struct EvalError {
    message: String,
}

impl EvalError {
    /// Wrap an evaluator-side failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External collaborator that scores a genome.
///
/// The engine assumes nothing about how the objective vector is produced.
/// Determinism of a run requires the evaluator to be a pure function of the
/// genome; the engine calls it exactly once per stale individual per
/// generation.
pub trait ObjectiveEvaluator {
    /// Number of objectives produced per genome.
    fn objective_count(&self) -> usize;

    /// Score a genome. The result must hold exactly `objective_count` values.
    fn evaluate(&self, genome: &[f64]) -> Result<Vec<f64>, EvalError>;
}

/// Reference evaluator: cost is the action count (genome length / 2), reward
/// the sum of all genes. Used by the CLI and as a stand-in for the external
/// task simulator in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceEvaluator;

impl ObjectiveEvaluator for SequenceEvaluator {
    fn objective_count(&self) -> usize {
        2
    }

    fn evaluate(&self, genome: &[f64]) -> Result<Vec<f64>, EvalError> {
        let cost = (genome.len() / 2) as f64;
        let reward = genome.iter().sum();
        Ok(vec![cost, reward])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_evaluator_counts_actions_and_sums_genes() {
        let objectives = SequenceEvaluator.evaluate(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(objectives, vec![2.0, 10.0]);
    }

    #[test]
    fn empty_genome_scores_zero() {
        let objectives = SequenceEvaluator.evaluate(&[]).unwrap();
        assert_eq!(objectives, vec![0.0, 0.0]);
    }
}
