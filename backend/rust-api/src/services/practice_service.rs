use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::{Difficulty, PracticeProblem};

/// In-memory bank of coding practice problems, loaded once at startup
/// from a JSON file. Selection is uniform over the tag/difficulty
/// filtered candidates; the random source is injected so tests can
/// seed it.
#[derive(Default)]
pub struct ProblemBank {
    problems: Vec<PracticeProblem>,
}

impl ProblemBank {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem bank at {}", path.display()))?;
        let problems: Vec<PracticeProblem> =
            serde_json::from_str(&raw).context("Failed to parse problem bank JSON")?;

        tracing::info!(
            "Problem bank loaded: {} problems from {}",
            problems.len(),
            path.display()
        );
        Ok(Self { problems })
    }

    pub fn from_problems(problems: Vec<PracticeProblem>) -> Self {
        Self { problems }
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Uniform pick among problems tagged with `topic` at `difficulty`;
    /// `None` when nothing matches.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        topic: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<&PracticeProblem> {
        let candidates: Vec<&PracticeProblem> = self
            .problems
            .iter()
            .filter(|p| p.difficulty == difficulty && p.tags.iter().any(|t| t == topic))
            .collect();

        candidates.choose(rng).copied()
    }
}
