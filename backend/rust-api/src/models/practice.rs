use serde::{Deserialize, Serialize};

use super::Difficulty;

/// One coding practice problem from the local problem bank file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeProblem {
    pub title: String,
    #[serde(rename = "titleSlug")]
    pub title_slug: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

/// Problem as handed to the client, with the canonical external URL.
#[derive(Debug, Serialize)]
pub struct ProblemView {
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub url: String,
}

impl From<&PracticeProblem> for ProblemView {
    fn from(p: &PracticeProblem) -> Self {
        Self {
            title: p.title.clone(),
            slug: p.title_slug.clone(),
            difficulty: p.difficulty,
            url: format!("https://leetcode.com/problems/{}/", p.title_slug),
        }
    }
}
