//! Crises and the solutions a player can throw at them

use serde::{Deserialize, Serialize};

/// Whether a solution saves the day. Fixed per solution in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Outcome::Success => "✔",
            Outcome::Failure => "✘",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failure => write!(f, "FAILURE"),
        }
    }
}

/// One player-selectable action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub id: String,
    pub text: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meme_image: Option<String>,
}

impl Solution {
    pub fn new(id: &str, text: &str, outcome: Outcome) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            outcome,
            success_message: None,
            failure_message: None,
            meme_image: None,
        }
    }

    pub fn success_message(mut self, message: &str) -> Self {
        self.success_message = Some(message.to_string());
        self
    }

    pub fn failure_message(mut self, message: &str) -> Self {
        self.failure_message = Some(message.to_string());
        self
    }
}

/// A scenario the player must address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crisis {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub solutions: Vec<Solution>,

    /// Fallback crisis substituted in when a solution fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_b: Option<Box<Crisis>>,
}

impl Crisis {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: String::new(),
            solutions: Vec::new(),
            plan_b: None,
        }
    }

    pub fn with_solution(mut self, solution: Solution) -> Self {
        self.solutions.push(solution);
        self
    }

    pub fn with_plan_b(mut self, plan_b: Crisis) -> Self {
        self.plan_b = Some(Box::new(plan_b));
        self
    }

    pub fn plan_b(&self) -> Option<&Crisis> {
        self.plan_b.as_deref()
    }

    pub fn solution(&self, id: &str) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.id == id)
    }

    pub fn has_solution(&self, solution: &Solution) -> bool {
        self.solutions.iter().any(|s| s == solution)
    }

    /// This crisis followed by every Plan B beneath it
    pub fn chain(&self) -> PlanBChain<'_> {
        PlanBChain { next: Some(self) }
    }
}

/// Iterator over a crisis and its nested fallbacks
pub struct PlanBChain<'a> {
    next: Option<&'a Crisis>,
}

impl<'a> Iterator for PlanBChain<'a> {
    type Item = &'a Crisis;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.plan_b();
        Some(current)
    }
}
