//! Evaluation result types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Translation code used for failures produced by the evaluation boundary
pub const EVALUATION_ERROR_CODE: &str = "evaluation-error";

/// Optional detail attached to a rule result
///
/// The engine never interprets this; it exists so a presentation layer can
/// pick a message per failure kind ("missing 1 of 2 required approvals").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultContext {
    /// Code a translation layer can map to a human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_code: Option<String>,

    /// Rule specific data
    #[serde(default)]
    pub details: Value,
}

impl ResultContext {
    /// Create a context carrying only details
    pub fn new(details: Value) -> Self {
        Self {
            translation_code: None,
            details,
        }
    }

    /// Set the translation code
    pub fn with_translation_code(mut self, code: impl Into<String>) -> Self {
        self.translation_code = Some(code.into());
        self
    }

    /// Diagnostic context for a rule that could not be evaluated
    pub fn evaluation_error(reason: &str, message: impl Into<String>) -> Self {
        Self::new(serde_json::json!({
            "reason": reason,
            "message": message.into(),
        }))
        .with_translation_code(EVALUATION_ERROR_CODE)
    }

    /// Whether this context describes an evaluation error rather than a verdict
    pub fn is_evaluation_error(&self) -> bool {
        self.translation_code.as_deref() == Some(EVALUATION_ERROR_CODE)
    }
}

/// Outcome of evaluating one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Identity of the rule that produced this result
    pub rule: String,

    /// Whether the rule failed
    pub failed: bool,

    /// Optional failure detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResultContext>,
}

impl RuleResult {
    /// Successful result
    pub fn success(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            failed: false,
            context: None,
        }
    }

    /// Failed result without detail
    pub fn failed(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            failed: true,
            context: None,
        }
    }

    /// Failed result with detail
    pub fn failed_with(rule: impl Into<String>, context: ResultContext) -> Self {
        Self {
            rule: rule.into(),
            failed: true,
            context: Some(context),
        }
    }

    /// Whether the rule succeeded
    pub fn is_success(&self) -> bool {
        !self.failed
    }
}

/// All rule outcomes of one evaluation, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Results {
    results: Vec<RuleResult>,
}

impl Results {
    /// Create empty results
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result
    pub fn push(&mut self, result: RuleResult) {
        self.results.push(result);
    }

    /// True iff no result failed
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(RuleResult::is_success)
    }

    /// Failed results in evaluation order
    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| r.failed)
    }

    /// First result produced by the given rule
    pub fn get(&self, rule: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.rule == rule)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl From<Vec<RuleResult>> for Results {
    fn from(results: Vec<RuleResult>) -> Self {
        Self { results }
    }
}

impl FromIterator<RuleResult> for Results {
    fn from_iter<I: IntoIterator<Item = RuleResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Results {
    type Item = RuleResult;
    type IntoIter = std::vec::IntoIter<RuleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a Results {
    type Item = &'a RuleResult;
    type IntoIter = std::slice::Iter<'a, RuleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Reason a merge is currently blocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Identity of the failing rule
    pub key: String,

    /// Generic message; a translation layer may refine it
    pub message: String,

    /// Whether a user may merge anyway
    pub overrideable: bool,
}

impl Obstacle {
    /// Obstacle for a failed rule result
    pub fn for_failure(result: &RuleResult) -> Self {
        Self {
            key: result.rule.clone(),
            message: format!("rule failed: {}", result.rule),
            overrideable: true,
        }
    }
}
