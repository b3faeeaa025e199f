//! The rule strategy trait

use crate::context::Context;
use crate::error::RuleError;
use crate::result::RuleResult;

/// A named, stateless validator
///
/// Implementations read repository and pull request state through the
/// [`Context`] and must not mutate anything. The name is the rule's stable
/// identity: it is what rulesets persist and what obstacles are keyed by.
///
/// # Example
///
/// ```rust
/// use mergegate_core::{Context, Rule, RuleError, RuleResult};
///
/// struct NotFromMain;
///
/// impl Rule for NotFromMain {
///     fn name(&self) -> &str {
///         "NotFromMain"
///     }
///
///     fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
///         if context.pull_request().source == "main" {
///             Ok(RuleResult::failed(self.name()))
///         } else {
///             Ok(context.success())
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Stable identity of this rule
    fn name(&self) -> &str;

    /// Whether the rule may appear more than once in a ruleset
    fn allows_multiple_instances(&self) -> bool {
        false
    }

    /// Type tag of the configuration this rule expects, if any
    fn configuration_type(&self) -> Option<&'static str> {
        None
    }

    /// Evaluate the rule
    ///
    /// Returning an error does not let the merge through: the engine turns it
    /// into a failed result with a diagnostic context.
    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError>;
}
