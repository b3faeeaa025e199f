use mergegate_core::{Context, ResultContext, Rule, RuleError, RuleResult};
use serde_json::json;

/// Fails while the pull request has open tasks
pub struct AllTasksDone;

impl Rule for AllTasksDone {
    fn name(&self) -> &str {
        "AllTasksDone"
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        let open = context.pull_request().open_tasks().count();
        if open == 0 {
            return Ok(context.success());
        }

        Ok(context.failure(
            ResultContext::new(json!({ "open": open })).with_translation_code("open-tasks"),
        ))
    }
}
