use mergegate_core::{Context, ResultContext, Rule, RuleError, RuleResult};
use serde_json::json;

/// Fails unless there is at least one reviewer and every reviewer approved
pub struct ApprovedByAllReviewers;

impl Rule for ApprovedByAllReviewers {
    fn name(&self) -> &str {
        "ApprovedByAllReviewers"
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        let pull_request = context.pull_request();

        if pull_request.reviewers.is_empty() {
            return Ok(context.failure(
                ResultContext::new(json!({ "missing": [] })).with_translation_code("no-reviewers"),
            ));
        }

        let missing = pull_request.pending_reviewers();
        if missing.is_empty() {
            Ok(context.success())
        } else {
            Ok(context.failure(
                ResultContext::new(json!({ "missing": missing }))
                    .with_translation_code("missing-approvals"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::{context, pull_request};

    fn validate(pr: mergegate_core::PullRequest) -> RuleResult {
        ApprovedByAllReviewers
            .validate(&context("ApprovedByAllReviewers", pr, None))
            .unwrap()
    }

    #[test]
    fn test_all_approved() {
        let pr = pull_request()
            .with_reviewer("alice", true)
            .with_reviewer("bob", true);
        assert!(validate(pr).is_success());
    }

    #[test]
    fn test_pending_reviewers_listed() {
        let pr = pull_request()
            .with_reviewer("carol", false)
            .with_reviewer("alice", true)
            .with_reviewer("bob", false);

        let result = validate(pr);
        assert!(result.failed);
        assert_eq!(
            result.context.unwrap().details,
            json!({"missing": ["bob", "carol"]})
        );
    }

    #[test]
    fn test_no_reviewers_fails() {
        let result = validate(pull_request());
        assert!(result.failed);
        assert_eq!(
            result.context.unwrap().translation_code.as_deref(),
            Some("no-reviewers")
        );
    }
}
