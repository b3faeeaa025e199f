use mergegate_core::{
    ConfigurationType, Constraint, Context, FieldDescriptor, FieldType, ResultContext, Rule,
    RuleError, RuleResult, TypeDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Minimum number of approvals required by [`ApprovedByXReviewers`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedByXReviewersConfiguration {
    pub number_of_reviewers: u32,
}

impl ApprovedByXReviewersConfiguration {
    pub fn new(number_of_reviewers: u32) -> Self {
        Self {
            number_of_reviewers,
        }
    }
}

impl ConfigurationType for ApprovedByXReviewersConfiguration {
    const TYPE_TAG: &'static str = "approved-by-x-reviewers";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_TAG)
            .with_description("Minimum number of approving reviewers")
            .add_field(
                FieldDescriptor::new("numberOfReviewers", FieldType::Integer)
                    .required()
                    .with_constraint(Constraint::Minimum(1)),
            )
    }
}

/// Fails while fewer than the configured number of reviewers approved
pub struct ApprovedByXReviewers;

impl Rule for ApprovedByXReviewers {
    fn name(&self) -> &str {
        "ApprovedByXReviewers"
    }

    fn configuration_type(&self) -> Option<&'static str> {
        Some(ApprovedByXReviewersConfiguration::TYPE_TAG)
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        let expected = context
            .configuration::<ApprovedByXReviewersConfiguration>()?
            .number_of_reviewers as usize;
        let actual = context.pull_request().approval_count();

        if actual >= expected {
            return Ok(context.success());
        }

        Ok(context.failure(
            ResultContext::new(json!({
                "expected": expected,
                "actual": actual,
                "missing": expected - actual,
            }))
            .with_translation_code("missing-approvals"),
        ))
    }
}
