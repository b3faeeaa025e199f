use mergegate_core::{
    ConfigurationType, Constraint, Context, FieldDescriptor, FieldType, ResultContext, Rule,
    RuleError, RuleResult, TypeDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Reviewer whose approval [`ApprovedByReviewer`] requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedByReviewerConfiguration {
    pub username: String,
}

impl ApprovedByReviewerConfiguration {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl ConfigurationType for ApprovedByReviewerConfiguration {
    const TYPE_TAG: &'static str = "approved-by-reviewer";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_TAG)
            .with_description("User that must approve")
            .add_field(
                FieldDescriptor::new("username", FieldType::String)
                    .required()
                    .with_constraint(Constraint::NotBlank),
            )
    }
}

/// Fails unless a specific user approved
///
/// May be applied once per required reviewer.
pub struct ApprovedByReviewer;

impl Rule for ApprovedByReviewer {
    fn name(&self) -> &str {
        "ApprovedByReviewer"
    }

    fn allows_multiple_instances(&self) -> bool {
        true
    }

    fn configuration_type(&self) -> Option<&'static str> {
        Some(ApprovedByReviewerConfiguration::TYPE_TAG)
    }

    fn validate(&self, context: &Context) -> Result<RuleResult, RuleError> {
        let username = &context
            .configuration::<ApprovedByReviewerConfiguration>()?
            .username;

        if context.pull_request().is_approved_by(username) {
            Ok(context.success())
        } else {
            Ok(context.failure(
                ResultContext::new(json!({ "username": username }))
                    .with_translation_code("missing-reviewer-approval"),
            ))
        }
    }
}
