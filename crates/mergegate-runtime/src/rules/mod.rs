//! Built-in rules

mod all_tasks_done;
mod approved_by_all_reviewers;
mod approved_by_reviewer;
mod approved_by_x_reviewers;

pub use all_tasks_done::AllTasksDone;
pub use approved_by_all_reviewers::ApprovedByAllReviewers;
pub use approved_by_reviewer::{ApprovedByReviewer, ApprovedByReviewerConfiguration};
pub use approved_by_x_reviewers::{ApprovedByXReviewers, ApprovedByXReviewersConfiguration};

use crate::registry::RuleRegistryBuilder;

/// Register every built-in rule together with its configuration type
pub(crate) fn register_builtin(builder: RuleRegistryBuilder) -> RuleRegistryBuilder {
    builder
        .rule(AllTasksDone)
        .rule(ApprovedByAllReviewers)
        .rule(ApprovedByXReviewers)
        .configuration::<ApprovedByXReviewersConfiguration>()
        .rule(ApprovedByReviewer)
        .configuration::<ApprovedByReviewerConfiguration>()
}
