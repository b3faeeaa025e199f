//! Read model of repositories and pull requests
//!
//! Rules only ever see immutable snapshots of these types through the
//! evaluation [`Context`](crate::Context).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Repository a pull request belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Stable repository ID (used for the repository configuration scope)
    pub id: String,

    /// Namespace, e.g. an organisation
    pub namespace: String,

    /// Repository name
    pub name: String,
}

impl Repository {
    /// Create a new repository
    pub fn new(
        id: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Repository {
            id: id.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// `namespace/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Lifecycle status of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    #[default]
    Open,
    Draft,
    Merged,
    Rejected,
}

/// Kind of a pull request comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentKind {
    /// Plain comment
    #[default]
    Comment,

    /// Task that still needs to be done
    TaskTodo,

    /// Task that has been completed
    TaskDone,
}

/// A pull request comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub kind: CommentKind,
    #[serde(default)]
    pub text: String,
}

impl Comment {
    /// Create a new comment
    pub fn new(id: impl Into<String>, author: impl Into<String>, kind: CommentKind) -> Self {
        Comment {
            id: id.into(),
            author: author.into(),
            kind,
            text: String::new(),
        }
    }

    /// Set the comment text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Whether this comment is an open task
    pub fn is_open_task(&self) -> bool {
        self.kind == CommentKind::TaskTodo
    }
}

/// Snapshot of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request ID
    pub id: String,

    /// Author user name
    pub author: String,

    /// Source branch
    pub source: String,

    /// Target branch
    pub target: String,

    /// Current status
    #[serde(default)]
    pub status: PullRequestStatus,

    /// Reviewer name -> approved
    #[serde(default)]
    pub reviewers: BTreeMap<String, bool>,

    /// Comments and tasks
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl PullRequest {
    /// Create a new open pull request without reviewers or comments
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        PullRequest {
            id: id.into(),
            author: author.into(),
            source: source.into(),
            target: target.into(),
            status: PullRequestStatus::Open,
            reviewers: BTreeMap::new(),
            comments: Vec::new(),
        }
    }

    /// Add or replace a reviewer
    pub fn with_reviewer(mut self, name: impl Into<String>, approved: bool) -> Self {
        self.reviewers.insert(name.into(), approved);
        self
    }

    /// Add a comment
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Number of reviewers that approved
    pub fn approval_count(&self) -> usize {
        self.reviewers.values().filter(|approved| **approved).count()
    }

    /// Whether the given reviewer approved
    pub fn is_approved_by(&self, reviewer: &str) -> bool {
        self.reviewers.get(reviewer).copied().unwrap_or(false)
    }

    /// Reviewers that have not approved yet, in name order
    pub fn pending_reviewers(&self) -> Vec<&str> {
        self.reviewers
            .iter()
            .filter(|(_, approved)| !**approved)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Comments that are open tasks
    pub fn open_tasks(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.is_open_task())
    }
}
