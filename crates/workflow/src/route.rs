use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::{DomainError, DomainResult, UserId, ValueObject};

/// One checkpoint in an approval route: a named review performed by a role,
/// within a deadline window.
///
/// Steps are compared by value. A route must not contain duplicate steps,
/// otherwise `ApprovalRoute::next_step` is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub name: String,
    pub role_name: String,
    pub required: bool,
    pub deadline_hours: i64,
}

impl ApprovalStep {
    pub fn new(name: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_name: role_name.into(),
            required: true,
            deadline_hours: 48,
        }
    }

    /// Absolute deadline for a review that started at `start`.
    pub fn deadline(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::hours(self.deadline_hours)
    }
}

impl ValueObject for ApprovalStep {}

/// Ordered sequence of approval steps a document proceeds through.
///
/// Routes are shared by value: a document holds a read-only copy, it does not
/// own or mutate the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRoute {
    pub name: String,
    pub steps: Vec<ApprovalStep>,
}

impl ApprovalRoute {
    pub fn new(name: impl Into<String>, steps: Vec<ApprovalStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// The entry point of the route.
    pub fn first_step(&self) -> DomainResult<&ApprovalStep> {
        self.steps
            .first()
            .ok_or_else(|| DomainError::route(format!("route '{}' has no steps", self.name)))
    }

    /// The step immediately following `current`, or `None` when `current` is
    /// the last step of the route.
    pub fn next_step(&self, current: &ApprovalStep) -> DomainResult<Option<&ApprovalStep>> {
        let idx = self
            .steps
            .iter()
            .position(|s| s == current)
            .ok_or_else(|| {
                DomainError::route(format!(
                    "step '{}' does not belong to route '{}'",
                    current.name, self.name
                ))
            })?;
        Ok(self.steps.get(idx + 1))
    }
}

/// A concrete review assignment produced from a route step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTask {
    pub step: ApprovalStep,
    pub assignee_id: UserId,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub comment: String,
}

impl ApprovalTask {
    pub fn new(step: ApprovalStep, assignee_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            step,
            assignee_id,
            created_at,
            completed: false,
            comment: String::new(),
        }
    }

    /// Mark the task done. Completing twice is rejected.
    pub fn complete(&mut self, comment: impl Into<String>) -> DomainResult<()> {
        if self.completed {
            return Err(DomainError::route(format!(
                "task for step '{}' is already completed",
                self.step.name
            )));
        }
        self.completed = true;
        self.comment = comment.into();
        Ok(())
    }
}
