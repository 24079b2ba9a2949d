//! Validation rules for inbound `TaskRequest` payloads.
//!
//! Every rule runs, including several rules on the same field; violations
//! are collected in field order (title, description, status, dueDate) rather
//! than stopping at the first one. Length limits pass on empty strings, so an
//! empty title or description reports only its "required" message, while an
//! empty status or a missing due date reports two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{TaskRequest, TaskStatus};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// One failed rule: the JSON field name and a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Outcome of validating a task. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    fn push(&mut self, field: &str, message: &str) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

/// Validate against the current UTC time.
pub fn validate(task: &TaskRequest) -> ValidationResult {
    validate_at(task, Utc::now())
}

/// Validate with an explicit notion of "now" for the due-date rule.
pub fn validate_at(task: &TaskRequest, now: DateTime<Utc>) -> ValidationResult {
    let mut result = ValidationResult::default();

    if is_blank(&task.title) {
        result.push("title", "Title is required.");
    }
    if task.title.chars().count() > TITLE_MAX_CHARS {
        result.push("title", "Title cannot exceed 200 characters.");
    }

    if is_blank(&task.description) {
        result.push("description", "Description is required.");
    }
    if task.description.chars().count() > DESCRIPTION_MAX_CHARS {
        result.push("description", "Description cannot exceed 1000 characters.");
    }

    if is_blank(&task.status) {
        result.push("status", "Status is required.");
    }
    if TaskStatus::parse(&task.status).is_none() {
        result.push(
            "status",
            "Status must be one of: Pending, In Progress, Completed, Cancelled.",
        );
    }

    // A missing due date fails both rules.
    if task.due_date.is_none() {
        result.push("dueDate", "Due date is required.");
    }
    if task.due_date.map_or(true, |due| due <= now) {
        result.push("dueDate", "Due date cannot be in the past.");
    }

    result
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
