//! Task status values and the forward-only status lifecycle.

use super::{ParseLifecycleError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task status as exchanged with the task API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created and work has not started.
    #[default]
    Pending,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Done,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Done];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the upper-case display label, e.g. `IN PROGRESS`.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ").to_ascii_uppercase()
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action offered for advancing a task one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusAction {
    /// Moves a pending task into progress.
    Start,
    /// Marks a task as done.
    Complete,
}

impl StatusAction {
    /// Returns a short verb for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
        }
    }
}

/// Status lifecycle variant used when computing the next status.
///
/// Both variants are linear and forward-only: no transition ever moves a
/// task back to an earlier status, and `done` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLifecycle {
    /// `pending -> done`.
    TwoState,
    /// `pending -> in_progress -> done`.
    #[default]
    ThreeState,
}

impl StatusLifecycle {
    /// Returns the canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoState => "two_state",
            Self::ThreeState => "three_state",
        }
    }

    /// Computes the status one step after `current`.
    ///
    /// Applying this to [`TaskStatus::Done`] returns `Done`.
    #[must_use]
    pub const fn next(self, current: TaskStatus) -> TaskStatus {
        match (self, current) {
            (Self::ThreeState, TaskStatus::Pending) => TaskStatus::InProgress,
            (_, TaskStatus::Pending | TaskStatus::InProgress | TaskStatus::Done) => {
                TaskStatus::Done
            }
        }
    }

    /// Returns how many [`Self::next`] applications reach `done`.
    #[must_use]
    pub const fn steps_to_done(self, current: TaskStatus) -> usize {
        match (self, current) {
            (_, TaskStatus::Done) => 0,
            (Self::ThreeState, TaskStatus::Pending) => 2,
            (_, TaskStatus::Pending | TaskStatus::InProgress) => 1,
        }
    }

    /// Returns the action available for a task in `current`, if any.
    #[must_use]
    pub const fn action(self, current: TaskStatus) -> Option<StatusAction> {
        if current.is_terminal() {
            return None;
        }
        match self.next(current) {
            TaskStatus::InProgress => Some(StatusAction::Start),
            TaskStatus::Pending | TaskStatus::Done => Some(StatusAction::Complete),
        }
    }
}

impl TryFrom<&str> for StatusLifecycle {
    type Error = ParseLifecycleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "two_state" => Ok(Self::TwoState),
            "three_state" => Ok(Self::ThreeState),
            _ => Err(ParseLifecycleError(value.to_owned())),
        }
    }
}

impl fmt::Display for StatusLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
