//! Application services for task tracking.

mod board;
mod client;

pub use board::{
    LoadState, Notice, NoticeSeverity, PendingMutation, TaskBoard, TaskBoardError,
    TaskBoardResult,
};
pub use client::{CreateTaskRequest, TaskClient, TaskClientError, TaskClientResult};
