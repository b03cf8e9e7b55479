//! # Devboard Core
//!
//! Core business logic and domain models for the Devboard project tracker.
//!
//! This crate provides projects, tasks, task ordering, status filtering and
//! calendar bucketing, a storage abstraction with in-memory and file-backed
//! implementations, and headless page controllers. It has no dependency on
//! any particular UI.

pub mod config;
pub mod domain;
pub mod error;
pub mod mock;
pub mod storage;
pub mod view;

// Re-export commonly used types
pub use config::DevboardConfig;
pub use domain::{
    build_calendar, calendar_entries, filter_projects, sort_tasks_for_display, CalendarEntry,
    CalendarGrid, CalendarMonth, NewProject, NewTask, Project, ProjectId, ProjectPatch,
    ProjectStatus, StatusFilter, Task, TaskId, TaskPatch, WeekStart,
};
pub use error::{DevboardError, Result};
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use storage::{InMemoryStorage, Storage};
