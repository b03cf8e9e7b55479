//! Headless page controllers.
//!
//! Each controller owns the local state of one page, calls the store and
//! only replaces its state after the store call succeeds. Failures are
//! returned to the caller and also queued as notifications for the renderer.

pub mod calendar_page;
pub mod dashboard;
pub mod new_project;
pub mod project_detail;

pub use calendar_page::CalendarPage;
pub use dashboard::Dashboard;
pub use new_project::{FormField, ProjectForm};
pub use project_detail::ProjectDetail;

use crate::error::DevboardError;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

/// Queue of notifications waiting to be shown
#[derive(Debug, Default, Clone)]
pub struct Notifications {
    queue: Vec<Notification>,
}

impl Notifications {
    pub fn success(&mut self, description: impl Into<String>) {
        self.queue.push(Notification {
            level: NotificationLevel::Success,
            title: "Success".to_string(),
            description: description.into(),
        });
    }

    /// Queues an error toast carrying the error's message and hands the error back
    pub fn failure(&mut self, action: &str, err: DevboardError) -> DevboardError {
        warn!(action, error = %err, "action failed");
        self.queue.push(Notification {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: format!("Failed to {}: {}", action, err),
        });
        err
    }

    /// Takes every pending notification, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> &[Notification] {
        &self.queue
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
