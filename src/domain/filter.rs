use crate::domain::project::{Project, ProjectStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status selection on the projects dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
    /// A status name this crate does not know; matches nothing
    Unknown(String),
}

impl StatusFilter {
    /// Parses a filter value. Never fails: `"all"` (or an empty string)
    /// means no filter and unrecognized names become [`StatusFilter::Unknown`].
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        match trimmed.parse::<ProjectStatus>() {
            Ok(status) => Self::Only(status),
            Err(_) => Self::Unknown(trimmed.to_string()),
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => project.status == *status,
            Self::Unknown(_) => false,
        }
    }

    /// Label for the filter button
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Projects",
            Self::Only(status) => status.label(),
            Self::Unknown(name) => name,
        }
    }

    /// Every selectable filter in button order
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(Self::All)
            .chain(ProjectStatus::ALL.iter().copied().map(Self::Only))
            .collect()
    }
}

impl From<ProjectStatus> for StatusFilter {
    fn from(status: ProjectStatus) -> Self {
        Self::Only(status)
    }
}

impl From<Option<ProjectStatus>> for StatusFilter {
    fn from(status: Option<ProjectStatus>) -> Self {
        status.map(Self::Only).unwrap_or(Self::All)
    }
}

impl From<&str> for StatusFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(status) => write!(f, "{}", status.as_str()),
            Self::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Returns the projects matching `filter`, in input order
pub fn filter_projects(projects: &[Project], filter: &StatusFilter) -> Vec<Project> {
    match filter {
        StatusFilter::All => projects.to_vec(),
        _ => projects
            .iter()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect(),
    }
}
