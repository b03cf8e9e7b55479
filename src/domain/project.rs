use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::{DevboardError, Result};

/// Technologies offered by the tech stack picker.
pub const TECH_STACK_OPTIONS: &[&str] = &[
    "React",
    "Next.js",
    "Vue",
    "Angular",
    "Svelte",
    "JavaScript",
    "TypeScript",
    "Node.js",
    "Express",
    "Nest.js",
    "Python",
    "Django",
    "Flask",
    "Ruby",
    "Rails",
    "PHP",
    "Laravel",
    "Go",
    "Rust",
    "Java",
    "Spring",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Firebase",
    "Supabase",
    "GraphQL",
    "REST",
    "Tailwind CSS",
    "Styled Components",
    "Material UI",
    "Vercel",
    "Netlify",
    "AWS",
    "GCP",
    "Azure",
    "Docker",
    "Kubernetes",
];

/// Unique identifier for a project, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generates a fresh random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ProjectId {
    type Err = DevboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DevboardError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// All statuses in display order
    pub const ALL: [ProjectStatus; 5] = [
        Self::Planning,
        Self::Active,
        Self::OnHold,
        Self::Completed,
        Self::Archived,
    ];

    /// Wire name, e.g. `on-hold`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Human readable label, e.g. `On Hold`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Active => "Active",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Archived => "Archived",
        }
    }

    /// The status after this one when cycling through the badge, wrapping
    /// from `Archived` back to `Planning`.
    pub fn next(&self) -> ProjectStatus {
        let index = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "on-hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(format!(
                "Invalid project status '{}'. Valid statuses: planning, active, on-hold, completed, archived",
                s
            )),
        }
    }
}

/// A tracked software project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Builds the stored record for a validated creation request
    pub fn from_new(id: ProjectId, new: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            status: new.status,
            tech_stack: new.tech_stack,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_tech(&self, tech: &str) -> bool {
        self.tech_stack.iter().any(|t| t == tech)
    }

    /// Returns the tech stack with `tech` appended, or `None` when the
    /// project already lists it.
    pub fn tech_stack_with(&self, tech: &str) -> Option<Vec<String>> {
        let tech = tech.trim();
        if tech.is_empty() || self.has_tech(tech) {
            return None;
        }
        let mut stack = self.tech_stack.clone();
        stack.push(tech.to_string());
        Some(stack)
    }

    /// Returns the tech stack without `tech`, or `None` when it is not listed.
    pub fn tech_stack_without(&self, tech: &str) -> Option<Vec<String>> {
        if !self.has_tech(tech) {
            return None;
        }
        Some(
            self.tech_stack
                .iter()
                .filter(|t| t.as_str() != tech)
                .cloned()
                .collect(),
        )
    }

    /// Catalogue entries not yet on this project, in catalogue order
    pub fn available_tech<'a>(&self, options: &'a [String]) -> Vec<&'a str> {
        options
            .iter()
            .map(String::as_str)
            .filter(|option| !self.has_tech(option))
            .collect()
    }

    /// Moves `updated_at` forward, never backward
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Applies a validated patch and bumps `updated_at`
    pub fn apply(&mut self, patch: ProjectPatch, now: DateTime<Utc>) -> Result<()> {
        let ProjectPatch {
            name,
            description,
            status,
            tech_stack,
            start_date,
            end_date,
        } = patch;

        let start = start_date.unwrap_or(self.start_date);
        let end = end_date.unwrap_or(self.end_date);
        validate_date_range(start, end)?;

        if let Some(name) = name {
            self.name = validate_name(&name)?;
        }
        if let Some(description) = description {
            self.description = normalize_text(description);
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(tech_stack) = tech_stack {
            self.tech_stack = dedup_tags(tech_stack);
        }
        self.start_date = start;
        self.end_date = end;
        self.touch(now);
        Ok(())
    }
}

/// Input for creating a project. Optional fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tech_stack<I, S>(mut self, tech: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech_stack = tech.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Checks required fields and returns the normalized request: trimmed
    /// name, blank description dropped, tech stack deduplicated.
    pub fn validate(self) -> Result<Self> {
        validate_date_range(self.start_date, self.end_date)?;
        Ok(Self {
            name: validate_name(&self.name)?,
            description: normalize_text(self.description),
            status: self.status,
            tech_stack: dedup_tags(self.tech_stack),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Partial update for a project. `None` leaves a field untouched; for
/// nullable columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single-field edit made from the project detail page
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    Name(String),
    Description(Option<String>),
    Status(ProjectStatus),
    TechStack(Vec<String>),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
}

impl From<ProjectField> for ProjectPatch {
    fn from(field: ProjectField) -> Self {
        let mut patch = ProjectPatch::default();
        match field {
            ProjectField::Name(name) => patch.name = Some(name),
            ProjectField::Description(description) => patch.description = Some(description),
            ProjectField::Status(status) => patch.status = Some(status),
            ProjectField::TechStack(stack) => patch.tech_stack = Some(stack),
            ProjectField::StartDate(date) => patch.start_date = Some(date),
            ProjectField::EndDate(date) => patch.end_date = Some(date),
        }
        patch
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DevboardError::Validation(
            "Project name is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(DevboardError::Validation(format!(
                "End date {} is before start date {}",
                end, start
            )));
        }
    }
    Ok(())
}

/// Trims free text; blank becomes `None`
pub(crate) fn normalize_text(text: Option<String>) -> Option<String> {
    text.and_then(|t| {
        let trimmed = t.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trims tags, drops blanks and keeps the first occurrence of each tag
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
