use crate::domain::{ProjectStatus, WeekStart, TECH_STACK_OPTIONS};
use crate::error::{DevboardError, Result};
use serde::{Deserialize, Serialize};

/// Tracker configuration, persisted next to the data by file-backed stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevboardConfig {
    /// First column of the calendar grid
    pub week_start: WeekStart,
    /// Status preselected on the new project form
    pub default_project_status: ProjectStatus,
    /// Title given to tasks created with "Add Task"
    pub new_task_title: String,
    /// Technologies offered by the tech stack picker
    pub tech_stack_options: Vec<String>,
}

impl Default for DevboardConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            default_project_status: ProjectStatus::Planning,
            new_task_title: "New Task".to_string(),
            tech_stack_options: TECH_STACK_OPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DevboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.new_task_title.trim().is_empty() {
            return Err(DevboardError::ConfigError(
                "new_task_title must not be empty".to_string(),
            ));
        }

        for (i, option) in self.tech_stack_options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(DevboardError::ConfigError(
                    "tech_stack_options must not contain blank entries".to_string(),
                ));
            }
            if self.tech_stack_options[..i].contains(option) {
                return Err(DevboardError::ConfigError(format!(
                    "duplicate tech stack option: {}",
                    option
                )));
            }
        }

        Ok(())
    }

    /// Parses and validates a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
