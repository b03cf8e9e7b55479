use crate::config::DevboardConfig;
use crate::domain::{NewProject, Project, ProjectStatus};
use crate::error::Result;
use crate::storage::Storage;
use crate::view::Notifications;
use chrono::NaiveDate;
use tracing::info;

/// A typed edit to one field of the new project form
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Name(String),
    Description(String),
    Status(ProjectStatus),
    AddTech(String),
    RemoveTech(String),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
}

/// State of the "Create New Project" form
#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub tech_stack: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_submitting: bool,
    pub notifications: Notifications,
}

impl ProjectForm {
    pub fn new(config: &DevboardConfig) -> Self {
        Self {
            status: config.default_project_status,
            ..Default::default()
        }
    }

    pub fn set(&mut self, field: FormField) {
        match field {
            FormField::Name(name) => self.name = name,
            FormField::Description(description) => self.description = description,
            FormField::Status(status) => self.status = status,
            FormField::AddTech(tech) => {
                if !self.tech_stack.contains(&tech) {
                    self.tech_stack.push(tech);
                }
            }
            FormField::RemoveTech(tech) => self.tech_stack.retain(|t| *t != tech),
            FormField::StartDate(date) => self.start_date = date,
            FormField::EndDate(date) => self.end_date = date,
        }
    }

    /// Builds the validated creation request without touching the store
    pub fn to_new_project(&self) -> Result<NewProject> {
        NewProject {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            status: self.status,
            tech_stack: self.tech_stack.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
        .validate()
    }

    /// Validates and creates the project. Validation failures never reach the store.
    pub async fn submit(&mut self, storage: &dyn Storage) -> Result<Project> {
        let new = match self.to_new_project() {
            Ok(new) => new,
            Err(err) => return Err(self.notifications.failure("create project", err)),
        };

        self.is_submitting = true;
        let result = storage.create_project(new).await;
        self.is_submitting = false;

        match result {
            Ok(project) => {
                info!(project_id = %project.id, "project form submitted");
                self.notifications.success("Project created successfully");
                Ok(project)
            }
            Err(err) => Err(self.notifications.failure("create project", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusFilter;
    use crate::error::DevboardError;
    use crate::storage::InMemoryStorage;
    use crate::view::NotificationLevel;

    #[test]
    fn test_form_defaults_from_config() {
        let config = DevboardConfig {
            default_project_status: ProjectStatus::Active,
            ..Default::default()
        };
        let form = ProjectForm::new(&config);
        assert_eq!(form.status, ProjectStatus::Active);
        assert!(form.tech_stack.is_empty());
    }

    #[test]
    fn test_add_tech_is_deduplicated() {
        let mut form = ProjectForm::default();
        form.set(FormField::AddTech("React".into()));
        form.set(FormField::AddTech("React".into()));
        assert_eq!(form.tech_stack, vec!["React"]);

        form.set(FormField::RemoveTech("React".into()));
        assert!(form.tech_stack.is_empty());
    }

    #[tokio::test]
    async fn test_submit_empty_name_is_validation_error() {
        let storage = InMemoryStorage::new();
        let mut form = ProjectForm::default();
        form.set(FormField::Name("   ".into()));

        let err = form.submit(&storage).await.unwrap_err();

        assert!(matches!(err, DevboardError::Validation(_)));
        assert_eq!(storage.project_count().await, 0);
        let pending = form.notifications.drain();
        assert_eq!(pending[0].level, NotificationLevel::Error);
        assert!(pending[0].description.contains("Project name is required"));
    }

    #[tokio::test]
    async fn test_submit_trims_and_defaults() {
        let storage = InMemoryStorage::new();
        let mut form = ProjectForm::default();
        form.set(FormField::Name("  Blog  ".into()));
        form.set(FormField::Description("   ".into()));
        form.set(FormField::Status(ProjectStatus::Active));

        let project = form.submit(&storage).await.unwrap();

        assert_eq!(project.name, "Blog");
        assert_eq!(project.description, None);
        assert!(project.tech_stack.is_empty());
        assert!(!form.is_submitting);
        assert_eq!(
            storage.list_projects(&StatusFilter::All).await.unwrap().len(),
            1
        );
    }
}
