use crate::config::DevboardConfig;
use crate::domain::{
    sort_tasks_for_display, NewTask, Project, ProjectField, ProjectId, ProjectPatch, Task, TaskId,
    TaskPatch,
};
use crate::error::Result;
use crate::storage::Storage;
use crate::view::Notifications;
use chrono::Utc;
use tracing::{debug, info};

/// State of the project detail page: the project, its tasks and the
/// submit guard shared by every action on the page.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: Project,
    pub tasks: Vec<Task>,
    pub is_submitting: bool,
    pub notifications: Notifications,
}

impl ProjectDetail {
    /// Loads the project and its tasks. There is no page state yet when
    /// this fails, so the failure is queued on the caller's `notifications`.
    pub async fn load(
        storage: &dyn Storage,
        id: &ProjectId,
        notifications: &mut Notifications,
    ) -> Result<Self> {
        match Self::fetch(storage, id).await {
            Ok((project, tasks)) => {
                debug!(project_id = %id, tasks = tasks.len(), "loaded project detail");
                Ok(Self {
                    project,
                    tasks,
                    is_submitting: false,
                    notifications: Notifications::default(),
                })
            }
            Err(err) => Err(notifications.failure("load project", err)),
        }
    }

    /// Refetches the project and its tasks. On failure the page keeps its
    /// last known state.
    pub async fn reload(&mut self, storage: &dyn Storage) -> Result<()> {
        let id = self.project.id;
        match Self::fetch(storage, &id).await {
            Ok((project, tasks)) => {
                self.project = project;
                self.tasks = tasks;
                Ok(())
            }
            Err(err) => Err(self.notifications.failure("load project", err)),
        }
    }

    async fn fetch(storage: &dyn Storage, id: &ProjectId) -> Result<(Project, Vec<Task>)> {
        let project = storage.get_project(id).await?;
        let tasks = storage.list_tasks_by_project(id).await?;
        Ok((project, tasks))
    }

    /// Tasks in display order
    pub fn sorted_tasks(&self) -> Vec<Task> {
        sort_tasks_for_display(&self.tasks)
    }

    /// Catalogue entries the picker should still offer
    pub fn available_tech<'a>(&self, config: &'a DevboardConfig) -> Vec<&'a str> {
        self.project.available_tech(&config.tech_stack_options)
    }

    /// Saves one field. The edit is validated locally first; the project is
    /// replaced only with the record the store returns.
    pub async fn update_field(&mut self, storage: &dyn Storage, field: ProjectField) -> Result<()> {
        let patch = ProjectPatch::from(field);
        self.save(storage, patch, true).await
    }

    /// Moves the status badge to the next status
    pub async fn cycle_status(&mut self, storage: &dyn Storage) -> Result<()> {
        let next = self.project.status.next();
        self.update_field(storage, ProjectField::Status(next)).await
    }

    /// Adds a technology. Returns `Ok(false)` without a store call when the
    /// project already lists it.
    pub async fn add_tech(&mut self, storage: &dyn Storage, tech: &str) -> Result<bool> {
        let Some(stack) = self.project.tech_stack_with(tech) else {
            return Ok(false);
        };
        self.save(storage, ProjectField::TechStack(stack).into(), false)
            .await?;
        Ok(true)
    }

    /// Removes a technology. Returns `Ok(false)` when it was not listed.
    pub async fn remove_tech(&mut self, storage: &dyn Storage, tech: &str) -> Result<bool> {
        let Some(stack) = self.project.tech_stack_without(tech) else {
            return Ok(false);
        };
        self.save(storage, ProjectField::TechStack(stack).into(), false)
            .await?;
        Ok(true)
    }

    async fn save(&mut self, storage: &dyn Storage, patch: ProjectPatch, announce: bool) -> Result<()> {
        let mut preview = self.project.clone();
        if let Err(err) = preview.apply(patch.clone(), Utc::now()) {
            return Err(self.notifications.failure("update project", err));
        }

        self.is_submitting = true;
        let result = storage.update_project(&self.project.id, patch).await;
        self.is_submitting = false;

        match result {
            Ok(project) => {
                self.project = project;
                if announce {
                    self.notifications.success("Project updated successfully");
                }
                Ok(())
            }
            Err(err) => Err(self.notifications.failure("update project", err)),
        }
    }

    /// Marks a task complete or incomplete
    pub async fn set_task_completed(
        &mut self,
        storage: &dyn Storage,
        task_id: &TaskId,
        is_completed: bool,
    ) -> Result<()> {
        self.is_submitting = true;
        let result = storage
            .update_task(task_id, TaskPatch::completion(is_completed))
            .await;
        self.is_submitting = false;

        match result {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
                    *slot = updated;
                }
                Ok(())
            }
            Err(err) => Err(self.notifications.failure("update task", err)),
        }
    }

    /// Creates a placeholder task at the top of the list
    pub async fn add_task(&mut self, storage: &dyn Storage, config: &DevboardConfig) -> Result<Task> {
        self.is_submitting = true;
        let result = storage
            .create_task(NewTask::new(self.project.id, config.new_task_title.clone()))
            .await;
        self.is_submitting = false;

        match result {
            Ok(task) => {
                info!(task_id = %task.id, project_id = %self.project.id, "task added");
                self.tasks.insert(0, task.clone());
                self.notifications.success("Task added successfully");
                Ok(task)
            }
            Err(err) => Err(self.notifications.failure("create task", err)),
        }
    }

    pub async fn delete_task(&mut self, storage: &dyn Storage, task_id: &TaskId) -> Result<()> {
        self.is_submitting = true;
        let result = storage.delete_task(task_id).await;
        self.is_submitting = false;

        match result {
            Ok(()) => {
                self.tasks.retain(|t| t.id != *task_id);
                self.notifications.success("Task deleted successfully");
                Ok(())
            }
            Err(err) => Err(self.notifications.failure("delete task", err)),
        }
    }
}
