use crate::{
    config::DevboardConfig,
    domain::{
        NewProject, NewTask, Project, ProjectId, ProjectPatch, StatusFilter, Task, TaskId,
        TaskPatch,
    },
    error::{DevboardError, Result},
    storage::{newest_first, Storage},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct State {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
    config: DevboardConfig,
}

/// In-memory store. Owns its records; hand it to views by reference.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RwLock<State>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DevboardConfig) -> Self {
        Self {
            state: RwLock::new(State {
                config,
                ..Default::default()
            }),
        }
    }

    /// Inserts records as-is, keeping their ids and timestamps
    pub async fn import(&self, projects: Vec<Project>, tasks: Vec<Task>) -> Result<()> {
        let mut state = self.state.write().await;
        for task in &tasks {
            let known = state.projects.contains_key(&task.project_id)
                || projects.iter().any(|p| p.id == task.project_id);
            if !known {
                return Err(DevboardError::MissingProject(task.project_id.to_string()));
            }
        }
        for project in projects {
            state.projects.insert(project.id, project);
        }
        for task in tasks {
            state.tasks.insert(task.id, task);
        }
        Ok(())
    }

    pub async fn project_count(&self) -> usize {
        self.state.read().await.projects.len()
    }

    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }

    async fn list_projects(&self, filter: &StatusFilter) -> Result<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect();
        newest_first(&mut projects, |p| p.created_at);
        debug!(filter = %filter, count = projects.len(), "listed projects");
        Ok(projects)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Project> {
        let state = self.state.read().await;
        state
            .projects
            .get(id)
            .cloned()
            .ok_or_else(|| DevboardError::ProjectNotFound(id.to_string()))
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let project = Project::from_new(ProjectId::new(), project.validate()?, Utc::now());
        let mut state = self.state.write().await;
        state.projects.insert(project.id, project.clone());
        info!(project_id = %project.id, name = %project.name, "created project");
        Ok(project)
    }

    async fn update_project(&self, id: &ProjectId, patch: ProjectPatch) -> Result<Project> {
        let mut state = self.state.write().await;
        let stored = state
            .projects
            .get(id)
            .ok_or_else(|| DevboardError::ProjectNotFound(id.to_string()))?;

        let mut updated = stored.clone();
        updated.apply(patch, Utc::now())?;
        state.projects.insert(*id, updated.clone());
        info!(project_id = %id, "updated project");
        Ok(updated)
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.projects.remove(id).is_none() {
            return Err(DevboardError::ProjectNotFound(id.to_string()));
        }
        let before = state.tasks.len();
        state.tasks.retain(|_, task| task.project_id != *id);
        info!(
            project_id = %id,
            removed_tasks = before - state.tasks.len(),
            "deleted project"
        );
        Ok(())
    }

    async fn list_tasks_by_project(&self, project_id: &ProjectId) -> Result<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id == *project_id)
            .cloned()
            .collect();
        newest_first(&mut tasks, |t| t.created_at);
        Ok(tasks)
    }

    async fn list_all_tasks(&self) -> Result<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        newest_first(&mut tasks, |t| t.created_at);
        Ok(tasks)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task> {
        let state = self.state.read().await;
        state
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| DevboardError::TaskNotFound(id.to_string()))
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        let task = task.validate()?;
        let mut state = self.state.write().await;
        if !state.projects.contains_key(&task.project_id) {
            return Err(DevboardError::MissingProject(task.project_id.to_string()));
        }
        let task = Task::from_new(TaskId::new(), task, Utc::now());
        state.tasks.insert(task.id, task.clone());
        info!(task_id = %task.id, project_id = %task.project_id, "created task");
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        let mut state = self.state.write().await;
        if let Some(project_id) = &patch.project_id {
            if !state.projects.contains_key(project_id) {
                return Err(DevboardError::MissingProject(project_id.to_string()));
            }
        }
        let stored = state
            .tasks
            .get(id)
            .ok_or_else(|| DevboardError::TaskNotFound(id.to_string()))?;

        let mut updated = stored.clone();
        updated.apply(patch, Utc::now())?;
        state.tasks.insert(*id, updated.clone());
        info!(task_id = %id, "updated task");
        Ok(updated)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.tasks.remove(id).is_none() {
            return Err(DevboardError::TaskNotFound(id.to_string()));
        }
        info!(task_id = %id, "deleted task");
        Ok(())
    }

    async fn load_config(&self) -> Result<DevboardConfig> {
        Ok(self.state.read().await.config.clone())
    }

    async fn save_config(&self, config: &DevboardConfig) -> Result<()> {
        config.validate()?;
        self.state.write().await.config = config.clone();
        Ok(())
    }
}
