use crate::{
    config::DevboardConfig,
    domain::{NewProject, NewTask, Project, ProjectId, ProjectPatch, StatusFilter, Task, TaskId, TaskPatch},
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::InMemoryStorage;

/// Data access contract for projects and tasks.
///
/// Every call is atomic at the store boundary. Lists come back newest
/// first. Ids and timestamps are assigned by the store.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Checks if the store is ready for use
    async fn is_initialized(&self) -> bool;

    /// Lists projects matching the status filter
    async fn list_projects(&self, filter: &StatusFilter) -> Result<Vec<Project>>;

    /// Loads a project by ID
    async fn get_project(&self, id: &ProjectId) -> Result<Project>;

    /// Creates a project and returns the stored record
    async fn create_project(&self, project: NewProject) -> Result<Project>;

    /// Applies a partial update and returns the stored record
    async fn update_project(&self, id: &ProjectId, patch: ProjectPatch) -> Result<Project>;

    /// Deletes a project together with its tasks
    async fn delete_project(&self, id: &ProjectId) -> Result<()>;

    /// Lists the tasks of one project
    async fn list_tasks_by_project(&self, project_id: &ProjectId) -> Result<Vec<Task>>;

    /// Lists every task across all projects
    async fn list_all_tasks(&self) -> Result<Vec<Task>>;

    /// Loads a task by ID
    async fn get_task(&self, id: &TaskId) -> Result<Task>;

    /// Creates a task under an existing project
    async fn create_task(&self, task: NewTask) -> Result<Task>;

    /// Applies a partial update and returns the stored record
    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task>;

    /// Deletes a task
    async fn delete_task(&self, id: &TaskId) -> Result<()>;

    /// Loads the tracker configuration
    async fn load_config(&self) -> Result<DevboardConfig>;

    /// Saves the tracker configuration
    async fn save_config(&self, config: &DevboardConfig) -> Result<()>;
}

/// Newest first, the order every list operation returns
pub(crate) fn newest_first<T, F>(records: &mut [T], created_at: F)
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}
