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
use serde::de::DeserializeOwned;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info, warn};

/// File-based storage: one JSON document per record
pub struct FileStorage {
    root_path: PathBuf,
    // Serializes read-modify-write sequences
    write_lock: Mutex<()>,
}

impl FileStorage {
    const DATA_DIR: &'static str = ".devboard";
    const PROJECTS_DIR: &'static str = "projects";
    const TASKS_DIR: &'static str = "tasks";
    const CONFIG_FILE: &'static str = "config.json";

    /// Creates a new FileStorage rooted at the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().join(Self::DATA_DIR),
            write_lock: Mutex::new(()),
        }
    }

    fn projects_dir(&self) -> PathBuf {
        self.root_path.join(Self::PROJECTS_DIR)
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root_path.join(Self::TASKS_DIR)
    }

    fn config_file(&self) -> PathBuf {
        self.root_path.join(Self::CONFIG_FILE)
    }

    fn project_file(&self, id: &ProjectId) -> PathBuf {
        self.projects_dir().join(format!("{}.json", id))
    }

    fn task_file(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Writes go through `initialize` first; reads of a missing store are empty
    async fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized().await {
            return Err(DevboardError::NotInitialized);
        }
        Ok(())
    }

    /// Writes `contents` next to `path` and renames it into place, so readers
    /// never see a partially written record
    async fn write_atomic(path: &Path, contents: String) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let contents = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    async fn write_project(&self, project: &Project) -> Result<()> {
        self.ensure_directory_exists(&self.projects_dir()).await?;
        let json = serde_json::to_string_pretty(project)?;
        Self::write_atomic(&self.project_file(&project.id), json).await
    }

    async fn write_task(&self, task: &Task) -> Result<()> {
        self.ensure_directory_exists(&self.tasks_dir()).await?;
        let json = serde_json::to_string_pretty(task)?;
        Self::write_atomic(&self.task_file(&task.id), json).await
    }

    /// Reads every record in `dir` whose file stem parses as an ID
    async fn read_all<T, I>(dir: &Path) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        I: FromStr,
    {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(dir).await?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let is_record = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| I::from_str(stem).is_ok())
                .unwrap_or(false);
            if is_record {
                records.push(Self::read_json(&path).await?);
            } else {
                warn!(path = %path.display(), "skipping file with unrecognized name");
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.projects_dir()).await?;
        self.ensure_directory_exists(&self.tasks_dir()).await?;

        if !self.config_file().exists() {
            self.save_config(&DevboardConfig::default()).await?;
        }

        info!(root = %self.root_path.display(), "initialized file storage");
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.config_file().exists()
    }

    async fn list_projects(&self, filter: &StatusFilter) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> =
            Self::read_all::<Project, ProjectId>(&self.projects_dir()).await?;
        projects.retain(|project| filter.matches(project));
        newest_first(&mut projects, |p| p.created_at);
        debug!(filter = %filter, count = projects.len(), "listed projects");
        Ok(projects)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Project> {
        let file_path = self.project_file(id);

        if !file_path.exists() {
            return Err(DevboardError::ProjectNotFound(id.to_string()));
        }

        Self::read_json(&file_path).await
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let project = Project::from_new(ProjectId::new(), project.validate()?, Utc::now());
        let _guard = self.write_lock.lock().await;
        self.ensure_initialized().await?;
        self.write_project(&project).await?;
        info!(project_id = %project.id, name = %project.name, "created project");
        Ok(project)
    }

    async fn update_project(&self, id: &ProjectId, patch: ProjectPatch) -> Result<Project> {
        let _guard = self.write_lock.lock().await;
        self.ensure_initialized().await?;
        let mut project = self.get_project(id).await?;
        project.apply(patch, Utc::now())?;
        self.write_project(&project).await?;
        info!(project_id = %id, "updated project");
        Ok(project)
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_initialized().await?;
        let file_path = self.project_file(id);

        if !file_path.exists() {
            return Err(DevboardError::ProjectNotFound(id.to_string()));
        }

        // Collect owned tasks before removing anything; the project goes first
        let owned: Vec<TaskId> = Self::read_all::<Task, TaskId>(&self.tasks_dir())
            .await?
            .into_iter()
            .filter(|t| t.project_id == *id)
            .map(|t| t.id)
            .collect();

        fs::remove_file(file_path).await?;

        for task_id in &owned {
            fs::remove_file(self.task_file(task_id)).await?;
        }

        info!(project_id = %id, removed_tasks = owned.len(), "deleted project");
        Ok(())
    }

    async fn list_tasks_by_project(&self, project_id: &ProjectId) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = Self::read_all::<Task, TaskId>(&self.tasks_dir()).await?;
        tasks.retain(|task| task.project_id == *project_id);
        newest_first(&mut tasks, |t| t.created_at);
        Ok(tasks)
    }

    async fn list_all_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = Self::read_all::<Task, TaskId>(&self.tasks_dir()).await?;
        newest_first(&mut tasks, |t| t.created_at);
        Ok(tasks)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task> {
        let file_path = self.task_file(id);

        if !file_path.exists() {
            return Err(DevboardError::TaskNotFound(id.to_string()));
        }

        Self::read_json(&file_path).await
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        let task = task.validate()?;
        let _guard = self.write_lock.lock().await;
        self.ensure_initialized().await?;

        if !self.project_file(&task.project_id).exists() {
            return Err(DevboardError::MissingProject(task.project_id.to_string()));
        }

        let task = Task::from_new(TaskId::new(), task, Utc::now());
        self.write_task(&task).await?;
        info!(task_id = %task.id, project_id = %task.project_id, "created task");
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        self.ensure_initialized().await?;

        if let Some(project_id) = &patch.project_id {
            if !self.project_file(project_id).exists() {
                return Err(DevboardError::MissingProject(project_id.to_string()));
            }
        }

        let mut task = self.get_task(id).await?;
        task.apply(patch, Utc::now())?;
        self.write_task(&task).await?;
        info!(task_id = %id, "updated task");
        Ok(task)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_initialized().await?;
        let file_path = self.task_file(id);

        if !file_path.exists() {
            return Err(DevboardError::TaskNotFound(id.to_string()));
        }

        fs::remove_file(file_path).await?;
        info!(task_id = %id, "deleted task");
        Ok(())
    }

    async fn load_config(&self) -> Result<DevboardConfig> {
        let config_file = self.config_file();

        if !config_file.exists() {
            return Err(DevboardError::NotInitialized);
        }

        let contents = fs::read_to_string(&config_file).await?;
        DevboardConfig::from_json(&contents)
    }

    async fn save_config(&self, config: &DevboardConfig) -> Result<()> {
        config.validate()?;
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(config)?;
        Self::write_atomic(&self.config_file(), json).await
    }
}
