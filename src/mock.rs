//! Sample projects and tasks for demos and tests.
//!
//! Due dates are relative to the `today` passed in, so the calendar always
//! has something to show around the current date.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{NewProject, NewTask, Project, ProjectId, ProjectStatus, Task, TaskId};
use crate::error::Result;
use crate::storage::Storage;

/// A complete set of sample records
#[derive(Debug, Clone, PartialEq)]
pub struct MockDataset {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl MockDataset {
    pub fn tasks_for(&self, project_id: &ProjectId) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id == *project_id)
            .collect()
    }
}

struct MockTask {
    title: &'static str,
    completed: bool,
    created: (i32, u32, u32),
    updated: (i32, u32, u32),
    due_in_days: Option<i64>,
}

struct MockProject {
    name: &'static str,
    description: &'static str,
    status: ProjectStatus,
    tech_stack: &'static [&'static str],
    start: Option<(i32, u32, u32)>,
    end: Option<(i32, u32, u32)>,
    created: (i32, u32, u32),
    updated: (i32, u32, u32),
    tasks: &'static [MockTask],
}

const fn task(
    title: &'static str,
    completed: bool,
    created: (i32, u32, u32),
    updated: (i32, u32, u32),
    due_in_days: Option<i64>,
) -> MockTask {
    MockTask {
        title,
        completed,
        created,
        updated,
        due_in_days,
    }
}

const MOCK_PROJECTS: &[MockProject] = &[
    MockProject {
        name: "Personal Portfolio Website",
        description: "A modern portfolio site showcasing my projects and skills built with React and Tailwind CSS.",
        status: ProjectStatus::Completed,
        tech_stack: &["React", "TypeScript", "Tailwind CSS", "Vercel"],
        start: Some((2023, 1, 15)),
        end: Some((2023, 2, 20)),
        created: (2023, 1, 15),
        updated: (2023, 2, 20),
        tasks: &[
            task("Design homepage layout", true, (2023, 1, 15), (2023, 1, 18), None),
            task("Implement dark/light mode toggle", true, (2023, 1, 20), (2023, 1, 22), None),
            task("Add project showcase section", true, (2023, 1, 25), (2023, 2, 1), None),
        ],
    },
    MockProject {
        name: "E-commerce Dashboard",
        description: "Admin dashboard for an e-commerce platform with sales analytics and inventory management.",
        status: ProjectStatus::Active,
        tech_stack: &["Next.js", "TypeScript", "Tailwind CSS", "Supabase", "Recharts"],
        start: Some((2023, 3, 1)),
        end: None,
        created: (2023, 3, 1),
        updated: (2023, 3, 15),
        tasks: &[
            task("Create authentication system", true, (2023, 3, 1), (2023, 3, 10), None),
            task("Build sales analytics dashboard", false, (2023, 3, 12), (2023, 3, 12), Some(5)),
            task("Implement inventory management", false, (2023, 3, 15), (2023, 3, 15), Some(14)),
        ],
    },
    MockProject {
        name: "Task Management App",
        description: "Minimalist task management application with drag-and-drop interface and team collaboration features.",
        status: ProjectStatus::Planning,
        tech_stack: &["React", "TypeScript", "Tailwind CSS", "Node.js", "PostgreSQL"],
        start: Some((2023, 4, 1)),
        end: None,
        created: (2023, 4, 1),
        updated: (2023, 4, 10),
        tasks: &[
            task("Define app requirements", true, (2023, 4, 1), (2023, 4, 5), None),
            task("Create wireframes and mockups", false, (2023, 4, 6), (2023, 4, 6), Some(-2)),
            task("Set up project repository", false, (2023, 4, 10), (2023, 4, 10), Some(1)),
        ],
    },
    MockProject {
        name: "Mobile Fitness App",
        description: "Cross-platform fitness application with workout tracking and nutrition planning features.",
        status: ProjectStatus::OnHold,
        tech_stack: &["React Native", "TypeScript", "Firebase"],
        start: Some((2023, 2, 10)),
        end: None,
        created: (2023, 2, 10),
        updated: (2023, 3, 1),
        tasks: &[
            task("Research competitor apps", true, (2023, 2, 10), (2023, 2, 15), None),
            task("Design app architecture", true, (2023, 2, 16), (2023, 2, 25), None),
            task("Implement user authentication", false, (2023, 2, 26), (2023, 3, 1), None),
        ],
    },
    MockProject {
        name: "Blog Platform",
        description: "A modern, markdown-based blog platform with custom themes and analytics.",
        status: ProjectStatus::Active,
        tech_stack: &["Next.js", "TypeScript", "Tailwind CSS", "Supabase", "Vercel"],
        start: Some((2023, 3, 20)),
        end: None,
        created: (2023, 3, 20),
        updated: (2023, 3, 30),
        tasks: &[
            task("Implement markdown editor", true, (2023, 3, 20), (2023, 3, 25), None),
            task("Build theme customization", false, (2023, 3, 26), (2023, 3, 26), Some(3)),
            task("Add analytics dashboard", false, (2023, 3, 30), (2023, 3, 30), Some(10)),
        ],
    },
];

fn ymd(date: (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
}

fn midnight(date: (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(date.0, date.1, date.2, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds the sample dataset with stable ids and timestamps
pub fn generate_mock_dataset(today: NaiveDate) -> MockDataset {
    let mut projects = Vec::with_capacity(MOCK_PROJECTS.len());
    let mut tasks = Vec::new();
    let mut task_counter: u128 = 0;

    for (index, mock) in MOCK_PROJECTS.iter().enumerate() {
        let project_id = ProjectId::from_uuid(Uuid::from_u128(index as u128 + 1));
        projects.push(Project {
            id: project_id,
            name: mock.name.to_string(),
            description: Some(mock.description.to_string()),
            status: mock.status,
            tech_stack: mock.tech_stack.iter().map(|s| s.to_string()).collect(),
            start_date: mock.start.and_then(ymd),
            end_date: mock.end.and_then(ymd),
            created_at: midnight(mock.created),
            updated_at: midnight(mock.updated),
        });

        for mock_task in mock.tasks {
            task_counter += 1;
            tasks.push(Task {
                id: TaskId::from_uuid(Uuid::from_u128(0x1000 + task_counter)),
                project_id,
                title: mock_task.title.to_string(),
                description: None,
                is_completed: mock_task.completed,
                due_date: mock_task.due_in_days.map(|d| today + Duration::days(d)),
                created_at: midnight(mock_task.created),
                updated_at: midnight(mock_task.updated),
            });
        }
    }

    MockDataset { projects, tasks }
}

/// Creates the sample dataset through any store. Ids and timestamps are
/// assigned by the store; the returned dataset holds the stored records.
pub async fn seed_storage(storage: &dyn Storage, today: NaiveDate) -> Result<MockDataset> {
    let mut projects = Vec::with_capacity(MOCK_PROJECTS.len());
    let mut tasks = Vec::new();

    for mock in MOCK_PROJECTS {
        let new = NewProject::new(mock.name)
            .with_description(mock.description)
            .with_status(mock.status)
            .with_tech_stack(mock.tech_stack.iter().copied())
            .with_dates(mock.start.and_then(ymd), mock.end.and_then(ymd));
        let project = storage.create_project(new).await?;

        for mock_task in mock.tasks {
            let mut new = NewTask::new(project.id, mock_task.title);
            new.is_completed = mock_task.completed;
            new.due_date = mock_task.due_in_days.map(|d| today + Duration::days(d));
            tasks.push(storage.create_task(new).await?);
        }
        projects.push(project);
    }

    info!(
        projects = projects.len(),
        tasks = tasks.len(),
        "seeded mock data"
    );
    Ok(MockDataset { projects, tasks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{filter_projects, StatusFilter};
    use crate::storage::InMemoryStorage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_dataset_shape() {
        let data = generate_mock_dataset(today());
        assert_eq!(data.projects.len(), 5);
        assert_eq!(data.tasks.len(), 15);
        for project in &data.projects {
            assert_eq!(data.tasks_for(&project.id).len(), 3);
        }
    }

    #[test]
    fn test_dataset_is_deterministic() {
        assert_eq!(generate_mock_dataset(today()), generate_mock_dataset(today()));
    }

    #[test]
    fn test_due_dates_relative_to_today() {
        let data = generate_mock_dataset(today());
        let overdue: Vec<&Task> = data.tasks.iter().filter(|t| t.is_overdue(today())).collect();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].title, "Create wireframes and mockups");
        assert_eq!(overdue[0].due_date, Some(today() - Duration::days(2)));
    }

    #[test]
    fn test_dataset_status_spread() {
        let data = generate_mock_dataset(today());
        let active = filter_projects(&data.projects, &StatusFilter::Only(ProjectStatus::Active));
        assert_eq!(active.len(), 2);
    }

    #[tokio::test]
    async fn test_seed_storage() {
        let storage = InMemoryStorage::new();
        let seeded = seed_storage(&storage, today()).await.unwrap();

        assert_eq!(storage.project_count().await, 5);
        assert_eq!(storage.task_count().await, 15);
        assert_eq!(seeded.projects.len(), 5);

        let dated = storage
            .list_all_tasks()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.due_date.is_some())
            .count();
        assert_eq!(dated, 6);
    }

    #[tokio::test]
    async fn test_import_generated_dataset() {
        let storage = InMemoryStorage::new();
        let data = generate_mock_dataset(today());
        storage
            .import(data.projects.clone(), data.tasks.clone())
            .await
            .unwrap();

        let first = storage.get_project(&data.projects[0].id).await.unwrap();
        assert_eq!(first.name, "Personal Portfolio Website");
    }
}
