use crate::config::DevboardConfig;
use crate::domain::{
    build_calendar, calendar_entries, CalendarEntry, CalendarGrid, CalendarMonth, StatusFilter,
    WeekStart,
};
use crate::error::Result;
use crate::storage::Storage;
use crate::view::Notifications;
use chrono::NaiveDate;
use tracing::debug;

/// State of the calendar page: the visible month and every dated task
/// joined with its project.
#[derive(Debug, Clone)]
pub struct CalendarPage {
    pub month: CalendarMonth,
    pub week_start: WeekStart,
    pub entries: Vec<CalendarEntry>,
    pub loading: bool,
    pub notifications: Notifications,
}

impl CalendarPage {
    /// Opens on the month containing `today`
    pub fn new(config: &DevboardConfig, today: NaiveDate) -> Self {
        Self {
            month: CalendarMonth::containing(today),
            week_start: config.week_start,
            entries: Vec::new(),
            loading: false,
            notifications: Notifications::default(),
        }
    }

    /// Reloads projects and tasks. On failure the previous entries stay.
    pub async fn load(&mut self, storage: &dyn Storage) -> Result<()> {
        self.loading = true;
        let result = Self::fetch(storage).await;
        self.loading = false;

        match result {
            Ok(entries) => {
                debug!(month = %self.month, entries = entries.len(), "calendar loaded");
                self.entries = entries;
                Ok(())
            }
            Err(err) => Err(self.notifications.failure("load calendar", err)),
        }
    }

    async fn fetch(storage: &dyn Storage) -> Result<Vec<CalendarEntry>> {
        let projects = storage.list_projects(&StatusFilter::All).await?;
        let tasks = storage.list_all_tasks().await?;
        Ok(calendar_entries(&projects, &tasks))
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.previous();
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.month = CalendarMonth::containing(today);
    }

    /// Month heading, e.g. `March 2024`
    pub fn title(&self) -> String {
        self.month.to_string()
    }

    pub fn day_names(&self) -> [&'static str; 7] {
        self.week_start.day_names()
    }

    /// Grid for the visible month. Moving between months never refetches.
    pub fn grid(&self, today: NaiveDate) -> CalendarGrid<'_, CalendarEntry> {
        build_calendar(&self.entries, self.month, self.week_start, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewProject, NewTask};
    use crate::error::DevboardError;
    use crate::mock::seed_storage;
    use crate::storage::InMemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_load_joins_project_names() {
        let storage = InMemoryStorage::new();
        let project = storage
            .create_project(NewProject::new("Task Manager"))
            .await
            .unwrap();
        storage
            .create_task(NewTask::new(project.id, "Set up repository").with_due_date(date(2024, 3, 15)))
            .await
            .unwrap();
        storage
            .create_task(NewTask::new(project.id, "Undated"))
            .await
            .unwrap();

        let today = date(2024, 3, 10);
        let mut page = CalendarPage::new(&DevboardConfig::default(), today);
        page.load(&storage).await.unwrap();

        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.title(), "March 2024");

        let grid = page.grid(today);
        let day = grid.day(date(2024, 3, 15)).unwrap();
        assert_eq!(day.count(), 1);
        assert_eq!(day.tasks[0].summary(), "Set up repository - Task Manager");
        assert!(grid.day(today).unwrap().is_today);
    }

    #[test]
    fn test_month_navigation() {
        let today = date(2024, 1, 20);
        let mut page = CalendarPage::new(&DevboardConfig::default(), today);

        page.previous_month();
        assert_eq!(page.title(), "December 2023");
        page.next_month();
        page.next_month();
        assert_eq!(page.title(), "February 2024");

        page.go_to_today(today);
        assert_eq!(page.month, CalendarMonth::containing(today));
    }

    #[test]
    fn test_monday_week_start_from_config() {
        let config = DevboardConfig {
            week_start: WeekStart::Monday,
            ..Default::default()
        };
        let page = CalendarPage::new(&config, date(2024, 3, 10));

        assert_eq!(page.day_names()[0], "Mon");
        let grid = page.grid(date(2024, 3, 10));
        assert_eq!(grid.first_date(), Some(date(2024, 2, 26)));
        assert_eq!(grid.last_date(), Some(date(2024, 3, 31)));
    }

    #[tokio::test]
    async fn test_seeded_tasks_land_on_grid() {
        let storage = InMemoryStorage::new();
        let today = date(2024, 3, 10);
        seed_storage(&storage, today).await.unwrap();

        let mut page = CalendarPage::new(&DevboardConfig::default(), today);
        page.load(&storage).await.unwrap();

        assert_eq!(page.entries.len(), 6);
        // +14 days lands on March 24, still inside the March grid
        assert_eq!(page.grid(today).entry_count(), 6);
    }

    #[cfg(feature = "file-storage")]
    #[tokio::test]
    async fn test_failed_load_keeps_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = crate::storage::FileStorage::new(dir.path());
        storage.initialize().await.unwrap();
        let project = storage.create_project(NewProject::new("Blog")).await.unwrap();
        storage
            .create_task(NewTask::new(project.id, "Write").with_due_date(date(2024, 3, 12)))
            .await
            .unwrap();

        let mut page = CalendarPage::new(&DevboardConfig::default(), date(2024, 3, 10));
        page.load(&storage).await.unwrap();
        assert_eq!(page.entries.len(), 1);

        let corrupt = dir
            .path()
            .join(".devboard")
            .join("projects")
            .join(format!("{}.json", project.id));
        tokio::fs::write(&corrupt, "{ not json").await.unwrap();

        let result = page.load(&storage).await;

        assert!(matches!(result, Err(DevboardError::SerializationError(_))));
        assert_eq!(page.entries.len(), 1);
        assert!(!page.loading);
        assert!(!page.notifications.is_empty());
    }
}
