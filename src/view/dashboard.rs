use crate::domain::{sort_projects, Project, SortField, SortOrder, StatusFilter};
use crate::error::Result;
use crate::storage::Storage;
use crate::view::Notifications;
use tracing::debug;

/// State of the projects dashboard
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub filter: StatusFilter,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub projects: Vec<Project>,
    pub loading: bool,
    pub notifications: Notifications,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            filter: StatusFilter::All,
            sort_field: SortField::Created,
            sort_order: SortOrder::Descending,
            projects: Vec::new(),
            loading: false,
            notifications: Notifications::default(),
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads projects for the current filter. On failure the previous list stays.
    pub async fn refresh(&mut self, storage: &dyn Storage) -> Result<()> {
        self.loading = true;
        let result = storage.list_projects(&self.filter).await;
        self.loading = false;

        match result {
            Ok(mut projects) => {
                sort_projects(&mut projects, self.sort_field, self.sort_order);
                debug!(filter = %self.filter, count = projects.len(), "dashboard refreshed");
                self.projects = projects;
                Ok(())
            }
            Err(err) => Err(self.notifications.failure("load projects", err)),
        }
    }

    /// Switches the status filter and reloads
    pub async fn set_filter(
        &mut self,
        storage: &dyn Storage,
        filter: impl Into<StatusFilter>,
    ) -> Result<()> {
        self.filter = filter.into();
        self.refresh(storage).await
    }

    /// Re-sorts the loaded projects without a store call
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort_field = field;
        self.sort_order = order;
        sort_projects(&mut self.projects, field, order);
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewProject, ProjectStatus};
    use crate::storage::InMemoryStorage;

    async fn seeded() -> InMemoryStorage {
        let storage = InMemoryStorage::new();
        for (name, status) in [
            ("Alpha", ProjectStatus::Active),
            ("Beta", ProjectStatus::Planning),
            ("Gamma", ProjectStatus::Active),
        ] {
            storage
                .create_project(NewProject::new(name).with_status(status))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        storage
    }

    #[tokio::test]
    async fn test_refresh_loads_newest_first() {
        let storage = seeded().await;
        let mut dashboard = Dashboard::new();
        dashboard.refresh(&storage).await.unwrap();

        let names: Vec<&str> = dashboard.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
        assert!(!dashboard.loading);
    }

    #[tokio::test]
    async fn test_set_filter() {
        let storage = seeded().await;
        let mut dashboard = Dashboard::new();

        dashboard.set_filter(&storage, "active").await.unwrap();
        assert_eq!(dashboard.projects.len(), 2);
        assert!(dashboard
            .projects
            .iter()
            .all(|p| p.status == ProjectStatus::Active));

        dashboard.set_filter(&storage, "archived").await.unwrap();
        assert!(dashboard.is_empty());

        dashboard.set_filter(&storage, StatusFilter::All).await.unwrap();
        assert_eq!(dashboard.projects.len(), 3);
    }

    #[tokio::test]
    async fn test_set_sort_by_name() {
        let storage = seeded().await;
        let mut dashboard = Dashboard::new();
        dashboard.refresh(&storage).await.unwrap();

        dashboard.set_sort(SortField::Name, SortOrder::Ascending);

        assert_eq!(dashboard.projects[0].name, "Alpha");
        assert_eq!(dashboard.projects[2].name, "Gamma");
    }
}
