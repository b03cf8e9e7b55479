use crate::domain::project::{Project, ProjectStatus};
use crate::domain::task::Task;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Status,
    Created,
    Updated,
    Start,
    End,
    TechCount,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "status" => Ok(SortField::Status),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            "start" => Ok(SortField::Start),
            "end" => Ok(SortField::End),
            "tech-count" => Ok(SortField::TechCount),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: name, status, created, updated, start, end, tech-count",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Returns tasks in display order without touching the input.
///
/// Open tasks come before completed ones. Within the same completion state
/// the earliest due date comes first and undated tasks go last, newest
/// first among themselves. The sort is stable, so tasks sharing a due date
/// keep their input order.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, Utc};
/// use devboard_core::domain::sorting::sort_tasks_for_display;
/// use devboard_core::domain::{NewTask, ProjectId, Task, TaskId};
///
/// let project = ProjectId::new();
/// let now = Utc::now();
/// let due = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
///
/// let done = Task::from_new(TaskId::new(), NewTask::new(project, "Done").completed(), now);
/// let dated = Task::from_new(TaskId::new(), NewTask::new(project, "Dated").with_due_date(due), now);
///
/// let sorted = sort_tasks_for_display(&[done, dated]);
/// assert_eq!(sorted[0].title, "Dated");
/// ```
pub fn sort_tasks_for_display(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sort_tasks(&mut sorted);
    sorted
}

/// In-place variant of [`sort_tasks_for_display`]
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks_for_display);
}

/// Three-level display comparator: completion, due date, then newest first.
/// Only two undated tasks reach the creation-time tie-break; equal due dates
/// compare equal.
pub fn compare_tasks_for_display(a: &Task, b: &Task) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then_with(|| match (a.due_date, b.due_date) {
            (None, None) => b.created_at.cmp(&a.created_at),
            (a_due, b_due) => compare_option_dates(a_due, b_due),
        })
}

/// Sorts projects in place by the given field and direction
pub fn sort_projects(projects: &mut [Project], field: SortField, order: SortOrder) {
    projects.sort_by(|a, b| {
        let cmp = match field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Status => compare_status(&a.status, &b.status),
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
            SortField::Start => compare_option_dates(a.start_date, b.start_date),
            SortField::End => compare_option_dates(a.end_date, b.end_date),
            SortField::TechCount => a.tech_stack.len().cmp(&b.tech_stack.len()),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare project status by lifecycle progression
///
/// Status order: Planning → Active → OnHold → Completed → Archived
fn compare_status(a: &ProjectStatus, b: &ProjectStatus) -> Ordering {
    fn status_order(s: &ProjectStatus) -> u8 {
        match s {
            ProjectStatus::Planning => 0,
            ProjectStatus::Active => 1,
            ProjectStatus::OnHold => 2,
            ProjectStatus::Completed => 3,
            ProjectStatus::Archived => 4,
        }
    }
    status_order(a).cmp(&status_order(b))
}

/// Compare optional dates with None treated as infinitely late
fn compare_option_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
