//! Month grid for the calendar page.
//!
//! The grid covers whole weeks, so it starts on the configured first weekday
//! on or before the 1st and ends on the last weekday on or after the last day
//! of the month. Items are bucketed by calendar day, never by timestamp.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::project::{Project, ProjectId, ProjectStatus};
use crate::domain::task::Task;

/// Anything that can be placed on the calendar
pub trait HasDueDate {
    fn due_date(&self) -> Option<NaiveDate>;
}

impl HasDueDate for Task {
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

/// First column of the calendar grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Column headers in grid order
    pub fn day_names(&self) -> [&'static str; 7] {
        match self {
            Self::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            Self::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }

    /// Column index of `date` in a grid starting on this weekday
    fn column_of(&self, date: NaiveDate) -> i64 {
        let offset = self.weekday().num_days_from_sunday();
        ((date.weekday().num_days_from_sunday() + 7 - offset) % 7) as i64
    }
}

/// A calendar month, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    /// Returns `None` for an invalid month number
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(date.day0() as i64))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().0 - Duration::days(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0.checked_add_months(Months::new(1)).unwrap_or(self.0))
    }

    pub fn previous(&self) -> Self {
        Self(self.0.checked_sub_months(Months::new(1)).unwrap_or(self.0))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%B %Y"))
    }
}

/// A task joined with the project it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub task: Task,
    pub project_id: ProjectId,
    pub project_name: String,
    pub project_status: ProjectStatus,
}

impl CalendarEntry {
    /// Tooltip text, e.g. `Set up repository - Task Manager`
    pub fn summary(&self) -> String {
        format!("{} - {}", self.task.title, self.project_name)
    }
}

impl HasDueDate for CalendarEntry {
    fn due_date(&self) -> Option<NaiveDate> {
        self.task.due_date
    }
}

/// Joins every dated task with its owning project. Undated tasks and tasks
/// whose project is not in `projects` are left out.
pub fn calendar_entries(projects: &[Project], tasks: &[Task]) -> Vec<CalendarEntry> {
    let by_id: HashMap<ProjectId, &Project> = projects.iter().map(|p| (p.id, p)).collect();

    tasks
        .iter()
        .filter(|task| task.due_date.is_some())
        .filter_map(|task| {
            by_id.get(&task.project_id).map(|project| CalendarEntry {
                task: task.clone(),
                project_id: project.id,
                project_name: project.name.clone(),
                project_status: project.status,
            })
        })
        .collect()
}

/// One cell of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a, T> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a T>,
    pub in_month: bool,
    pub is_today: bool,
}

impl<T> CalendarDay<'_, T> {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid<'a, T> {
    pub month: CalendarMonth,
    pub week_start: WeekStart,
    pub days: Vec<CalendarDay<'a, T>>,
}

impl<'a, T> CalendarGrid<'a, T> {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// Rows of seven days
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay<'a, T>]> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay<'a, T>> {
        let first = self.first_date()?;
        let index = usize::try_from((date - first).num_days()).ok()?;
        self.days.get(index)
    }

    /// Number of items placed on the grid
    pub fn entry_count(&self) -> usize {
        self.days.iter().map(CalendarDay::count).sum()
    }
}

/// First and last date shown for `month`
pub fn grid_bounds(month: CalendarMonth, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    let first = month.first_day();
    let last = month.last_day();
    let start = first - Duration::days(week_start.column_of(first));
    let end = last + Duration::days(6 - week_start.column_of(last));
    (start, end)
}

/// Buckets dated items into the day cells of `month`'s grid.
///
/// Every item whose due date falls inside the grid lands in exactly one
/// cell; undated items and items outside the grid are skipped.
pub fn build_calendar<'a, T: HasDueDate>(
    items: &'a [T],
    month: CalendarMonth,
    week_start: WeekStart,
    today: NaiveDate,
) -> CalendarGrid<'a, T> {
    let (start, end) = grid_bounds(month, week_start);
    let mut days: Vec<CalendarDay<'a, T>> = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarDay {
            date,
            tasks: Vec::new(),
            in_month: month.contains(date),
            is_today: date == today,
        })
        .collect();

    for item in items {
        let Some(due) = item.due_date() else {
            continue;
        };
        if due < start || due > end {
            continue;
        }
        let index = (due - start).num_days() as usize;
        if let Some(day) = days.get_mut(index) {
            day.tasks.push(item);
        }
    }

    CalendarGrid {
        month,
        week_start,
        days,
    }
}

/// Today's date in the local time zone
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::NewProject;
    use crate::domain::task::{NewTask, TaskId};
    use chrono::Utc;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(due: Option<NaiveDate>) -> Task {
        let mut new = NewTask::new(ProjectId::new(), "t");
        new.due_date = due;
        Task::from_new(TaskId::new(), new, Utc::now())
    }

    #[test]
    fn test_month_navigation() {
        let march = CalendarMonth::new(2024, 3).unwrap();
        assert_eq!(march.next(), CalendarMonth::new(2024, 4).unwrap());
        assert_eq!(march.previous(), CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(
            CalendarMonth::new(2024, 12).unwrap().next(),
            CalendarMonth::new(2025, 1).unwrap()
        );
        assert!(CalendarMonth::new(2024, 13).is_none());
    }

    #[test]
    fn test_month_bounds() {
        let feb = CalendarMonth::containing(date(2024, 2, 17));
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert_eq!(feb.to_string(), "February 2024");
    }

    #[test]
    fn test_grid_bounds_sunday_start() {
        // March 2024 starts on a Friday and ends on a Sunday
        let (start, end) = grid_bounds(CalendarMonth::new(2024, 3).unwrap(), WeekStart::Sunday);
        assert_eq!(start, date(2024, 2, 25));
        assert_eq!(end, date(2024, 4, 6));
    }

    #[test]
    fn test_grid_bounds_monday_start() {
        let (start, end) = grid_bounds(CalendarMonth::new(2024, 3).unwrap(), WeekStart::Monday);
        assert_eq!(start, date(2024, 2, 26));
        assert_eq!(end, date(2024, 3, 31));
    }

    #[test]
    fn test_grid_is_whole_weeks() {
        let tasks: Vec<Task> = Vec::new();
        let grid = build_calendar(
            &tasks,
            CalendarMonth::new(2024, 3).unwrap(),
            WeekStart::Sunday,
            date(2024, 3, 10),
        );

        assert_eq!(grid.days.len() % 7, 0);
        assert_eq!(grid.days.len(), 42);
        assert_eq!(grid.weeks().count(), 6);
        assert_eq!(grid.days[0].date.weekday(), Weekday::Sun);
        assert!(!grid.days[0].in_month);
        assert!(grid.day(date(2024, 3, 1)).unwrap().in_month);
    }

    #[test]
    fn test_today_flag() {
        let tasks: Vec<Task> = Vec::new();
        let today = date(2024, 3, 10);
        let grid = build_calendar(
            &tasks,
            CalendarMonth::containing(today),
            WeekStart::Sunday,
            today,
        );

        let flagged: Vec<NaiveDate> = grid
            .days
            .iter()
            .filter(|d| d.is_today)
            .map(|d| d.date)
            .collect();
        assert_eq!(flagged, vec![today]);
    }

    #[test]
    fn test_tasks_bucketed_by_day() {
        let tasks = vec![
            task(Some(date(2024, 3, 5))),
            task(Some(date(2024, 3, 5))),
            task(Some(date(2024, 2, 26))),
            task(None),
            task(Some(date(2024, 5, 1))),
        ];
        let grid = build_calendar(
            &tasks,
            CalendarMonth::new(2024, 3).unwrap(),
            WeekStart::Sunday,
            date(2024, 3, 1),
        );

        assert_eq!(grid.day(date(2024, 3, 5)).unwrap().count(), 2);
        let leading = grid.day(date(2024, 2, 26)).unwrap();
        assert_eq!(leading.count(), 1);
        assert!(!leading.in_month);
        assert_eq!(grid.entry_count(), 3);
        assert!(grid.day(date(2024, 5, 1)).is_none());
    }

    #[test]
    fn test_calendar_entries_join_projects() {
        let project = Project::from_new(
            ProjectId::new(),
            NewProject::new("Task Manager").with_status(ProjectStatus::Active),
            Utc::now(),
        );
        let mut owned = task(Some(date(2024, 3, 5)));
        owned.project_id = project.id;
        owned.title = "Set up repository".into();
        let mut undated = task(None);
        undated.project_id = project.id;
        let orphan = task(Some(date(2024, 3, 6)));

        let entries = calendar_entries(&[project], &[owned, undated, orphan]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].project_status, ProjectStatus::Active);
        assert_eq!(entries[0].summary(), "Set up repository - Task Manager");
    }

    #[test]
    fn test_grid_over_entries() {
        let project = Project::from_new(ProjectId::new(), NewProject::new("P"), Utc::now());
        let mut t = task(Some(date(2024, 3, 20)));
        t.project_id = project.id;
        let entries = calendar_entries(&[project], &[t]);

        let grid = build_calendar(
            &entries,
            CalendarMonth::new(2024, 3).unwrap(),
            WeekStart::Monday,
            date(2024, 3, 1),
        );
        assert_eq!(grid.day(date(2024, 3, 20)).unwrap().tasks[0].project_name, "P");
    }

    proptest! {
        #[test]
        fn prop_bucketing_is_partition(
            offsets in prop::collection::vec(proptest::option::of(-20i64..60), 0..50),
            monday in any::<bool>(),
        ) {
            let tasks: Vec<Task> = offsets
                .iter()
                .map(|o| task(o.map(|d| date(2024, 3, 1) + Duration::days(d))))
                .collect();
            let week_start = if monday { WeekStart::Monday } else { WeekStart::Sunday };
            let month = CalendarMonth::new(2024, 3).unwrap();
            let grid = build_calendar(&tasks, month, week_start, date(2024, 3, 1));
            let (start, end) = grid_bounds(month, week_start);

            for t in &tasks {
                let hits = grid
                    .days
                    .iter()
                    .filter(|d| d.tasks.iter().any(|e| e.id == t.id))
                    .count();
                match t.due_date {
                    Some(due) if due >= start && due <= end => {
                        prop_assert_eq!(hits, 1);
                        let day = grid.day(due).unwrap();
                        prop_assert!(day.tasks.iter().any(|e| e.id == t.id));
                    }
                    _ => {
                        prop_assert_eq!(hits, 0);
                    }
                }
            }
            prop_assert_eq!(grid.days.len() % 7, 0);
            prop_assert_eq!(grid.days[0].date.weekday(), week_start.weekday());
        }
    }
}
