pub mod calendar;
pub mod filter;
pub mod project;
pub mod sorting;
pub mod task;

pub use calendar::{
    build_calendar, calendar_entries, CalendarDay, CalendarEntry, CalendarGrid, CalendarMonth,
    HasDueDate, WeekStart,
};
pub use filter::{filter_projects, StatusFilter};
pub use project::{
    NewProject, Project, ProjectField, ProjectId, ProjectPatch, ProjectStatus, TECH_STACK_OPTIONS,
};
pub use sorting::{sort_projects, sort_tasks, sort_tasks_for_display, SortField, SortOrder};
pub use task::{NewTask, Task, TaskId, TaskPatch};
