use clockify::TimeEntry;
use std::collections::{BTreeMap, HashMap};
use time::{Date, Duration, OffsetDateTime, UtcOffset};

pub const NO_PROJECT_ID: &str = "no-project";
pub const NO_PROJECT_NAME: &str = "No Project";
pub const NO_TASK_ID: &str = "no-task";
pub const NO_TASK_NAME: &str = "No Task";

/// Id -> display name, as built from the loaded projects and tasks.
pub type NameLookup = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub task_id: String,
    pub task_name: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project_id: String,
    pub project_name: String,
    pub total: Duration,
    pub by_task: HashMap<String, TaskSummary>,
}

impl ProjectSummary {
    /// Tasks, longest first.
    pub fn sorted_tasks(&self) -> Vec<&TaskSummary> {
        let mut tasks: Vec<_> = self.by_task.values().collect();
        tasks.sort_by(|a, b| {
            b.duration
                .cmp(&a.duration)
                .then_with(|| a.task_name.cmp(&b.task_name))
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        tasks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub date: Date,
    pub total: Duration,
    pub by_project: HashMap<String, ProjectSummary>,
}

impl DailySummary {
    pub fn sorted_projects(&self) -> Vec<&ProjectSummary> {
        sort_projects(&self.by_project)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySummary {
    pub start_date: Date,
    /// Exclusive.
    pub end_date: Date,
    pub total: Duration,
    pub by_day: BTreeMap<Date, Duration>,
    pub by_project: HashMap<String, ProjectSummary>,
}

impl WeeklySummary {
    pub fn sorted_projects(&self) -> Vec<&ProjectSummary> {
        sort_projects(&self.by_project)
    }

    /// The seven days of the week in order, zero for days without entries.
    pub fn days(&self) -> Vec<(Date, Duration)> {
        (0..7)
            .filter_map(|offset| self.start_date.checked_add(Duration::days(offset)))
            .map(|day| (day, self.by_day.get(&day).copied().unwrap_or(Duration::ZERO)))
            .collect()
    }
}

/// Monday of the week containing `date`.
pub fn week_start_of(date: Date) -> Date {
    let days_from_monday = i64::from(date.weekday().number_days_from_monday());
    date.checked_sub(Duration::days(days_from_monday))
        .unwrap_or(date)
}

/// Rolls `entries` up by project and task. Open entries are measured up to `now`.
pub fn aggregate_daily(
    date: Date,
    entries: &[TimeEntry],
    project_names: &NameLookup,
    task_names: &NameLookup,
    now: OffsetDateTime,
) -> DailySummary {
    let mut summary = DailySummary {
        date,
        total: Duration::ZERO,
        by_project: HashMap::new(),
    };

    for entry in entries {
        let duration = entry.time_interval.duration_at(now);
        summary.total += duration;
        add_to_projects(
            &mut summary.by_project,
            entry,
            duration,
            project_names,
            task_names,
        );
    }

    summary
}

/// Like [`aggregate_daily`], with an extra per-day bucket keyed by the date the
/// entry started on in `offset`.
pub fn aggregate_weekly(
    week_start: Date,
    entries: &[TimeEntry],
    project_names: &NameLookup,
    task_names: &NameLookup,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> WeeklySummary {
    let mut summary = WeeklySummary {
        start_date: week_start,
        end_date: week_start
            .checked_add(Duration::days(7))
            .unwrap_or(week_start),
        total: Duration::ZERO,
        by_day: BTreeMap::new(),
        by_project: HashMap::new(),
    };

    for entry in entries {
        let duration = entry.time_interval.duration_at(now);
        summary.total += duration;

        let day = entry.time_interval.start.to_offset(offset).date();
        *summary.by_day.entry(day).or_insert(Duration::ZERO) += duration;

        add_to_projects(
            &mut summary.by_project,
            entry,
            duration,
            project_names,
            task_names,
        );
    }

    summary
}

fn add_to_projects(
    by_project: &mut HashMap<String, ProjectSummary>,
    entry: &TimeEntry,
    duration: Duration,
    project_names: &NameLookup,
    task_names: &NameLookup,
) {
    let (project_id, project_name) = resolve(
        entry.project_id.as_deref(),
        project_names,
        NO_PROJECT_ID,
        NO_PROJECT_NAME,
    );
    let (task_id, task_name) = resolve(
        entry.task_id.as_deref(),
        task_names,
        NO_TASK_ID,
        NO_TASK_NAME,
    );

    let project = by_project
        .entry(project_id.clone())
        .or_insert_with(|| ProjectSummary {
            project_id,
            project_name,
            total: Duration::ZERO,
            by_task: HashMap::new(),
        });
    project.total += duration;

    project
        .by_task
        .entry(task_id.clone())
        .or_insert_with(|| TaskSummary {
            task_id,
            task_name,
            duration: Duration::ZERO,
        })
        .duration += duration;
}

fn resolve(
    id: Option<&str>,
    names: &NameLookup,
    missing_id: &str,
    missing_name: &str,
) -> (String, String) {
    match id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let name = names.get(id).map(String::as_str).unwrap_or(id);
            (id.to_string(), name.to_string())
        }
        None => (missing_id.to_string(), missing_name.to_string()),
    }
}

fn sort_projects(by_project: &HashMap<String, ProjectSummary>) -> Vec<&ProjectSummary> {
    let mut projects: Vec<_> = by_project.values().collect();
    projects.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.project_name.cmp(&b.project_name))
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    projects
}
