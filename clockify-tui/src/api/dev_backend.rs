use clockify::{ClockifyError, Project, Tag, Task, TimeEntry, TimeEntryRequest, TimeInterval};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use time::{Duration, OffsetDateTime, Time};

use crate::time_utils::local_offset;

/// In-memory stand-in for the remote service, seeded with a few days of history.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug)]
struct DevStore {
    entries: Vec<TimeEntry>,
    next_id: u64,
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    pub fn new() -> Self {
        let entries = seed_dev_history(OffsetDateTime::now_utc());
        let next_id = entries.len() as u64 + 1;
        Self {
            store: Arc::new(Mutex::new(DevStore { entries, next_id })),
        }
    }

    fn store(&self) -> MutexGuard<'_, DevStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn projects(&self) -> Vec<Project> {
        vec![
            Project::new("proj_1", "Nordic Crisis Manager"),
            Project::new("proj_2", "Azure DevOps Integration"),
            Project::new("proj_3", "TUI Development"),
            Project::new("proj_4", "Internal"),
        ]
    }

    pub fn tasks(&self, project_id: &str) -> Vec<Task> {
        match project_id {
            "proj_1" => vec![
                Task::new("task_1_1", "Backend Development", project_id),
                Task::new("task_1_2", "Code Review", project_id),
            ],
            "proj_2" => vec![Task::new("task_2_1", "API Integration", project_id)],
            "proj_3" => vec![
                Task::new("task_3_1", "Feature Implementation", project_id),
                Task::new("task_3_2", "Bug Fixing", project_id),
            ],
            _ => Vec::new(),
        }
    }

    pub fn tags(&self) -> Vec<Tag> {
        vec![
            Tag::new("tag_1", "billable"),
            Tag::new("tag_2", "meeting"),
            Tag::new("tag_3", "support"),
        ]
    }

    pub fn current_timer(&self) -> Option<TimeEntry> {
        self.store()
            .entries
            .iter()
            .find(|entry| entry.is_running())
            .cloned()
    }

    pub fn entries_between(&self, start: OffsetDateTime, end: OffsetDateTime) -> Vec<TimeEntry> {
        let mut entries: Vec<_> = self
            .store()
            .entries
            .iter()
            .filter(|entry| entry.time_interval.start >= start && entry.time_interval.start < end)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.time_interval.start.cmp(&a.time_interval.start));
        entries
    }

    pub fn search(&self, substring: &str) -> Vec<TimeEntry> {
        let needle = substring.to_lowercase();
        self.store()
            .entries
            .iter()
            .filter(|entry| entry.description.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Starts a timer, stopping any running one first like the real service.
    pub fn start(
        &self,
        description: &str,
        project_id: Option<&str>,
        task_id: Option<&str>,
        tag_ids: &[String],
        now: OffsetDateTime,
    ) -> TimeEntry {
        let mut store = self.store();
        for entry in store.entries.iter_mut().filter(|entry| entry.is_running()) {
            entry.time_interval.end = Some(now);
        }

        let entry = dev_entry(
            store.next_id,
            description,
            project_id,
            task_id,
            tag_ids.to_vec(),
            now,
            None,
        );
        store.next_id += 1;
        store.entries.push(entry.clone());
        entry
    }

    pub fn stop(&self, now: OffsetDateTime) -> Result<TimeEntry, ClockifyError> {
        let mut store = self.store();
        let entry = store
            .entries
            .iter_mut()
            .find(|entry| entry.is_running())
            .ok_or(ClockifyError::NoRunningTimer)?;
        entry.time_interval.end = Some(now);
        Ok(entry.clone())
    }

    pub fn update(&self, id: &str, request: &TimeEntryRequest) -> Result<TimeEntry, ClockifyError> {
        let mut store = self.store();
        let entry = store
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| not_found(id))?;

        entry.description = request.description.clone();
        entry.project_id = request.project_id.clone();
        entry.task_id = request.task_id.clone();
        entry.tag_ids = request.tag_ids.clone();
        entry.billable = request.billable;
        entry.time_interval = TimeInterval {
            start: request.start,
            end: request.end,
        };
        Ok(entry.clone())
    }

    pub fn delete(&self, id: &str) -> Result<(), ClockifyError> {
        let mut store = self.store();
        let before = store.entries.len();
        store.entries.retain(|entry| entry.id != id);
        if store.entries.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: &str) -> ClockifyError {
    ClockifyError::Status {
        status: 404,
        body: format!("time entry {id} not found"),
    }
}

fn dev_entry(
    idx: u64,
    description: &str,
    project_id: Option<&str>,
    task_id: Option<&str>,
    tag_ids: Vec<String>,
    start: OffsetDateTime,
    end: Option<OffsetDateTime>,
) -> TimeEntry {
    TimeEntry {
        id: format!("dev-entry-{idx}"),
        description: description.to_string(),
        project_id: project_id.map(str::to_string),
        task_id: task_id.map(str::to_string),
        tag_ids,
        user_id: "dev-user".to_string(),
        workspace_id: "dev-workspace".to_string(),
        billable: false,
        time_interval: TimeInterval { start, end },
    }
}

fn seed_dev_history(now: OffsetDateTime) -> Vec<TimeEntry> {
    let offset = local_offset();
    let today = now.to_offset(offset).date();

    let at = |days_back: i64, hour: u8, minute: u8| {
        let date = today - Duration::days(days_back);
        let time = Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT);
        date.with_time(time).assume_offset(offset)
    };

    let billable = || vec!["tag_1".to_string()];
    let seeds = [
        (0, (8, 0), (10, 0), "API refactor", Some("proj_1"), Some("task_1_1"), billable()),
        (0, (10, 15), (11, 0), "PR review", Some("proj_1"), Some("task_1_2"), Vec::new()),
        (1, (9, 0), (12, 0), "Webhook setup", Some("proj_2"), Some("task_2_1"), billable()),
        (1, (13, 0), (13, 30), "Standup", Some("proj_4"), None, vec!["tag_2".to_string()]),
        (2, (9, 30), (15, 0), "Scrollable lists", Some("proj_3"), Some("task_3_1"), Vec::new()),
        (3, (14, 0), (16, 45), "Crash on resize", Some("proj_3"), Some("task_3_2"), Vec::new()),
        (4, (10, 0), (10, 45), "Inbox", None, None, Vec::new()),
    ];

    seeds
        .into_iter()
        .filter(|(days_back, (hour, minute), ..)| at(*days_back, *hour, *minute) <= now)
        .enumerate()
        .map(
            |(idx, (days_back, (h_start, m_start), (h_end, m_end), note, project, task, tags))| {
                dev_entry(
                    idx as u64 + 1,
                    note,
                    project,
                    task,
                    tags,
                    at(days_back, h_start, m_start),
                    Some(at(days_back, h_end, m_end)),
                )
            },
        )
        .collect()
}
