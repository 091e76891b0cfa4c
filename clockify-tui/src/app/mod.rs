use crate::report::{self, DailySummary, NameLookup, WeeklySummary};
use crate::selector::{EntrySelector, MAX_DESCRIPTION_CHARS};
use crate::time_utils::date_range;
use crate::timer::TimerState;
use clockify::{Project, Tag, Task, TimeEntry};
use std::collections::HashMap;
use time::{Date, OffsetDateTime, UtcOffset};

mod navigation;
mod state;
pub use state::{
    EntriesScope, ReportKey, ReportKind, StatusKind, StatusMessage, TextInput, View,
};

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    /// Seeded dev data instead of the real service.
    pub is_dev: bool,
    pub offset: UtcOffset,

    pub timer: TimerState,
    /// Stop request sent and not yet answered.
    pub stop_pending: bool,

    // Composition flow, drawn over the timer view while open
    pub selector: EntrySelector,
    pub selector_open: bool,
    /// Description being amended before tag selection in editing mode.
    pub description_edit: Option<TextInput>,
    /// Entry awaiting delete confirmation.
    pub confirm_delete: Option<String>,

    // Reference data
    pub projects: Vec<Project>,
    pub tags: Vec<Tag>,
    pub project_names: NameLookup,
    pub task_names: NameLookup,
    pub tag_names: HashMap<String, String>,

    // Entries view
    pub entries: Vec<TimeEntry>,
    pub entries_scope: EntriesScope,
    pub selected_entry: Option<usize>,

    // Reports view
    pub report_entries: Vec<TimeEntry>,
    pub report_kind: ReportKind,
    /// Selected day; weekly reports cover the week containing it.
    pub report_date: Date,
    pub report_loaded: Option<ReportKey>,

    // Requests awaiting a completion message
    pub in_flight: usize,
    pub throbber_state: throbber_widgets_tui::ThrobberState,
}

impl App {
    pub fn new(offset: UtcOffset, is_dev: bool) -> Self {
        let today = OffsetDateTime::now_utc().to_offset(offset).date();
        Self {
            running: true,
            current_view: View::Timer,
            show_help: false,
            status: None,
            is_dev,
            offset,
            timer: TimerState::new(),
            stop_pending: false,
            selector: EntrySelector::new(),
            selector_open: false,
            description_edit: None,
            confirm_delete: None,
            projects: Vec::new(),
            tags: Vec::new(),
            project_names: NameLookup::new(),
            task_names: NameLookup::new(),
            tag_names: HashMap::new(),
            entries: Vec::new(),
            entries_scope: EntriesScope::Today,
            selected_entry: None,
            report_entries: Vec::new(),
            report_kind: ReportKind::Daily,
            report_date: today,
            report_loaded: None,
            in_flight: 0,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text: message.into(),
        });
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Success,
            text: message.into(),
        });
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text: message.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn request_started(&mut self) {
        self.in_flight += 1;
    }

    pub fn request_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// True while a modal owns the keyboard.
    pub fn is_in_modal(&self) -> bool {
        self.selector_open || self.description_edit.is_some() || self.confirm_delete.is_some()
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.project_names = projects
            .iter()
            .map(|project| (project.id.clone(), project.name.clone()))
            .collect();
        self.selector.set_projects(projects.clone());
        self.projects = projects;
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tag_names = tags
            .iter()
            .map(|tag| (tag.id.clone(), tag.name.clone()))
            .collect();
        self.selector.set_tags(tags.clone());
        self.tags = tags;
    }

    /// Merges task names into the lookup used by reports and entry rows.
    pub fn add_task_names(&mut self, tasks: &[Task]) {
        for task in tasks {
            self.task_names.insert(task.id.clone(), task.name.clone());
        }
    }

    /// Returns false when the entries belong to a scope no longer shown.
    pub fn set_entries(&mut self, scope: EntriesScope, entries: Vec<TimeEntry>) -> bool {
        if scope != self.entries_scope {
            return false;
        }
        self.entries = entries;
        self.selected_entry = match self.selected_entry {
            _ if self.entries.is_empty() => None,
            Some(i) => Some(i.min(self.entries.len() - 1)),
            None => Some(0),
        };
        true
    }

    /// Returns false when the entries belong to a report no longer shown.
    pub fn set_report_entries(&mut self, key: ReportKey, entries: Vec<TimeEntry>) -> bool {
        if key != self.report_key() {
            return false;
        }
        self.report_entries = entries;
        self.report_loaded = Some(key);
        true
    }

    pub fn selected_entry(&self) -> Option<&TimeEntry> {
        self.selected_entry.and_then(|i| self.entries.get(i))
    }

    pub fn entries_range(&self, scope: EntriesScope) -> (OffsetDateTime, OffsetDateTime) {
        let today = self.today();
        match scope {
            EntriesScope::Today => date_range(today, 1, self.offset),
            EntriesScope::ThisWeek => date_range(report::week_start_of(today), 7, self.offset),
        }
    }

    pub fn report_key(&self) -> ReportKey {
        let start = match self.report_kind {
            ReportKind::Daily => self.report_date,
            ReportKind::Weekly => report::week_start_of(self.report_date),
        };
        ReportKey {
            kind: self.report_kind,
            start,
        }
    }

    pub fn report_range(&self, key: ReportKey) -> (OffsetDateTime, OffsetDateTime) {
        let days = match key.kind {
            ReportKind::Daily => 1,
            ReportKind::Weekly => 7,
        };
        date_range(key.start, days, self.offset)
    }

    /// Computed fresh on every call so running entries keep growing.
    pub fn daily_summary(&self, now: OffsetDateTime) -> DailySummary {
        report::aggregate_daily(
            self.report_date,
            &self.report_entries,
            &self.project_names,
            &self.task_names,
            now,
        )
    }

    pub fn weekly_summary(&self, now: OffsetDateTime) -> WeeklySummary {
        report::aggregate_weekly(
            report::week_start_of(self.report_date),
            &self.report_entries,
            &self.project_names,
            &self.task_names,
            now,
            self.offset,
        )
    }

    pub fn project_name(&self, project_id: Option<&str>) -> String {
        match project_id {
            Some(id) => self
                .project_names
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
            None => report::NO_PROJECT_NAME.to_string(),
        }
    }

    pub fn task_name(&self, task_id: Option<&str>) -> Option<String> {
        let id = task_id?;
        Some(
            self.task_names
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
        )
    }

    pub fn tag_list(&self, tag_ids: &[String]) -> String {
        tag_ids
            .iter()
            .map(|id| self.tag_names.get(id).map(String::as_str).unwrap_or(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn open_selector(&mut self) {
        self.selector.reset();
        self.selector_open = true;
        self.clear_status();
    }

    pub fn close_selector(&mut self) {
        self.selector.reset();
        self.selector_open = false;
    }

    /// Starts amending the running timer's description.
    pub fn begin_description_edit(&mut self) -> bool {
        if !self.timer.is_running {
            self.set_error("No timer running to edit");
            return false;
        }
        let mut input = TextInput::new().with_max_chars(MAX_DESCRIPTION_CHARS);
        input.set_value(&self.timer.description);
        self.description_edit = Some(input);
        self.clear_status();
        true
    }

    /// Hands the amended description to the selector's tag step.
    pub fn finish_description_edit(&mut self) {
        let Some(input) = self.description_edit.take() else {
            return;
        };
        self.selector
            .begin_editing(&input.value, &self.timer.tag_ids, self.tags.clone());
        self.selector_open = true;
    }

    pub fn cancel_description_edit(&mut self) {
        self.description_edit = None;
    }
}
