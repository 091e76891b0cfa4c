use clockify::{Project, Tag, Task};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;

pub const MAX_DESCRIPTION_CHARS: usize = 255;
pub const MAX_SUGGESTIONS: usize = 5;
/// Shortest description that triggers a suggestion lookup.
pub const MIN_SUGGESTION_QUERY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    SelectingProject,
    SelectingTask,
    EnteringDescription,
    SelectingTags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorResult {
    /// Attributes for a new timer.
    Start {
        project_id: String,
        task_id: Option<String>,
        description: String,
        tag_ids: Vec<String>,
    },
    /// New description and tags for the running timer.
    Update {
        description: String,
        tag_ids: Vec<String>,
    },
}

/// Guided flow for composing a new entry, or amending the running one.
///
/// Compose mode walks project, task, description and tags in order. Editing
/// mode starts at tag selection with the running timer's description and tags
/// and never touches project or task.
#[derive(Debug, Clone)]
pub struct EntrySelector {
    mode: SelectorMode,
    editing_mode: bool,

    projects: Vec<Project>,
    tasks: Vec<Task>,
    tags: Vec<Tag>,

    project_cursor: Option<usize>,
    task_cursor: Option<usize>,
    tag_cursor: Option<usize>,
    selected_tags: BTreeSet<usize>,

    // Project confirmed while its tasks are in flight.
    pending_project: Option<String>,
    description: String,

    suggestions: Vec<String>,
    suggestion_cursor: Option<usize>,
    latest_request_id: u64,

    // Confirmed result sent, awaiting the service.
    submitting: bool,
}

impl Default for EntrySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl EntrySelector {
    pub fn new() -> Self {
        Self {
            mode: SelectorMode::SelectingProject,
            editing_mode: false,
            projects: Vec::new(),
            tasks: Vec::new(),
            tags: Vec::new(),
            project_cursor: None,
            task_cursor: None,
            tag_cursor: None,
            selected_tags: BTreeSet::new(),
            pending_project: None,
            description: String::new(),
            suggestions: Vec::new(),
            suggestion_cursor: None,
            latest_request_id: 0,
            submitting: false,
        }
    }

    pub fn mode(&self) -> SelectorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.editing_mode
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn project_cursor(&self) -> Option<usize> {
        self.project_cursor
    }

    pub fn task_cursor(&self) -> Option<usize> {
        self.task_cursor
    }

    pub fn tag_cursor(&self) -> Option<usize> {
        self.tag_cursor
    }

    pub fn is_tag_selected(&self, index: usize) -> bool {
        self.selected_tags.contains(&index)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestion_cursor(&self) -> Option<usize> {
        self.suggestion_cursor
    }

    /// Project whose tasks are being fetched, if any.
    pub fn pending_project(&self) -> Option<&str> {
        self.pending_project.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_loading_tasks(&self) -> bool {
        self.mode == SelectorMode::SelectingProject && self.pending_project.is_some()
    }

    pub fn selected_project(&self) -> Option<&Project> {
        let id = self.pending_project.as_deref()?;
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.task_cursor.and_then(|i| self.tasks.get(i))
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.project_cursor = clamp_cursor(self.project_cursor, self.projects.len());
    }

    /// Replaces the tag list, keeping the current selection by tag id.
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        let selected_ids = self.selected_tag_ids();
        self.tags = tags;
        self.selected_tags = self.indices_of(&selected_ids);
        self.tag_cursor = clamp_cursor(self.tag_cursor, self.tags.len());
    }

    /// Enters editing mode at tag selection, seeded from the running timer.
    pub fn begin_editing(&mut self, description: &str, current_tag_ids: &[String], tags: Vec<Tag>) {
        self.reset();
        self.editing_mode = true;
        self.description = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        self.tags = tags;
        self.selected_tags = self.indices_of(current_tag_ids);
        self.tag_cursor = first_cursor(self.tags.len());
        self.mode = SelectorMode::SelectingTags;
    }

    pub fn move_up(&mut self) {
        if let Some(cursor) = self.active_cursor_mut() {
            *cursor = cursor.map(|i| i.saturating_sub(1));
        }
    }

    pub fn move_down(&mut self) {
        let len = self.active_len();
        if let Some(cursor) = self.active_cursor_mut() {
            *cursor = cursor.map(|i| (i + 1).min(len.saturating_sub(1)));
        }
    }

    /// Records the highlighted project and returns its id so its tasks can be
    /// loaded. The flow moves on once [`Self::set_tasks`] delivers them.
    pub fn confirm_project(&mut self) -> Option<String> {
        if self.mode != SelectorMode::SelectingProject {
            return None;
        }
        let project = self.project_cursor.and_then(|i| self.projects.get(i))?;
        let id = project.id.clone();
        self.pending_project = Some(id.clone());
        Some(id)
    }

    /// Delivers the tasks of the pending project. Tasks for any other project
    /// are stale and ignored.
    pub fn set_tasks(&mut self, project_id: &str, tasks: Vec<Task>) -> bool {
        if self.mode != SelectorMode::SelectingProject
            || self.pending_project.as_deref() != Some(project_id)
        {
            return false;
        }
        self.tasks = tasks;
        self.task_cursor = first_cursor(self.tasks.len());
        self.mode = SelectorMode::SelectingTask;
        true
    }

    /// Unfreezes the project list after its task load failed.
    pub fn cancel_pending_project(&mut self, project_id: &str) {
        if self.mode == SelectorMode::SelectingProject
            && self.pending_project.as_deref() == Some(project_id)
        {
            self.pending_project = None;
        }
    }

    /// Accepts the highlighted task, or no task when the list is empty.
    pub fn confirm_task(&mut self) -> bool {
        if self.mode != SelectorMode::SelectingTask {
            return false;
        }
        self.mode = SelectorMode::EnteringDescription;
        true
    }

    pub fn input_char(&mut self, c: char) -> bool {
        if self.mode != SelectorMode::EnteringDescription || c.is_control() {
            return false;
        }
        if self.description.chars().count() >= MAX_DESCRIPTION_CHARS {
            return false;
        }
        self.description.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.mode != SelectorMode::EnteringDescription {
            return false;
        }
        self.description.pop().is_some()
    }

    pub fn confirm_description(&mut self) -> bool {
        if self.mode != SelectorMode::EnteringDescription {
            return false;
        }
        self.clear_suggestions();
        self.selected_tags.clear();
        self.tag_cursor = first_cursor(self.tags.len());
        self.mode = SelectorMode::SelectingTags;
        true
    }

    pub fn toggle_current_tag(&mut self) {
        if self.mode != SelectorMode::SelectingTags {
            return;
        }
        let Some(index) = self.tag_cursor.filter(|&i| i < self.tags.len()) else {
            return;
        };
        if !self.selected_tags.remove(&index) {
            self.selected_tags.insert(index);
        }
    }

    /// Finishes the flow. `None` outside tag selection or while a result
    /// is already being submitted.
    pub fn confirm_tags(&self) -> Option<SelectorResult> {
        if self.mode != SelectorMode::SelectingTags || self.submitting {
            return None;
        }

        let tag_ids = self.selected_tag_ids();
        if self.editing_mode {
            return Some(SelectorResult::Update {
                description: self.description.clone(),
                tag_ids,
            });
        }

        Some(SelectorResult::Start {
            project_id: self.pending_project.clone()?,
            task_id: self.selected_task().map(|task| task.id.clone()),
            description: self.description.clone(),
            tag_ids,
        })
    }

    /// Records that the confirmed result is on its way to the service.
    /// Further confirmations are refused until [`Self::submit_failed`] or
    /// [`Self::reset`].
    pub fn mark_submitting(&mut self) {
        if self.mode == SelectorMode::SelectingTags {
            self.submitting = true;
        }
    }

    /// The service rejected the result; allow another attempt.
    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }

    /// Steps back one state. Returns true when the whole flow should close.
    pub fn back(&mut self) -> bool {
        match self.mode {
            SelectorMode::SelectingTags if self.editing_mode => true,
            SelectorMode::SelectingTags => {
                self.selected_tags.clear();
                self.tag_cursor = first_cursor(self.tags.len());
                self.mode = SelectorMode::EnteringDescription;
                false
            }
            SelectorMode::EnteringDescription => {
                self.description.clear();
                self.clear_suggestions();
                if self.tasks.is_empty() {
                    self.pending_project = None;
                    self.mode = SelectorMode::SelectingProject;
                } else {
                    self.mode = SelectorMode::SelectingTask;
                }
                false
            }
            SelectorMode::SelectingTask => {
                self.tasks.clear();
                self.task_cursor = None;
                self.pending_project = None;
                self.mode = SelectorMode::SelectingProject;
                false
            }
            SelectorMode::SelectingProject => true,
        }
    }

    /// Back to the initial state. Loaded projects and tags are kept.
    pub fn reset(&mut self) {
        self.mode = SelectorMode::SelectingProject;
        self.editing_mode = false;
        self.submitting = false;
        self.tasks.clear();
        self.project_cursor = first_cursor(self.projects.len());
        self.task_cursor = None;
        self.tag_cursor = first_cursor(self.tags.len());
        self.selected_tags.clear();
        self.pending_project = None;
        self.description.clear();
        self.clear_suggestions();
    }

    /// Issues a lookup for the current description. Every call supersedes
    /// earlier requests, including calls that return `None` because the text
    /// is too short.
    pub fn suggestion_request(&mut self) -> Option<(u64, String)> {
        self.latest_request_id += 1;
        if self.mode != SelectorMode::EnteringDescription
            || self.description.chars().count() < MIN_SUGGESTION_QUERY
        {
            self.suggestions.clear();
            self.suggestion_cursor = None;
            return None;
        }
        Some((self.latest_request_id, self.description.clone()))
    }

    /// Applies lookup results. Results of superseded requests are dropped.
    pub fn apply_suggestions(&mut self, request_id: u64, candidates: Vec<String>) -> bool {
        if request_id != self.latest_request_id
            || self.mode != SelectorMode::EnteringDescription
        {
            return false;
        }

        let matcher = SkimMatcherV2::default();
        let mut seen = BTreeSet::new();
        let mut ranked: Vec<(i64, String)> = candidates
            .into_iter()
            .filter(|candidate| !candidate.trim().is_empty() && *candidate != self.description)
            .filter(|candidate| seen.insert(candidate.clone()))
            .filter_map(|candidate| {
                matcher
                    .fuzzy_match(&candidate, &self.description)
                    .map(|score| (score, candidate))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        self.suggestions = ranked
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, candidate)| candidate)
            .collect();
        self.suggestion_cursor = first_cursor(self.suggestions.len());
        true
    }

    /// Replaces the description with the highlighted suggestion.
    pub fn accept_suggestion(&mut self) -> bool {
        if self.mode != SelectorMode::EnteringDescription {
            return false;
        }
        let Some(suggestion) = self.suggestion_cursor.and_then(|i| self.suggestions.get(i))
        else {
            return false;
        };
        self.description = suggestion.chars().take(MAX_DESCRIPTION_CHARS).collect();
        self.clear_suggestions();
        true
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion_cursor = None;
        self.latest_request_id += 1;
    }

    fn selected_tag_ids(&self) -> Vec<String> {
        self.selected_tags
            .iter()
            .filter_map(|&i| self.tags.get(i))
            .map(|tag| tag.id.clone())
            .collect()
    }

    fn indices_of(&self, tag_ids: &[String]) -> BTreeSet<usize> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| tag_ids.contains(&tag.id))
            .map(|(i, _)| i)
            .collect()
    }

    fn active_len(&self) -> usize {
        match self.mode {
            SelectorMode::SelectingProject => self.projects.len(),
            SelectorMode::SelectingTask => self.tasks.len(),
            SelectorMode::EnteringDescription => self.suggestions.len(),
            SelectorMode::SelectingTags => self.tags.len(),
        }
    }

    fn active_cursor_mut(&mut self) -> Option<&mut Option<usize>> {
        match self.mode {
            // The project list is frozen while its tasks load.
            SelectorMode::SelectingProject if self.pending_project.is_some() => None,
            SelectorMode::SelectingProject => Some(&mut self.project_cursor),
            SelectorMode::SelectingTask => Some(&mut self.task_cursor),
            SelectorMode::EnteringDescription => Some(&mut self.suggestion_cursor),
            SelectorMode::SelectingTags => Some(&mut self.tag_cursor),
        }
    }
}

fn first_cursor(len: usize) -> Option<usize> {
    (len > 0).then_some(0)
}

fn clamp_cursor(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(cursor.unwrap_or(0).min(len - 1))
    }
}
