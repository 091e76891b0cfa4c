use crate::app::{EntriesScope, ReportKey};
use clockify::TimeEntry;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Work requested by key handlers. Each action becomes one background task.
#[derive(Debug, Clone)]
pub(super) enum Action {
    RefreshCurrentTimer,
    LoadProjects {
        force: bool,
    },
    LoadTasks {
        project_id: String,
    },
    /// Tasks of every project, for the name lookup.
    LoadTaskNames {
        project_ids: Vec<String>,
    },
    LoadTags {
        force: bool,
    },
    LoadEntries {
        scope: EntriesScope,
    },
    LoadReport {
        key: ReportKey,
    },
    StartTimer {
        description: String,
        project_id: Option<String>,
        task_id: Option<String>,
        tag_ids: Vec<String>,
    },
    StopTimer,
    UpdateRunningEntry {
        entry: TimeEntry,
        description: String,
        tag_ids: Vec<String>,
    },
    SearchSuggestions {
        request_id: u64,
        query: String,
    },
    DeleteEntry {
        id: String,
    },
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
