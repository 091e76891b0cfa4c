use crate::app::{EntriesScope, ReportKey};
use clockify::{Project, Tag, Task, TimeEntry};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Completion of a background task, applied to the app by the event loop.
#[derive(Debug, Clone)]
pub(super) enum Message {
    CurrentTimerLoaded(Option<TimeEntry>),
    TimerStarted(TimeEntry),
    TimerStopped(TimeEntry),
    /// Stop found no running timer; another client stopped it first.
    TimerAlreadyStopped,
    TimerUpdated(TimeEntry),
    ProjectsLoaded(Vec<Project>),
    TasksLoaded {
        project_id: String,
        tasks: Vec<Task>,
    },
    TasksFailed {
        project_id: String,
        error: String,
    },
    TaskNamesLoaded(Vec<Task>),
    TagsLoaded(Vec<Tag>),
    EntriesLoaded {
        scope: EntriesScope,
        entries: Vec<TimeEntry>,
    },
    ReportEntriesLoaded {
        key: ReportKey,
        entries: Vec<TimeEntry>,
    },
    SuggestionsLoaded {
        request_id: u64,
        descriptions: Vec<String>,
    },
    EntryDeleted {
        id: String,
    },
    /// Start or update of the composed entry was rejected.
    SubmitFailed {
        context: &'static str,
        error: String,
    },
    StopFailed {
        error: String,
    },
    Failed {
        context: &'static str,
        error: String,
    },
}

pub(super) type MessageTx = UnboundedSender<Message>;
pub(super) type MessageRx = UnboundedReceiver<Message>;

pub(super) fn channel() -> (MessageTx, MessageRx) {
    mpsc::unbounded_channel()
}
