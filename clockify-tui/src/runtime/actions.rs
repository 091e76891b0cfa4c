use crate::api::ApiClient;
use crate::app::App;
use crate::cache::Cache;
use clockify::{ClockifyError, Task, TimeEntryRequest};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::action_queue::{Action, ActionTx};
use super::message::{Message, MessageTx};

/// What background tasks need: the backend, the shared cache and a way back.
#[derive(Clone)]
pub(super) struct Backend {
    pub client: ApiClient,
    pub cache: Arc<Cache>,
    pub message_tx: MessageTx,
}

/// Spawns the task for `action`. Its result arrives later as a [`Message`].
pub(super) fn run_action(action: Action, app: &mut App, backend: &Backend) {
    app.request_started();
    let client = backend.client.clone();
    let cache = Arc::clone(&backend.cache);
    let tx = backend.message_tx.clone();

    match action {
        Action::RefreshCurrentTimer => spawn(tx, async move {
            match client.fetch_current_timer().await {
                Ok(entry) => Message::CurrentTimerLoaded(entry),
                Err(e) => failed("Failed to load current timer", e),
            }
        }),
        Action::LoadProjects { force } => {
            if force {
                cache.clear();
            }
            spawn(tx, async move {
                if let Some(projects) = cache.get_projects() {
                    debug!(count = projects.len(), "projects served from cache");
                    return Message::ProjectsLoaded(projects);
                }
                match client.fetch_projects().await {
                    Ok(projects) => {
                        debug!(count = projects.len(), "fetched projects");
                        cache.set_projects(projects.clone());
                        Message::ProjectsLoaded(projects)
                    }
                    Err(e) => failed("Failed to load projects", e),
                }
            })
        }
        Action::LoadTasks { project_id } => spawn(tx, async move {
            match tasks_for(&client, &cache, &project_id).await {
                Ok(tasks) => Message::TasksLoaded { project_id, tasks },
                Err(e) => {
                    warn!(%project_id, error = %e, "failed to load tasks");
                    Message::TasksFailed {
                        project_id,
                        error: e.to_string(),
                    }
                }
            }
        }),
        Action::LoadTaskNames { project_ids } => spawn(tx, async move {
            let mut all = Vec::new();
            for project_id in &project_ids {
                match tasks_for(&client, &cache, project_id).await {
                    Ok(tasks) => all.extend(tasks),
                    Err(e) => warn!(%project_id, error = %e, "skipping task names for project"),
                }
            }
            Message::TaskNamesLoaded(all)
        }),
        Action::LoadTags { force } => spawn(tx, async move {
            if !force {
                if let Some(tags) = cache.get_tags() {
                    debug!(count = tags.len(), "tags served from cache");
                    return Message::TagsLoaded(tags);
                }
            }
            match client.fetch_tags().await {
                Ok(tags) => {
                    cache.set_tags(tags.clone());
                    Message::TagsLoaded(tags)
                }
                Err(e) => failed("Failed to load tags", e),
            }
        }),
        Action::LoadEntries { scope } => {
            let (start, end) = app.entries_range(scope);
            spawn(tx, async move {
                match client.fetch_entries(start, end).await {
                    Ok(entries) => Message::EntriesLoaded { scope, entries },
                    Err(e) => failed("Failed to load entries", e),
                }
            })
        }
        Action::LoadReport { key } => {
            let (start, end) = app.report_range(key);
            spawn(tx, async move {
                match client.fetch_entries(start, end).await {
                    Ok(entries) => Message::ReportEntriesLoaded { key, entries },
                    Err(e) => failed("Failed to load report", e),
                }
            })
        }
        Action::StartTimer {
            description,
            project_id,
            task_id,
            tag_ids,
        } => spawn(tx, async move {
            let result = client
                .start_timer(
                    &description,
                    project_id.as_deref(),
                    task_id.as_deref(),
                    &tag_ids,
                )
                .await;
            match result {
                Ok(entry) => {
                    info!(entry_id = %entry.id, "timer started");
                    Message::TimerStarted(entry)
                }
                Err(e) => submit_failed("Failed to start timer", e),
            }
        }),
        Action::StopTimer => spawn(tx, async move {
            match client.stop_timer().await {
                Ok(entry) => {
                    info!(entry_id = %entry.id, "timer stopped");
                    Message::TimerStopped(entry)
                }
                Err(ClockifyError::NoRunningTimer) => {
                    info!("timer was already stopped elsewhere");
                    Message::TimerAlreadyStopped
                }
                Err(e) => {
                    warn!(error = %e, "Failed to stop timer");
                    Message::StopFailed {
                        error: e.to_string(),
                    }
                }
            }
        }),
        Action::UpdateRunningEntry {
            entry,
            description,
            tag_ids,
        } => spawn(tx, async move {
            let request = TimeEntryRequest::amend(&entry, description, tag_ids);
            match client.update_entry(&entry.id, &request).await {
                Ok(updated) => Message::TimerUpdated(updated),
                Err(e) => submit_failed("Failed to update timer", e),
            }
        }),
        Action::SearchSuggestions { request_id, query } => spawn(tx, async move {
            match client.search_entries_by_description(&query).await {
                Ok(entries) => Message::SuggestionsLoaded {
                    request_id,
                    descriptions: entries.into_iter().map(|entry| entry.description).collect(),
                },
                Err(e) => failed("Failed to load suggestions", e),
            }
        }),
        Action::DeleteEntry { id } => spawn(tx, async move {
            match client.delete_entry(&id).await {
                Ok(()) => {
                    info!(entry_id = %id, "entry deleted");
                    Message::EntryDeleted { id }
                }
                Err(e) => failed("Failed to delete entry", e),
            }
        }),
    }
}

fn spawn<F>(tx: MessageTx, task: F)
where
    F: Future<Output = Message> + Send + 'static,
{
    tokio::spawn(async move {
        let _ = tx.send(task.await);
    });
}

fn failed(context: &'static str, error: ClockifyError) -> Message {
    warn!(error = %error, "{context}");
    Message::Failed {
        context,
        error: error.to_string(),
    }
}

fn submit_failed(context: &'static str, error: ClockifyError) -> Message {
    warn!(error = %error, "{context}");
    Message::SubmitFailed {
        context,
        error: error.to_string(),
    }
}

async fn tasks_for(
    client: &ApiClient,
    cache: &Cache,
    project_id: &str,
) -> Result<Vec<Task>, ClockifyError> {
    if let Some(tasks) = cache.get_tasks(project_id) {
        return Ok(tasks);
    }
    let tasks = client.fetch_tasks(project_id).await?;
    cache.set_tasks(project_id, tasks.clone());
    Ok(tasks)
}

fn enqueue(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Reloads whatever the entries and reports views currently show.
fn reload_lists(app: &App, action_tx: &ActionTx) {
    enqueue(
        action_tx,
        Action::LoadEntries {
            scope: app.entries_scope,
        },
    );
    enqueue(
        action_tx,
        Action::LoadReport {
            key: app.report_key(),
        },
    );
}

/// Applies one completion to the app. Failures leave the state as it was.
pub(super) fn apply_message(message: Message, app: &mut App, action_tx: &ActionTx) {
    app.request_finished();

    match message {
        Message::CurrentTimerLoaded(entry) => {
            app.timer.update_from_entry(entry.as_ref());
            if !app.timer.is_running && (app.selector.is_editing() || app.description_edit.is_some())
            {
                app.close_selector();
                app.cancel_description_edit();
                app.set_status("Timer is no longer running");
            }
        }
        Message::TimerStarted(entry) => {
            app.timer.start(&entry);
            app.close_selector();
            app.set_success("Timer started");
            reload_lists(app, action_tx);
        }
        Message::TimerStopped(_) => {
            app.stop_pending = false;
            app.timer.stop();
            app.set_success("Timer stopped");
            reload_lists(app, action_tx);
        }
        Message::TimerAlreadyStopped => {
            app.stop_pending = false;
            app.timer.stop();
            app.set_status("Timer was already stopped by another client");
            reload_lists(app, action_tx);
        }
        Message::TimerUpdated(entry) => {
            app.timer.apply_update(&entry);
            app.close_selector();
            app.set_success("Description and tags updated");
            reload_lists(app, action_tx);
        }
        Message::ProjectsLoaded(projects) => {
            let project_ids = projects.iter().map(|project| project.id.clone()).collect();
            app.set_projects(projects);
            enqueue(action_tx, Action::LoadTaskNames { project_ids });
        }
        Message::TasksLoaded { project_id, tasks } => {
            app.add_task_names(&tasks);
            if !app.selector.set_tasks(&project_id, tasks) {
                debug!(%project_id, "dropped tasks for a project no longer pending");
            }
        }
        Message::TasksFailed { project_id, error } => {
            app.selector.cancel_pending_project(&project_id);
            app.set_error(format!("Failed to load tasks: {error}"));
        }
        Message::TaskNamesLoaded(tasks) => {
            app.add_task_names(&tasks);
        }
        Message::TagsLoaded(tags) => {
            app.set_tags(tags);
        }
        Message::EntriesLoaded { scope, entries } => {
            if !app.set_entries(scope, entries) {
                debug!(?scope, "dropped entries for a scope no longer shown");
            }
        }
        Message::ReportEntriesLoaded { key, entries } => {
            if !app.set_report_entries(key, entries) {
                debug!(?key, "dropped entries for a report no longer shown");
            }
        }
        Message::SuggestionsLoaded {
            request_id,
            descriptions,
        } => {
            if !app.selector.apply_suggestions(request_id, descriptions) {
                debug!(request_id, "dropped stale suggestions");
            }
        }
        Message::EntryDeleted { id } => {
            let mut entries = std::mem::take(&mut app.entries);
            entries.retain(|entry| entry.id != id);
            app.set_entries(app.entries_scope, entries);
            app.report_entries.retain(|entry| entry.id != id);
            if app.timer.entry_id() == Some(id.as_str()) {
                app.timer.stop();
            }
            app.set_success("Entry deleted");
        }
        Message::SubmitFailed { context, error } => {
            app.selector.submit_failed();
            app.set_error(format!("{context}: {error}"));
        }
        Message::StopFailed { error } => {
            app.stop_pending = false;
            app.set_error(format!("Failed to stop timer: {error}"));
        }
        Message::Failed { context, error } => {
            app.set_error(format!("{context}: {error}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{EntriesScope, View};
    use crate::runtime::action_queue::channel;
    use crate::runtime::message;
    use crate::selector::SelectorMode;
    use clockify::{ClockifyClient, Project, Tag, TimeEntry, TimeInterval};
    use serde_json::json;
    use time::macros::{datetime, offset};
    use time::OffsetDateTime;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn entry(id: &str, end: Option<OffsetDateTime>) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            description: "Write report".to_string(),
            project_id: Some("p1".to_string()),
            task_id: None,
            tag_ids: vec!["g1".to_string()],
            user_id: "u".to_string(),
            workspace_id: "w".to_string(),
            billable: false,
            time_interval: TimeInterval {
                start: datetime!(2024-01-15 09:00 UTC),
                end,
            },
        }
    }

    fn app() -> App {
        let mut app = App::new(offset!(UTC), false);
        app.set_projects(vec![Project::new("p1", "Alpha"), Project::new("p2", "Beta")]);
        app.set_tags(vec![Tag::new("g1", "billable")]);
        app
    }

    #[test]
    fn failure_leaves_state_unchanged() {
        let mut app = app();
        app.timer.start(&entry("e1", None));
        app.request_started();
        let before = app.timer.clone();
        let (action_tx, mut action_rx) = channel();

        app.stop_pending = true;

        apply_message(
            Message::StopFailed {
                error: "status 500".to_string(),
            },
            &mut app,
            &action_tx,
        );

        assert!(!app.stop_pending);
        assert_eq!(app.timer, before);
        assert_eq!(app.in_flight, 0);
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Failed to stop timer: status 500")
        );
        assert!(action_rx.try_recv().is_err());
    }

    #[test]
    fn rejected_start_allows_another_attempt() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        app.open_selector();
        app.selector.confirm_project();
        app.selector.set_tasks("p1", Vec::new());
        app.selector.confirm_task();
        app.selector.confirm_description();
        app.selector.mark_submitting();
        assert_eq!(app.selector.confirm_tags(), None);

        apply_message(
            Message::SubmitFailed {
                context: "Failed to start timer",
                error: "status 400".to_string(),
            },
            &mut app,
            &action_tx,
        );

        assert!(app.selector_open);
        assert!(!app.selector.is_submitting());
        assert!(app.selector.confirm_tags().is_some());
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Failed to start timer: status 400")
        );
    }

    #[test]
    fn stopped_timer_clears_the_pending_stop() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        app.timer.start(&entry("e1", None));
        app.stop_pending = true;

        apply_message(
            Message::TimerStopped(entry("e1", Some(datetime!(2024-01-15 10:00 UTC)))),
            &mut app,
            &action_tx,
        );

        assert!(!app.stop_pending);
        assert!(!app.timer.is_running);
    }

    #[test]
    fn current_timer_reconciliation_is_idempotent() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        let running = entry("e1", None);

        apply_message(
            Message::CurrentTimerLoaded(Some(running.clone())),
            &mut app,
            &action_tx,
        );
        let once = app.timer.clone();
        apply_message(
            Message::CurrentTimerLoaded(Some(running)),
            &mut app,
            &action_tx,
        );
        assert_eq!(app.timer, once);
        assert!(app.timer.is_running);

        apply_message(Message::CurrentTimerLoaded(None), &mut app, &action_tx);
        assert!(!app.timer.is_running);
        assert_eq!(app.timer.entry_id(), None);
    }

    #[test]
    fn timer_stopped_elsewhere_closes_the_editor() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        app.timer.start(&entry("e1", None));
        app.begin_description_edit();
        app.finish_description_edit();

        apply_message(Message::CurrentTimerLoaded(None), &mut app, &action_tx);

        assert!(!app.selector_open);
        assert!(!app.selector.is_editing());
    }

    #[test]
    fn started_timer_closes_selector_and_reloads_lists() {
        let mut app = app();
        app.open_selector();
        let (action_tx, mut action_rx) = channel();

        apply_message(Message::TimerStarted(entry("e1", None)), &mut app, &action_tx);

        assert!(app.timer.is_running);
        assert!(!app.selector_open);
        assert!(matches!(
            action_rx.try_recv(),
            Ok(Action::LoadEntries {
                scope: EntriesScope::Today
            })
        ));
        assert!(matches!(action_rx.try_recv(), Ok(Action::LoadReport { .. })));
    }

    #[test]
    fn already_stopped_timer_is_reconciled() {
        let mut app = app();
        app.timer.start(&entry("e1", None));
        let (action_tx, _action_rx) = channel();

        apply_message(Message::TimerAlreadyStopped, &mut app, &action_tx);

        assert!(!app.timer.is_running);
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Timer was already stopped by another client")
        );
    }

    #[test]
    fn loaded_projects_request_their_task_names() {
        let mut app = App::new(offset!(UTC), false);
        let (action_tx, mut action_rx) = channel();

        apply_message(
            Message::ProjectsLoaded(vec![Project::new("p1", "Alpha"), Project::new("p2", "Beta")]),
            &mut app,
            &action_tx,
        );

        assert_eq!(app.project_name(Some("p2")), "Beta");
        match action_rx.try_recv() {
            Ok(Action::LoadTaskNames { project_ids }) => assert_eq!(project_ids, ["p1", "p2"]),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn tasks_move_the_selector_forward_only_for_the_pending_project() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        app.open_selector();
        app.selector.confirm_project();

        apply_message(
            Message::TasksLoaded {
                project_id: "p2".to_string(),
                tasks: vec![Task::new("t9", "Other", "p2")],
            },
            &mut app,
            &action_tx,
        );
        assert_eq!(app.selector.mode(), SelectorMode::SelectingProject);
        assert_eq!(app.task_name(Some("t9")).as_deref(), Some("Other"));

        apply_message(
            Message::TasksLoaded {
                project_id: "p1".to_string(),
                tasks: vec![Task::new("t1", "Design", "p1")],
            },
            &mut app,
            &action_tx,
        );
        assert_eq!(app.selector.mode(), SelectorMode::SelectingTask);
    }

    #[test]
    fn failed_task_load_unfreezes_project_list() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        app.open_selector();
        app.selector.confirm_project();

        apply_message(
            Message::TasksFailed {
                project_id: "p1".to_string(),
                error: "timeout".to_string(),
            },
            &mut app,
            &action_tx,
        );

        assert!(!app.selector.is_loading_tasks());
        assert_eq!(app.selector.mode(), SelectorMode::SelectingProject);
    }

    #[test]
    fn deleted_entry_leaves_lists_and_running_timer() {
        let mut app = app();
        let (action_tx, _action_rx) = channel();
        let done = Some(datetime!(2024-01-15 10:00 UTC));
        app.set_entries(
            EntriesScope::Today,
            vec![entry("e1", None), entry("e2", done)],
        );
        app.timer.start(&entry("e1", None));
        app.navigate_to(View::Entries);

        apply_message(
            Message::EntryDeleted {
                id: "e1".to_string(),
            },
            &mut app,
            &action_tx,
        );

        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].id, "e2");
        assert_eq!(app.selected_entry, Some(0));
        assert!(!app.timer.is_running);
    }

    #[tokio::test]
    async fn started_timer_round_trips_through_the_dev_backend() {
        let mut app = app();
        let (message_tx, mut message_rx) = message::channel();
        let backend = Backend {
            client: ApiClient::dev(),
            cache: Arc::new(Cache::default()),
            message_tx,
        };

        run_action(
            Action::StartTimer {
                description: "Pairing".to_string(),
                project_id: Some("proj_1".to_string()),
                task_id: None,
                tag_ids: Vec::new(),
            },
            &mut app,
            &backend,
        );
        assert!(app.is_loading());

        let message = message_rx.recv().await.unwrap();
        let (action_tx, _action_rx) = channel();
        apply_message(message, &mut app, &action_tx);

        assert!(!app.is_loading());
        assert!(app.timer.is_running);
        assert_eq!(app.timer.description, "Pairing");
    }

    #[tokio::test]
    async fn projects_are_cached_after_the_first_load() {
        let mut app = App::new(offset!(UTC), true);
        let (message_tx, mut message_rx) = message::channel();
        let backend = Backend {
            client: ApiClient::dev(),
            cache: Arc::new(Cache::default()),
            message_tx,
        };

        run_action(Action::LoadProjects { force: false }, &mut app, &backend);
        let message = message_rx.recv().await.unwrap();

        assert!(matches!(message, Message::ProjectsLoaded(ref p) if p.len() == 4));
        assert_eq!(backend.cache.get_projects().map(|p| p.len()), Some(4));
    }

    #[tokio::test]
    async fn task_names_survive_a_failing_project() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/workspaces/w1/projects/p1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "t1", "name": "Design", "projectId": "p1" }
            ])))
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/workspaces/w1/projects/p2/tasks"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = ClockifyClient::new("secret", server.uri(), clockify::DEFAULT_TIMEOUT)
            .unwrap()
            .with_workspace("w1")
            .with_user("u1");
        let mut app = app();
        let (message_tx, mut message_rx) = message::channel();
        let backend = Backend {
            client: ApiClient::Remote(client),
            cache: Arc::new(Cache::default()),
            message_tx,
        };

        run_action(
            Action::LoadTaskNames {
                project_ids: vec!["p1".to_string(), "p2".to_string()],
            },
            &mut app,
            &backend,
        );
        let message = message_rx.recv().await.unwrap();
        assert!(matches!(message, Message::TaskNamesLoaded(ref tasks) if tasks.len() == 1));

        let (action_tx, _action_rx) = channel();
        apply_message(message, &mut app, &action_tx);

        assert_eq!(app.task_name(Some("t1")).as_deref(), Some("Design"));
        assert!(app.status.is_none());
        assert_eq!(backend.cache.get_tasks("p2"), None);
    }
}
