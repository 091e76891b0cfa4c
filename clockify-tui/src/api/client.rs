use clockify::{
    ClockifyClient, ClockifyError, Project, Tag, Task, TimeEntry, TimeEntryRequest,
};
use time::OffsetDateTime;

use crate::api::dev_backend::DevBackend;

/// The backend the UI talks to: the real service, or seeded in-memory data.
#[derive(Debug, Clone)]
pub enum ApiClient {
    Remote(ClockifyClient),
    Dev(DevBackend),
}

impl ApiClient {
    pub fn dev() -> Self {
        Self::Dev(DevBackend::new())
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev(_))
    }

    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ClockifyError> {
        match self {
            Self::Remote(client) => client.fetch_projects().await,
            Self::Dev(dev) => Ok(dev.projects()),
        }
    }

    pub async fn fetch_tasks(&self, project_id: &str) -> Result<Vec<Task>, ClockifyError> {
        match self {
            Self::Remote(client) => client.fetch_tasks(project_id).await,
            Self::Dev(dev) => Ok(dev.tasks(project_id)),
        }
    }

    pub async fn fetch_tags(&self) -> Result<Vec<Tag>, ClockifyError> {
        match self {
            Self::Remote(client) => client.fetch_tags().await,
            Self::Dev(dev) => Ok(dev.tags()),
        }
    }

    pub async fn fetch_current_timer(&self) -> Result<Option<TimeEntry>, ClockifyError> {
        match self {
            Self::Remote(client) => client.fetch_current_timer().await,
            Self::Dev(dev) => Ok(dev.current_timer()),
        }
    }

    pub async fn fetch_entries(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        match self {
            Self::Remote(client) => client.fetch_entries(start, end).await,
            Self::Dev(dev) => Ok(dev.entries_between(start, end)),
        }
    }

    pub async fn search_entries_by_description(
        &self,
        substring: &str,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        match self {
            Self::Remote(client) => client.search_entries_by_description(substring).await,
            Self::Dev(dev) => Ok(dev.search(substring)),
        }
    }

    pub async fn start_timer(
        &self,
        description: &str,
        project_id: Option<&str>,
        task_id: Option<&str>,
        tag_ids: &[String],
    ) -> Result<TimeEntry, ClockifyError> {
        match self {
            Self::Remote(client) => {
                client
                    .start_timer(description, project_id, task_id, tag_ids)
                    .await
            }
            Self::Dev(dev) => Ok(dev.start(
                description,
                project_id,
                task_id,
                tag_ids,
                OffsetDateTime::now_utc(),
            )),
        }
    }

    pub async fn stop_timer(&self) -> Result<TimeEntry, ClockifyError> {
        match self {
            Self::Remote(client) => client.stop_timer().await,
            Self::Dev(dev) => dev.stop(OffsetDateTime::now_utc()),
        }
    }

    pub async fn update_entry(
        &self,
        id: &str,
        request: &TimeEntryRequest,
    ) -> Result<TimeEntry, ClockifyError> {
        match self {
            Self::Remote(client) => client.update_entry(id, request).await,
            Self::Dev(dev) => dev.update(id, request),
        }
    }

    pub async fn delete_entry(&self, id: &str) -> Result<(), ClockifyError> {
        match self {
            Self::Remote(client) => client.delete_entry(id).await,
            Self::Dev(dev) => dev.delete(id),
        }
    }
}
