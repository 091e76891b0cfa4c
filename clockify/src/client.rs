use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, instrument, warn};

use crate::{
    domain::{
        to_api_instant, Project, StopTimerRequest, Tag, Task, TimeEntry, TimeEntryRequest, User,
        Workspace,
    },
    ClockifyURL,
};

pub const DEFAULT_BASE_URL: &str = "https://api.clockify.me/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "X-Api-Key";
const COLLECTION_PAGE_SIZE: &str = "5000";
const ENTRY_PAGE_SIZE: &str = "1000";
const SEARCH_PAGE_SIZE: &str = "50";

#[derive(Clone)]
pub struct ClockifyClient {
    http: reqwest::Client,
    base_url: ClockifyURL,
    api_key: String,
    workspace_id: Option<String>,
    user_id: Option<String>,
}

impl ClockifyClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClockifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: ClockifyURL::new(base_url),
            api_key: api_key.into(),
            workspace_id: None,
            user_id: None,
        })
    }

    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn workspace_url(&self, path: &str) -> Result<ClockifyURL, ClockifyError> {
        let workspace_id = self
            .workspace_id
            .as_deref()
            .ok_or(ClockifyError::MissingContext("workspace"))?;

        Ok(self
            .base_url
            .append_path(&format!("workspaces/{workspace_id}"))
            .append_path(path))
    }

    fn user_entries_url(&self) -> Result<ClockifyURL, ClockifyError> {
        let user_id = self
            .user_id
            .as_deref()
            .ok_or(ClockifyError::MissingContext("user"))?;

        self.workspace_url(&format!("user/{user_id}/time-entries"))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<reqwest::Response, ClockifyError> {
        debug!(call = call_name, "sending request");

        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .inspect_err(|e| warn!(call = call_name, error = %e, "request failed"))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(call = call_name, %status, "request rejected, check the API key");
            return Err(ClockifyError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(call = call_name, %status, body = %body, "unexpected status");
            return Err(ClockifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ClockifyError> {
        let response = self.send(request, call_name).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(call = call_name, error = %e, "failed to parse response");
            ClockifyError::Parse(format!("{call_name}: {e}"))
        })
    }

    pub async fn current_user(&self) -> Result<User, ClockifyError> {
        let url = self.base_url.append_path("user");
        self.json(self.http.get(url.as_ref()), "current_user").await
    }

    pub async fn workspaces(&self) -> Result<Vec<Workspace>, ClockifyError> {
        let url = self.base_url.append_path("workspaces");
        self.json(self.http.get(url.as_ref()), "workspaces").await
    }

    /// Non-archived projects of the workspace.
    #[instrument(skip(self))]
    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ClockifyError> {
        let url = self.workspace_url("projects")?;
        let request = self
            .http
            .get(url.as_ref())
            .query(&[("archived", "false"), ("page-size", COLLECTION_PAGE_SIZE)]);

        self.json(request, "fetch_projects").await
    }

    #[instrument(skip(self))]
    pub async fn fetch_tasks(&self, project_id: &str) -> Result<Vec<Task>, ClockifyError> {
        let url = self.workspace_url(&format!("projects/{project_id}/tasks"))?;
        let request = self
            .http
            .get(url.as_ref())
            .query(&[("page-size", COLLECTION_PAGE_SIZE)]);

        self.json(request, "fetch_tasks").await
    }

    #[instrument(skip(self))]
    pub async fn fetch_tags(&self) -> Result<Vec<Tag>, ClockifyError> {
        let url = self.workspace_url("tags")?;
        let request = self
            .http
            .get(url.as_ref())
            .query(&[("archived", "false"), ("page-size", COLLECTION_PAGE_SIZE)]);

        self.json(request, "fetch_tags").await
    }

    /// The user's running entry, if any.
    #[instrument(skip(self))]
    pub async fn fetch_current_timer(&self) -> Result<Option<TimeEntry>, ClockifyError> {
        let url = self.user_entries_url()?;
        let request = self
            .http
            .get(url.as_ref())
            .query(&[("in-progress", "true")]);

        let entries: Vec<TimeEntry> = self.json(request, "fetch_current_timer").await?;
        Ok(entries.into_iter().next())
    }

    /// Entries whose start lies in `[start, end)`.
    #[instrument(skip(self))]
    pub async fn fetch_entries(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        let url = self.user_entries_url()?;
        let start = to_api_instant(start).format(&Rfc3339)?;
        let end = to_api_instant(end).format(&Rfc3339)?;
        let request = self.http.get(url.as_ref()).query(&[
            ("start", start.as_str()),
            ("end", end.as_str()),
            ("page-size", ENTRY_PAGE_SIZE),
        ]);

        self.json(request, "fetch_entries").await
    }

    /// Recent entries whose description contains `substring`.
    #[instrument(skip(self))]
    pub async fn search_entries_by_description(
        &self,
        substring: &str,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        let url = self.user_entries_url()?;
        let request = self.http.get(url.as_ref()).query(&[
            ("description", substring),
            ("page-size", SEARCH_PAGE_SIZE),
        ]);

        self.json(request, "search_entries_by_description").await
    }

    #[instrument(skip(self))]
    pub async fn start_timer(
        &self,
        description: &str,
        project_id: Option<&str>,
        task_id: Option<&str>,
        tag_ids: &[String],
    ) -> Result<TimeEntry, ClockifyError> {
        let url = self.workspace_url("time-entries")?;
        let body = TimeEntryRequest::start_at(
            OffsetDateTime::now_utc(),
            description,
            project_id.map(str::to_string),
            task_id.map(str::to_string),
            tag_ids.to_vec(),
        );

        self.json(self.http.post(url.as_ref()).json(&body), "start_timer")
            .await
    }

    /// Stops the running entry. Fails with [`ClockifyError::NoRunningTimer`]
    /// when nothing is running on the server side.
    #[instrument(skip(self))]
    pub async fn stop_timer(&self) -> Result<TimeEntry, ClockifyError> {
        let url = self.user_entries_url()?;
        let body = StopTimerRequest::at(OffsetDateTime::now_utc());

        match self
            .json(self.http.patch(url.as_ref()).json(&body), "stop_timer")
            .await
        {
            Err(ClockifyError::Status { status: 404, .. }) => Err(ClockifyError::NoRunningTimer),
            other => other,
        }
    }

    #[instrument(skip(self, entry))]
    pub async fn update_entry(
        &self,
        id: &str,
        entry: &TimeEntryRequest,
    ) -> Result<TimeEntry, ClockifyError> {
        let url = self.workspace_url(&format!("time-entries/{id}"))?;
        self.json(self.http.put(url.as_ref()).json(entry), "update_entry")
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: &str) -> Result<(), ClockifyError> {
        let url = self.workspace_url(&format!("time-entries/{id}"))?;
        self.send(self.http.delete(url.as_ref()), "delete_entry")
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for ClockifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockifyClient")
            .field("base_url", &self.base_url)
            .field("workspace_id", &self.workspace_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug)]
pub enum ClockifyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unauthorized, check the API key")]
    Unauthorized,
    #[error("no running timer")]
    NoRunningTimer,
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
    #[error("no {0} selected")]
    MissingContext(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn entry_json(id: &str, end: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "description": "Write report",
            "projectId": "p1",
            "taskId": null,
            "tagIds": ["t1"],
            "userId": "u1",
            "workspaceId": "w1",
            "billable": false,
            "timeInterval": { "start": "2024-03-04T09:00:00Z", "end": end }
        })
    }

    fn client_for(server: &MockServer) -> ClockifyClient {
        ClockifyClient::new("secret", server.uri(), DEFAULT_TIMEOUT)
            .unwrap()
            .with_workspace("w1")
            .with_user("u1")
    }

    #[tokio::test]
    async fn fetch_projects_sends_api_key_and_skips_archived() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/workspaces/w1/projects"))
            .and(matchers::header("X-Api-Key", "secret"))
            .and(matchers::query_param("archived", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "p1", "name": "Alpha", "color": "#ff0000", "archived": false },
                { "id": "p2", "name": "Beta", "clientName": null }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let projects = client_for(&mock_server).fetch_projects().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Alpha");
        assert_eq!(projects[1].client_name, "");
    }

    #[tokio::test]
    async fn current_timer_is_none_when_nothing_runs() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/workspaces/w1/user/u1/time-entries"))
            .and(matchers::query_param("in-progress", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let current = client_for(&mock_server).fetch_current_timer().await.unwrap();

        assert!(current.is_none());
    }

    #[tokio::test]
    async fn current_timer_returns_first_running_entry() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/workspaces/w1/user/u1/time-entries"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([entry_json("e1", None)])),
            )
            .mount(&mock_server)
            .await;

        let current = client_for(&mock_server)
            .fetch_current_timer()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(current.id, "e1");
        assert!(current.is_running());
    }

    #[tokio::test]
    async fn fetch_entries_formats_range_as_utc() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/workspaces/w1/user/u1/time-entries"))
            .and(matchers::query_param("start", "2024-03-03T23:00:00Z"))
            .and(matchers::query_param("end", "2024-03-04T23:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry_json(
                "e1",
                Some("2024-03-04T10:00:00Z")
            )])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let entries = client_for(&mock_server)
            .fetch_entries(
                time::macros::datetime!(2024-03-04 00:00 +01:00),
                time::macros::datetime!(2024-03-05 00:00 +01:00),
            )
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_running());
    }

    #[tokio::test]
    async fn start_timer_posts_selection() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/workspaces/w1/time-entries"))
            .and(matchers::body_partial_json(json!({
                "description": "Write report",
                "projectId": "p1",
                "tagIds": ["t1"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(entry_json("e9", None)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let entry = client_for(&mock_server)
            .start_timer("Write report", Some("p1"), None, &["t1".to_string()])
            .await
            .unwrap();

        assert_eq!(entry.id, "e9");
    }

    #[tokio::test]
    async fn stop_timer_maps_not_found_to_no_running_timer() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("PATCH"))
            .and(matchers::path("/workspaces/w1/user/u1/time-entries"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).stop_timer().await;

        assert!(matches!(result, Err(ClockifyError::NoRunningTimer)));
    }

    #[tokio::test]
    async fn rejected_key_is_unauthorized() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).fetch_tags().await;

        assert!(matches!(result, Err(ClockifyError::Unauthorized)));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("PUT"))
            .and(matchers::path("/workspaces/w1/time-entries/e1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let request = TimeEntryRequest::start_at(
            OffsetDateTime::now_utc(),
            "x",
            None,
            None,
            Vec::new(),
        );
        let result = client_for(&mock_server).update_entry("e1", &request).await;

        match result {
            Err(ClockifyError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn workspace_calls_fail_without_context() {
        let mock_server = MockServer::start().await;
        let client = ClockifyClient::new("secret", mock_server.uri(), DEFAULT_TIMEOUT).unwrap();

        let result = client.fetch_projects().await;

        assert!(matches!(
            result,
            Err(ClockifyError::MissingContext("workspace"))
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).current_user().await;

        assert!(matches!(result, Err(ClockifyError::Parse(_))));
    }
}
