use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use super::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

impl TimeInterval {
    /// Length of the interval, measured up to `now` while it is still open.
    ///
    /// Signed: an end before the start yields a negative duration.
    pub fn duration_at(&self, now: OffsetDateTime) -> Duration {
        self.end.unwrap_or(now) - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workspace_id: String,
    #[serde(default)]
    pub billable: bool,
    pub time_interval: TimeInterval,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.time_interval.end.is_none()
    }
}

/// Body for creating or replacing a time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub end: Option<OffsetDateTime>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub billable: bool,
}

impl TimeEntryRequest {
    /// A request that opens a new running entry at `start`.
    pub fn start_at(
        start: OffsetDateTime,
        description: impl Into<String>,
        project_id: Option<String>,
        task_id: Option<String>,
        tag_ids: Vec<String>,
    ) -> Self {
        Self {
            start: to_api_instant(start),
            end: None,
            description: description.into(),
            project_id,
            task_id,
            tag_ids,
            billable: false,
        }
    }

    /// Replacement body for `entry` with a new description and tag set.
    ///
    /// Interval, project, task and billable flag are carried over unchanged,
    /// since the service replaces every field on update.
    pub fn amend(entry: &TimeEntry, description: impl Into<String>, tag_ids: Vec<String>) -> Self {
        Self {
            start: to_api_instant(entry.time_interval.start),
            end: entry.time_interval.end.map(to_api_instant),
            description: description.into(),
            project_id: entry.project_id.clone(),
            task_id: entry.task_id.clone(),
            tag_ids,
            billable: entry.billable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTimerRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl StopTimerRequest {
    pub fn at(end: OffsetDateTime) -> Self {
        Self {
            end: to_api_instant(end),
        }
    }
}

/// UTC, whole seconds. The service rejects fractional seconds in some endpoints.
pub fn to_api_instant(instant: OffsetDateTime) -> OffsetDateTime {
    let utc = instant.to_offset(UtcOffset::UTC);
    utc - Duration::nanoseconds(i64::from(utc.nanosecond()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_running_entry_with_null_collections() {
        let json = r#"{
            "id": "e1",
            "description": null,
            "projectId": "p1",
            "taskId": null,
            "tagIds": null,
            "userId": "u1",
            "workspaceId": "w1",
            "billable": false,
            "timeInterval": { "start": "2024-03-04T09:00:00Z", "end": null, "duration": null }
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();

        assert!(entry.is_running());
        assert_eq!(entry.description, "");
        assert!(entry.tag_ids.is_empty());
        assert_eq!(entry.project_id.as_deref(), Some("p1"));
        assert_eq!(entry.task_id, None);
    }

    #[test]
    fn duration_uses_now_for_open_interval_and_can_be_negative() {
        let open = TimeInterval {
            start: datetime!(2024-03-04 09:00 UTC),
            end: None,
        };
        assert_eq!(
            open.duration_at(datetime!(2024-03-04 09:30 UTC)),
            Duration::minutes(30)
        );

        let inverted = TimeInterval {
            start: datetime!(2024-03-04 10:00 UTC),
            end: Some(datetime!(2024-03-04 09:00 UTC)),
        };
        assert_eq!(
            inverted.duration_at(datetime!(2024-03-04 12:00 UTC)),
            Duration::hours(-1)
        );
    }

    #[test]
    fn amend_keeps_interval_project_and_task() {
        let entry = TimeEntry {
            id: "e1".to_string(),
            description: "old".to_string(),
            project_id: Some("p1".to_string()),
            task_id: Some("t1".to_string()),
            tag_ids: vec!["a".to_string()],
            user_id: "u1".to_string(),
            workspace_id: "w1".to_string(),
            billable: true,
            time_interval: TimeInterval {
                start: datetime!(2024-03-04 10:00:00.5 +01:00),
                end: None,
            },
        };

        let request = TimeEntryRequest::amend(&entry, "new", vec!["b".to_string()]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["start"], "2024-03-04T09:00:00Z");
        assert!(body.get("end").is_none());
        assert_eq!(body["description"], "new");
        assert_eq!(body["projectId"], "p1");
        assert_eq!(body["taskId"], "t1");
        assert_eq!(body["tagIds"], serde_json::json!(["b"]));
        assert_eq!(body["billable"], true);
    }
}
