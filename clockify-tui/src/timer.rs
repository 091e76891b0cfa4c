use clockify::TimeEntry;
use time::{Duration, OffsetDateTime};

/// The running timer as last seen on the server.
///
/// When `is_running` is false every other field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    pub is_running: bool,
    pub current_entry: Option<TimeEntry>,
    pub start_time: Option<OffsetDateTime>,
    pub description: String,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub tag_ids: Vec<String>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, entry: &TimeEntry) {
        self.is_running = true;
        self.current_entry = Some(entry.clone());
        self.start_time = Some(entry.time_interval.start);
        self.description = entry.description.clone();
        self.project_id = entry.project_id.clone();
        self.task_id = entry.task_id.clone();
        self.tag_ids = entry.tag_ids.clone();
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Reconciles with the server's view of the running entry.
    pub fn update_from_entry(&mut self, entry: Option<&TimeEntry>) {
        match entry {
            Some(entry) if entry.is_running() => self.start(entry),
            _ => self.stop(),
        }
    }

    /// Takes the new description and tags of an amended running entry.
    pub fn apply_update(&mut self, entry: &TimeEntry) {
        if !self.is_running {
            return;
        }
        self.description = entry.description.clone();
        self.tag_ids = entry.tag_ids.clone();
        if let Some(current) = self.current_entry.as_mut() {
            current.description = entry.description.clone();
            current.tag_ids = entry.tag_ids.clone();
        }
    }

    pub fn elapsed(&self, now: OffsetDateTime) -> Duration {
        match self.start_time {
            Some(start) if self.is_running => now - start,
            _ => Duration::ZERO,
        }
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.current_entry.as_ref().map(|entry| entry.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockify::TimeInterval;
    use time::macros::datetime;

    fn running_entry() -> TimeEntry {
        TimeEntry {
            id: "e1".to_string(),
            description: "Write report".to_string(),
            project_id: Some("p1".to_string()),
            task_id: Some("t1".to_string()),
            tag_ids: vec!["g1".to_string(), "g2".to_string()],
            user_id: "u1".to_string(),
            workspace_id: "w1".to_string(),
            billable: false,
            time_interval: TimeInterval {
                start: datetime!(2024-03-04 09:00 UTC),
                end: None,
            },
        }
    }

    fn stopped_entry() -> TimeEntry {
        let mut entry = running_entry();
        entry.time_interval.end = Some(datetime!(2024-03-04 10:00 UTC));
        entry
    }

    #[test]
    fn start_copies_entry_fields() {
        let mut timer = TimerState::new();
        timer.start(&running_entry());

        assert!(timer.is_running);
        assert_eq!(timer.entry_id(), Some("e1"));
        assert_eq!(timer.start_time, Some(datetime!(2024-03-04 09:00 UTC)));
        assert_eq!(timer.description, "Write report");
        assert_eq!(timer.project_id.as_deref(), Some("p1"));
        assert_eq!(timer.task_id.as_deref(), Some("t1"));
        assert_eq!(timer.tag_ids, vec!["g1", "g2"]);
    }

    #[test]
    fn stop_clears_everything() {
        let mut timer = TimerState::new();
        timer.start(&running_entry());
        timer.stop();

        assert_eq!(timer, TimerState::default());
    }

    #[test]
    fn update_from_entry_is_idempotent() {
        let mut once = TimerState::new();
        once.update_from_entry(Some(&running_entry()));
        let mut twice = once.clone();
        twice.update_from_entry(Some(&running_entry()));
        assert_eq!(once, twice);
        assert!(once.is_running);

        let mut none_once = once.clone();
        none_once.update_from_entry(None);
        let mut none_twice = none_once.clone();
        none_twice.update_from_entry(None);
        assert_eq!(none_once, none_twice);
        assert_eq!(none_once, TimerState::default());
    }

    #[test]
    fn ended_entry_stops_timer() {
        let mut timer = TimerState::new();
        timer.start(&running_entry());

        timer.update_from_entry(Some(&stopped_entry()));

        assert!(!timer.is_running);
        assert_eq!(timer.current_entry, None);
    }

    #[test]
    fn apply_update_only_touches_description_and_tags() {
        let mut timer = TimerState::new();
        timer.start(&running_entry());

        let mut amended = running_entry();
        amended.description = "Review".to_string();
        amended.tag_ids = vec!["g3".to_string()];
        amended.project_id = Some("other".to_string());
        timer.apply_update(&amended);

        assert_eq!(timer.description, "Review");
        assert_eq!(timer.tag_ids, vec!["g3"]);
        assert_eq!(timer.project_id.as_deref(), Some("p1"));

        let mut stopped = TimerState::new();
        stopped.apply_update(&amended);
        assert_eq!(stopped, TimerState::default());
    }

    #[test]
    fn elapsed_is_zero_when_stopped() {
        let now = datetime!(2024-03-04 09:30 UTC);
        let mut timer = TimerState::new();
        assert_eq!(timer.elapsed(now), Duration::ZERO);

        timer.start(&running_entry());
        assert_eq!(timer.elapsed(now), Duration::minutes(30));
    }
}
