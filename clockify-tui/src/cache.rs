use clockify::{Project, Tag, Task};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
struct ProjectSlot {
    projects: Vec<Project>,
    tags: Vec<Tag>,
    last_update: Option<Instant>,
}

/// TTL cache for reference data shared between the UI loop and fetch tasks.
///
/// Projects (and tags) and the per-project task lists live behind separate
/// locks so a task write never waits on a project read. Only a project write
/// refreshes the expiry clock; task lists expire together with the projects.
#[derive(Debug)]
pub struct Cache {
    ttl: Duration,
    project_slot: RwLock<ProjectSlot>,
    tasks: RwLock<HashMap<String, Vec<Task>>>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Cache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            project_slot: RwLock::new(ProjectSlot::default()),
            tasks: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_projects(&self) -> Option<Vec<Project>> {
        self.get_projects_at(Instant::now())
    }

    pub fn get_projects_at(&self, now: Instant) -> Option<Vec<Project>> {
        let slot = self
            .project_slot
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if slot.projects.is_empty() || !self.is_fresh(slot.last_update, now) {
            return None;
        }
        Some(slot.projects.clone())
    }

    pub fn set_projects(&self, projects: Vec<Project>) {
        self.set_projects_at(projects, Instant::now());
    }

    pub fn set_projects_at(&self, projects: Vec<Project>, now: Instant) {
        let mut slot = self
            .project_slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.projects = projects;
        slot.last_update = Some(now);
    }

    pub fn get_tags(&self) -> Option<Vec<Tag>> {
        self.get_tags_at(Instant::now())
    }

    pub fn get_tags_at(&self, now: Instant) -> Option<Vec<Tag>> {
        let slot = self
            .project_slot
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if slot.tags.is_empty() || !self.is_fresh(slot.last_update, now) {
            return None;
        }
        Some(slot.tags.clone())
    }

    /// Tags ride on the project clock and do not refresh it.
    pub fn set_tags(&self, tags: Vec<Tag>) {
        let mut slot = self
            .project_slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.tags = tags;
    }

    pub fn get_tasks(&self, project_id: &str) -> Option<Vec<Task>> {
        self.get_tasks_at(project_id, Instant::now())
    }

    pub fn get_tasks_at(&self, project_id: &str, now: Instant) -> Option<Vec<Task>> {
        // Read the clock first; the project lock is released before the
        // tasks lock is taken.
        if self.is_expired_at(now) {
            return None;
        }

        let tasks = self.tasks.read().unwrap_or_else(PoisonError::into_inner);
        tasks
            .get(project_id)
            .filter(|tasks| !tasks.is_empty())
            .cloned()
    }

    pub fn set_tasks(&self, project_id: &str, tasks: Vec<Task>) {
        let mut map = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(project_id.to_string(), tasks);
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// True when projects were never written or the TTL has passed.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        let slot = self
            .project_slot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        !self.is_fresh(slot.last_update, now)
    }

    pub fn clear(&self) {
        let mut slot = self
            .project_slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);

        *slot = ProjectSlot::default();
        tasks.clear();
    }

    fn is_fresh(&self, last_update: Option<Instant>, now: Instant) -> bool {
        last_update.is_some_and(|written| now.saturating_duration_since(written) <= self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn projects() -> Vec<Project> {
        vec![Project::new("p1", "Alpha"), Project::new("p2", "Beta")]
    }

    fn tasks(project_id: &str) -> Vec<Task> {
        vec![Task::new("t1", "Design", project_id)]
    }

    #[test]
    fn fresh_write_is_readable() {
        let cache = Cache::new(Duration::from_secs(60));
        let t0 = Instant::now();

        cache.set_projects_at(projects(), t0);

        assert_eq!(
            cache.get_projects_at(t0 + Duration::from_secs(60)),
            Some(projects())
        );
        assert!(!cache.is_expired_at(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn project_reads_do_not_wait_on_the_tasks_lock() {
        let cache = Arc::new(Cache::new(Duration::from_secs(60)));
        cache.set_projects(projects());
        let _tasks_guard = cache.tasks.write().unwrap();

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let reader = Arc::clone(&cache);
        thread::spawn(move || {
            let _ = done_tx.send(reader.get_projects());
        });

        assert_eq!(
            done_rx.recv_timeout(Duration::from_secs(1)),
            Ok(Some(projects()))
        );
    }

    #[test]
    fn expires_after_ttl() {
        let cache = Cache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.set_projects_at(projects(), t0);
        cache.set_tasks("p1", tasks("p1"));

        let later = t0 + Duration::from_secs(61);

        assert_eq!(cache.get_projects_at(later), None);
        assert_eq!(cache.get_tasks_at("p1", later), None);
        assert!(cache.is_expired_at(later));
    }

    #[test]
    fn never_written_is_expired_and_misses() {
        let cache = Cache::default();

        assert!(cache.is_expired());
        assert_eq!(cache.get_projects(), None);
        assert_eq!(cache.get_tags(), None);
        assert_eq!(cache.get_tasks("p1"), None);
    }

    #[test]
    fn empty_collections_are_misses() {
        let cache = Cache::default();
        cache.set_projects(Vec::new());
        cache.set_tasks("p1", Vec::new());

        assert_eq!(cache.get_projects(), None);
        assert_eq!(cache.get_tasks("p1"), None);
        assert!(!cache.is_expired());
    }

    #[test]
    fn tasks_share_the_project_clock() {
        let cache = Cache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.set_projects_at(projects(), t0);
        cache.set_tasks("p1", tasks("p1"));

        assert_eq!(
            cache.get_tasks_at("p1", t0 + Duration::from_secs(30)),
            Some(tasks("p1"))
        );
        assert_eq!(cache.get_tasks_at("p2", t0 + Duration::from_secs(30)), None);

        // Tasks written without any project write are never fresh.
        let other = Cache::default();
        other.set_tasks("p1", tasks("p1"));
        assert_eq!(other.get_tasks("p1"), None);
    }

    #[test]
    fn tag_writes_do_not_refresh_the_clock() {
        let cache = Cache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.set_projects_at(projects(), t0);
        cache.set_tags(vec![Tag::new("g1", "billable")]);

        assert!(cache.get_tags_at(t0 + Duration::from_secs(10)).is_some());
        assert_eq!(cache.get_tags_at(t0 + Duration::from_secs(61)), None);
    }

    #[test]
    fn clear_returns_to_never_written() {
        let cache = Cache::default();
        cache.set_projects(projects());
        cache.set_tasks("p1", tasks("p1"));
        cache.set_tags(vec![Tag::new("g1", "billable")]);

        cache.clear();

        assert!(cache.is_expired());
        assert_eq!(cache.get_projects(), None);
        assert_eq!(cache.get_tasks("p1"), None);
        assert_eq!(cache.get_tags(), None);
    }

    #[test]
    fn concurrent_readers_and_writers_do_not_deadlock() {
        let cache = Arc::new(Cache::default());
        cache.set_projects(projects());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..200 {
                        match i % 4 {
                            0 => cache.set_tasks("p1", tasks("p1")),
                            1 => {
                                let _ = cache.get_tasks("p1");
                            }
                            2 => {
                                let _ = cache.get_projects();
                            }
                            _ => cache.clear(),
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
