//! In-process course content store.
//!
//! Holds modules, stats and notifications and exposes the CRUD surface used
//! by the teacher and student views. The store knows nothing about where
//! its state is persisted; every successful mutation advances
//! [`CourseStore::revision`] so an adapter can decide when to save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    seed_modules, seed_stats, ContentDraft, ContentItem, ContentPatch, ContentType, Module,
    NewNotification, Notification, NotificationLog, Stats, StatsPatch, TEACHER_UPLOADER,
};

/// Errors surfaced by store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    #[error("Invalid quiz questions: {0}")]
    InvalidQuestions(String),
}

/// The full store state, as captured in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseState {
    pub modules: Vec<Module>,

    pub stats: Stats,

    #[serde(default)]
    pub notifications: NotificationLog,
}

impl CourseState {
    /// The static seed, with seed content stamped at `at`
    pub fn seed(at: DateTime<Utc>) -> Self {
        Self {
            modules: seed_modules(at),
            stats: seed_stats(),
            notifications: NotificationLog::new(),
        }
    }

    fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    fn module_mut(&mut self, module_id: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == module_id)
    }
}

/// A content item located by a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub module: &'a Module,
    pub content_type: ContentType,
    pub item: &'a ContentItem,
}

/// Mutable course content registry
#[derive(Debug, Clone)]
pub struct CourseStore {
    state: CourseState,

    /// Kept for `reset`
    seed: CourseState,

    /// Bumped on every mutation that changes state
    revision: u64,

    /// Last time-based id handed out (millis)
    last_id: i64,
}

impl Default for CourseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseStore {
    /// Create a fresh store from the static seed
    pub fn new() -> Self {
        Self::with_seed(CourseState::seed(Utc::now()))
    }

    /// Create a store starting at the given seed
    pub fn with_seed(seed: CourseState) -> Self {
        Self {
            state: seed.clone(),
            seed,
            revision: 0,
            last_id: 0,
        }
    }

    /// Create a store with rehydrated state; `reset` still returns to `seed`
    pub fn from_parts(seed: CourseState, state: CourseState) -> Self {
        Self {
            state,
            seed,
            revision: 0,
            last_id: 0,
        }
    }

    pub fn state(&self) -> &CourseState {
        &self.state
    }

    pub fn seed(&self) -> &CourseState {
        &self.seed
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stats(&self) -> &Stats {
        &self.state.stats
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.state.notifications
    }

    /// Append a new item to the end of a module list.
    ///
    /// Stamps a time-based id unique within the list, the current time and
    /// the teacher uploader label, then logs a success notification.
    pub fn add_content(
        &mut self,
        module_id: &str,
        content_type: ContentType,
        draft: ContentDraft,
    ) -> Result<ContentItem, StoreError> {
        let existing: Vec<String> = self
            .require_module(module_id)?
            .items(content_type)
            .iter()
            .map(|i| i.id.clone())
            .collect();

        let mut id = self.next_id();
        while existing.contains(&id) {
            id = self.next_id();
        }

        let item = ContentItem::from_draft(id, draft, Utc::now(), TEACHER_UPLOADER);
        let module = self.module_mut(module_id)?;
        module.items_mut(content_type).push(item.clone());
        let message = format!("New {} added to {}", content_type.singular(), module.title);

        debug!(module_id, %content_type, item_id = %item.id, "Added content");
        self.add_notification(NewNotification::success(message));
        Ok(item)
    }

    /// Shallow-merge `patch` into the item with `content_id`.
    ///
    /// Returns whether an item matched. Order and all other items are
    /// untouched; the info notification is logged either way.
    pub fn update_content(
        &mut self,
        module_id: &str,
        content_type: ContentType,
        content_id: &str,
        patch: ContentPatch,
    ) -> Result<bool, StoreError> {
        let module = self.module_mut(module_id)?;

        let matched = match module
            .items_mut(content_type)
            .iter_mut()
            .find(|i| i.id == content_id)
        {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        };
        let message = format!("{} updated in {}", content_type.singular(), module.title);

        debug!(module_id, %content_type, content_id, matched, "Updated content");
        self.add_notification(NewNotification::info(message));
        Ok(matched)
    }

    /// Remove the item with `content_id`, keeping the order of the rest.
    ///
    /// Returns whether an item was removed; an absent id is not an error.
    pub fn delete_content(
        &mut self,
        module_id: &str,
        content_type: ContentType,
        content_id: &str,
    ) -> Result<bool, StoreError> {
        let module = self.module_mut(module_id)?;

        let items = module.items_mut(content_type);
        let before = items.len();
        items.retain(|i| i.id != content_id);
        let removed = items.len() != before;
        let message = format!("{} deleted from {}", content_type.singular(), module.title);

        debug!(module_id, %content_type, content_id, removed, "Deleted content");
        self.add_notification(NewNotification::warning(message));
        Ok(removed)
    }

    /// Shallow-merge counters into the stats record
    pub fn update_stats(&mut self, patch: &StatsPatch) {
        self.state.stats.merge(patch);
        self.revision += 1;
    }

    /// Prepend a notification, keeping only the most recent entries.
    ///
    /// Returns the generated id.
    pub fn add_notification(&mut self, notification: NewNotification) -> String {
        let id = self.next_id();
        self.state.notifications.push(Notification {
            id: id.clone(),
            severity: notification.severity,
            message: notification.message,
            timestamp: Utc::now(),
        });
        self.revision += 1;
        id
    }

    /// Remove a notification by id; returns whether one was present
    pub fn remove_notification(&mut self, notification_id: &str) -> bool {
        let removed = self.state.notifications.remove(notification_id).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Content list for a module, empty if the module is absent
    pub fn module_content(&self, module_id: &str, content_type: ContentType) -> &[ContentItem] {
        self.state
            .module(module_id)
            .map(|m| m.items(content_type))
            .unwrap_or(&[])
    }

    /// String-keyed form of [`module_content`](Self::module_content); an
    /// unknown content type also yields an empty list
    pub fn module_content_by_name(&self, module_id: &str, content_type: &str) -> &[ContentItem] {
        match content_type.parse::<ContentType>() {
            Ok(ct) => self.module_content(module_id, ct),
            Err(_) => &[],
        }
    }

    /// All modules in seed order
    pub fn all_modules(&self) -> &[Module] {
        &self.state.modules
    }

    pub fn get_module(&self, module_id: &str) -> Option<&Module> {
        self.state.module(module_id)
    }

    /// Item counts per content type for one module
    pub fn content_counts(&self, module_id: &str) -> Result<Vec<(ContentType, usize)>, StoreError> {
        Ok(self.require_module(module_id)?.content_counts())
    }

    /// Case-insensitive title/description search across every list.
    ///
    /// An empty query matches every item.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query_lower = query.trim().to_lowercase();

        self.state
            .modules
            .iter()
            .flat_map(|module| {
                ContentType::ALL.into_iter().flat_map(move |content_type| {
                    module
                        .items(content_type)
                        .iter()
                        .map(move |item| SearchHit {
                            module,
                            content_type,
                            item,
                        })
                })
            })
            .filter(|hit| hit.item.matches(&query_lower))
            .collect()
    }

    /// Restore modules, stats and notifications to the seed
    pub fn reset(&mut self) {
        self.state = self.seed.clone();
        self.revision += 1;
    }

    fn require_module(&self, module_id: &str) -> Result<&Module, StoreError> {
        self.state
            .module(module_id)
            .ok_or_else(|| StoreError::ModuleNotFound(module_id.to_string()))
    }

    fn module_mut(&mut self, module_id: &str) -> Result<&mut Module, StoreError> {
        self.state.module_mut(module_id).ok_or_else(|| {
            debug!(module_id, "Mutation on unknown module ignored");
            StoreError::ModuleNotFound(module_id.to_string())
        })
    }

    /// Millisecond timestamp id, strictly increasing within this store
    fn next_id(&mut self) -> String {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Severity, MAX_NOTIFICATIONS};

    #[test]
    fn test_add_content_appends_and_notifies() {
        let mut store = CourseStore::new();
        let item = store
            .add_content(
                "wind-power",
                ContentType::Videos,
                ContentDraft::new("Turbine Basics", "Intro"),
            )
            .unwrap();

        let videos = store.module_content("wind-power", ContentType::Videos);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Turbine Basics");
        assert_eq!(videos[0].id, item.id);
        assert_eq!(videos[0].uploaded_by, TEACHER_UPLOADER);

        let latest = store.notifications().latest().unwrap();
        assert_eq!(latest.severity, Severity::Success);
        assert_eq!(latest.message, "New video added to Wind Power");
    }

    #[test]
    fn test_add_content_ids_are_unique_within_list() {
        let mut store = CourseStore::new();
        for i in 0..20 {
            store
                .add_content(
                    "hydropower",
                    ContentType::Quizzes,
                    ContentDraft::new(format!("Quiz {}", i), ""),
                )
                .unwrap();
        }

        let mut ids: Vec<_> = store
            .module_content("hydropower", ContentType::Quizzes)
            .iter()
            .map(|i| i.id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_update_content_keeps_position() {
        let mut store = CourseStore::new();
        let first = store
            .add_content("geothermal", ContentType::Textbooks, ContentDraft::new("A", "a"))
            .unwrap();
        store
            .add_content("geothermal", ContentType::Textbooks, ContentDraft::new("B", "b"))
            .unwrap();

        let matched = store
            .update_content(
                "geothermal",
                ContentType::Textbooks,
                &first.id,
                ContentPatch::title("A2"),
            )
            .unwrap();

        assert!(matched);
        let books = store.module_content("geothermal", ContentType::Textbooks);
        assert_eq!(books[0].id, first.id);
        assert_eq!(books[0].title, "A2");
        assert_eq!(books[0].description, "a");
        assert_eq!(books[1].title, "B");
        assert_eq!(
            store.notifications().latest().unwrap().message,
            "textbook updated in Geothermal"
        );
    }

    #[test]
    fn test_update_missing_item_still_notifies() {
        let mut store = CourseStore::new();
        let before = store.all_modules().to_vec();

        let matched = store
            .update_content("solar-pv", ContentType::Videos, "404", ContentPatch::title("x"))
            .unwrap();

        assert!(!matched);
        assert_eq!(store.all_modules(), before.as_slice());
        assert_eq!(store.notifications().len(), 1);
    }

    #[test]
    fn test_delete_content() {
        let mut store = CourseStore::new();

        assert!(store
            .delete_content("solar-pv", ContentType::Quizzes, "1")
            .unwrap());
        assert!(store
            .module_content("solar-pv", ContentType::Quizzes)
            .is_empty());
        assert_eq!(store.module_content("solar-pv", ContentType::Videos).len(), 1);

        // Absent id is a quiet no-op on the list
        assert!(!store
            .delete_content("solar-pv", ContentType::Quizzes, "1")
            .unwrap());

        let latest = store.notifications().latest().unwrap();
        assert_eq!(latest.severity, Severity::Warning);
        assert_eq!(latest.message, "quiz deleted from Solar PV");
    }

    #[test]
    fn test_unknown_module_changes_nothing() {
        let mut store = CourseStore::new();
        let before = store.state().clone();
        let revision = store.revision();

        let err = store
            .add_content("not-a-real-module", ContentType::Videos, ContentDraft::new("x", ""))
            .unwrap_err();
        assert_eq!(err, StoreError::ModuleNotFound("not-a-real-module".to_string()));
        assert!(store
            .update_content("not-a-real-module", ContentType::Videos, "1", ContentPatch::title("y"))
            .is_err());
        assert!(store
            .delete_content("not-a-real-module", ContentType::Videos, "1")
            .is_err());

        assert_eq!(store.state(), &before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_notifications_are_bounded() {
        let mut store = CourseStore::new();
        let first = store.add_notification(NewNotification::info("first"));
        for i in 0..MAX_NOTIFICATIONS {
            store.add_notification(NewNotification::info(format!("n{}", i)));
        }

        assert_eq!(store.notifications().len(), MAX_NOTIFICATIONS);
        assert!(store.notifications().iter().all(|n| n.id != first));
        assert_eq!(
            store.notifications().latest().unwrap().message,
            format!("n{}", MAX_NOTIFICATIONS - 1)
        );
    }

    #[test]
    fn test_remove_notification() {
        let mut store = CourseStore::new();
        let id = store.add_notification(NewNotification::success("hello"));
        let revision = store.revision();

        assert!(!store.remove_notification("missing"));
        assert_eq!(store.revision(), revision);
        assert!(store.remove_notification(&id));
        assert!(store.notifications().is_empty());
    }

    #[test]
    fn test_update_stats() {
        let mut store = CourseStore::new();
        store.update_stats(&StatsPatch {
            average_score: Some(91),
            ..Default::default()
        });

        assert_eq!(store.stats().average_score, 91);
        assert_eq!(store.stats().total_students, 142);
    }

    #[test]
    fn test_module_content_by_name() {
        let store = CourseStore::new();

        assert_eq!(store.module_content_by_name("solar-pv", "videos").len(), 1);
        assert!(store.module_content_by_name("solar-pv", "podcasts").is_empty());
        assert!(store.module_content_by_name("moon-power", "videos").is_empty());
    }

    #[test]
    fn test_search() {
        let mut store = CourseStore::new();
        store
            .add_content(
                "solar-thermal",
                ContentType::Projects,
                ContentDraft::new("Parabolic Trough", "Build a SOLAR concentrator"),
            )
            .unwrap();

        let hits = store.search("solar");
        // Four seed items mention solar, plus the new project
        assert_eq!(hits.len(), 5);
        assert!(hits
            .iter()
            .any(|h| h.module.id == "solar-thermal" && h.content_type == ContentType::Projects));

        assert!(store.search("tidal").is_empty());
        assert_eq!(store.search("").len(), 6);
    }

    #[test]
    fn test_content_counts() {
        let store = CourseStore::new();
        let counts = store.content_counts("solar-pv").unwrap();

        assert!(counts.iter().all(|(_, n)| *n == 1));
        assert!(store.content_counts("nowhere").is_err());
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut store = CourseStore::new();
        store
            .add_content("wind-power", ContentType::Videos, ContentDraft::new("x", ""))
            .unwrap();
        store.update_stats(&StatsPatch {
            total_students: Some(1),
            ..Default::default()
        });

        store.reset();

        assert_eq!(store.state(), store.seed());
    }
}
