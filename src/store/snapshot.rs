//! Serialized form of the store kept in a key/value storage area.
//!
//! ```text
//! { "state": { "modules": [...], "stats": {...}, "notifications": [...] },
//!   "version": 1 }
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::course_store::{CourseState, CourseStore};
use crate::domain::Module;

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "course-storage";

/// Versioned whole-state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: CourseState,
    pub version: u32,
}

impl Snapshot {
    /// Capture the current state of a store
    pub fn capture(store: &CourseStore) -> Self {
        Self {
            state: store.state().clone(),
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse a stored snapshot, discarding it when unreadable or from
    /// another schema version
    pub fn parse_compatible(json: &str) -> Option<Self> {
        match Self::from_json(json) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => Some(snapshot),
            Ok(snapshot) => {
                warn!(
                    found = snapshot.version,
                    expected = SNAPSHOT_VERSION,
                    "Discarding snapshot with incompatible version"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable snapshot");
                None
            }
        }
    }

    /// Build a store from this snapshot on top of `seed`
    pub fn restore(self, seed: CourseState) -> CourseStore {
        let state = rehydrate(&seed, self.state);
        CourseStore::from_parts(seed, state)
    }
}

/// Merge persisted state over the seed.
///
/// Module ids stay fixed to the seed: persisted modules with unknown ids are
/// dropped and seed modules missing from the snapshot come from the seed.
/// Order follows the seed.
pub fn rehydrate(seed: &CourseState, persisted: CourseState) -> CourseState {
    let CourseState {
        modules: mut persisted_modules,
        stats,
        mut notifications,
    } = persisted;

    let modules: Vec<Module> = seed
        .modules
        .iter()
        .map(|seed_module| {
            match persisted_modules.iter().position(|m| m.id == seed_module.id) {
                Some(pos) => persisted_modules.swap_remove(pos),
                None => seed_module.clone(),
            }
        })
        .collect();

    for dropped in &persisted_modules {
        warn!(module_id = %dropped.id, "Ignoring persisted module not present in seed");
    }

    notifications.enforce_limit();

    CourseState {
        modules,
        stats,
        notifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentDraft, ContentType};
    use chrono::Utc;

    #[test]
    fn test_snapshot_envelope_shape() {
        let store = CourseStore::new();
        let json: serde_json::Value =
            serde_json::from_str(&Snapshot::capture(&store).to_json().unwrap()).unwrap();

        assert_eq!(json["version"], 1);
        assert!(json["state"]["modules"].is_array());
        assert_eq!(json["state"]["stats"]["totalStudents"], 142);
        assert!(json["state"]["notifications"].is_array());
    }

    #[test]
    fn test_parse_compatible_rejects_other_versions() {
        let store = CourseStore::new();
        let mut snapshot = Snapshot::capture(&store);
        snapshot.version = 0;

        assert!(Snapshot::parse_compatible(&snapshot.to_json().unwrap()).is_none());
        assert!(Snapshot::parse_compatible("{not json").is_none());
    }

    #[test]
    fn test_restore_keeps_mutations() {
        let mut store = CourseStore::new();
        store
            .add_content("wind-power", ContentType::Assignments, ContentDraft::new("Betz limit", ""))
            .unwrap();
        let json = Snapshot::capture(&store).to_json().unwrap();

        let restored = Snapshot::from_json(&json)
            .unwrap()
            .restore(store.seed().clone());

        assert_eq!(restored.all_modules(), store.all_modules());
        assert_eq!(restored.notifications(), store.notifications());
    }

    #[test]
    fn test_rehydrate_pins_module_ids_to_seed() {
        let seed = CourseState::seed(Utc::now());
        let mut persisted = seed.clone();
        persisted.modules.retain(|m| m.id != "geothermal");
        persisted
            .modules
            .push(Module::new("fusion", "Fusion", "", "⚛️", "#000"));
        persisted.modules.reverse();

        let state = rehydrate(&seed, persisted);

        let ids: Vec<_> = state.modules.iter().map(|m| m.id.as_str()).collect();
        let seed_ids: Vec<_> = seed.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, seed_ids);
    }
}
