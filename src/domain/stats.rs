//! Display-only course counters.

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Flat record of course counters shown on the dashboards.
///
/// Not derived from content; updated explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_students: u32,
    pub active_students: u32,
    /// Percent
    pub average_progress: u32,
    /// Percent
    pub completion_rate: u32,
    pub total_modules: u32,
    pub total_assignments: u32,
    pub submitted_assignments: u32,
    /// Percent
    pub average_score: u32,
}

impl Stats {
    /// Shallow merge of the fields set in `patch`
    pub fn merge(&mut self, patch: &StatsPatch) {
        fn take(slot: &mut u32, value: Option<u32>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        take(&mut self.total_students, patch.total_students);
        take(&mut self.active_students, patch.active_students);
        take(&mut self.average_progress, patch.average_progress);
        take(&mut self.completion_rate, patch.completion_rate);
        take(&mut self.total_modules, patch.total_modules);
        take(&mut self.total_assignments, patch.total_assignments);
        take(&mut self.submitted_assignments, patch.submitted_assignments);
        take(&mut self.average_score, patch.average_score);
    }

    /// Counter names paired with their values, in display order
    pub fn entries(&self) -> [(&'static str, u32); 8] {
        [
            ("totalStudents", self.total_students),
            ("activeStudents", self.active_students),
            ("averageProgress", self.average_progress),
            ("completionRate", self.completion_rate),
            ("totalModules", self.total_modules),
            ("totalAssignments", self.total_assignments),
            ("submittedAssignments", self.submitted_assignments),
            ("averageScore", self.average_score),
        ]
    }
}

/// Partial stats update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    pub total_students: Option<u32>,
    pub active_students: Option<u32>,
    pub average_progress: Option<u32>,
    pub completion_rate: Option<u32>,
    pub total_modules: Option<u32>,
    pub total_assignments: Option<u32>,
    pub submitted_assignments: Option<u32>,
    pub average_score: Option<u32>,
}

impl StatsPatch {
    /// Set one counter by name (camelCase or snake_case)
    pub fn set(&mut self, name: &str, value: u32) -> Result<(), StoreError> {
        let slot = match name.replace('_', "").to_lowercase().as_str() {
            "totalstudents" => &mut self.total_students,
            "activestudents" => &mut self.active_students,
            "averageprogress" => &mut self.average_progress,
            "completionrate" => &mut self.completion_rate,
            "totalmodules" => &mut self.total_modules,
            "totalassignments" => &mut self.total_assignments,
            "submittedassignments" => &mut self.submitted_assignments,
            "averagescore" => &mut self.average_score,
            _ => return Err(StoreError::UnknownStat(name.to_string())),
        };
        *slot = Some(value);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &StatsPatch::default()
    }
}
