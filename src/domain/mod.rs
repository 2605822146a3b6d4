//! Domain types for the course content store.
//!
//! This module contains the core data structures:
//! - Module: a course topic with five content lists
//! - ContentItem: a video, textbook, project, assignment or quiz
//! - Stats: display-only counters
//! - Notification: bounded activity log
//! - Seed: the static starting state

pub mod content;
pub mod module;
pub mod notification;
pub mod seed;
pub mod stats;

// Re-export commonly used types
pub use content::{
    parse_questions, ContentDraft, ContentFields, ContentItem, ContentPatch, ContentType,
    FieldsPatch, QuizQuestion, TEACHER_UPLOADER,
};
pub use module::Module;
pub use notification::{NewNotification, Notification, NotificationLog, Severity, MAX_NOTIFICATIONS};
pub use seed::{seed_modules, seed_stats};
pub use stats::{Stats, StatsPatch};
