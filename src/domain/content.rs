//! Content items and the five content-type lists a module carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::store::StoreError;

/// Label stamped on every item uploaded through the store
pub const TEACHER_UPLOADER: &str = "Teacher";

/// Label stamped on seed content
pub const SYSTEM_UPLOADER: &str = "System";

/// Marker given to freshly uploaded quizzes
pub const QUIZ_PENDING_STATUS: &str = "⏳";

/// Duration shown for videos uploaded without one
pub const UNKNOWN_DURATION: &str = "N/A";

/// Item keys owned by the store; never accepted through `extra`
const RESERVED_KEYS: [&str; 5] = ["id", "title", "description", "uploadedAt", "uploadedBy"];

/// Content-type key of a module list
///
/// Deserializes through `FromStr`, so singular and mixed-case keys are
/// accepted; it always serializes as the plural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ContentType {
    Videos,
    Textbooks,
    Projects,
    Assignments,
    Quizzes,
}

impl ContentType {
    /// All content types in display order
    pub const ALL: [ContentType; 5] = [
        ContentType::Videos,
        ContentType::Textbooks,
        ContentType::Projects,
        ContentType::Assignments,
        ContentType::Quizzes,
    ];

    /// Key used for the list in snapshots and on the command line
    pub fn key(self) -> &'static str {
        match self {
            ContentType::Videos => "videos",
            ContentType::Textbooks => "textbooks",
            ContentType::Projects => "projects",
            ContentType::Assignments => "assignments",
            ContentType::Quizzes => "quizzes",
        }
    }

    /// Singular noun used in notification messages
    pub fn singular(self) -> &'static str {
        match self {
            ContentType::Videos => "video",
            ContentType::Textbooks => "textbook",
            ContentType::Projects => "project",
            ContentType::Assignments => "assignment",
            ContentType::Quizzes => "quiz",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for ContentType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "videos" | "video" => Ok(ContentType::Videos),
            "textbooks" | "textbook" => Ok(ContentType::Textbooks),
            "projects" | "project" => Ok(ContentType::Projects),
            "assignments" | "assignment" => Ok(ContentType::Assignments),
            "quizzes" | "quiz" => Ok(ContentType::Quizzes),
            _ => Err(StoreError::UnknownContentType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ContentType {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,

    #[serde(default)]
    pub options: Vec<String>,

    /// Index into `options` of the right answer
    #[serde(default)]
    pub correct: usize,
}

/// Parse the JSON question list a teacher pastes into the quiz form.
///
/// Blank input yields an empty list.
pub fn parse_questions(raw: &str) -> Result<Vec<QuizQuestion>, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let questions: Vec<QuizQuestion> =
        serde_json::from_str(raw).map_err(|e| StoreError::InvalidQuestions(e.to_string()))?;

    if let Some((index, q)) = questions
        .iter()
        .enumerate()
        .find(|(_, q)| !q.options.is_empty() && q.correct >= q.options.len())
    {
        return Err(StoreError::InvalidQuestions(format!(
            "question {} marks option {} correct but has {} options",
            index + 1,
            q.correct,
            q.options.len()
        )));
    }

    Ok(questions)
}

/// Type-specific optional fields shared by items, drafts and patches.
///
/// Keys the store does not know about are kept in `extra` and written back
/// out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentFields {
    /// Shallow merge: fields present in `patch` replace the current value,
    /// explicit nulls clear it
    pub fn merge(&mut self, patch: FieldsPatch) {
        fn put<T>(slot: &mut Option<T>, value: Option<Option<T>>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        put(&mut self.duration, patch.duration);
        put(&mut self.url, patch.url);
        put(&mut self.file_url, patch.file_url);
        put(&mut self.file_name, patch.file_name);
        put(&mut self.instructions, patch.instructions);
        put(&mut self.due_date, patch.due_date);
        put(&mut self.status, patch.status);
        put(&mut self.questions, patch.questions);

        for (key, value) in patch.extra {
            if value.is_null() {
                self.extra.remove(&key);
            } else {
                self.extra.insert(key, value);
            }
        }
        self.strip_reserved();
    }

    fn strip_reserved(&mut self) {
        for key in RESERVED_KEYS {
            self.extra.remove(key);
        }
    }
}

/// Field changes carried by a `ContentPatch`.
///
/// The outer `Option` is "key present", the inner one is the new value, so
/// `{"dueDate": null}` clears the due date while a missing key keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsPatch {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub file_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub questions: Option<Option<Vec<QuizQuestion>>>,

    /// Unknown keys; a null value removes the key
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FieldsPatch {
    /// Clear a field by its camelCase key
    pub fn clear(&mut self, key: &str) {
        match key {
            "duration" => self.duration = Some(None),
            "url" => self.url = Some(None),
            "fileUrl" => self.file_url = Some(None),
            "fileName" => self.file_name = Some(None),
            "instructions" => self.instructions = Some(None),
            "dueDate" => self.due_date = Some(None),
            "status" => self.status = Some(None),
            "questions" => self.questions = Some(None),
            other => {
                self.extra.insert(other.to_string(), Value::Null);
            }
        }
    }
}

impl From<ContentFields> for FieldsPatch {
    fn from(fields: ContentFields) -> Self {
        Self {
            duration: fields.duration.map(Some),
            url: fields.url.map(Some),
            file_url: fields.file_url.map(Some),
            file_name: fields.file_name.map(Some),
            instructions: fields.instructions.map(Some),
            due_date: fields.due_date.map(Some),
            status: fields.status.map(Some),
            questions: fields.questions.map(Some),
            extra: fields.extra,
        }
    }
}

/// A piece of instructional material inside a module list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub fields: ContentFields,

    pub uploaded_at: DateTime<Utc>,

    pub uploaded_by: String,
}

impl ContentItem {
    /// Build a stored item from a draft
    pub fn from_draft(
        id: impl Into<String>,
        draft: ContentDraft,
        uploaded_at: DateTime<Utc>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        let mut fields = draft.fields;
        fields.strip_reserved();

        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            fields,
            uploaded_at,
            uploaded_by: uploaded_by.into(),
        }
    }

    /// Apply a patch, keeping id and upload metadata
    pub fn apply(&mut self, patch: ContentPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.fields.merge(patch.fields);
    }

    /// Case-insensitive substring match on title or description
    pub fn matches(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
    }
}

/// Payload for a new content item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub fields: ContentFields,
}

impl ContentDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: ContentFields::default(),
        }
    }

    pub fn with_fields(mut self, fields: ContentFields) -> Self {
        self.fields = fields;
        self
    }

    /// Fill in the defaults the upload form applies for each content type
    pub fn prepare(mut self, content_type: ContentType) -> Self {
        match content_type {
            ContentType::Videos => {
                if self.fields.duration.is_none() {
                    self.fields.duration = Some(UNKNOWN_DURATION.to_string());
                }
            }
            ContentType::Quizzes => {
                self.fields.status = Some(QUIZ_PENDING_STATUS.to_string());
                if self.fields.questions.is_none() {
                    self.fields.questions = Some(Vec::new());
                }
            }
            ContentType::Textbooks | ContentType::Projects | ContentType::Assignments => {}
        }
        self
    }
}

/// Partial update for an existing item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub fields: FieldsPatch,
}

impl ContentPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_fields(mut self, fields: impl Into<FieldsPatch>) -> Self {
        self.fields = fields.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &ContentPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_str() {
        assert_eq!("videos".parse::<ContentType>().unwrap(), ContentType::Videos);
        assert_eq!("Quiz".parse::<ContentType>().unwrap(), ContentType::Quizzes);
        assert_eq!(
            " assignment ".parse::<ContentType>().unwrap(),
            ContentType::Assignments
        );
        assert!("podcasts".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_singular_names() {
        assert_eq!(ContentType::Quizzes.singular(), "quiz");
        assert_eq!(ContentType::Videos.singular(), "video");
    }

    #[test]
    fn test_item_json_uses_camel_case_and_keeps_extra_keys() {
        let json = r#"{
            "id": "1",
            "title": "Solar Energy Engineering",
            "description": "Guide",
            "fileUrl": "https://files/solar.pdf",
            "energyType": "solar",
            "uploadedAt": "2024-03-01T10:00:00Z",
            "uploadedBy": "System"
        }"#;

        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.fields.file_url.as_deref(), Some("https://files/solar.pdf"));
        assert_eq!(item.fields.extra.get("energyType"), Some(&Value::from("solar")));

        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["fileUrl"], "https://files/solar.pdf");
        assert_eq!(out["energyType"], "solar");
        assert!(out.get("duration").is_none());
    }

    #[test]
    fn test_patch_leaves_unset_fields_alone() {
        let mut item = ContentItem::from_draft(
            "42",
            ContentDraft::new("Old", "Keep me").with_fields(ContentFields {
                duration: Some("15 min".to_string()),
                ..Default::default()
            }),
            Utc::now(),
            TEACHER_UPLOADER,
        );

        item.apply(ContentPatch::title("New"));

        assert_eq!(item.id, "42");
        assert_eq!(item.title, "New");
        assert_eq!(item.description, "Keep me");
        assert_eq!(item.fields.duration.as_deref(), Some("15 min"));
    }

    #[test]
    fn test_patch_cannot_smuggle_an_id() {
        let mut item = ContentItem::from_draft("7", ContentDraft::new("A", ""), Utc::now(), "Teacher");
        let patch: ContentPatch =
            serde_json::from_str(r#"{"id": "99", "uploadedBy": "Mallory", "room": "B12"}"#).unwrap();

        item.apply(patch);

        assert_eq!(item.id, "7");
        assert_eq!(item.uploaded_by, "Teacher");
        assert_eq!(item.fields.extra.get("room"), Some(&Value::from("B12")));
        assert!(item.fields.extra.get("id").is_none());
    }

    #[test]
    fn test_null_in_patch_clears_field() {
        let mut item = ContentItem::from_draft(
            "5",
            ContentDraft::new("Site survey", "").with_fields(ContentFields {
                due_date: Some("2024-03-15".to_string()),
                instructions: Some("Measure the head".to_string()),
                extra: Map::from_iter([("room".to_string(), Value::from("B12"))]),
                ..Default::default()
            }),
            Utc::now(),
            TEACHER_UPLOADER,
        );

        let patch: ContentPatch =
            serde_json::from_str(r#"{"dueDate": null, "room": null}"#).unwrap();
        item.apply(patch);

        assert_eq!(item.fields.due_date, None);
        assert!(item.fields.extra.get("room").is_none());
        assert_eq!(item.fields.instructions.as_deref(), Some("Measure the head"));

        let out = serde_json::to_value(&item).unwrap();
        assert!(out.get("dueDate").is_none());
    }

    #[test]
    fn test_fields_patch_clear_by_key() {
        let mut patch = FieldsPatch::default();
        patch.clear("fileUrl");
        patch.clear("energyType");

        assert_eq!(patch.file_url, Some(None));
        assert_eq!(patch.extra.get("energyType"), Some(&Value::Null));
        assert_eq!(patch.due_date, None);
    }

    #[test]
    fn test_content_type_deserializes_leniently() {
        let types: Vec<ContentType> =
            serde_json::from_str(r#"["videos", "Quiz", "TEXTBOOK"]"#).unwrap();
        assert_eq!(
            types,
            vec![ContentType::Videos, ContentType::Quizzes, ContentType::Textbooks]
        );
        assert_eq!(serde_json::to_string(&ContentType::Quizzes).unwrap(), r#""quizzes""#);
        assert!(serde_json::from_str::<ContentType>(r#""podcasts""#).is_err());
    }

    #[test]
    fn test_prepare_defaults() {
        let video = ContentDraft::new("Turbine Basics", "Intro").prepare(ContentType::Videos);
        assert_eq!(video.fields.duration.as_deref(), Some(UNKNOWN_DURATION));

        let quiz = ContentDraft::new("Quiz 2", "Wind").prepare(ContentType::Quizzes);
        assert_eq!(quiz.fields.status.as_deref(), Some(QUIZ_PENDING_STATUS));
        assert_eq!(quiz.fields.questions, Some(Vec::new()));

        let book = ContentDraft::new("Book", "").prepare(ContentType::Textbooks);
        assert_eq!(book.fields, ContentFields::default());
    }

    #[test]
    fn test_parse_questions() {
        let raw = r#"[{"question": "What is a PV cell?", "options": ["A", "B", "C"], "correct": 0}]"#;
        let questions = parse_questions(raw).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 3);

        assert!(parse_questions("   ").unwrap().is_empty());
        assert!(matches!(
            parse_questions("[{"),
            Err(StoreError::InvalidQuestions(_))
        ));
        assert!(matches!(
            parse_questions(r#"[{"question": "q", "options": ["A"], "correct": 3}]"#),
            Err(StoreError::InvalidQuestions(_))
        ));
    }
}
