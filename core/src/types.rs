//! Domain DTOs for the learning platform API.
//!
//! # Design
//! These mirror the backend's JSON but are defined independently of the
//! mock server; the integration tests catch schema drift. Every response is
//! an envelope with a `success` flag and optional `message` / `error` next to
//! its payload. Optional fields are tolerated as missing; nothing else is
//! validated.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A course as listed or fetched in detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub difficulty_level: String,
    pub estimated_duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_count: Option<u32>,
    pub created_at: String,
    /// Present on the detail endpoint, ordered by `lesson_number`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<Lesson>>,
}

/// Weak back-reference from a lesson to its course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseRef {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// 1-based position within the course.
    pub lesson_number: u32,
    pub estimated_duration: String,
    #[serde(default, deserialize_with = "learning_objectives")]
    pub learning_objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_generated_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseRef>,
}

impl Lesson {
    /// Whether the backend reports generated content for this lesson,
    /// whichever of the two flags the endpoint uses.
    pub fn content_available(&self) -> bool {
        self.has_content.or(self.has_generated_content).unwrap_or(false)
    }
}

/// Exercise difficulty as reported by the content generator.
///
/// Matched case-insensitively; anything outside the three known levels is
/// kept lowercased in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl Difficulty {
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "beginner" => Difficulty::Beginner,
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Other(lowered),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Other(raw) => raw,
        }
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Difficulty::parse(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentSection {
    pub section_title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeExample {
    pub title: String,
    pub code: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PracticeExercise {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
}

/// Full AI-generated lesson body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonContent {
    pub introduction: String,
    #[serde(default)]
    pub main_content: Vec<ContentSection>,
    #[serde(default)]
    pub code_examples: Vec<CodeExample>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub practice_exercises: Vec<PracticeExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    pub lesson_id: i64,
    pub lesson_title: String,
    pub is_completed: bool,
    pub completion_percentage: u32,
    pub time_spent_minutes: u32,
    pub last_accessed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseProgress {
    pub course_id: i64,
    pub course_title: String,
    #[serde(default)]
    pub lessons: Vec<UserProgress>,
    /// Average completion across the course's tracked lessons.
    pub total_completion: f64,
    pub total_time_spent: u32,
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoursesResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub course: Course,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub course_title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub lesson: Lesson,
}

/// Lesson summary echoed back by the overview endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverviewLesson {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub course_title: String,
    pub estimated_duration: String,
    #[serde(default, deserialize_with = "learning_objectives")]
    pub learning_objectives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonOverviewResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub lesson: OverviewLesson,
    pub overview: String,
    /// False when the backend fell back to a canned overview.
    pub ai_generated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentLesson {
    pub id: i64,
    pub title: String,
    pub course_title: String,
}

/// Envelope shared by the generate and cached-content endpoints.
///
/// A cached lookup with nothing stored answers `success: false,
/// has_content: false` and no payload, so every payload field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonContentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<ContentLesson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<LessonContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl LessonContentResponse {
    /// True when the cached-content lookup found stored content.
    pub fn has_content(&self) -> bool {
        self.has_content.unwrap_or(false) && self.content.is_some()
    }

    /// Consume the envelope, keeping the content only when the backend
    /// flagged it as present.
    pub fn into_cached_content(self) -> Option<LessonContent> {
        if self.has_content() {
            self.content
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub lesson_id: i64,
    pub completion_percentage: u32,
    pub time_spent_minutes: u32,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub progress: Vec<CourseProgress>,
}

/// Liveness answer from `/health`. Not wrapped in an envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for the overview and generate endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateLessonRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl GenerateLessonRequest {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

/// Body for the progress endpoint. Omitted fields are left to the backend's
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProgressRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl UpdateProgressRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            completion_percentage: None,
            time_spent_minutes: None,
            is_completed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Objectives arrive as a list, as a string holding a JSON list, as a single
/// plain string, or as null.
fn learning_objectives<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::List(list)) => list,
        Some(Raw::Text(text)) => crate::format::parse_learning_objectives(&text),
        None => Vec::new(),
    })
}
