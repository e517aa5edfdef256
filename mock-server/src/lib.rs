//! In-memory stand-in for the learning platform backend.
//!
//! Serves the same routes and JSON envelopes as the real service. AI output
//! is replaced by deterministic canned text so tests can assert on it.

pub mod catalog;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use catalog::{Catalog, CourseRecord, LessonRecord};

pub const ANONYMOUS_USER: &str = "anonymous";

pub const NO_CACHED_CONTENT: &str =
    "No cached content available. Please generate lesson content first.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentSection {
    pub section_title: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeExample {
    pub title: String,
    pub code: String,
    pub explanation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PracticeExercise {
    pub title: String,
    pub description: String,
    pub difficulty: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonContent {
    pub introduction: String,
    pub main_content: Vec<ContentSection>,
    pub code_examples: Vec<CodeExample>,
    pub key_takeaways: Vec<String>,
    pub practice_exercises: Vec<PracticeExercise>,
}

#[derive(Deserialize)]
pub struct GenerateLessonRequest {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProgressRequest {
    pub user_id: String,
    #[serde(default)]
    pub completion_percentage: i64,
    #[serde(default)]
    pub time_spent_minutes: u32,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Clone, Debug)]
struct CachedContent {
    content: LessonContent,
    generated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
struct ProgressRecord {
    course_id: i64,
    completion_percentage: u32,
    time_spent_minutes: u32,
    is_completed: bool,
    last_accessed: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
}

impl ProgressRecord {
    fn started(course_id: i64) -> Self {
        Self {
            course_id,
            completion_percentage: 0,
            time_spent_minutes: 0,
            is_completed: false,
            last_accessed: now(),
            completed_at: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Backend {
    catalog: Catalog,
    content: HashMap<i64, CachedContent>,
    // Keyed by (user id, lesson id).
    progress: BTreeMap<(String, i64), ProgressRecord>,
}

pub type Db = Arc<RwLock<Backend>>;

/// Error response in the backend's `{"detail": ...}` shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    detail: &'static str,
}

impl ApiFailure {
    fn not_found(detail: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn app() -> Router {
    app_with(Catalog::seeded())
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(RwLock::new(Backend {
        catalog,
        ..Backend::default()
    }));
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses))
        .route("/api/courses/{id}", get(get_course))
        .route("/api/courses/{id}/lessons", get(get_course_lessons))
        .route("/api/lessons/{id}", get(get_lesson))
        .route("/api/ai/lessons/{id}/overview", post(generate_overview))
        .route("/api/ai/lessons/{id}/generate", post(generate_content))
        .route("/api/ai/lessons/{id}/content", get(get_cached_content))
        .route("/api/ai/lessons/{id}/progress", post(update_progress))
        .route("/api/user/{user_id}/progress", get(get_user_progress))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "LearnAnySkills API",
        "version": "1.0.0",
    }))
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

fn lesson_summary(backend: &Backend, lesson: &LessonRecord) -> Value {
    json!({
        "id": lesson.id,
        "title": lesson.title,
        "description": lesson.description,
        "lesson_number": lesson.lesson_number,
        "estimated_duration": lesson.estimated_duration,
        "learning_objectives": lesson.learning_objectives,
        "has_content": backend.content.contains_key(&lesson.id),
    })
}

async fn list_courses(State(db): State<Db>) -> Json<Value> {
    let backend = db.read().await;
    let courses: Vec<Value> = backend
        .catalog
        .courses
        .iter()
        .map(|course| {
            json!({
                "id": course.id,
                "title": course.title,
                "description": course.description,
                "difficulty_level": course.difficulty_level,
                "estimated_duration": course.estimated_duration,
                "image_url": course.image_url,
                "lesson_count": backend.catalog.lessons_of(course.id).len(),
                "created_at": now(),
            })
        })
        .collect();
    Json(json!({ "success": true, "courses": courses }))
}

async fn get_course(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let backend = db.read().await;
    let course = backend
        .catalog
        .course(id)
        .ok_or(ApiFailure::not_found("Course not found"))?;
    let lessons: Vec<Value> = backend
        .catalog
        .lessons_of(id)
        .into_iter()
        .map(|lesson| lesson_summary(&backend, lesson))
        .collect();
    Ok(Json(json!({
        "success": true,
        "course": {
            "id": course.id,
            "title": course.title,
            "description": course.description,
            "overview": course.overview,
            "difficulty_level": course.difficulty_level,
            "estimated_duration": course.estimated_duration,
            "image_url": course.image_url,
            "created_at": now(),
            "lessons": lessons,
        }
    })))
}

async fn get_course_lessons(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let backend = db.read().await;
    let course = backend
        .catalog
        .course(id)
        .ok_or(ApiFailure::not_found("Course not found"))?;
    let lessons: Vec<Value> = backend
        .catalog
        .lessons_of(id)
        .into_iter()
        .map(|lesson| {
            let mut summary = lesson_summary(&backend, lesson);
            summary["created_at"] = json!(now());
            summary
        })
        .collect();
    Ok(Json(json!({
        "success": true,
        "course_title": course.title,
        "lessons": lessons,
    })))
}

async fn get_lesson(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let backend = db.read().await;
    let (lesson, course) = find_lesson(&backend, id)?;
    let cached = backend.content.get(&id);
    let mut body = json!({
        "id": lesson.id,
        "title": lesson.title,
        "description": lesson.description,
        "lesson_number": lesson.lesson_number,
        "estimated_duration": lesson.estimated_duration,
        "learning_objectives": lesson.learning_objectives,
        "course": { "id": course.id, "title": course.title },
        "has_generated_content": cached.is_some(),
    });
    if let Some(cached) = cached {
        body["content_summary"] = json!(cached.content.introduction);
    }
    Ok(Json(json!({ "success": true, "lesson": body })))
}

fn find_lesson(backend: &Backend, id: i64) -> Result<(&LessonRecord, &CourseRecord), ApiFailure> {
    let lesson = backend
        .catalog
        .lesson(id)
        .ok_or(ApiFailure::not_found("Lesson not found"))?;
    let course = backend
        .catalog
        .course(lesson.course_id)
        .ok_or(ApiFailure::not_found("Course not found"))?;
    Ok((lesson, course))
}

// ---------------------------------------------------------------------------
// AI content
// ---------------------------------------------------------------------------

/// The backend's fallback overview, used when no model answers.
pub fn canned_overview(lesson: &LessonRecord) -> String {
    format!(
        "Welcome to {}! In this lesson, you'll learn {}. Let's get started on this exciting learning journey!",
        lesson.title,
        lesson.description.to_lowercase()
    )
}

pub fn canned_content(course: &CourseRecord, lesson: &LessonRecord) -> LessonContent {
    LessonContent {
        introduction: format!(
            "Welcome to {}, part of {}. {}.",
            lesson.title, course.title, lesson.description
        ),
        main_content: lesson
            .learning_objectives
            .iter()
            .map(|objective| ContentSection {
                section_title: objective.clone(),
                content: format!("This section covers how to {}.", objective.to_lowercase()),
            })
            .collect(),
        code_examples: vec![CodeExample {
            title: format!("{} in practice", lesson.title),
            code: format!("# {}\nprint(\"{}\")", lesson.title, lesson.title),
            explanation: "A minimal starting point to build on.".to_string(),
        }],
        key_takeaways: lesson.learning_objectives.clone(),
        practice_exercises: vec![PracticeExercise {
            title: format!("Practice: {}", lesson.title),
            description: format!("Apply what you learned: {}.", lesson.description),
            difficulty: "beginner".to_string(),
        }],
    }
}

async fn generate_overview(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(_input): Json<GenerateLessonRequest>,
) -> ApiResult {
    let backend = db.read().await;
    let (lesson, course) = find_lesson(&backend, id)?;
    Ok(Json(json!({
        "success": true,
        "lesson": {
            "id": lesson.id,
            "title": lesson.title,
            "description": lesson.description,
            "course_title": course.title,
            "estimated_duration": lesson.estimated_duration,
            "learning_objectives": lesson.learning_objectives,
        },
        "overview": canned_overview(lesson),
        "ai_generated": false,
    })))
}

async fn generate_content(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<GenerateLessonRequest>,
) -> ApiResult {
    let mut backend = db.write().await;
    let (lesson, course) = find_lesson(&backend, id)?;
    let lesson_json = json!({
        "id": lesson.id,
        "title": lesson.title,
        "course_title": course.title,
    });
    let course_id = course.id;

    if let Some(cached) = backend.content.get(&id) {
        return Ok(Json(json!({
            "success": true,
            "lesson": lesson_json,
            "content": cached.content,
            "cached": true,
            "generated_at": cached.generated_at,
        })));
    }

    let cached = CachedContent {
        content: canned_content(course, lesson),
        generated_at: now(),
    };
    tracing::info!(lesson_id = id, "generated lesson content");
    backend.content.insert(id, cached.clone());

    if let Some(user_id) = input.user_id.filter(|u| u != ANONYMOUS_USER) {
        backend
            .progress
            .entry((user_id, id))
            .or_insert_with(|| ProgressRecord::started(course_id));
    }

    Ok(Json(json!({
        "success": true,
        "lesson": lesson_json,
        "content": cached.content,
        "cached": false,
        "generated_at": cached.generated_at,
    })))
}

async fn get_cached_content(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    let backend = db.read().await;
    let (lesson, course) = find_lesson(&backend, id)?;
    let Some(cached) = backend.content.get(&id) else {
        return Ok(Json(json!({
            "success": false,
            "message": NO_CACHED_CONTENT,
            "has_content": false,
        })));
    };
    Ok(Json(json!({
        "success": true,
        "lesson": { "id": lesson.id, "title": lesson.title, "course_title": course.title },
        "content": cached.content,
        "has_content": true,
        "generated_at": cached.generated_at,
    })))
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

async fn update_progress(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateProgressRequest>,
) -> ApiResult {
    let mut backend = db.write().await;
    let course_id = find_lesson(&backend, id)?.1.id;
    let record = backend
        .progress
        .entry((input.user_id, id))
        .or_insert_with(|| ProgressRecord::started(course_id));

    let stamp = now();
    record.completion_percentage = input.completion_percentage.clamp(0, 100) as u32;
    record.time_spent_minutes = record.time_spent_minutes.saturating_add(input.time_spent_minutes);
    record.is_completed = input.is_completed;
    record.last_accessed = stamp;
    if input.is_completed && record.completed_at.is_none() {
        record.completed_at = Some(stamp);
    }

    Ok(Json(json!({
        "success": true,
        "message": "Progress updated successfully",
        "progress": {
            "lesson_id": id,
            "completion_percentage": record.completion_percentage,
            "time_spent_minutes": record.time_spent_minutes,
            "is_completed": record.is_completed,
        }
    })))
}

async fn get_user_progress(State(db): State<Db>, Path(user_id): Path<String>) -> Json<Value> {
    let backend = db.read().await;
    let mut per_course: BTreeMap<i64, Vec<Value>> = BTreeMap::new();
    let mut totals: BTreeMap<i64, (u32, u32)> = BTreeMap::new();

    for ((owner, lesson_id), record) in &backend.progress {
        if *owner != user_id {
            continue;
        }
        let title = backend
            .catalog
            .lesson(*lesson_id)
            .map(|l| l.title.clone())
            .unwrap_or_default();
        per_course.entry(record.course_id).or_default().push(json!({
            "lesson_id": lesson_id,
            "lesson_title": title,
            "is_completed": record.is_completed,
            "completion_percentage": record.completion_percentage,
            "time_spent_minutes": record.time_spent_minutes,
            "last_accessed": record.last_accessed,
        }));
        let entry = totals.entry(record.course_id).or_default();
        entry.0 += record.completion_percentage;
        entry.1 += record.time_spent_minutes;
    }

    let progress: Vec<Value> = per_course
        .into_iter()
        .map(|(course_id, lessons)| {
            let (completion_sum, time_spent) = totals.get(&course_id).copied().unwrap_or_default();
            let average = f64::from(completion_sum) / lessons.len() as f64;
            let course_title = backend
                .catalog
                .course(course_id)
                .map(|c| c.title.clone())
                .unwrap_or_default();
            json!({
                "course_id": course_id,
                "course_title": course_title,
                "lessons": lessons,
                "total_completion": (average * 10.0).round() / 10.0,
                "total_time_spent": time_spent,
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "user_id": user_id,
        "progress": progress,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_lesson() -> (CourseRecord, LessonRecord) {
        let catalog = Catalog::seeded();
        (catalog.courses[0].clone(), catalog.lessons[0].clone())
    }

    #[test]
    fn content_serializes_with_backend_field_names() {
        let (course, lesson) = first_lesson();
        let json = serde_json::to_value(canned_content(&course, &lesson)).unwrap();
        assert!(json["introduction"].as_str().unwrap().contains("Python for Data Analysis"));
        assert_eq!(json["main_content"].as_array().unwrap().len(), 4);
        assert_eq!(json["practice_exercises"][0]["difficulty"], "beginner");
    }

    #[test]
    fn overview_lowercases_the_description() {
        let (_, lesson) = first_lesson();
        let overview = canned_overview(&lesson);
        assert!(overview.starts_with("Welcome to Introduction to Python and Data Types!"));
        assert!(overview.contains("learn python basics"));
    }

    #[test]
    fn progress_request_fields_default() {
        let input: UpdateProgressRequest = serde_json::from_str(r#"{"user_id":"u"}"#).unwrap();
        assert_eq!(input.completion_percentage, 0);
        assert_eq!(input.time_spent_minutes, 0);
        assert!(!input.is_completed);
    }

    #[test]
    fn progress_request_rejects_missing_user() {
        let result: Result<UpdateProgressRequest, _> =
            serde_json::from_str(r#"{"is_completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn generate_request_user_is_optional() {
        let input: GenerateLessonRequest = serde_json::from_str("{}").unwrap();
        assert!(input.user_id.is_none());
    }

    #[test]
    fn failure_body_uses_detail() {
        let failure = ApiFailure::not_found("Lesson not found");
        assert_eq!(failure.status, StatusCode::NOT_FOUND);
        assert_eq!(failure.detail, "Lesson not found");
    }
}
