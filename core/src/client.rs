//! Stateless request builder and response parser for the learning API.
//!
//! # Design
//! `LearnClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; `LearnApi` glues the two around a
//! `Transport`. Ids are forwarded as given, negative ones included.
//!
//! Response normalization lives in `check_status`: 2xx passes through, 404
//! and 5xx become their dedicated errors, anything else keeps the original
//! body.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::types::{
    CourseResponse, CoursesResponse, GenerateLessonRequest, HealthResponse, LessonContentResponse,
    LessonOverviewResponse, LessonResponse, LessonsResponse, ProgressResponse,
    ProgressUpdateResponse, UpdateProgressRequest,
};

/// Synchronous, stateless client for the learning platform API.
#[derive(Debug, Clone)]
pub struct LearnClient {
    base_url: String,
}

impl LearnClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- courses ------------------------------------------------------------

    pub fn build_list_courses(&self) -> HttpRequest {
        self.get("/api/courses")
    }

    pub fn build_get_course(&self, course_id: i64) -> HttpRequest {
        self.get(&format!("/api/courses/{course_id}"))
    }

    pub fn build_get_course_lessons(&self, course_id: i64) -> HttpRequest {
        self.get(&format!("/api/courses/{course_id}/lessons"))
    }

    pub fn build_get_lesson(&self, lesson_id: i64) -> HttpRequest {
        self.get(&format!("/api/lessons/{lesson_id}"))
    }

    // -- ai -----------------------------------------------------------------

    pub fn build_generate_lesson_overview(
        &self,
        lesson_id: i64,
        input: &GenerateLessonRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.post(&format!("/api/ai/lessons/{lesson_id}/overview"), input)
    }

    pub fn build_generate_lesson_content(
        &self,
        lesson_id: i64,
        input: &GenerateLessonRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.post(&format!("/api/ai/lessons/{lesson_id}/generate"), input)
    }

    pub fn build_get_cached_lesson_content(&self, lesson_id: i64) -> HttpRequest {
        self.get(&format!("/api/ai/lessons/{lesson_id}/content"))
    }

    pub fn build_update_progress(
        &self,
        lesson_id: i64,
        input: &UpdateProgressRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.post(&format!("/api/ai/lessons/{lesson_id}/progress"), input)
    }

    // -- progress & health --------------------------------------------------

    pub fn build_get_user_progress(&self, user_id: &str) -> HttpRequest {
        self.get(&format!("/api/user/{}/progress", encode_segment(user_id)))
    }

    pub fn build_check_health(&self) -> HttpRequest {
        self.get("/health")
    }

    // -- parsers ------------------------------------------------------------

    pub fn parse_list_courses(&self, response: HttpResponse) -> Result<CoursesResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_course(&self, response: HttpResponse) -> Result<CourseResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_course_lessons(
        &self,
        response: HttpResponse,
    ) -> Result<LessonsResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_lesson(&self, response: HttpResponse) -> Result<LessonResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_generate_lesson_overview(
        &self,
        response: HttpResponse,
    ) -> Result<LessonOverviewResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_generate_lesson_content(
        &self,
        response: HttpResponse,
    ) -> Result<LessonContentResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_cached_lesson_content(
        &self,
        response: HttpResponse,
    ) -> Result<LessonContentResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_progress(
        &self,
        response: HttpResponse,
    ) -> Result<ProgressUpdateResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_user_progress(
        &self,
        response: HttpResponse,
    ) -> Result<ProgressResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_check_health(&self, response: HttpResponse) -> Result<HealthResponse, ApiError> {
        parse_json(response)
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: default_headers(),
            body: None,
        }
    }

    fn post<T: Serialize>(&self, path: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: default_headers(),
            body: Some(body),
        })
    }
}

fn default_headers() -> Vec<(String, String)> {
    vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::error!(status = response.status, body = %response.body, "API response error");
    match response.status {
        404 => Err(ApiError::NotFound),
        500..=599 => Err(ApiError::ServerError {
            status: response.status,
            body: response.body.clone(),
        }),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved set kept).
fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
