//! Domain API: one method per backend endpoint.
//!
//! Each call builds its request with `LearnClient`, logs it, runs it through
//! the `Transport` and parses the envelope. Nothing here catches errors;
//! they reach the caller unchanged.

use crate::client::LearnClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CourseResponse, CoursesResponse, GenerateLessonRequest, HealthResponse, LessonContentResponse,
    LessonOverviewResponse, LessonResponse, LessonsResponse, ProgressResponse,
    ProgressUpdateResponse, UpdateProgressRequest,
};

/// Typed access to the learning platform backend.
pub struct LearnApi<T = UreqTransport> {
    client: LearnClient,
    transport: T,
}

impl LearnApi<UreqTransport> {
    /// API bound to the configured base URL with the configured deadline.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            LearnClient::new(&config.base_url),
            UreqTransport::new(config.timeout),
        )
    }
}

impl<T: Transport> LearnApi<T> {
    pub fn new(client: LearnClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &LearnClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::info!("API Request: {} {}", request.method, request.path);
        self.transport.execute(&request)
    }

    // -----------------------------------------------------------------------
    // Courses
    // -----------------------------------------------------------------------

    pub fn list_courses(&self) -> Result<CoursesResponse, ApiError> {
        let response = self.send(self.client.build_list_courses())?;
        self.client.parse_list_courses(response)
    }

    /// Course detail including its ordered lessons.
    pub fn get_course(&self, course_id: i64) -> Result<CourseResponse, ApiError> {
        let response = self.send(self.client.build_get_course(course_id))?;
        self.client.parse_get_course(response)
    }

    pub fn get_course_lessons(&self, course_id: i64) -> Result<LessonsResponse, ApiError> {
        let response = self.send(self.client.build_get_course_lessons(course_id))?;
        self.client.parse_get_course_lessons(response)
    }

    pub fn get_lesson(&self, lesson_id: i64) -> Result<LessonResponse, ApiError> {
        let response = self.send(self.client.build_get_lesson(lesson_id))?;
        self.client.parse_get_lesson(response)
    }

    // -----------------------------------------------------------------------
    // AI content
    // -----------------------------------------------------------------------

    /// Ask the backend for an AI overview. Every call may trigger a new
    /// generation.
    pub fn generate_lesson_overview(
        &self,
        lesson_id: i64,
        input: &GenerateLessonRequest,
    ) -> Result<LessonOverviewResponse, ApiError> {
        let request = self.client.build_generate_lesson_overview(lesson_id, input)?;
        let response = self.send(request)?;
        self.client.parse_generate_lesson_overview(response)
    }

    /// Generate full lesson content, or receive the backend's cached copy.
    pub fn generate_lesson_content(
        &self,
        lesson_id: i64,
        input: &GenerateLessonRequest,
    ) -> Result<LessonContentResponse, ApiError> {
        let request = self.client.build_generate_lesson_content(lesson_id, input)?;
        let response = self.send(request)?;
        self.client.parse_generate_lesson_content(response)
    }

    /// Previously generated content. Check `has_content()` on the result:
    /// an empty cache is a successful call.
    pub fn get_cached_lesson_content(
        &self,
        lesson_id: i64,
    ) -> Result<LessonContentResponse, ApiError> {
        let response = self.send(self.client.build_get_cached_lesson_content(lesson_id))?;
        self.client.parse_get_cached_lesson_content(response)
    }

    pub fn update_progress(
        &self,
        lesson_id: i64,
        input: &UpdateProgressRequest,
    ) -> Result<ProgressUpdateResponse, ApiError> {
        let request = self.client.build_update_progress(lesson_id, input)?;
        let response = self.send(request)?;
        self.client.parse_update_progress(response)
    }

    // -----------------------------------------------------------------------
    // Progress & health
    // -----------------------------------------------------------------------

    pub fn get_user_progress(&self, user_id: &str) -> Result<ProgressResponse, ApiError> {
        let response = self.send(self.client.build_get_user_progress(user_id))?;
        self.client.parse_get_user_progress(response)
    }

    pub fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.send(self.client.build_check_health())?;
        self.client.parse_check_health(response)
    }

    /// `check_health` collapsed to a yes/no answer.
    pub fn is_api_available(&self) -> bool {
        match self.check_health() {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(error = %err, "API not available");
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{api, ScriptedTransport};
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn list_courses_unwraps_the_envelope() {
        let api = api(ScriptedTransport::default().on(
            HttpMethod::Get,
            "/api/courses",
            200,
            r#"{"success":true,"courses":[{"id":1,"title":"Python for Data Analysis","description":"d",
                "difficulty_level":"Beginner","estimated_duration":"6-8 weeks","created_at":"2024-05-01T10:00:00"}]}"#,
        ));
        let courses = api.list_courses().unwrap();
        assert_eq!(courses.courses[0].title, "Python for Data Analysis");
    }

    #[test]
    fn each_call_issues_exactly_one_request() {
        let transport = ScriptedTransport::default().on(
            HttpMethod::Post,
            "/api/ai/lessons/5/progress",
            200,
            r#"{"success":true,"message":"Progress updated successfully"}"#,
        );
        let api = api(transport);
        let mut input = UpdateProgressRequest::new("user_1");
        input.is_completed = Some(true);
        let result = api.update_progress(5, &input).unwrap();
        assert_eq!(result.message, "Progress updated successfully");
        assert_eq!(api.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn errors_propagate_without_retry() {
        let transport = ScriptedTransport::default().fail(
            HttpMethod::Post,
            "/api/ai/lessons/5/generate",
            || ApiError::Timeout,
        );
        let api = api(transport);
        let err = api
            .generate_lesson_content(5, &GenerateLessonRequest::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(api.transport.seen.borrow().len(), 1);
    }

    #[test]
    fn missing_route_surfaces_as_not_found() {
        let api = api(ScriptedTransport::default());
        assert!(matches!(api.get_lesson(99), Err(ApiError::NotFound)));
    }

    #[test]
    fn api_availability_follows_health() {
        let up = api(ScriptedTransport::default().on(
            HttpMethod::Get,
            "/health",
            200,
            r#"{"status":"healthy","service":"LearnAnySkills API","version":"1.0.0"}"#,
        ));
        assert!(up.is_api_available());

        let down = api(ScriptedTransport::default().fail(HttpMethod::Get, "/health", || {
            ApiError::Network("refused".to_string())
        }));
        assert!(!down.is_api_available());
    }
}
