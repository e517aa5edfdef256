//! Page view models.
//!
//! # Design
//! Each page loads its data through `LearnApi` in the same order the web
//! pages did and keeps only a transient copy of what it needs. A failed load
//! becomes a `PageError` carrying the page's message and a link back to a
//! safe page. Rendering is plain text via `Display`; the card and section
//! view models are public so callers can lay them out differently.

use std::fmt;

use crate::api::LearnApi;
use crate::error::ApiError;
use crate::format::{
    calculate_progress, difficulty_color, format_duration, format_progress, format_time_ago,
    truncate_text, DEFAULT_TRUNCATE_LENGTH,
};
use crate::identity::{UserIdentity, ANONYMOUS_USER};
use crate::storage::KeyValueStore;
use crate::transport::Transport;
use crate::types::{Course, CourseProgress, GenerateLessonRequest, Lesson, LessonContent};

pub const BRAND: &str = "LearnAnySkills";

pub const BEGIN_LESSON: &str = "Begin Lesson";

const COURSES_LINK: &str = "/courses";
const HOME_LINK: &str = "/";

/// A page that could not be shown, with where to go instead.
#[derive(Debug)]
pub struct PageError {
    message: String,
    back_link: &'static str,
    source: Option<ApiError>,
}

impl PageError {
    fn new(message: &str, back_link: &'static str, source: Option<ApiError>) -> Self {
        Self {
            message: message.to_string(),
            back_link,
            source,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn back_link(&self) -> &'static str {
        self.back_link
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        self.source.as_ref()
    }

    pub fn back_label(&self) -> &'static str {
        if self.back_link == HOME_LINK {
            "Back to Home"
        } else {
            "Back to Courses"
        }
    }

    /// Fallback screen shown in place of the page.
    pub fn render(&self) -> String {
        format!("{}\n\n{} -> {}\n", self.message, self.back_label(), self.back_link)
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Route parameters must be non-zero integers.
fn parse_route_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id != 0)
}

fn resolve_user_id<S: KeyValueStore>(identity: &UserIdentity<S>) -> String {
    identity.user_id().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "user id unavailable, continuing anonymously");
        ANONYMOUS_USER.to_string()
    })
}

// ---------------------------------------------------------------------------
// Course cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCard {
    pub id: i64,
    pub title: String,
    pub difficulty: String,
    pub difficulty_color: &'static str,
    pub lesson_count: Option<u32>,
    pub duration: String,
    pub summary: String,
}

impl CourseCard {
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            difficulty: course.difficulty_level.clone(),
            difficulty_color: difficulty_color(&course.difficulty_level),
            lesson_count: course
                .lesson_count
                .or_else(|| course.lessons.as_ref().map(|l| l.len() as u32)),
            duration: format_duration(&course.estimated_duration),
            summary: truncate_text(&course.description, DEFAULT_TRUNCATE_LENGTH),
        }
    }
}

impl fmt::Display for CourseCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.title)?;
        write!(f, "    {}", self.difficulty)?;
        if let Some(count) = self.lesson_count {
            write!(f, " | {count} lessons")?;
        }
        writeln!(f, " | {}", self.duration)?;
        writeln!(f, "    {}", self.summary)
    }
}

fn load_cards<T: Transport>(
    api: &LearnApi<T>,
    back_link: &'static str,
) -> Result<Vec<CourseCard>, PageError> {
    match api.list_courses() {
        Ok(response) => Ok(response.courses.iter().map(CourseCard::from_course).collect()),
        Err(err) => {
            tracing::error!(error = %err, "Error fetching courses");
            Err(PageError::new(
                "Failed to load courses. Please try again later.",
                back_link,
                Some(err),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Home & course list
// ---------------------------------------------------------------------------

/// Landing page with the course catalogue as featured cards.
#[derive(Debug, Clone)]
pub struct HomePage {
    cards: Vec<CourseCard>,
}

impl HomePage {
    pub fn load<T: Transport>(api: &LearnApi<T>) -> Result<Self, PageError> {
        Ok(Self {
            cards: load_cards(api, COURSES_LINK)?,
        })
    }

    pub fn cards(&self) -> &[CourseCard] {
        &self.cards
    }
}

impl fmt::Display for HomePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{BRAND}")?;
        writeln!(f)?;
        writeln!(f, "Master Skills with AI-Powered Learning")?;
        writeln!(f)?;
        writeln!(f, "Featured Courses")?;
        writeln!(f)?;
        for card in &self.cards {
            writeln!(f, "{card}")?;
        }
        writeln!(f, "View All Courses -> {COURSES_LINK}")
    }
}

#[derive(Debug, Clone)]
pub struct CourseListPage {
    cards: Vec<CourseCard>,
}

impl CourseListPage {
    pub fn load<T: Transport>(api: &LearnApi<T>) -> Result<Self, PageError> {
        Ok(Self {
            cards: load_cards(api, HOME_LINK)?,
        })
    }

    pub fn cards(&self) -> &[CourseCard] {
        &self.cards
    }
}

impl fmt::Display for CourseListPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Back to Home -> {HOME_LINK}")?;
        writeln!(f)?;
        writeln!(f, "All Courses")?;
        writeln!(f)?;
        if self.cards.is_empty() {
            return writeln!(f, "No courses available yet.");
        }
        for card in &self.cards {
            writeln!(f, "{card}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Course detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CourseDetailPage {
    course: Course,
}

impl CourseDetailPage {
    pub fn load<T: Transport>(api: &LearnApi<T>, raw_id: &str) -> Result<Self, PageError> {
        let Some(course_id) = parse_route_id(raw_id) else {
            return Err(PageError::new("Invalid course ID", COURSES_LINK, None));
        };
        match api.get_course(course_id) {
            Ok(response) => Ok(Self {
                course: response.course,
            }),
            Err(err) => {
                tracing::error!(course_id, error = %err, "Error fetching course");
                Err(PageError::new(
                    "Failed to load course. Please try again later.",
                    COURSES_LINK,
                    Some(err),
                ))
            }
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Lessons in the order the backend returned them.
    pub fn lessons(&self) -> &[Lesson] {
        self.course.lessons.as_deref().unwrap_or_default()
    }

    /// Share of lessons that already have generated content.
    pub fn prepared_percentage(&self) -> u32 {
        let lessons = self.lessons();
        let ready = lessons.iter().filter(|l| l.content_available()).count();
        calculate_progress(ready as u32, lessons.len() as u32)
    }
}

impl fmt::Display for CourseDetailPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let course = &self.course;
        writeln!(f, "Back to Courses -> {COURSES_LINK}")?;
        writeln!(f)?;
        writeln!(f, "{}", course.title)?;
        writeln!(
            f,
            "{} | {}",
            course.difficulty_level,
            format_duration(&course.estimated_duration)
        )?;
        writeln!(f)?;
        writeln!(f, "{}", course.description)?;
        if let Some(overview) = course.overview.as_deref().filter(|o| !o.is_empty()) {
            writeln!(f)?;
            writeln!(f, "Course Overview")?;
            writeln!(f, "{overview}")?;
        }
        writeln!(f)?;
        let prepared = format_progress(f64::from(self.prepared_percentage()));
        writeln!(f, "Lessons ({prepared} content ready)")?;
        for lesson in self.lessons() {
            let marker = if lesson.content_available() { "*" } else { " " };
            writeln!(
                f,
                "{marker} {:>2}. {} ({})",
                lesson.lesson_number,
                lesson.title,
                format_duration(&lesson.estimated_duration)
            )?;
            writeln!(f, "       {}", truncate_text(&lesson.description, DEFAULT_TRUNCATE_LENGTH))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lesson detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LessonPage {
    lesson_id: i64,
    lesson: Lesson,
    overview: Option<String>,
    content: Option<LessonContent>,
}

impl LessonPage {
    /// Fetch the lesson, then any cached content, then an overview. Only the
    /// first step is fatal.
    pub fn load<T: Transport, S: KeyValueStore>(
        api: &LearnApi<T>,
        identity: &UserIdentity<S>,
        raw_id: &str,
    ) -> Result<Self, PageError> {
        let Some(lesson_id) = parse_route_id(raw_id) else {
            return Err(PageError::new("Invalid lesson ID", COURSES_LINK, None));
        };

        let lesson = match api.get_lesson(lesson_id) {
            Ok(response) => response.lesson,
            Err(err) => {
                tracing::error!(lesson_id, error = %err, "Error fetching lesson");
                return Err(PageError::new(
                    "Failed to load lesson. Please try again later.",
                    COURSES_LINK,
                    Some(err),
                ));
            }
        };

        // An empty cache may come back as an error from some backends.
        let content = match api.get_cached_lesson_content(lesson_id) {
            Ok(response) => response.into_cached_content(),
            Err(err) => {
                tracing::debug!(lesson_id, error = %err, "No cached content available");
                None
            }
        };

        let request = GenerateLessonRequest::for_user(resolve_user_id(identity));
        let overview = match api.generate_lesson_overview(lesson_id, &request) {
            Ok(response) => Some(response.overview),
            Err(err) => {
                tracing::warn!(lesson_id, error = %err, "Lesson overview unavailable");
                None
            }
        };

        Ok(Self {
            lesson_id,
            lesson,
            overview,
            content,
        })
    }

    /// Generate the full lesson content.
    pub fn begin<T: Transport, S: KeyValueStore>(
        &mut self,
        api: &LearnApi<T>,
        identity: &UserIdentity<S>,
    ) -> Result<(), PageError> {
        let request = GenerateLessonRequest::for_user(resolve_user_id(identity));
        match api.generate_lesson_content(self.lesson_id, &request) {
            Ok(response) => {
                self.content = response.content;
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    lesson_id = self.lesson_id,
                    error = %err,
                    "Error generating content"
                );
                Err(PageError::new(
                    "Failed to generate lesson content. Please try again.",
                    COURSES_LINK,
                    Some(err),
                ))
            }
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn overview(&self) -> Option<&str> {
        self.overview.as_deref()
    }

    pub fn content(&self) -> Option<&LessonContent> {
        self.content.as_ref()
    }

    /// The action offered while no content exists.
    pub fn call_to_action(&self) -> Option<&'static str> {
        self.content.is_none().then_some(BEGIN_LESSON)
    }

    fn back_link(&self) -> (String, &str) {
        match &self.lesson.course {
            Some(course) => (format!("{COURSES_LINK}/{}", course.id), course.title.as_str()),
            None => (COURSES_LINK.to_string(), "Course"),
        }
    }
}

impl fmt::Display for LessonPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lesson = &self.lesson;
        let (link, label) = self.back_link();
        writeln!(f, "Back to {label} -> {link}")?;
        writeln!(f)?;
        writeln!(f, "Lesson {}: {}", lesson.lesson_number, lesson.title)?;
        write!(f, "{}", format_duration(&lesson.estimated_duration))?;
        if let Some(course) = &lesson.course {
            write!(f, " | From {}", course.title)?;
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "{}", lesson.description)?;

        if !lesson.learning_objectives.is_empty() {
            writeln!(f)?;
            writeln!(f, "What You'll Learn")?;
            for objective in &lesson.learning_objectives {
                writeln!(f, "  - {objective}")?;
            }
        }

        if let Some(overview) = &self.overview {
            writeln!(f)?;
            writeln!(f, "Lesson Overview")?;
            writeln!(f, "{overview}")?;
        }

        writeln!(f)?;
        match &self.content {
            None => {
                writeln!(f, "Ready to start learning?")?;
                writeln!(f, "[ {BEGIN_LESSON} ]")
            }
            Some(content) => write_content(f, content),
        }
    }
}

fn write_content(f: &mut fmt::Formatter<'_>, content: &LessonContent) -> fmt::Result {
    writeln!(f, "Introduction")?;
    writeln!(f, "{}", content.introduction)?;
    for section in &content.main_content {
        writeln!(f)?;
        writeln!(f, "## {}", section.section_title)?;
        writeln!(f, "{}", section.content)?;
    }
    if !content.code_examples.is_empty() {
        writeln!(f)?;
        writeln!(f, "Code Examples")?;
        for example in &content.code_examples {
            writeln!(f)?;
            writeln!(f, "### {}", example.title)?;
            writeln!(f, "```")?;
            writeln!(f, "{}", example.code)?;
            writeln!(f, "```")?;
            writeln!(f, "{}", example.explanation)?;
        }
    }
    if !content.key_takeaways.is_empty() {
        writeln!(f)?;
        writeln!(f, "Key Takeaways")?;
        for takeaway in &content.key_takeaways {
            writeln!(f, "  - {takeaway}")?;
        }
    }
    if !content.practice_exercises.is_empty() {
        writeln!(f)?;
        writeln!(f, "Practice Exercises")?;
        for exercise in &content.practice_exercises {
            writeln!(f, "  * {} [{}]", exercise.title, exercise.difficulty.as_str())?;
            writeln!(f, "    {}", exercise.description)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProgressPage {
    user_id: String,
    courses: Vec<CourseProgress>,
}

impl ProgressPage {
    pub fn load<T: Transport>(api: &LearnApi<T>, user_id: &str) -> Result<Self, PageError> {
        match api.get_user_progress(user_id) {
            Ok(response) => Ok(Self {
                user_id: response.user_id,
                courses: response.progress,
            }),
            Err(err) => {
                tracing::error!(user_id, error = %err, "Error fetching progress");
                Err(PageError::new(
                    "Failed to load progress. Please try again later.",
                    COURSES_LINK,
                    Some(err),
                ))
            }
        }
    }

    pub fn courses(&self) -> &[CourseProgress] {
        &self.courses
    }
}

impl fmt::Display for ProgressPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Progress for {}", self.user_id)?;
        if self.courses.is_empty() {
            writeln!(f)?;
            return writeln!(f, "No lessons started yet.");
        }
        for course in &self.courses {
            let completed = course.lessons.iter().filter(|l| l.is_completed).count() as u32;
            writeln!(f)?;
            writeln!(
                f,
                "{} - {} complete, {}/{} lessons done, {} min",
                course.course_title,
                format_progress(course.total_completion),
                completed,
                course.lessons.len(),
                course.total_time_spent
            )?;
            for lesson in &course.lessons {
                let mark = if lesson.is_completed { "x" } else { " " };
                writeln!(
                    f,
                    "  [{mark}] {} ({}, {} min) last seen {}",
                    lesson.lesson_title,
                    format_progress(f64::from(lesson.completion_percentage)),
                    lesson.time_spent_minutes,
                    format_time_ago(&lesson.last_accessed)
                )?;
            }
        }
        Ok(())
    }
}
