//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed values (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::fmt::Debug;

use learnaskill_core::types::{
    CourseResponse, CoursesResponse, HealthResponse, LessonContentResponse,
    LessonOverviewResponse, LessonResponse, LessonsResponse, ProgressResponse,
    ProgressUpdateResponse,
};
use learnaskill_core::{
    ApiError, GenerateLessonRequest, HttpMethod, HttpRequest, HttpResponse, LearnClient,
    UpdateProgressRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

fn client() -> LearnClient {
    LearnClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn input<T: DeserializeOwned>(case: &Value) -> T {
    serde_json::from_value(case["input"].clone()).unwrap()
}

fn build(c: &LearnClient, case: &Value) -> HttpRequest {
    let id = || case["input_id"].as_i64().unwrap();
    match case["operation"].as_str().unwrap() {
        "list_courses" => c.build_list_courses(),
        "get_course" => c.build_get_course(id()),
        "get_course_lessons" => c.build_get_course_lessons(id()),
        "get_lesson" => c.build_get_lesson(id()),
        "generate_lesson_overview" => {
            let input: GenerateLessonRequest = input(case);
            c.build_generate_lesson_overview(id(), &input).unwrap()
        }
        "generate_lesson_content" => {
            let input: GenerateLessonRequest = input(case);
            c.build_generate_lesson_content(id(), &input).unwrap()
        }
        "get_cached_lesson_content" => c.build_get_cached_lesson_content(id()),
        "update_progress" => {
            let input: UpdateProgressRequest = input(case);
            c.build_update_progress(id(), &input).unwrap()
        }
        "get_user_progress" => c.build_get_user_progress(case["input_user"].as_str().unwrap()),
        "check_health" => c.build_check_health(),
        other => panic!("unknown operation: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    let expected_path = format!("{BASE_URL}{}", expected["path"].as_str().unwrap());
    assert_eq!(req.path, expected_path, "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_error(name: &str, err: &ApiError, expected: &str) {
    let matched = match expected {
        "NotFound" => matches!(err, ApiError::NotFound),
        "ServerError" => matches!(err, ApiError::ServerError { .. }),
        "Http" => matches!(err, ApiError::Http { .. }),
        "Deserialization" => matches!(err, ApiError::Deserialization(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

fn assert_outcome<T>(name: &str, result: Result<T, ApiError>, case: &Value)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        assert_error(name, &err, expected_error.as_str().unwrap());
    } else {
        let parsed = result.unwrap();
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(parsed, expected, "{name}: parsed result");
    }
}

fn parse(c: &LearnClient, case: &Value) {
    let name = case["name"].as_str().unwrap();
    let response = simulated_response(case);
    match case["operation"].as_str().unwrap() {
        "list_courses" => {
            assert_outcome::<CoursesResponse>(name, c.parse_list_courses(response), case)
        }
        "get_course" => assert_outcome::<CourseResponse>(name, c.parse_get_course(response), case),
        "get_course_lessons" => {
            assert_outcome::<LessonsResponse>(name, c.parse_get_course_lessons(response), case)
        }
        "get_lesson" => assert_outcome::<LessonResponse>(name, c.parse_get_lesson(response), case),
        "generate_lesson_overview" => assert_outcome::<LessonOverviewResponse>(
            name,
            c.parse_generate_lesson_overview(response),
            case,
        ),
        "generate_lesson_content" => assert_outcome::<LessonContentResponse>(
            name,
            c.parse_generate_lesson_content(response),
            case,
        ),
        "get_cached_lesson_content" => assert_outcome::<LessonContentResponse>(
            name,
            c.parse_get_cached_lesson_content(response),
            case,
        ),
        "update_progress" => {
            assert_outcome::<ProgressUpdateResponse>(name, c.parse_update_progress(response), case)
        }
        "get_user_progress" => {
            assert_outcome::<ProgressResponse>(name, c.parse_get_user_progress(response), case)
        }
        "check_health" => {
            assert_outcome::<HealthResponse>(name, c.parse_check_health(response), case)
        }
        other => panic!("unknown operation: {other}"),
    }
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = build(&c, case);
        assert_request(name, &req, &case["expected_request"]);
        parse(&c, case);
    }
}

#[test]
fn course_test_vectors() {
    run_vectors(include_str!("../../test-vectors/courses.json"));
}

#[test]
fn ai_test_vectors() {
    run_vectors(include_str!("../../test-vectors/ai.json"));
}

#[test]
fn progress_test_vectors() {
    run_vectors(include_str!("../../test-vectors/progress.json"));
}

// ---------------------------------------------------------------------------
// Status normalization
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let err = c.parse_get_lesson(response).unwrap_err();
        assert_error(name, &err, case["expected_error"].as_str().unwrap());
    }
}
