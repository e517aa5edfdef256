//! Synchronous client core for the LearnAnySkills learning platform.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` executes the
//! round-trip; `LearnApi` ties the two together per endpoint and the page
//! view models in `pages` drive it the way the web frontend did.
//!
//! # Design
//! - `LearnClient` is stateless; it holds only `base_url`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - The only persistent client state is the anonymous user id, kept in a
//!   `KeyValueStore` behind `UserIdentity`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod identity;
pub mod pacing;
pub mod pages;
pub mod storage;
pub mod transport;
pub mod types;

pub use api::LearnApi;
pub use client::LearnClient;
pub use config::ClientConfig;
pub use error::{ApiError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use identity::UserIdentity;
pub use pages::PageError;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Course, CourseProgress, GenerateLessonRequest, Lesson, LessonContent, UpdateProgressRequest,
    UserProgress,
};
