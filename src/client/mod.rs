//! Client module - HTTP transports for native and browser builds
//!
//! Both transports implement [`RequestApi`](crate::interface::RequestApi)
//! over the same routes and the same status handling: reqwest for native
//! builds, gloo_net (the browser's fetch API) for WASM.

use crate::error::{Error, ErrorKind, Result};
use crate::model::structs::ApiErrorBody;
use urlencoding::encode;

#[cfg(feature = "no-wasm")]
pub mod request;

#[cfg(feature = "wasm")]
pub mod gloo;

/// Endpoint URLs under one API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base: String,
}

impl Routes {
    pub fn new(base_url: &str) -> Routes {
        Routes {
            base: crate::config::normalize_base_url(base_url),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn at(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn login(&self) -> String {
        self.at("/login")
    }

    pub fn register(&self) -> String {
        self.at("/register")
    }

    pub fn verify(&self) -> String {
        self.at("/verify")
    }

    pub fn requests(&self) -> String {
        self.at("/requests")
    }

    pub fn students(&self) -> String {
        self.at("/students")
    }

    pub fn student(&self, username: &str) -> String {
        self.at(&format!("/students/{}", encode(username)))
    }

    pub fn student_courses(&self, username: &str) -> String {
        self.at(&format!("/students/{}/courses", encode(username)))
    }

    pub fn student_course(&self, username: &str, course: &str) -> String {
        self.at(&format!(
            "/students/{}/courses/{}",
            encode(username),
            encode(course)
        ))
    }

    pub fn courses(&self) -> String {
        self.at("/courses")
    }

    pub fn course(&self, name: &str) -> String {
        self.at(&format!("/courses/{}", encode(name)))
    }

    pub fn add_course(&self) -> String {
        self.at("/add-course")
    }

    pub fn update_course_verification(&self) -> String {
        self.at("/update-course-verification")
    }
}

/// `Authorization` header value; an empty token never leaves the client.
pub fn bearer_header(token: &str) -> Result<String> {
    if token.trim().is_empty() {
        return Err(ErrorKind::Unauthenticated("No token stored".to_string()).into());
    }
    Ok(format!("Bearer {token}"))
}

/// Maps a non-200 response to an error, using the server's `{"error": ...}`
/// message when the body has one.
pub fn status_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 => ErrorKind::Unauthenticated(message).into(),
        403 => ErrorKind::Forbidden(message).into(),
        _ => ErrorKind::ApiError { status, message }.into(),
    }
}
