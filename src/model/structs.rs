use serde::{Deserialize, Deserializer, Serialize};

// The server encodes empty lists as `null` and omits some of them entirely.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A student's claim to a course, waiting for an admin to verify it.
///
/// Only `verified` ever changes, and only through the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CourseUpdateRequest {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub course: String,
    #[serde(default)]
    pub verified: bool,
}

impl CourseUpdateRequest {
    /// Approve/Deny are offered only while this holds.
    pub fn is_pending(&self) -> bool {
        !self.verified
    }
}

/// Roster entry. `courses` is filled in lazily, one call per student, after
/// the roster itself arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRegistration {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudentDetails {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "isVerified")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// Body of `GET /students/{username}/courses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentCourses {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub courses: Vec<String>,
}

/// Body of every successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

/// Body of every non-200 response the server produces itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
