#![allow(async_fn_in_trait)] // the controllers run on one task; no Send bound needed

use crate::config::Config;
use crate::error::Result;
use crate::model::dtos::{
    CourseClaim, LoginParams, NewCourse, OtpParams, RegisterParams, VerificationUpdate,
};
use crate::model::structs::{Ack, Course, CourseUpdateRequest, StudentDetails, UserRegistration};

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance
    async fn new(config: &Config) -> Result<Self>
    where
        Self: Sized;
}

/// Every call the dashboards make against the course API.
///
/// `token` is the bearer credential; implementations send it as
/// `Authorization: Bearer <token>` and reject an empty one without sending
/// anything. Only HTTP 200 counts as success.
pub trait RequestApi {
    /// Exchange credentials for a bearer token
    async fn login(&self, params: LoginParams<'_>) -> Result<String>;

    async fn register(&self, params: RegisterParams<'_>) -> Result<Ack>;

    /// Confirm a registration with the emailed one-time code
    async fn verify_otp(&self, params: OtpParams<'_>) -> Result<Ack>;

    /// Pending course-enrollment claims (admin)
    async fn get_course_requests(&self, token: &str) -> Result<Vec<CourseUpdateRequest>>;

    /// Full student roster (admin)
    async fn get_students(&self, token: &str) -> Result<Vec<UserRegistration>>;

    async fn get_student_details(&self, token: &str, username: &str) -> Result<StudentDetails>;

    /// Names of the courses a student is enrolled in
    async fn get_student_courses(&self, token: &str, username: &str) -> Result<Vec<String>>;

    /// Course catalog
    async fn get_courses(&self, token: &str) -> Result<Vec<Course>>;

    async fn create_course(&self, token: &str, params: NewCourse<'_>) -> Result<Ack>;

    async fn delete_course(&self, token: &str, name: &str) -> Result<Ack>;

    /// Submit an enrollment claim for admin verification
    async fn request_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack>;

    /// Remove a course from a student's enrollment
    async fn drop_student_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack>;

    /// Approve (`verified: true`) or deny a pending claim
    async fn update_course_verification(
        &self,
        token: &str,
        params: VerificationUpdate<'_>,
    ) -> Result<Ack>;
}
