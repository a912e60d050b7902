//! WASM HTTP transport using gloo_net
//!
//! Requests go through the browser's fetch API; the token itself comes from
//! the caller's session context, never from ambient storage.

use crate::config::Config;
use crate::error::Result;
use crate::interface::{HttpClient, RequestApi};
use crate::model::dtos::{
    CourseClaim, LoginParams, NewCourse, OtpParams, RegisterParams, VerificationUpdate,
};
use crate::model::structs::{
    Ack, Course, CourseUpdateRequest, StudentCourses, StudentDetails, TokenResponse,
    UserRegistration,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{bearer_header, status_error, Routes};

#[derive(Debug, Clone)]
pub struct GlooClient {
    routes: Routes,
}

impl HttpClient for GlooClient {
    async fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            routes: Routes::new(&config.base_url),
        })
    }
}

impl GlooClient {
    fn authorized(builder: RequestBuilder, token: &str) -> Result<RequestBuilder> {
        Ok(builder
            .header("Accept", "application/json")
            .header("Authorization", &bearer_header(token)?))
    }

    /// Handle JSON response with error checking
    async fn handle_json_response<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
        log::debug!("{what}: status {}", resp.status());

        if resp.status() != 200 {
            let text = resp.text().await.unwrap_or_default();
            let err = status_error(resp.status(), &text);
            log::error!("Error {what}: {err}");
            return Err(err);
        }

        Ok(resp.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, url: String, token: &str, what: &str) -> Result<T> {
        log::debug!("GET {url}");
        let resp = Self::authorized(Request::get(&url), token)?
            .send()
            .await
            .map_err(|e| {
                log::error!("Error {what}: {e}");
                e
            })?;
        Self::handle_json_response(resp, what).await
    }

    async fn send_json<T: DeserializeOwned, B: serde::Serialize>(
        builder: RequestBuilder,
        body: &B,
        what: &str,
    ) -> Result<T> {
        let resp = builder.json(body)?.send().await.map_err(|e| {
            log::error!("Error {what}: {e}");
            e
        })?;
        Self::handle_json_response(resp, what).await
    }
}

impl RequestApi for GlooClient {
    async fn login(&self, params: LoginParams<'_>) -> Result<String> {
        let url = self.routes.login();
        log::debug!("POST {url}");
        let resp: TokenResponse = Self::send_json(Request::post(&url), &params, "logging in").await?;
        Ok(resp.token)
    }

    async fn register(&self, params: RegisterParams<'_>) -> Result<Ack> {
        let url = self.routes.register();
        log::debug!("POST {url}");
        Self::send_json(Request::post(&url), &params, "registering").await
    }

    async fn verify_otp(&self, params: OtpParams<'_>) -> Result<Ack> {
        let url = self.routes.verify();
        log::debug!("POST {url}");
        Self::send_json(Request::post(&url), &params, "verifying OTP").await
    }

    async fn get_course_requests(&self, token: &str) -> Result<Vec<CourseUpdateRequest>> {
        let requests: Option<Vec<CourseUpdateRequest>> = self
            .get(self.routes.requests(), token, "fetching course requests")
            .await?;
        Ok(requests.unwrap_or_default())
    }

    async fn get_students(&self, token: &str) -> Result<Vec<UserRegistration>> {
        let students: Option<Vec<UserRegistration>> = self
            .get(self.routes.students(), token, "fetching students")
            .await?;
        Ok(students.unwrap_or_default())
    }

    async fn get_student_details(&self, token: &str, username: &str) -> Result<StudentDetails> {
        self.get(
            self.routes.student(username),
            token,
            "fetching student details",
        )
        .await
    }

    async fn get_student_courses(&self, token: &str, username: &str) -> Result<Vec<String>> {
        let body: StudentCourses = self
            .get(
                self.routes.student_courses(username),
                token,
                "fetching student courses",
            )
            .await?;
        Ok(body.courses)
    }

    async fn get_courses(&self, token: &str) -> Result<Vec<Course>> {
        let courses: Option<Vec<Course>> = self
            .get(self.routes.courses(), token, "fetching courses")
            .await?;
        Ok(courses.unwrap_or_default())
    }

    async fn create_course(&self, token: &str, params: NewCourse<'_>) -> Result<Ack> {
        let url = self.routes.courses();
        log::debug!("POST {url}");
        let builder = Self::authorized(Request::post(&url), token)?;
        Self::send_json(builder, &params, "adding course").await
    }

    async fn delete_course(&self, token: &str, name: &str) -> Result<Ack> {
        let url = self.routes.course(name);
        log::debug!("DELETE {url}");
        let resp = Self::authorized(Request::delete(&url), token)?
            .send()
            .await?;
        Self::handle_json_response(resp, "deleting course").await
    }

    async fn request_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack> {
        let url = self.routes.add_course();
        log::debug!("POST {url}");
        let builder = Self::authorized(Request::post(&url), token)?;
        Self::send_json(builder, &params, "requesting course").await
    }

    async fn drop_student_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack> {
        let url = self.routes.student_course(params.username, params.course);
        log::debug!("DELETE {url}");
        let builder = Self::authorized(Request::delete(&url), token)?;
        Self::send_json(builder, &params, "dropping student course").await
    }

    async fn update_course_verification(
        &self,
        token: &str,
        params: VerificationUpdate<'_>,
    ) -> Result<Ack> {
        let url = self.routes.update_course_verification();
        log::debug!("POST {url}");
        let builder = Self::authorized(Request::post(&url), token)?;
        Self::send_json(builder, &params, "updating course verification").await
    }
}
