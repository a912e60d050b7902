//! Native HTTP transport using reqwest.

use crate::config::Config;
use crate::error::{ErrorKind, Result};
use crate::interface::{HttpClient, RequestApi};
use crate::model::dtos::{
    CourseClaim, LoginParams, NewCourse, OtpParams, RegisterParams, VerificationUpdate,
};
use crate::model::structs::{
    Ack, Course, CourseUpdateRequest, StudentCourses, StudentDetails, TokenResponse,
    UserRegistration,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder, StatusCode,
};
use serde::de::DeserializeOwned;

use super::{bearer_header, status_error, Routes};

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    routes: Routes,
}

impl HttpClient for ReqwestClient {
    async fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            routes: Routes::new(&config.base_url),
        })
    }
}

impl ReqwestClient {
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            routes: Routes::new(base_url),
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    fn auth_headers(token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer_header(token)?)
                .map_err(|e| ErrorKind::ParseError(e.to_string()))?,
        );
        Ok(headers)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
        let resp = request.send().await.map_err(|e| {
            log::error!("Error {what}: {e}");
            e
        })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            let err = status_error(status.as_u16(), &body);
            log::error!("Error {what}: {err}");
            return Err(err);
        }

        Ok(resp.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, url: String, token: &str, what: &str) -> Result<T> {
        log::debug!("GET {url}");
        let headers = Self::auth_headers(token)?;
        Self::send(self.client.get(url).headers(headers), what).await
    }
}

impl RequestApi for ReqwestClient {
    async fn login(&self, params: LoginParams<'_>) -> Result<String> {
        let url = self.routes.login();
        log::debug!("POST {url}");

        let resp: TokenResponse =
            Self::send(self.client.post(url).json(&params), "logging in").await?;
        Ok(resp.token)
    }

    async fn register(&self, params: RegisterParams<'_>) -> Result<Ack> {
        let url = self.routes.register();
        log::debug!("POST {url}");
        Self::send(self.client.post(url).json(&params), "registering").await
    }

    async fn verify_otp(&self, params: OtpParams<'_>) -> Result<Ack> {
        let url = self.routes.verify();
        log::debug!("POST {url}");
        Self::send(self.client.post(url).json(&params), "verifying OTP").await
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
        let headers = Self::auth_headers(token)?;
        Self::send(
            self.client.post(url).headers(headers).json(&params),
            "adding course",
        )
        .await
    }

    async fn delete_course(&self, token: &str, name: &str) -> Result<Ack> {
        let url = self.routes.course(name);
        log::debug!("DELETE {url}");
        let headers = Self::auth_headers(token)?;
        Self::send(self.client.delete(url).headers(headers), "deleting course").await
    }

    async fn request_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack> {
        let url = self.routes.add_course();
        log::debug!("POST {url}");
        let headers = Self::auth_headers(token)?;
        Self::send(
            self.client.post(url).headers(headers).json(&params),
            "requesting course",
        )
        .await
    }

    async fn drop_student_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack> {
        let url = self.routes.student_course(params.username, params.course);
        log::debug!("DELETE {url}");
        let headers = Self::auth_headers(token)?;
        Self::send(
            self.client.delete(url).headers(headers).json(&params),
            "dropping student course",
        )
        .await
    }

    async fn update_course_verification(
        &self,
        token: &str,
        params: VerificationUpdate<'_>,
    ) -> Result<Ack> {
        let url = self.routes.update_course_verification();
        log::debug!("POST {url}");
        let headers = Self::auth_headers(token)?;
        Self::send(
            self.client.post(url).headers(headers).json(&params),
            "updating course verification",
        )
        .await
    }
}
