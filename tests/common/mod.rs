#![allow(dead_code)]

use course_desk::error::{ErrorKind, Result};
use course_desk::interface::RequestApi;
use course_desk::model::dtos::{
    CourseClaim, LoginParams, NewCourse, OtpParams, RegisterParams, VerificationUpdate,
};
use course_desk::model::structs::{
    Ack, Course, CourseUpdateRequest, StudentDetails, UserRegistration,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const ADMIN: &str = "alice";
pub const STUDENT: &str = "bob";

/// Unsigned token carrying `username` and `role` claims.
pub fn token_for(username: &str, role: &str) -> String {
    let payload = format!(r#"{{"username":"{username}","role":"{role}","exp":4102444800}}"#);
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
        base64_simd::URL_SAFE_NO_PAD.encode_to_string(payload)
    )
}

#[derive(Default)]
pub struct FakeState {
    pub passwords: HashMap<String, (String, String)>,
    pub students: Vec<UserRegistration>,
    pub enrolled: HashMap<String, Vec<String>>,
    pub catalog: Vec<Course>,
    pub requests: Vec<CourseUpdateRequest>,
    /// Endpoint name of every call, in order.
    pub calls: Vec<String>,
    /// Bearer token of every authorized call.
    pub tokens: Vec<String>,
    /// Endpoints answering with a 500.
    pub failing: HashSet<String>,
    /// Endpoints that never answer.
    pub stalled: HashSet<String>,
    /// Per-student delay of the course lookup.
    pub course_delays: HashMap<String, Duration>,
}

/// In-memory course service speaking `RequestApi`.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    /// One admin, two students, a small catalog and one pending request.
    pub fn seeded() -> FakeApi {
        let api = FakeApi::default();
        {
            let mut s = api.state();
            s.passwords.insert(ADMIN.into(), ("secret".into(), "admin".into()));
            s.passwords.insert(STUDENT.into(), ("hunter2".into(), "student".into()));
            s.passwords.insert("carol".into(), ("pw".into(), "student".into()));
            s.students = vec![student(STUDENT), student("carol")];
            s.enrolled.insert("carol".into(), vec!["MATH200".into()]);
            s.catalog = vec![course("CS101"), course("MATH200")];
            s.requests = vec![CourseUpdateRequest {
                id: Some("r1".into()),
                username: STUDENT.into(),
                course: "CS101".into(),
                verified: false,
            }];
        }
        api
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, endpoint: &str) {
        self.state().failing.insert(endpoint.to_string());
    }

    pub fn recover(&self, endpoint: &str) {
        self.state().failing.remove(endpoint);
    }

    pub fn stall(&self, endpoint: &str) {
        self.state().stalled.insert(endpoint.to_string());
    }

    pub fn delay_courses(&self, username: &str, delay: Duration) {
        self.state()
            .course_delays
            .insert(username.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.state().calls.iter().filter(|c| *c == endpoint).count()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.state().tokens.clone()
    }

    // Records the call, then fails or stalls it as configured.
    async fn enter(&self, endpoint: &str, token: Option<&str>) -> Result<()> {
        let stalled = {
            let mut s = self.state();
            s.calls.push(endpoint.to_string());
            if let Some(token) = token {
                s.tokens.push(token.to_string());
            }
            if s.failing.contains(endpoint) {
                return Err(ErrorKind::ApiError {
                    status: 500,
                    message: format!("{endpoint} unavailable"),
                }
                .into());
            }
            s.stalled.contains(endpoint)
        };
        if stalled {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

pub fn student(username: &str) -> UserRegistration {
    UserRegistration {
        username: username.to_string(),
        email: format!("{username}@example.edu"),
        courses: None,
    }
}

pub fn course(name: &str) -> Course {
    Course {
        id: None,
        name: name.to_string(),
    }
}

fn is_claim(request: &CourseUpdateRequest, username: &str, course: &str) -> bool {
    request.username == username && request.course == course
}

fn ack(message: &str) -> Result<Ack> {
    Ok(Ack {
        message: message.to_string(),
    })
}

impl RequestApi for FakeApi {
    async fn login(&self, params: LoginParams<'_>) -> Result<String> {
        self.enter("login", None).await?;
        let role = match self.state().passwords.get(params.username) {
            Some((password, role)) if password == params.password => role.clone(),
            _ => {
                return Err(ErrorKind::Unauthenticated("Invalid credentials".into()).into());
            }
        };
        Ok(token_for(params.username, &role))
    }

    async fn register(&self, params: RegisterParams<'_>) -> Result<Ack> {
        self.enter("register", None).await?;
        let mut s = self.state();
        if s.passwords.contains_key(params.username) {
            return Err(ErrorKind::ApiError {
                status: 409,
                message: "User already exists".into(),
            }
            .into());
        }
        s.passwords.insert(
            params.username.to_string(),
            (params.password.to_string(), params.role.to_string()),
        );
        ack("User registered successfully. Please verify your email.")
    }

    async fn verify_otp(&self, params: OtpParams<'_>) -> Result<Ack> {
        self.enter("verify", None).await?;
        if params.otp != "123456" {
            return Err(ErrorKind::ApiError {
                status: 400,
                message: "Invalid OTP".into(),
            }
            .into());
        }
        ack("Email verified successfully")
    }

    async fn get_course_requests(&self, token: &str) -> Result<Vec<CourseUpdateRequest>> {
        self.enter("requests", Some(token)).await?;
        Ok(self.state().requests.clone())
    }

    async fn get_students(&self, token: &str) -> Result<Vec<UserRegistration>> {
        self.enter("students", Some(token)).await?;
        Ok(self.state().students.clone())
    }

    async fn get_student_details(&self, token: &str, username: &str) -> Result<StudentDetails> {
        self.enter("student", Some(token)).await?;
        let s = self.state();
        let Some(entry) = s.students.iter().find(|st| st.username == username) else {
            return Err(ErrorKind::ApiError {
                status: 404,
                message: "Student not found".into(),
            }
            .into());
        };
        Ok(StudentDetails {
            username: entry.username.clone(),
            email: entry.email.clone(),
            role: "student".into(),
            is_verified: true,
            courses: s.enrolled.get(username).cloned().unwrap_or_default(),
        })
    }

    async fn get_student_courses(&self, token: &str, username: &str) -> Result<Vec<String>> {
        self.enter("student_courses", Some(token)).await?;
        let delay = self.state().course_delays.get(username).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.state().enrolled.get(username).cloned().unwrap_or_default())
    }

    async fn get_courses(&self, token: &str) -> Result<Vec<Course>> {
        self.enter("courses", Some(token)).await?;
        Ok(self.state().catalog.clone())
    }

    async fn create_course(&self, token: &str, params: NewCourse<'_>) -> Result<Ack> {
        self.enter("create_course", Some(token)).await?;
        self.state().catalog.push(course(params.name));
        ack("Course created successfully")
    }

    async fn delete_course(&self, token: &str, name: &str) -> Result<Ack> {
        self.enter("delete_course", Some(token)).await?;
        self.state().catalog.retain(|c| c.name != name);
        ack("Course deleted successfully")
    }

    async fn request_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack> {
        self.enter("request_course", Some(token)).await?;
        self.state().requests.push(CourseUpdateRequest {
            id: None,
            username: params.username.to_string(),
            course: params.course.to_string(),
            verified: false,
        });
        ack("Course addition request submitted")
    }

    async fn drop_student_course(&self, token: &str, params: CourseClaim<'_>) -> Result<Ack> {
        self.enter("drop_course", Some(token)).await?;
        if let Some(courses) = self.state().enrolled.get_mut(params.username) {
            courses.retain(|c| c != params.course);
        }
        ack("Course removed successfully")
    }

    async fn update_course_verification(
        &self,
        token: &str,
        params: VerificationUpdate<'_>,
    ) -> Result<Ack> {
        self.enter("update_verification", Some(token)).await?;
        let mut s = self.state();
        let (username, course) = (params.username, params.course);
        if !s.requests.iter().any(|r| is_claim(r, username, course)) {
            return Err(ErrorKind::ApiError {
                status: 404,
                message: "Course request not found".into(),
            }
            .into());
        }

        if params.verified {
            for request in s.requests.iter_mut() {
                if !is_claim(request, username, course) {
                    continue;
                }
                request.verified = true;
            }
            let courses = s.enrolled.entry(params.username.to_string()).or_default();
            if !courses.iter().any(|c| c == params.course) {
                courses.push(params.course.to_string());
            }
        } else {
            s.requests.retain(|r| !is_claim(r, username, course));
        }
        ack("Course verification updated")
    }
}
