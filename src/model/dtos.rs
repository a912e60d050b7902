use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LoginParams<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Admin registrations are only accepted with the server's security code.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    #[serde(rename = "securityCode", skip_serializing_if = "str::is_empty")]
    pub security_code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpParams<'a> {
    pub username: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCourse<'a> {
    pub name: &'a str,
}

/// A student/course pair: enrollment requests and enrollment removal.
#[derive(Debug, Clone, Serialize)]
pub struct CourseClaim<'a> {
    pub username: &'a str,
    pub course: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationUpdate<'a> {
    pub username: &'a str,
    pub course: &'a str,
    pub verified: bool,
}
