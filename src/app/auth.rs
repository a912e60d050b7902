use crate::error::{ErrorKind, Result};
use crate::interface::RequestApi;
use crate::model::dtos::{LoginParams, OtpParams, RegisterParams};
use crate::model::structs::Ack;
use crate::session::{Role, SessionContext};
use crate::store::TokenStore;

/// Logs in, stores the token and returns the resolved session.
pub async fn login<A: RequestApi, S: TokenStore>(
    api: &A,
    store: &S,
    username: &str,
    password: &str,
) -> Result<SessionContext> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ErrorKind::ParseError("Username and password are required".to_string()).into());
    }

    let token = api
        .login(LoginParams {
            username: username.trim(),
            password,
        })
        .await?;
    store.save(&token)?;

    let ctx = SessionContext::from_token(Some(token));
    log::info!("Signed in as {} ({})", ctx.username(), ctx.role());
    Ok(ctx)
}

/// Forgets the stored token. Any later session resolves to the empty role.
pub fn logout<S: TokenStore>(store: &S) -> Result<SessionContext> {
    store.clear()?;
    log::info!("Signed out");
    Ok(SessionContext::signed_out())
}

pub async fn register<A: RequestApi>(
    api: &A,
    username: &str,
    password: &str,
    role: Role,
    security_code: &str,
) -> Result<Ack> {
    if role == Role::None {
        return Err(ErrorKind::ParseError("Role must be admin or student".to_string()).into());
    }

    api.register(RegisterParams {
        username,
        password,
        role: role.as_str(),
        security_code,
    })
    .await
}

pub async fn verify_otp<A: RequestApi>(api: &A, username: &str, otp: &str) -> Result<Ack> {
    api.verify_otp(OtpParams {
        username,
        otp: otp.trim(),
    })
    .await
}
