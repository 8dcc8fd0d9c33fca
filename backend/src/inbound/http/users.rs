//! Account endpoints: signup, login, current user.

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{LoginRequest, SignupRequest};
use crate::domain::user::UserValidationError;
use crate::domain::{AccessToken, Email, Error, Password, User, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupBody {
    /// Login email; globally unique.
    pub email: String,
    /// Public handle; globally unique.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Wire representation of a user; never includes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// Stable identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Public handle.
    pub username: String,
    /// Account creation instant.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
            created_at: user.created_at(),
        }
    }
}

/// Response for signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Freshly issued bearer token.
    pub access_token: AccessToken,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// The authenticated user.
    pub user: UserProfile,
}

impl AuthResponse {
    fn new(user: User, token: AccessToken) -> Self {
        Self {
            access_token: token,
            token_type: "bearer",
            user: UserProfile::from(user),
        }
    }
}

fn map_validation_error(field: &str, error: &UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Create an account and issue a token.
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    body: web::Json<SignupBody>,
) -> ApiResult<web::Json<AuthResponse>> {
    let body = body.into_inner();
    let request = SignupRequest {
        email: Email::new(body.email).map_err(|e| map_validation_error("email", &e))?,
        username: Username::new(body.username)
            .map_err(|e| map_validation_error("username", &e))?,
        password: Password::new(body.password)
            .map_err(|e| map_validation_error("password", &e))?,
    };
    let session = state.accounts.signup(request).await?;
    Ok(web::Json(AuthResponse::new(session.user, session.token)))
}

/// Authenticate and issue a fresh token.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    body: web::Json<LoginBody>,
) -> ApiResult<web::Json<AuthResponse>> {
    let body = body.into_inner();
    // An unusable password can never match a stored hash; collapse it into
    // the same failure as any other bad credential.
    let password =
        Password::new(body.password).map_err(|_| Error::unauthorized("Invalid credentials"))?;
    let session = state
        .accounts
        .login(LoginRequest {
            email: body.email,
            password,
        })
        .await?;
    Ok(web::Json(AuthResponse::new(session.user, session.token)))
}

/// Return the authenticated user's record.
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<UserProfile>> {
    let user = state.accounts.current_user(auth.user_id()).await?;
    Ok(web::Json(UserProfile::from(user)))
}
