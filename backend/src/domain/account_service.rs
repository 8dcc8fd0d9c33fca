//! Account management service: signup, login, and token-subject resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::credentials::{CredentialError, PasswordHasher};
use crate::domain::error::Error;
use crate::domain::ports::{
    AccountDirectory, AuthSession, LoginRequest, SignupRequest, UserRepository,
    UserRepositoryError,
};
use crate::domain::token::{TokenError, TokenService};
use crate::domain::user::{User, UserId};

const CONFLICT_MESSAGE: &str = "Email or username already exists";
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// [`AccountDirectory`] implementation over a user repository.
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl<R> AccountService<R> {
    /// Create a service with the given repository, hasher, and token issuer.
    pub fn new(users: Arc<R>, hasher: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
            // A racing signup slipped past the pre-check; the unique index
            // is the authoritative guard, so report the same conflict.
            UserRepositoryError::Duplicate => Error::conflict(CONFLICT_MESSAGE),
        }
    }

    fn map_credential_error(error: CredentialError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_token_error(error: TokenError) -> Error {
        Error::internal(error.to_string())
    }

    fn open_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(user.id()).map_err(Self::map_token_error)?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl<R> AccountDirectory for AccountService<R>
where
    R: UserRepository,
{
    async fn signup(&self, request: SignupRequest) -> Result<AuthSession, Error> {
        let taken = self
            .users
            .exists_with_email_or_username(request.email.as_str(), request.username.as_str())
            .await
            .map_err(Self::map_repository_error)?;
        if taken {
            return Err(Error::conflict(CONFLICT_MESSAGE));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(Self::map_credential_error)?;
        let user = User::new(request.email, request.username, password_hash);

        self.users
            .insert(&user)
            .await
            .map_err(Self::map_repository_error)?;

        info!(user_id = %user.id(), username = %user.username(), "user signed up");
        self.open_session(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthSession, Error> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(Self::map_repository_error)?;

        // Unknown email and wrong password collapse into one failure so the
        // endpoint cannot be used to enumerate accounts.
        let Some(user) = user else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };
        if !self.hasher.verify(&request.password, user.password_hash()) {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        info!(user_id = %user.id(), "user logged in");
        self.open_session(user)
    }

    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::unauthorized("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::user::{Email, Password, Username};

    const TEST_COST: u32 = 4;

    fn service(users: MockUserRepository) -> AccountService<MockUserRepository> {
        AccountService::new(
            Arc::new(users),
            PasswordHasher::new(TEST_COST),
            Arc::new(TokenService::new(b"test-secret")),
        )
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            email: Email::new("ada@example.com").expect("valid email"),
            username: Username::new("ada").expect("valid username"),
            password: Password::new("TestPassword123!").expect("valid password"),
        }
    }

    fn stored_user(password: &str) -> User {
        let hash = PasswordHasher::new(TEST_COST)
            .hash(&Password::new(password).expect("valid password"))
            .expect("hashing succeeds");
        User::new(
            Email::new("ada@example.com").expect("valid email"),
            Username::new("ada").expect("valid username"),
            hash,
        )
    }

    #[tokio::test]
    async fn signup_issues_a_token_for_the_new_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_exists_with_email_or_username()
            .withf(|email, username| email == "ada@example.com" && username == "ada")
            .times(1)
            .return_once(|_, _| Ok(false));
        users
            .expect_insert()
            .withf(|user| {
                user.password_hash() != "TestPassword123!"
                    && user.password_hash().starts_with("$2")
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = service(users);
        let tokens = Arc::new(TokenService::new(b"test-secret"));
        let session = service
            .signup(signup_request())
            .await
            .expect("signup succeeds");

        let subject = tokens
            .validate(session.token.as_str())
            .expect("issued token validates");
        assert_eq!(&subject, session.user.id());
    }

    #[tokio::test]
    async fn signup_rejects_taken_email_or_username() {
        let mut users = MockUserRepository::new();
        users
            .expect_exists_with_email_or_username()
            .times(1)
            .return_once(|_, _| Ok(true));

        let error = service(users)
            .signup(signup_request())
            .await
            .expect_err("conflict");
        assert_eq!(error.code, ErrorCode::Conflict);
        assert_eq!(error.message, "Email or username already exists");
    }

    #[tokio::test]
    async fn signup_reports_insert_race_as_the_same_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_exists_with_email_or_username()
            .times(1)
            .return_once(|_, _| Ok(false));
        users
            .expect_insert()
            .times(1)
            .return_once(|_| Err(UserRepositoryError::Duplicate));

        let error = service(users)
            .signup(signup_request())
            .await
            .expect_err("conflict");
        assert_eq!(error.code, ErrorCode::Conflict);
        assert_eq!(error.message, "Email or username already exists");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let mut unknown = MockUserRepository::new();
        unknown
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        let unknown_error = service(unknown)
            .login(LoginRequest {
                email: "nobody@example.com".to_owned(),
                password: Password::new("whatever").expect("valid password"),
            })
            .await
            .expect_err("unauthorized");

        let mut wrong = MockUserRepository::new();
        wrong
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(Some(stored_user("right-password"))));
        let wrong_error = service(wrong)
            .login(LoginRequest {
                email: "ada@example.com".to_owned(),
                password: Password::new("wrong-password").expect("valid password"),
            })
            .await
            .expect_err("unauthorized");

        assert_eq!(unknown_error, wrong_error);
        assert_eq!(unknown_error.code, ErrorCode::Unauthorized);
        assert_eq!(unknown_error.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn login_issues_a_token_for_matching_credentials() {
        let user = stored_user("TestPassword123!");
        let user_id = user.id().clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "ada@example.com")
            .times(1)
            .return_once(move |_| Ok(Some(user)));

        let session = service(users)
            .login(LoginRequest {
                email: "ada@example.com".to_owned(),
                password: Password::new("TestPassword123!").expect("valid password"),
            })
            .await
            .expect("login succeeds");
        assert_eq!(session.user.id(), &user_id);
    }

    #[tokio::test]
    async fn current_user_rejects_dangling_token_subjects() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let error = service(users)
            .current_user(&UserId::random())
            .await
            .expect_err("unauthorized");
        assert_eq!(error.code, ErrorCode::Unauthorized);
        assert_eq!(error.message, "User not found");
    }

    #[tokio::test]
    async fn store_connection_failures_surface_as_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Err(UserRepositoryError::connection("refused")));

        let error = service(users)
            .login(LoginRequest {
                email: "ada@example.com".to_owned(),
                password: Password::new("x").expect("valid password"),
            })
            .await
            .expect_err("unavailable");
        assert_eq!(error.code, ErrorCode::ServiceUnavailable);
    }
}
