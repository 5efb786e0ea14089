use chrono::Utc;
use salvo::async_trait;
use tracing::info;
use validator::ValidateEmail;

use crate::core::{
    dtos::auth::login_dto::LoginDto,
    types::{
        errors::auth_error::AuthError,
        responses::auth_response::{LoginResponse, TokenResponse},
    },
    utils::{bcrypt_utils::verify_password, jwt_utils::JwtUtils},
};

use super::repository::{AuthRepository, AuthRepositoryImpl};

pub type DefaultAuthService = AuthServiceImpl<AuthRepositoryImpl>;

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, data: LoginDto, jwt_utils: &JwtUtils)
    -> Result<LoginResponse, AuthError>;

    async fn refresh_token(
        &self,
        user_id: i32,
        jwt_utils: &JwtUtils,
    ) -> Result<TokenResponse, AuthError>;
}

#[derive(Debug, Clone)]
pub struct AuthServiceImpl<R: AuthRepository> {
    repository: R,
}

impl<R: AuthRepository> AuthServiceImpl<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

/// Normalised `(email, password)`, both non-blank, email well formed.
/// Accounts are stored with the same normalisation on creation.
fn credentials(data: &LoginDto) -> Result<(String, &str), AuthError> {
    let email = data
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let password = data.password.as_deref().map(str::trim).unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if !email.validate_email() {
        return Err(AuthError::InvalidEmail);
    }

    Ok((email, password))
}

#[async_trait]
impl<R: AuthRepository> AuthService for AuthServiceImpl<R> {
    async fn login(
        &self,
        data: LoginDto,
        jwt_utils: &JwtUtils,
    ) -> Result<LoginResponse, AuthError> {
        let (email, password) = credentials(&data)?;

        let user = self
            .repository
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password) {
            return Err(AuthError::InvalidPassword);
        }

        let now = Utc::now().naive_utc();
        self.repository.record_login(user.id, now).await?;

        let token = jwt_utils.generate_token(&user)?;
        let refresh_token = jwt_utils.generate_refresh_token(&user)?;

        info!(user_id = user.id, role = %user.role, "User logged in");

        Ok(LoginResponse::new(user, now, token, refresh_token))
    }

    async fn refresh_token(
        &self,
        user_id: i32,
        jwt_utils: &JwtUtils,
    ) -> Result<TokenResponse, AuthError> {
        let user = self
            .repository
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(TokenResponse {
            token: jwt_utils.generate_token(&user)?,
            refresh_token: jwt_utils.generate_refresh_token(&user)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::core::entities::models::{Role, User};
    use crate::core::types::errors::general::GeneralError;
    use crate::core::utils::jwt_utils::{test_jwt_utils, test_user};

    struct MockAuthRepository {
        users: Vec<User>,
        logins: Mutex<Vec<i32>>,
    }

    impl MockAuthRepository {
        fn with_doctor() -> Self {
            let mut user = test_user(2, Role::Doctor);
            user.email = "doctor@mediguru.com".to_string();
            user.password = bcrypt::hash("doctor123", 4).unwrap();
            Self {
                users: vec![user],
                logins: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, GeneralError> {
            Ok(self.users.iter().find(|u| u.email == email).cloned())
        }

        async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, GeneralError> {
            Ok(self.users.iter().find(|u| u.id == user_id).cloned())
        }

        async fn record_login(
            &self,
            user_id: i32,
            _at: NaiveDateTime,
        ) -> Result<(), GeneralError> {
            self.logins.lock().unwrap().push(user_id);
            Ok(())
        }
    }

    fn login_dto(email: &str, password: &str) -> LoginDto {
        LoginDto {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let service = AuthServiceImpl::new(MockAuthRepository::with_doctor());
        let jwt_utils = test_jwt_utils();

        let response = service
            .login(login_dto("  Doctor@MediGuru.com ", "doctor123 "), &jwt_utils)
            .await
            .unwrap();

        assert_eq!(response.id, 2);
        assert_eq!(response.role, Role::Doctor);
        assert_eq!(response.department, "General");
        assert_eq!(response.registration_number, "");
        assert!(response.is_active);
        assert_eq!(jwt_utils.decode_token(&response.token).unwrap().user_id, 2);
        assert!(jwt_utils.decode_refresh_token(&response.refresh_token).is_ok());
        assert_eq!(*service.repository.logins.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let service = AuthServiceImpl::new(MockAuthRepository::with_doctor());
        let jwt_utils = test_jwt_utils();

        let err = service
            .login(login_dto("nobody@mediguru.com", "doctor123"), &jwt_utils)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        let err = service
            .login(login_dto("doctor@mediguru.com", "wrong"), &jwt_utils)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid password");

        let err = service
            .login(login_dto("not-an-email", "doctor123"), &jwt_utils)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail));

        let err = service
            .login(
                LoginDto {
                    email: Some("doctor@mediguru.com".to_string()),
                    password: None,
                },
                &jwt_utils,
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");

        assert!(service.repository.logins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_token_reloads_user() {
        let service = AuthServiceImpl::new(MockAuthRepository::with_doctor());
        let jwt_utils = test_jwt_utils();

        let tokens = service.refresh_token(2, &jwt_utils).await.unwrap();
        assert_eq!(jwt_utils.decode_token(&tokens.token).unwrap().user_id, 2);

        assert!(matches!(
            service.refresh_token(99, &jwt_utils).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
