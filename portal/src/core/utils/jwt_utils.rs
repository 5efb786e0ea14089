use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use salvo::Handler;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::entities::models::{Role, User};
use crate::core::env::app_env::JwtConfig;
use crate::core::types::errors::access_error::AccessError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtUtils {
    secret_key: String,
    refresh_secret_key: String,
    token_duration: time::Duration,
    refresh_token_duration: time::Duration,
}

#[derive(Debug, Clone, Copy)]
enum TokenKind {
    Access,
    Refresh,
}

impl JwtUtils {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret_key: config.jwt_token.clone(),
            refresh_secret_key: config.refresh_token.clone(),
            token_duration: time::Duration::seconds(config.token_expires_in_seconds),
            refresh_token_duration: time::Duration::seconds(
                config.refresh_token_expires_in_seconds,
            ),
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(user, TokenKind::Access)
    }

    pub fn generate_refresh_token(
        &self,
        user: &User,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(user, TokenKind::Refresh)
    }

    pub fn decode_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        self.verify(token, TokenKind::Access)
    }

    pub fn decode_refresh_token(
        &self,
        token: &str,
    ) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        self.verify(token, TokenKind::Refresh)
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.secret_key.as_bytes(),
            TokenKind::Refresh => self.refresh_secret_key.as_bytes(),
        }
    }

    fn sign(&self, user: &User, kind: TokenKind) -> Result<String, jsonwebtoken::errors::Error> {
        let duration = match kind {
            TokenKind::Access => self.token_duration,
            TokenKind::Refresh => self.refresh_token_duration,
        };
        let exp = OffsetDateTime::now_utc() + duration;

        let claims = JwtClaims {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: exp.unix_timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Rejects requests without a valid access token and puts the decoded
    /// [`JwtClaims`] into the depot.
    pub fn auth_middleware(&self) -> impl Handler {
        #[handler]
        async fn middleware(
            req: &mut Request,
            depot: &mut Depot,
            res: &mut Response,
            ctrl: &mut FlowCtrl,
        ) {
            authenticate(req, depot, res, ctrl, TokenKind::Access);
        }
        middleware
    }

    pub fn refresh_token_middleware(&self) -> impl Handler {
        #[handler]
        async fn middleware(
            req: &mut Request,
            depot: &mut Depot,
            res: &mut Response,
            ctrl: &mut FlowCtrl,
        ) {
            authenticate(req, depot, res, ctrl, TokenKind::Refresh);
        }
        middleware
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
    kind: TokenKind,
) {
    let claims = match (bearer_token(req), depot.obtain::<JwtUtils>()) {
        (None, _) => Err(AccessError::MissingToken),
        (Some(token), Ok(jwt_utils)) => jwt_utils
            .verify(token, kind)
            .map_err(|_| AccessError::InvalidToken),
        (Some(_), Err(_)) => {
            tracing::error!("JwtUtils is not injected into the depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            ctrl.skip_rest();
            return;
        }
    };

    match claims {
        Ok(claims) => {
            depot.inject(claims);
        }
        Err(err) => {
            crate::core::types::errors::render_error(res, err.status_code(), err.to_string());
            ctrl.skip_rest();
        }
    }
}

#[cfg(test)]
pub(crate) fn test_jwt_utils() -> JwtUtils {
    JwtUtils::new(&JwtConfig {
        jwt_token: "secret".to_string(),
        refresh_token: "refresh_secret".to_string(),
        token_expires_in_seconds: 3600,
        refresh_token_expires_in_seconds: 7200,
    })
}

#[cfg(test)]
pub(crate) fn test_user(id: i32, role: Role) -> User {
    let now = chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc();
    User {
        id,
        name: format!("Dr. Test {id}"),
        email: format!("user{id}@mediguru.com"),
        password: String::new(),
        role,
        department: None,
        registration_number: None,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    }
}
