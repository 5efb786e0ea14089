use salvo::oapi::extract::JsonBody;
use salvo::prelude::*;

use crate::core::dtos::auth::login_dto::LoginDto;
use crate::core::types::errors::auth_error::AuthError;
use crate::core::types::responses::auth_response::{LoginResponse, TokenResponse};
use crate::core::utils::depot_utils::obtain;
use crate::core::utils::jwt_utils::{JwtClaims, JwtUtils};

use super::service::{AuthService, DefaultAuthService};

pub fn get_auth_router(jwt_utils: JwtUtils) -> Router {
    Router::new()
        .path("auth")
        .push(Router::with_path("login").post(login))
        .push(
            Router::with_hoop(jwt_utils.refresh_token_middleware())
                .path("refresh")
                .get(refresh_token),
        )
}

/// Signs in with email and password.
#[endpoint(tags("auth"), status_codes(200, 400, 401, 500))]
async fn login(data: JsonBody<LoginDto>, depot: &mut Depot) -> Result<LoginResponse, AuthError> {
    let auth_service = obtain::<DefaultAuthService>(depot)?;
    let jwt_utils = obtain::<JwtUtils>(depot)?;

    auth_service.login(data.into_inner(), jwt_utils).await
}

/// Issues a fresh token pair. Expects the refresh token as bearer.
#[endpoint(tags("auth"), status_codes(200, 401, 500))]
async fn refresh_token(depot: &mut Depot) -> Result<TokenResponse, AuthError> {
    let user_id = obtain::<JwtClaims>(depot)?.user_id;
    let auth_service = obtain::<DefaultAuthService>(depot)?;
    let jwt_utils = obtain::<JwtUtils>(depot)?;

    auth_service.refresh_token(user_id, jwt_utils).await
}
