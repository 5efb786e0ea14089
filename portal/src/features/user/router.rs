use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::core::{
    dtos::user::create_user_dto::CreateUserDto,
    types::{
        errors::user_error::UserError,
        responses::user_response::{ListUserResponse, UserResponse, UserStatsResponse},
    },
    utils::{
        depot_utils::obtain,
        jwt_utils::{JwtClaims, JwtUtils},
        permissions::{Capability, authorize},
    },
};

use super::service::{DefaultUserService, UserService};

pub fn get_user_router(jwt_utils: JwtUtils) -> Router {
    Router::with_hoop(jwt_utils.auth_middleware())
        .path("users")
        .get(get_users)
        .post(create_user)
        .push(
            Router::with_path("me")
                .get(get_me)
                .push(Router::with_path("stats").get(get_my_stats)),
        )
}

/// Lists every user with role counts and training figures.
#[endpoint(tags("user"), status_codes(200, 401, 403, 500))]
async fn get_users(depot: &mut Depot) -> Result<ListUserResponse, UserError> {
    authorize(depot, Capability::ManageUsers)?;
    let user_service = obtain::<DefaultUserService>(depot)?;

    user_service.get_users().await
}

/// Registers a new user.
#[endpoint(tags("user"), status_codes(201, 400, 401, 403, 409, 500))]
async fn create_user(
    data: JsonBody<CreateUserDto>,
    depot: &mut Depot,
) -> Result<UserResponse, UserError> {
    authorize(depot, Capability::ManageUsers)?;
    let user_service = obtain::<DefaultUserService>(depot)?;

    user_service.create_user(data.into_inner()).await
}

/// Profile of the signed-in user.
#[endpoint(tags("user"), status_codes(200, 401, 404, 500))]
async fn get_me(depot: &mut Depot) -> Result<UserResponse, UserError> {
    let user_id = obtain::<JwtClaims>(depot)?.user_id;
    let user_service = obtain::<DefaultUserService>(depot)?;

    user_service.get_user_by_id(user_id).await
}

/// Upcoming sessions, attended sessions and mean posttest score of the
/// signed-in user.
#[endpoint(tags("user"), status_codes(200, 401, 404, 500))]
async fn get_my_stats(depot: &mut Depot) -> Result<UserStatsResponse, UserError> {
    let user_id = obtain::<JwtClaims>(depot)?.user_id;
    let user_service = obtain::<DefaultUserService>(depot)?;

    user_service.get_user_stats(user_id).await
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;

    use crate::core::entities::models::Role;
    use crate::core::utils::jwt_utils::{test_jwt_utils, test_user};

    use super::*;

    fn service() -> Service {
        let jwt_utils = test_jwt_utils();
        let router = Router::new()
            .hoop(affix_state::inject(jwt_utils.clone()))
            .push(get_user_router(jwt_utils));
        Service::new(router)
    }

    #[tokio::test]
    async fn test_users_require_token() {
        let mut res = TestClient::get("http://127.0.0.1:5000/users")
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Missing bearer token");
    }

    #[tokio::test]
    async fn test_users_reject_garbage_token() {
        let mut res = TestClient::get("http://127.0.0.1:5000/users")
            .add_header("Authorization", "Bearer not-a-jwt", true)
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_users_forbidden_for_doctor() {
        let token = test_jwt_utils()
            .generate_token(&test_user(2, Role::Doctor))
            .unwrap();

        let mut res = TestClient::get("http://127.0.0.1:5000/users")
            .bearer_auth(token)
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Access denied. Admin privileges required.");
    }

    #[tokio::test]
    async fn test_own_stats_require_token() {
        let mut res = TestClient::get("http://127.0.0.1:5000/users/me/stats")
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Missing bearer token");
    }
}
