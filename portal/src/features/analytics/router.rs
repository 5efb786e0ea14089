use salvo::prelude::*;

use crate::core::{
    types::{
        errors::analytics_error::AnalyticsError, responses::analytics_response::AnalyticsResponse,
    },
    utils::{
        depot_utils::obtain,
        jwt_utils::JwtUtils,
        permissions::{Capability, authorize},
    },
};

use super::service::{AnalyticsService, DefaultAnalyticsService};

pub fn get_analytics_router(jwt_utils: JwtUtils) -> Router {
    Router::with_hoop(jwt_utils.auth_middleware())
        .path("analytics")
        .get(get_analytics)
}

/// Dashboard overview: user and meeting distributions, recent activity and
/// this month's figures.
#[endpoint(tags("analytics"), status_codes(200, 401, 403, 500))]
async fn get_analytics(depot: &mut Depot) -> Result<AnalyticsResponse, AnalyticsError> {
    authorize(depot, Capability::ViewAnalytics)?;
    let analytics_service = obtain::<DefaultAnalyticsService>(depot)?;

    analytics_service.get_analytics().await
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
            .push(get_analytics_router(jwt_utils));
        Service::new(router)
    }

    #[tokio::test]
    async fn test_analytics_forbidden_for_doctor() {
        let token = test_jwt_utils()
            .generate_token(&test_user(2, Role::Doctor))
            .unwrap();

        let mut res = TestClient::get("http://127.0.0.1:5000/analytics")
            .bearer_auth(token)
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(
            body["error"],
            "Access denied. Admin or monitoring privileges required."
        );
    }

    #[tokio::test]
    async fn test_analytics_require_token() {
        let res = TestClient::get("http://127.0.0.1:5000/analytics")
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }
}
