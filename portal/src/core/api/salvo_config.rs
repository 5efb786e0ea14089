use salvo::{
    catcher::Catcher,
    cors::{Any, Cors},
    http::Method,
    oapi::{
        Info, SecurityRequirement, SecurityScheme,
        security::{Http, HttpAuthScheme},
    },
    prelude::*,
    rate_limiter::{BasicQuota, FixedGuard, MokaStore, RateLimiter, RemoteIpIssuer},
};
use tracing::error;

use crate::{
    core::{
        database::db::DbPool, env::app_env::AppEnv, types::errors::render_error,
        utils::jwt_utils::JwtUtils,
    },
    features::{
        analytics::{
            repository::AnalyticsRepositoryImpl, router::get_analytics_router,
            service::AnalyticsServiceImpl,
        },
        auth::{repository::AuthRepositoryImpl, router::get_auth_router, service::AuthServiceImpl},
        meeting::{
            repository::MeetingRepositoryImpl, router::get_meeting_router,
            service::MeetingServiceImpl,
        },
        records::repository::RecordRepositoryImpl,
        statistics::service::StatisticsServiceImpl,
        upload::service::UploadServiceImpl,
        user::{repository::UserRepositoryImpl, router::get_user_router, service::UserServiceImpl},
    },
};

#[derive(Debug, Clone)]
pub struct DbConnection(pub DbPool);

#[endpoint(tags("system"))]
async fn health_check(res: &mut Response) {
    res.render("MediGuru portal API is running");
}

#[handler]
async fn set_services(depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
    let pool = match depot.obtain::<DbConnection>() {
        Ok(connection) => connection.0.clone(),
        Err(_) => {
            error!("Database pool is not injected into the depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            ctrl.skip_rest();
            return;
        }
    };

    let auth_repository = AuthRepositoryImpl::new(pool.clone());
    let user_repository = UserRepositoryImpl::new(pool.clone());
    let meeting_repository = MeetingRepositoryImpl::new(pool.clone());
    let record_repository = RecordRepositoryImpl::new(pool.clone());
    let analytics_repository = AnalyticsRepositoryImpl::new(pool);

    let auth_service = AuthServiceImpl::new(auth_repository);
    let user_service = UserServiceImpl::new(
        user_repository,
        meeting_repository.clone(),
        record_repository.clone(),
    );
    let meeting_service =
        MeetingServiceImpl::new(meeting_repository.clone(), record_repository.clone());
    let statistics_service =
        StatisticsServiceImpl::new(meeting_repository.clone(), record_repository.clone());
    let upload_service = UploadServiceImpl::new(meeting_repository, record_repository.clone());
    let analytics_service = AnalyticsServiceImpl::new(analytics_repository, record_repository);

    depot.inject(auth_service);
    depot.inject(user_service);
    depot.inject(meeting_service);
    depot.inject(statistics_service);
    depot.inject(upload_service);
    depot.inject(analytics_service);
}

pub fn get_salvo_service(env: &AppEnv, pool: DbPool) -> Service {
    let jwt_utils = JwtUtils::new(&env.jwt);

    let limiter = RateLimiter::new(
        FixedGuard::new(),
        MokaStore::new(),
        RemoteIpIssuer,
        BasicQuota::per_second(env.rate_limit_per_second),
    );

    let health_router = Router::with_path("health-check").get(health_check);
    let auth_router = get_auth_router(jwt_utils.clone());
    let user_router = get_user_router(jwt_utils.clone());
    let meeting_router = get_meeting_router(jwt_utils.clone());
    let analytics_router = get_analytics_router(jwt_utils.clone());

    let cors = Cors::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec!["Authorization", "Content-Type", "X-Requested-With"])
        .into_handler();

    let router = Router::with_path(&env.api_prefix)
        .hoop(Logger::new())
        .hoop(affix_state::inject(DbConnection(pool)))
        .hoop(affix_state::inject(jwt_utils))
        .hoop(CatchPanic::new())
        .hoop(CachingHeaders::new())
        .hoop(Compression::new().min_length(1024))
        .hoop(limiter)
        .hoop(set_services)
        .push(health_router)
        .push(auth_router)
        .push(user_router)
        .push(meeting_router)
        .push(analytics_router);

    let doc_info = Info::new("MediGuru Portal API", env!("CARGO_PKG_VERSION"))
        .description("Training portal for CMHO medical officers: meetings, attendance and test scores.");
    let http_auth_schema = Http::new(HttpAuthScheme::Bearer)
        .bearer_format("JWT")
        .description("jsonwebtoken");
    let security_requirement = SecurityRequirement::new("BearerAuth", ["*"]);
    let doc = OpenApi::new("MediGuru Portal API", env!("CARGO_PKG_VERSION"))
        .info(doc_info)
        .add_security_scheme("BearerAuth", SecurityScheme::Http(http_auth_schema))
        .security([security_requirement])
        .merge_router(&router);

    let router = Router::new()
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"))
        .push(router);

    Service::new(router)
        .hoop(cors)
        .catcher(Catcher::default().hoop(handle_error_status))
}

/// Gives unmatched routes and disallowed methods the same JSON error body as
/// the handlers.
#[handler]
async fn handle_error_status(res: &mut Response, ctrl: &mut FlowCtrl) {
    match res.status_code.unwrap_or(StatusCode::NOT_FOUND) {
        StatusCode::NOT_FOUND => render_error(res, StatusCode::NOT_FOUND, "Not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            render_error(res, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
        }
        _ => return,
    }
    ctrl.skip_rest();
}
