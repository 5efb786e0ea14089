use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::core::{
    dtos::meeting::{
        create_meeting_dto::CreateMeetingDto, meeting_filter_dto::MeetingFilterDto,
        update_meeting_dto::UpdateMeetingDto,
    },
    entities::models::MeetingStatus,
    types::{
        errors::meeting_error::MeetingError,
        responses::meeting_response::{
            CreatedMeetingResponse, DeletedMeetingResponse, ListMeetingResponse, MeetingResponse,
        },
    },
    utils::{
        depot_utils::obtain,
        jwt_utils::JwtUtils,
        permissions::{Capability, authorize},
    },
};
use crate::features::{
    statistics::router::get_statistics_router, upload::router::get_upload_router,
};

use super::service::{DefaultMeetingService, MeetingService};

pub fn get_meeting_router(jwt_utils: JwtUtils) -> Router {
    Router::with_hoop(jwt_utils.auth_middleware())
        .path("meetings")
        .post(create_meeting)
        .get(get_meetings)
        .push(
            Router::with_path("{meeting_id}")
                .get(get_meeting_by_id)
                .put(update_meeting)
                .delete(delete_meeting),
        )
        .push(get_statistics_router())
        .push(get_upload_router())
}

fn parse_status_filter(status: Option<String>) -> Result<Option<MeetingStatus>, MeetingError> {
    match status.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| MeetingError::InvalidField {
                field: "status",
                value: value.to_string(),
            }),
    }
}

/// Schedules a new training meeting.
#[endpoint(tags("meeting"), status_codes(201, 400, 401, 403, 500))]
async fn create_meeting(
    data: JsonBody<CreateMeetingDto>,
    depot: &mut Depot,
) -> Result<CreatedMeetingResponse, MeetingError> {
    let user_id = authorize(depot, Capability::ManageMeetings)?.user_id;
    let meeting_service = obtain::<DefaultMeetingService>(depot)?;

    let meeting = meeting_service
        .create_meeting(data.into_inner(), user_id)
        .await?;

    Ok(meeting)
}

/// Lists meetings, optionally narrowed to one derived status.
#[endpoint(tags("meeting"), status_codes(200, 400, 401, 403, 500))]
async fn get_meetings(
    filter: MeetingFilterDto,
    depot: &mut Depot,
) -> Result<ListMeetingResponse, MeetingError> {
    authorize(depot, Capability::ViewMeetings)?;
    let meeting_service = obtain::<DefaultMeetingService>(depot)?;

    let status = parse_status_filter(filter.status)?;

    meeting_service.get_meetings(status).await
}

#[endpoint(tags("meeting"), status_codes(200, 401, 403, 404, 500))]
async fn get_meeting_by_id(
    meeting_id: PathParam<i32>,
    depot: &mut Depot,
) -> Result<MeetingResponse, MeetingError> {
    authorize(depot, Capability::ViewMeetings)?;
    let meeting_service = obtain::<DefaultMeetingService>(depot)?;

    meeting_service
        .get_meeting_by_id(meeting_id.into_inner())
        .await
}

/// Partially updates a meeting. Omitted fields keep their value.
#[endpoint(tags("meeting"), status_codes(200, 400, 401, 403, 404, 500))]
async fn update_meeting(
    meeting_id: PathParam<i32>,
    data: JsonBody<UpdateMeetingDto>,
    depot: &mut Depot,
) -> Result<MeetingResponse, MeetingError> {
    authorize(depot, Capability::ManageMeetings)?;
    let meeting_service = obtain::<DefaultMeetingService>(depot)?;

    meeting_service
        .update_meeting(meeting_id.into_inner(), data.into_inner())
        .await
}

/// Deletes a meeting together with its attendance and test records.
#[endpoint(tags("meeting"), status_codes(200, 401, 403, 404, 500))]
async fn delete_meeting(
    meeting_id: PathParam<i32>,
    depot: &mut Depot,
) -> Result<DeletedMeetingResponse, MeetingError> {
    authorize(depot, Capability::ManageMeetings)?;
    let meeting_service = obtain::<DefaultMeetingService>(depot)?;

    meeting_service
        .delete_meeting(meeting_id.into_inner())
        .await
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};

    use crate::core::entities::models::Role;
    use crate::core::utils::jwt_utils::{test_jwt_utils, test_user};

    use super::*;

    fn service() -> Service {
        let jwt_utils = test_jwt_utils();
        let router = Router::new()
            .hoop(affix_state::inject(jwt_utils.clone()))
            .push(get_meeting_router(jwt_utils));
        Service::new(router)
    }

    fn token_for(role: Role) -> String {
        test_jwt_utils().generate_token(&test_user(2, role)).unwrap()
    }

    #[tokio::test]
    async fn test_create_meeting_forbidden_for_doctor() {
        let mut res = TestClient::post("http://127.0.0.1:5000/meetings")
            .bearer_auth(token_for(Role::Doctor))
            .json(&json!({
                "name": "Advanced Cardiology Update",
                "date": "2099-01-18",
                "time": "10:00",
                "topic": "Cardiology",
                "hosters": "Dr. Priya Sharma"
            }))
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Access denied. Admin privileges required.");
    }

    #[tokio::test]
    async fn test_meetings_require_token() {
        let mut res = TestClient::get("http://127.0.0.1:5000/meetings")
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Missing bearer token");
    }

    #[tokio::test]
    async fn test_meeting_statistics_forbidden_for_doctor() {
        let mut res = TestClient::get("http://127.0.0.1:5000/meetings/1/statistics")
            .bearer_auth(token_for(Role::Doctor))
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
    async fn test_upload_forbidden_for_monitoring() {
        let mut res = TestClient::post("http://127.0.0.1:5000/meetings/1/uploads/attendance")
            .bearer_auth(token_for(Role::Monitoring))
            .json(&json!({"rows": [{"name": "Dr. Sana", "department": "Cardiology"}]}))
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        let body: Value = res.take_json().await.unwrap();
        assert_eq!(body["error"], "Access denied. Admin privileges required.");
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all".into())).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("Completed".into())).unwrap(),
            Some(MeetingStatus::Completed)
        );
        assert!(matches!(
            parse_status_filter(Some("cancelled".into())),
            Err(MeetingError::InvalidField { field: "status", .. })
        ));
    }
}
