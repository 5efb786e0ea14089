use salvo::{oapi::extract::PathParam, prelude::*};

use crate::core::{
    dtos::statistics::statistics_query_dto::StatisticsQueryDto,
    entities::models::RecordKind,
    types::{
        errors::statistics_error::StatisticsError,
        responses::statistics_response::{CsvExport, MeetingStatisticsResponse},
    },
    utils::{
        depot_utils::obtain,
        permissions::{Capability, authorize},
    },
};

use super::service::{DefaultStatisticsService, StatisticsService};

/// Mounted below `/meetings`, behind the meeting router's auth hoop.
pub fn get_statistics_router() -> Router {
    Router::with_path("{meeting_id}/statistics")
        .get(get_meeting_statistics)
        .push(Router::with_path("{kind}/export").get(export_records))
}

/// Pretest, posttest and attendance figures for one meeting.
#[endpoint(tags("statistics"), status_codes(200, 401, 403, 404, 500))]
async fn get_meeting_statistics(
    meeting_id: PathParam<i32>,
    query: StatisticsQueryDto,
    depot: &mut Depot,
) -> Result<MeetingStatisticsResponse, StatisticsError> {
    authorize(depot, Capability::ViewStatistics)?;
    let statistics_service = obtain::<DefaultStatisticsService>(depot)?;

    statistics_service
        .get_meeting_statistics(meeting_id.into_inner(), query.search)
        .await
}

/// Downloads one record set of a meeting as CSV.
#[endpoint(tags("statistics"), status_codes(200, 400, 401, 403, 404, 500))]
async fn export_records(
    meeting_id: PathParam<i32>,
    kind: PathParam<String>,
    depot: &mut Depot,
) -> Result<CsvExport, StatisticsError> {
    authorize(depot, Capability::ViewStatistics)?;
    let statistics_service = obtain::<DefaultStatisticsService>(depot)?;

    let kind = kind
        .into_inner()
        .parse::<RecordKind>()
        .map_err(StatisticsError::InvalidKind)?;

    statistics_service
        .export_records(meeting_id.into_inner(), kind)
        .await
}
