use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use salvo::async_trait;

use crate::core::{
    entities::models::{MeetingStatus, Role},
    types::{
        errors::analytics_error::AnalyticsError,
        responses::{
            analytics_response::{
                Analytics, AnalyticsResponse, MonthlyStats, Overview, RecentActivity, RecentUser,
                RoleShare, StatusShare,
            },
            meeting_response::MeetingResponse,
        },
    },
    utils::stats_utils::percentage,
};
use crate::features::{
    meeting::service::{today, with_upload_status},
    records::repository::{RecordRepository, RecordRepositoryImpl},
};

use super::repository::{AnalyticsRepository, AnalyticsRepositoryImpl};

const RECENT_LIMIT: i64 = 5;

pub type DefaultAnalyticsService =
    AnalyticsServiceImpl<AnalyticsRepositoryImpl, RecordRepositoryImpl>;

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn get_analytics(&self) -> Result<AnalyticsResponse, AnalyticsError>;
}

#[derive(Debug, Clone)]
pub struct AnalyticsServiceImpl<A: AnalyticsRepository, R: RecordRepository> {
    repository: A,
    record_repository: R,
}

impl<A: AnalyticsRepository, R: RecordRepository> AnalyticsServiceImpl<A, R> {
    pub fn new(repository: A, record_repository: R) -> Self {
        Self {
            repository,
            record_repository,
        }
    }
}

/// One entry per role in a fixed order, including empty roles.
pub fn role_distribution(counts: &[(Role, i64)]) -> Vec<RoleShare> {
    let total = counts.iter().map(|(_, count)| count).sum::<i64>();

    Role::ALL
        .into_iter()
        .map(|role| {
            let count = counts
                .iter()
                .filter(|(r, _)| *r == role)
                .map(|(_, count)| count)
                .sum::<i64>();
            RoleShare {
                role,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

/// Statuses that no meeting currently has are left out.
pub fn status_distribution(dates: &[NaiveDate], today: NaiveDate) -> Vec<StatusShare> {
    let total = dates.len() as i64;

    MeetingStatus::ALL
        .into_iter()
        .filter_map(|status| {
            let count = dates
                .iter()
                .filter(|date| MeetingStatus::derive(**date, today) == status)
                .count() as i64;
            (count > 0).then(|| StatusShare {
                status,
                count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

pub fn first_of_month(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.day0()))
}

/// Local midnight on `date` as a naive UTC instant, the clock `created_at`
/// columns are written with.
pub fn local_midnight_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> NaiveDateTime {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map_or(midnight, |at| at.naive_utc())
}

#[async_trait]
impl<A: AnalyticsRepository, R: RecordRepository> AnalyticsService for AnalyticsServiceImpl<A, R> {
    async fn get_analytics(&self) -> Result<AnalyticsResponse, AnalyticsError> {
        let today = today();
        let month_start = first_of_month(today);
        let month_start_at = local_midnight_utc(month_start, &Local);

        let role_counts = self.repository.count_users_by_role().await?;
        let dates = self.repository.meeting_dates().await?;

        let user_distribution = role_distribution(&role_counts);
        let meeting_distribution = status_distribution(&dates, today);

        let total_users = user_distribution.iter().map(|share| share.count).sum::<i64>();
        let total_meetings = dates.len() as i64;
        let count_of = |status: MeetingStatus| {
            meeting_distribution
                .iter()
                .find(|share| share.status == status)
                .map_or(0, |share| share.count)
        };

        let overview = Overview {
            total_users,
            total_meetings,
            active_sessions: count_of(MeetingStatus::Ongoing),
            completion_rate: percentage(count_of(MeetingStatus::Completed), total_meetings),
        };

        let (attendance_rows, attended_rows) = self.record_repository.attendance_totals().await?;
        let monthly_stats = MonthlyStats {
            new_users: self.repository.count_users_since(month_start_at).await?,
            new_meetings: self.repository.count_meetings_since(month_start_at).await?,
            completed_trainings: dates
                .iter()
                .filter(|date| **date >= month_start && **date < today)
                .count() as i64,
            average_attendance: percentage(attended_rows, attendance_rows),
        };

        let recent_meetings = self
            .repository
            .recent_meetings(RECENT_LIMIT)
            .await?
            .into_iter()
            .map(|(meeting, creator)| MeetingResponse::new(meeting, Some(creator), today))
            .collect();

        let recent_activity = RecentActivity {
            meetings: with_upload_status(&self.record_repository, recent_meetings).await?,
            users: self
                .repository
                .recent_users(RECENT_LIMIT)
                .await?
                .into_iter()
                .map(|user| RecentUser {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    role: user.role,
                    department: user.department,
                    created_at: user.created_at,
                })
                .collect(),
        };

        Ok(AnalyticsResponse {
            analytics: Analytics {
                overview,
                user_distribution,
                meeting_distribution,
                recent_activity,
                monthly_stats,
            },
            message: "Analytics fetched successfully".to_string(),
        })
    }
}
