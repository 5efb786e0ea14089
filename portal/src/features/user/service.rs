use std::collections::HashMap;

use chrono::Utc;
use salvo::async_trait;
use tracing::info;
use validator::Validate;

use crate::core::{
    dtos::user::create_user_dto::CreateUserDto,
    entities::models::{MeetingStatus, NewUser, TestKind, User},
    types::{
        errors::user_error::UserError,
        responses::user_response::{
            ListUserResponse, UserResponse, UserStatistics, UserStatsResponse, UserSummary,
        },
    },
    utils::{
        bcrypt_utils::hash_password,
        stats_utils::{mean, round1},
    },
};
use crate::features::{
    meeting::{
        repository::{MeetingRepository, MeetingRepositoryImpl},
        service::today,
    },
    records::repository::{RecordRepository, RecordRepositoryImpl},
};

use super::repository::{UserRepository, UserRepositoryImpl};

pub type DefaultUserService =
    UserServiceImpl<UserRepositoryImpl, MeetingRepositoryImpl, RecordRepositoryImpl>;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_users(&self) -> Result<ListUserResponse, UserError>;
    async fn create_user(&self, data: CreateUserDto) -> Result<UserResponse, UserError>;
    async fn get_user_by_id(&self, user_id: i32) -> Result<UserResponse, UserError>;
    async fn get_user_stats(&self, user_id: i32) -> Result<UserStatsResponse, UserError>;
}

#[derive(Debug, Clone)]
pub struct UserServiceImpl<U: UserRepository, M: MeetingRepository, R: RecordRepository> {
    repository: U,
    meeting_repository: M,
    record_repository: R,
}

impl<U: UserRepository, M: MeetingRepository, R: RecordRepository> UserServiceImpl<U, M, R> {
    pub fn new(repository: U, meeting_repository: M, record_repository: R) -> Self {
        Self {
            repository,
            meeting_repository,
            record_repository,
        }
    }

    /// Distinct meetings attended per participant name.
    async fn trainings(&self) -> Result<HashMap<String, i64>, UserError> {
        Ok(self
            .record_repository
            .count_attended_meetings()
            .await?
            .into_iter()
            .collect())
    }

    /// Mean posttest percentage per participant name.
    async fn average_scores(&self) -> Result<HashMap<String, f64>, UserError> {
        let mut percentages: HashMap<String, Vec<f64>> = HashMap::new();
        for score in self
            .record_repository
            .find_scores_by_kind(TestKind::Posttest)
            .await?
        {
            percentages
                .entry(score.name.clone())
                .or_default()
                .push(score.percentage());
        }

        Ok(percentages
            .into_iter()
            .filter_map(|(name, values)| mean(values).map(|avg| (name, round1(avg))))
            .collect())
    }
}

fn summarize(
    user: User,
    trainings: &HashMap<String, i64>,
    scores: &HashMap<String, f64>,
) -> UserSummary {
    UserSummary {
        trainings_completed: trainings.get(&user.name).copied().unwrap_or(0),
        average_score: scores.get(&user.name).copied().unwrap_or(0.0),
        id: user.id,
        email: user.email,
        role: user.role,
        department: user
            .department
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Not specified".to_string()),
        registration_number: user.registration_number,
        created_at: user.created_at,
        last_login: user.last_login_at,
        status: "active".to_string(),
        name: user.name,
    }
}

/// Trims the free-text fields, normalises the credentials the way login does
/// and runs the field validators.
fn sanitize(data: CreateUserDto) -> Result<CreateUserDto, UserError> {
    let trim_optional = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let data = CreateUserDto {
        name: data.name.trim().to_string(),
        email: data.email.trim().to_lowercase(),
        password: data.password.trim().to_string(),
        department: trim_optional(data.department),
        registration_number: trim_optional(data.registration_number),
        ..data
    };

    if let Err(errors) = data.validate() {
        let field_errors = errors.field_errors();
        let message = ["name", "email", "password"]
            .iter()
            .filter_map(|field| field_errors.get(*field))
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid user data".to_string());
        return Err(UserError::InvalidInput(message));
    }

    Ok(data)
}

#[async_trait]
impl<U: UserRepository, M: MeetingRepository, R: RecordRepository> UserService
    for UserServiceImpl<U, M, R>
{
    async fn get_users(&self) -> Result<ListUserResponse, UserError> {
        let mut users = self.repository.find_all().await?;
        users.sort_by(|a, b| (a.role.as_str(), &a.name).cmp(&(b.role.as_str(), &b.name)));

        let trainings = self.trainings().await?;
        let scores = self.average_scores().await?;

        let statistics = UserStatistics::from_roles(users.iter().map(|u| u.role));
        let users = users
            .into_iter()
            .map(|user| summarize(user, &trainings, &scores))
            .collect();

        Ok(ListUserResponse {
            users,
            statistics,
            message: "Users fetched successfully".to_string(),
        })
    }

    async fn create_user(&self, data: CreateUserDto) -> Result<UserResponse, UserError> {
        let data = sanitize(data)?;
        let password = hash_password(&data.password)?;
        let now = Utc::now().naive_utc();

        let user = self
            .repository
            .create_user(NewUser {
                name: &data.name,
                email: &data.email,
                password: &password,
                role: data.role,
                department: data.department.as_deref(),
                registration_number: data.registration_number.as_deref(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "User created");

        Ok(UserResponse::from(user))
    }

    async fn get_user_by_id(&self, user_id: i32) -> Result<UserResponse, UserError> {
        let user = self.repository.get_user_by_id(user_id).await?;

        Ok(UserResponse::from(user))
    }

    async fn get_user_stats(&self, user_id: i32) -> Result<UserStatsResponse, UserError> {
        let user = self.repository.get_user_by_id(user_id).await?;
        let today = today();

        let upcoming_sessions = self
            .meeting_repository
            .find_all()
            .await?
            .iter()
            .filter(|(meeting, _)| {
                MeetingStatus::derive(meeting.date, today) == MeetingStatus::Upcoming
            })
            .count() as i64;

        Ok(UserStatsResponse {
            upcoming_sessions,
            completed_sessions: self.trainings().await?.get(&user.name).copied().unwrap_or(0),
            average_score: self
                .average_scores()
                .await?
                .get(&user.name)
                .copied()
                .unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::DateTime;

    use super::*;
    use crate::core::entities::models::{
        AttendanceStatus, NewAttendanceRecord, NewTestScore, Role,
    };
    use crate::core::dtos::auth::login_dto::LoginDto;
    use crate::core::types::errors::general::GeneralError;
    use crate::core::utils::bcrypt_utils::verify_password;
    use crate::core::utils::jwt_utils::{test_jwt_utils, test_user};
    use crate::features::auth::{
        repository::AuthRepository,
        service::{AuthService, AuthServiceImpl},
    };
    use crate::features::meeting::service::tests::{MockMeetingRepository, sample_meeting};
    use crate::features::records::repository::tests::MockRecordRepository;

    #[derive(Default)]
    struct MockUserRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_all(&self) -> Result<Vec<User>, UserError> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn get_user_by_id(&self, user_id: i32) -> Result<User, UserError> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned()
                .ok_or(UserError::UserNotFound(user_id))
        }

        async fn create_user(&self, user: NewUser<'_>) -> Result<User, UserError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(UserError::EmailTaken);
            }
            let created = User {
                id: users.len() as i32 + 1,
                name: user.name.to_string(),
                email: user.email.to_string(),
                password: user.password.to_string(),
                role: user.role,
                department: user.department.map(str::to_string),
                registration_number: user.registration_number.map(str::to_string),
                created_at: user.created_at,
                updated_at: user.updated_at,
                last_login_at: None,
            };
            users.push(created.clone());
            Ok(created)
        }
    }

    #[async_trait]
    impl AuthRepository for MockUserRepository {
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, GeneralError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, GeneralError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned())
        }

        async fn record_login(
            &self,
            _user_id: i32,
            _at: chrono::NaiveDateTime,
        ) -> Result<(), GeneralError> {
            Ok(())
        }
    }

    fn named(id: i32, role: Role, name: &str) -> User {
        let mut user = test_user(id, role);
        user.name = name.to_string();
        user
    }

    fn create_dto(email: &str, password: &str) -> CreateUserDto {
        CreateUserDto {
            name: " Dr. Meera Joshi ".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Doctor,
            department: Some("  ".to_string()),
            registration_number: Some("CG/MED/2023/011".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_users_with_statistics_and_training_figures() {
        let users = MockUserRepository {
            users: Mutex::new(vec![
                named(1, Role::Monitoring, "Dr. Kavita"),
                named(2, Role::Doctor, "Dr. Rajesh"),
                named(3, Role::Admin, "Admin"),
                named(4, Role::Doctor, "Dr. Anil"),
            ]),
        };
        let records = MockRecordRepository::default();
        let at = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        for (meeting_id, status) in [
            (1, AttendanceStatus::Present),
            (2, AttendanceStatus::Late),
            (3, AttendanceStatus::Absent),
        ] {
            records
                .upsert_attendance(NewAttendanceRecord {
                    meeting_id,
                    name: "Dr. Rajesh".to_string(),
                    department: "Medicine".to_string(),
                    status,
                    login_time: None,
                    logout_time: None,
                    recorded_at: at,
                })
                .await
                .unwrap();
        }
        for (meeting_id, score) in [(1, 16.0), (2, 19.0)] {
            records
                .upsert_test_score(NewTestScore {
                    meeting_id,
                    kind: TestKind::Posttest,
                    name: "Dr. Rajesh".to_string(),
                    department: "Medicine".to_string(),
                    score,
                    total_marks: 20.0,
                    recorded_at: at,
                })
                .await
                .unwrap();
        }
        let service = UserServiceImpl::new(users, MockMeetingRepository::default(), records);

        let response = service.get_users().await.unwrap();

        let names = response
            .users
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Admin", "Dr. Anil", "Dr. Rajesh", "Dr. Kavita"]);
        assert_eq!(
            response.statistics,
            UserStatistics {
                total: 4,
                doctors: 2,
                admins: 1,
                monitoring: 1,
            }
        );

        let rajesh = &response.users[2];
        assert_eq!(rajesh.trainings_completed, 2);
        assert_eq!(rajesh.average_score, 87.5);
        assert_eq!(rajesh.department, "Not specified");
        assert_eq!(rajesh.status, "active");
        assert_eq!(response.users[1].trainings_completed, 0);
        assert_eq!(response.users[1].average_score, 0.0);
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_trims_input() {
        let service = UserServiceImpl::new(
            MockUserRepository::default(),
            MockMeetingRepository::default(),
            MockRecordRepository::default(),
        );

        let created = service
            .create_user(create_dto(" Meera@MediGuru.com ", "meera123"))
            .await
            .unwrap();

        assert_eq!(created.name, "Dr. Meera Joshi");
        assert_eq!(created.email, "meera@mediguru.com");
        assert_eq!(created.department, None);

        let stored = service.repository.users.lock().unwrap()[0].clone();
        assert_ne!(stored.password, "meera123");
        assert!(verify_password("meera123", &stored.password));
    }

    #[tokio::test]
    async fn test_create_user_validation_and_duplicates() {
        let service = UserServiceImpl::new(
            MockUserRepository::default(),
            MockMeetingRepository::default(),
            MockRecordRepository::default(),
        );

        let err = service
            .create_user(create_dto("meera@mediguru.com", "123"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = service
            .create_user(create_dto("meera", "meera123"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");

        service
            .create_user(create_dto("meera@mediguru.com", "meera123"))
            .await
            .unwrap();
        assert!(matches!(
            service
                .create_user(create_dto("meera@mediguru.com", "other123"))
                .await,
            Err(UserError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_created_user_can_login_with_same_input() {
        let jwt_utils = test_jwt_utils();

        for (email, password) in [
            ("meera@mediguru.com", "meera123"),
            (" Meera@MediGuru.COM ", "meera123"),
            ("meera@mediguru.com", "  meera123 "),
        ] {
            let service = UserServiceImpl::new(
                MockUserRepository::default(),
                MockMeetingRepository::default(),
                MockRecordRepository::default(),
            );
            let created = service
                .create_user(create_dto(email, password))
                .await
                .unwrap();

            let auth = AuthServiceImpl::new(service.repository);
            let response = auth
                .login(
                    LoginDto {
                        email: Some(email.to_string()),
                        password: Some(password.to_string()),
                    },
                    &jwt_utils,
                )
                .await
                .unwrap();
            assert_eq!(response.id, created.id);
        }
    }

    #[tokio::test]
    async fn test_user_stats_for_signed_in_doctor() {
        let today = today();
        let records = MockRecordRepository::default();
        let at = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        for (meeting_id, name, status) in [
            (1, "Dr. Rajesh", AttendanceStatus::Present),
            (2, "Dr. Rajesh", AttendanceStatus::Absent),
            (2, "Dr. Anil", AttendanceStatus::Late),
        ] {
            records
                .upsert_attendance(NewAttendanceRecord {
                    meeting_id,
                    name: name.to_string(),
                    department: "Medicine".to_string(),
                    status,
                    login_time: None,
                    logout_time: None,
                    recorded_at: at,
                })
                .await
                .unwrap();
        }
        records
            .upsert_test_score(NewTestScore {
                meeting_id: 1,
                kind: TestKind::Posttest,
                name: "Dr. Rajesh".to_string(),
                department: "Medicine".to_string(),
                score: 15.0,
                total_marks: 20.0,
                recorded_at: at,
            })
            .await
            .unwrap();
        let service = UserServiceImpl::new(
            MockUserRepository {
                users: Mutex::new(vec![
                    named(2, Role::Doctor, "Dr. Rajesh"),
                    named(3, Role::Doctor, "Dr. Meera"),
                ]),
            },
            MockMeetingRepository::with(vec![
                sample_meeting(1, today - chrono::Duration::days(7)),
                sample_meeting(2, today - chrono::Duration::days(1)),
                sample_meeting(3, today),
                sample_meeting(4, today + chrono::Duration::days(2)),
                sample_meeting(5, today + chrono::Duration::days(9)),
            ]),
            records,
        );

        assert_eq!(
            service.get_user_stats(2).await.unwrap(),
            UserStatsResponse {
                upcoming_sessions: 2,
                completed_sessions: 1,
                average_score: 75.0,
            }
        );
        assert_eq!(
            service.get_user_stats(3).await.unwrap(),
            UserStatsResponse {
                upcoming_sessions: 2,
                completed_sessions: 0,
                average_score: 0.0,
            }
        );
        assert!(matches!(
            service.get_user_stats(9).await,
            Err(UserError::UserNotFound(9))
        ));
    }
}
