use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use crate::core::database::schema::{attendance_records, meetings, test_scores, users};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DbEnum, Serialize, Deserialize, ToSchema)]
#[ExistingTypePath = "crate::core::database::schema::sql_types::UserRole"]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Admin,
    Monitoring,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Doctor, Role::Admin, Role::Monitoring];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DbEnum, Serialize, Deserialize, ToSchema)]
#[ExistingTypePath = "crate::core::database::schema::sql_types::AttendanceStatus"]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!(
                "Invalid attendance status '{other}' (expected present, late or absent)"
            )),
        }
    }
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
        }
    }

    pub fn attended(&self) -> bool {
        !matches!(self, AttendanceStatus::Absent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DbEnum, Serialize, Deserialize, ToSchema)]
#[ExistingTypePath = "crate::core::database::schema::sql_types::TestKind"]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Pretest,
    Posttest,
}

/// Status of a meeting, derived from its date at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 3] = [
        MeetingStatus::Upcoming,
        MeetingStatus::Ongoing,
        MeetingStatus::Completed,
    ];

    /// Only the calendar date matters; the meeting's time of day is ignored.
    pub fn derive(date: NaiveDate, today: NaiveDate) -> Self {
        match date.cmp(&today) {
            std::cmp::Ordering::Greater => MeetingStatus::Upcoming,
            std::cmp::Ordering::Equal => MeetingStatus::Ongoing,
            std::cmp::Ordering::Less => MeetingStatus::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Upcoming => "upcoming",
            MeetingStatus::Ongoing => "ongoing",
            MeetingStatus::Completed => "completed",
        }
    }
}

impl FromStr for MeetingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeetingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown meeting status: {s}"))
    }
}

/// The three spreadsheets a meeting collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Pretest,
    Posttest,
    Attendance,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Pretest => "pretest",
            RecordKind::Posttest => "posttest",
            RecordKind::Attendance => "attendance",
        }
    }

    pub fn test_kind(&self) -> Option<TestKind> {
        match self {
            RecordKind::Pretest => Some(TestKind::Pretest),
            RecordKind::Posttest => Some(TestKind::Posttest),
            RecordKind::Attendance => None,
        }
    }
}

impl From<TestKind> for RecordKind {
    fn from(kind: TestKind) -> Self {
        match kind {
            TestKind::Pretest => RecordKind::Pretest,
            TestKind::Posttest => RecordKind::Posttest,
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretest" => Ok(RecordKind::Pretest),
            "posttest" => Ok(RecordKind::Posttest),
            "attendance" => Ok(RecordKind::Attendance),
            other => Err(format!(
                "Unknown record kind '{other}' (expected pretest, posttest or attendance)"
            )),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub department: Option<String>,
    pub registration_number: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_login_at: Option<NaiveDateTime>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub department: Option<&'a str>,
    pub registration_number: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User, foreign_key = created_by))]
#[diesel(table_name = meetings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Meeting {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub topic: String,
    pub hosters: String,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meetings)]
pub struct NewMeeting<'a> {
    pub name: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub topic: &'a str,
    pub hosters: &'a str,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default, Clone, AsChangeset, PartialEq)]
#[diesel(table_name = meetings)]
pub struct MeetingChanges {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub topic: Option<String>,
    pub hosters: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Meeting))]
#[diesel(table_name = attendance_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttendanceRecord {
    pub id: i32,
    pub meeting_id: i32,
    pub name: String,
    pub department: String,
    pub status: AttendanceStatus,
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, AsChangeset, PartialEq)]
#[diesel(table_name = attendance_records)]
pub struct NewAttendanceRecord {
    pub meeting_id: i32,
    pub name: String,
    pub department: String,
    pub status: AttendanceStatus,
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Meeting))]
#[diesel(table_name = test_scores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TestScore {
    pub id: i32,
    pub meeting_id: i32,
    pub kind: TestKind,
    pub name: String,
    pub department: String,
    pub score: f64,
    pub total_marks: f64,
    pub recorded_at: NaiveDateTime,
}

impl TestScore {
    pub fn percentage(&self) -> f64 {
        if self.total_marks > 0.0 {
            self.score / self.total_marks * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset, PartialEq)]
#[diesel(table_name = test_scores)]
pub struct NewTestScore {
    pub meeting_id: i32,
    pub kind: TestKind,
    pub name: String,
    pub department: String,
    pub score: f64,
    pub total_marks: f64,
    pub recorded_at: NaiveDateTime,
}
