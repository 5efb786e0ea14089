use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
#[salvo(schema(example = json!({
    "name": "Pediatric Emergency Care Workshop",
    "date": "2025-01-15",
    "time": "14:00",
    "topic": "Emergency Medicine",
    "hosters": "Dr. Rajesh Kumar"
})))]
pub struct CreateMeetingDto {
    #[serde(default)]
    pub name: String,

    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    /// `HH:MM` or `HH:MM:SS`
    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub topic: String,

    #[serde(default)]
    pub hosters: String,
}
