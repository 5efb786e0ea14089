use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
#[salvo(schema(example = json!({"time": "15:30", "hosters": "Dr. Priya Sharma"})))]
pub struct UpdateMeetingDto {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub topic: Option<String>,
    pub hosters: Option<String>,
}
