use salvo::oapi::ToParameters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub struct MeetingFilterDto {
    /// One of `upcoming`, `ongoing`, `completed`. Omit or pass `all` for every meeting.
    pub status: Option<String>,
}
