use salvo::oapi::ToParameters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub struct StatisticsQueryDto {
    /// Case-insensitive match on participant name or department.
    pub search: Option<String>,
}
