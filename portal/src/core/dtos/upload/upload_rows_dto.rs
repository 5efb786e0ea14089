use salvo::oapi::ToSchema;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
#[salvo(schema(example = json!({
    "rows": [
        {"name": "Dr. Amit Sharma", "department": "Pediatrics", "score": 18, "totalMarks": 20},
        {"name": "Dr. Priya Patel", "department": "Emergency", "score": "16", "totalMarks": "20"}
    ]
})))]
pub struct UploadRowsDto {
    #[serde(default)]
    pub rows: Vec<UploadRowDto>,
}

/// One spreadsheet row as parsed by the dashboard. Test uploads use
/// `score`/`totalMarks`; attendance uploads use `status` and the times.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadRowDto {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub department: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub total_marks: Option<f64>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub login_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub logout_time: Option<String>,
}

/// Spreadsheet cells arrive as numbers or as text. Unparseable text becomes
/// NaN so the row fails validation instead of the whole body.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Cell>::deserialize(deserializer)? {
        None => None,
        Some(Cell::Number(n)) => Some(n),
        Some(Cell::Text(text)) if text.trim().is_empty() => None,
        Some(Cell::Text(text)) => Some(text.trim().parse().unwrap_or(f64::NAN)),
    })
}

/// Text columns may hold numeric cells, e.g. a department code or a time
/// the spreadsheet stored as a day fraction.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Number(f64),
        Flag(bool),
    }

    Ok(match Option::<Cell>::deserialize(deserializer)? {
        None => None,
        Some(Cell::Text(text)) => Some(text),
        Some(Cell::Number(n)) => Some(n.to_string()),
        Some(Cell::Flag(flag)) => Some(flag.to_string()),
    })
}
