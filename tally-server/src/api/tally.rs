//! Tally creation and listing

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Query, Request, State},
    http::header,
    Form, Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tally_common::db::{self, NewTally, Tally};
use tally_common::time::{display_date, format_storage, now_timestamp, parse_client_timestamp};
use tracing::info;

use crate::api::{ApiError, ReportQuery};
use crate::AppState;

const MISSING_FIELDS: &str = "Missing required fields";

/// Body of `POST /api/tally`
///
/// Text fields also accept numbers and booleans, stored as their text form.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTallyRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub department: Option<String>,
    #[serde(
        rename = "qType",
        alias = "interactionType",
        default,
        deserialize_with = "deserialize_text"
    )]
    pub q_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub referral: bool,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub timestamp: Option<String>,
}

impl CreateTallyRequest {
    /// Check required fields and normalize the timestamp.
    ///
    /// An absent timestamp is filled with the current time unless
    /// `require_timestamp` is set.
    pub fn into_new_tally(self, require_timestamp: bool) -> Result<NewTally, ApiError> {
        let (Some(department), Some(interaction_type)) =
            (non_blank(self.department), non_blank(self.q_type))
        else {
            return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
        };

        let timestamp = match non_blank(self.timestamp) {
            Some(raw) => format_storage(&parse_client_timestamp(&raw)?),
            None if require_timestamp => {
                return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
            }
            None => now_timestamp(),
        };

        Ok(NewTally {
            department,
            interaction_type,
            referral: self.referral,
            notes: self.notes.unwrap_or_default(),
            feedback: self.feedback.unwrap_or_default(),
            timestamp,
        })
    }
}

/// Create body extractor: urlencoded form when the Content-Type says so,
/// JSON otherwise. Unreadable bodies become [`ApiError::Validation`].
#[derive(Debug)]
pub struct TallyBody(pub CreateTallyRequest);

#[async_trait]
impl<S> FromRequest<S> for TallyBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(request) = Form::<CreateTallyRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            return Ok(Self(request));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        let request = serde_json::from_slice(&body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?;

        Ok(Self(request))
    }
}

/// Successful create response
#[derive(Debug, Serialize)]
pub struct CreateTallyResponse {
    pub success: bool,
    pub id: i64,
}

/// One row of `GET /api/tally`
#[derive(Debug, Serialize)]
pub struct TallyRow {
    pub id: i64,
    pub department: String,
    #[serde(rename = "qType")]
    pub interaction_type: String,
    pub referral: bool,
    pub notes: String,
    pub feedback: String,
    /// `MM/DD/YYYY`
    pub timestamp: String,
}

impl From<Tally> for TallyRow {
    fn from(t: Tally) -> Self {
        Self {
            timestamp: display_date(&t.timestamp),
            id: t.id,
            department: t.department,
            interaction_type: t.interaction_type,
            referral: t.referral,
            notes: t.notes,
            feedback: t.feedback,
        }
    }
}

/// POST /api/tally
pub async fn create_tally(
    State(state): State<AppState>,
    TallyBody(request): TallyBody,
) -> Result<Json<CreateTallyResponse>, ApiError> {
    let tally = request.into_new_tally(state.require_timestamp)?;
    let id = db::insert_tally(&state.db, &tally).await?;

    info!(
        "Recorded tally {} ({} / {}) at {}",
        id, tally.department, tally.interaction_type, tally.timestamp
    );

    Ok(Json(CreateTallyResponse { success: true, id }))
}

/// GET /api/tally?start=&end=&department=
pub async fn list_tallies(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<TallyRow>>, ApiError> {
    let filter = query.to_filter()?;
    let tallies = db::list_tallies(&state.db, &filter).await?;

    Ok(Json(tallies.into_iter().map(TallyRow::from).collect()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::custom(format!("expected text, found {}", other))),
    }
}

/// Form checkboxes arrive as booleans, 0/1, or strings like "on"
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "on" | "yes"
        ),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> CreateTallyRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_request_normalizes_timestamp() {
        let tally = request(
            r#"{"department":"Circulation","qType":"Fines Inquiry","referral":true,
                "timestamp":"2024-01-15T10:00"}"#,
        )
        .into_new_tally(false)
        .unwrap();

        assert_eq!(tally.department, "Circulation");
        assert_eq!(tally.interaction_type, "Fines Inquiry");
        assert!(tally.referral);
        assert_eq!(tally.notes, "");
        assert_eq!(tally.feedback, "");
        assert_eq!(tally.timestamp, "2024-01-15 10:00:00");
    }

    #[test]
    fn test_missing_department_rejected() {
        let err = request(r#"{"qType":"Other"}"#).into_new_tally(false).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_blank_interaction_type_rejected() {
        let err = request(r#"{"department":"IT Department","qType":"   "}"#)
            .into_new_tally(false)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_absent_timestamp_generated_unless_required() {
        let body = r#"{"department":"IT Department","qType":"Other"}"#;

        let tally = request(body).into_new_tally(false).unwrap();
        assert_eq!(tally.timestamp.len(), 19);

        let err = request(body).into_new_tally(true).unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);
    }

    #[test]
    fn test_unparseable_timestamp_rejected() {
        let err = request(r#"{"department":"IT Department","qType":"Other","timestamp":"soon"}"#)
            .into_new_tally(false)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_interaction_type_alias() {
        let tally = request(r#"{"department":"Youth Services","interactionType":"Programming"}"#)
            .into_new_tally(false)
            .unwrap();
        assert_eq!(tally.interaction_type, "Programming");
    }

    #[test]
    fn test_scalar_text_fields_coerced() {
        let tally = request(
            r#"{"department":"Circulation","qType":"Library Card","notes":42,"feedback":null}"#,
        )
        .into_new_tally(false)
        .unwrap();
        assert_eq!(tally.notes, "42");
        assert_eq!(tally.feedback, "");
    }

    #[test]
    fn test_structured_text_field_rejected() {
        let result: Result<CreateTallyRequest, _> =
            serde_json::from_str(r#"{"department":["Circulation"],"qType":"Other"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_referral_flag_forms() {
        for (raw, expected) in [
            ("true", true),
            ("false", false),
            ("1", true),
            ("0", false),
            ("\"on\"", true),
            ("\"\"", false),
            ("null", false),
        ] {
            let body = format!(r#"{{"referral":{}}}"#, raw);
            assert_eq!(request(&body).referral, expected, "referral = {}", raw);
        }
        assert!(!request("{}").referral);
    }
}
