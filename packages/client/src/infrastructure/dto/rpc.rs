//! Wire shapes of the Apps Script endpoint.
//!
//! The sheet is edited by hand, so every field is optional and numbers may
//! arrive as strings. Conversion into domain types happens here and nowhere
//! else.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    ApplicationForm, ClientRecord, ClientStatus, LightType, QueueEntry, Settings, Submission,
    WaitingList,
};

/// Request envelope: `{"function": ..., "parameters": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub function: String,
    pub parameters: Value,
}

impl RpcRequest {
    pub fn new(function: impl Into<String>, parameters: Value) -> Self {
        Self {
            function: function.into(),
            parameters,
        }
    }
}

/// `getWaitingList` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitingListDto {
    /// Falsy (`null`, `false`, missing) means "no such applicant"
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub client: Option<ClientRecordDto>,
    #[serde(default)]
    pub list: Vec<QueueItemDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientRecordDto {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub queue_num: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueItemDto {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub queue_num: Option<u32>,
    /// Masked name used by older sheet scripts
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `getMeetingSettings` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsDto {
    #[serde(rename = "TODAY_LIGHT", default)]
    pub today_light: Option<String>,
    #[serde(rename = "LINE_MEETING_LINK", default)]
    pub line_meeting_link: Option<String>,
    #[serde(
        rename = "MAX_WAITING_CLIENTS",
        default,
        deserialize_with = "lenient_string"
    )]
    pub max_waiting_clients: Option<String>,
}

/// `submitApplication` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionDto {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub queue_num: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ClientRecordDto> for ClientRecord {
    fn from(dto: ClientRecordDto) -> Self {
        Self {
            status: non_empty(dto.status).map(ClientStatus::from),
            queue_number: dto.queue_num,
        }
    }
}

impl From<QueueItemDto> for QueueEntry {
    fn from(dto: QueueItemDto) -> Self {
        Self {
            queue_number: dto.queue_num,
            display_name: non_empty(dto.display_name).or_else(|| non_empty(dto.name)),
            status: non_empty(dto.status).map(ClientStatus::from),
        }
    }
}

impl From<WaitingListDto> for WaitingList {
    fn from(dto: WaitingListDto) -> Self {
        Self {
            client: dto.client.map(ClientRecord::from),
            entries: dto.list.into_iter().map(QueueEntry::from).collect(),
        }
    }
}

impl From<SettingsDto> for Settings {
    fn from(dto: SettingsDto) -> Self {
        let defaults = Settings::default();
        Self {
            light_type: non_empty(dto.today_light)
                .map(LightType::from)
                .unwrap_or(defaults.light_type),
            meeting_link: dto.line_meeting_link.unwrap_or(defaults.meeting_link),
            max_waiting_clients: non_empty(dto.max_waiting_clients)
                .unwrap_or(defaults.max_waiting_clients),
        }
    }
}

impl From<&Settings> for SettingsDto {
    fn from(settings: &Settings) -> Self {
        Self {
            today_light: Some(settings.light_type.label().to_string()),
            line_meeting_link: Some(settings.meeting_link.clone()),
            max_waiting_clients: Some(settings.max_waiting_clients.clone()),
        }
    }
}

impl From<SubmissionDto> for Submission {
    fn from(dto: SubmissionDto) -> Self {
        Self {
            status: non_empty(dto.status).map(ClientStatus::from),
            queue_number: dto.queue_num,
            message: non_empty(dto.message),
        }
    }
}

/// Parameters of `submitApplication`: the form fields plus `name`
pub fn application_parameters(form: &ApplicationForm) -> Value {
    let mut parameters: Map<String, Value> = form.fields.clone();
    parameters.insert(
        "name".to_string(),
        Value::String(form.name.as_str().to_string()),
    );
    Value::Object(parameters)
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Application-level error carried in an otherwise successful body.
///
/// A falsy `error` field does not count.
pub fn application_error(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(value) if !is_truthy(value) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
        None => None,
    }
}

/// Falsy `client` means "no such applicant"; any truthy value is a record,
/// even one carrying no fields.
fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<ClientRecordDto>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        other if is_truthy(&other) => Ok(Some(ClientRecordDto::default())),
        _ => Ok(None),
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
