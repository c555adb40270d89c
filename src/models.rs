use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operator,
    Master,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Master => "master",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationStatus {
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationEvent {
    Pay,
    Cancel,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::Paid => "PAID",
            OperationStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationStatus::Pending)
    }

    /// Next status for `event`, or an error when the operation is already
    /// PAID or CANCELLED.
    pub fn apply(self, id: i64, event: OperationEvent) -> AppResult<OperationStatus> {
        match (self, event) {
            (OperationStatus::Pending, OperationEvent::Pay) => Ok(OperationStatus::Paid),
            (OperationStatus::Pending, OperationEvent::Cancel) => Ok(OperationStatus::Cancelled),
            (from, event) => Err(AppError::InvalidTransition { id, from, event }),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for OperationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationEvent::Pay => f.write_str("pay"),
            OperationEvent::Cancel => f.write_str("cancel"),
        }
    }
}

/// Embedded `{id, name}` reference the backend attaches for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub client_name: String,
    pub car: String,
    pub service_id: i64,
    pub price: i64,
    pub status: OperationStatus,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    pub operator_id: i64,
    #[serde(default)]
    pub master_id: Option<i64>,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: i64,
    pub operator_id: i64,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftAction {
    Open,
    Close,
}

impl ShiftAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftAction::Open => "open",
            ShiftAction::Close => "close",
        }
    }
}

impl fmt::Display for ShiftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftLog {
    pub id: i64,
    pub operator_id: i64,
    #[serde(default)]
    pub operator_name: Option<String>,
    pub action: ShiftAction,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub shift_start: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub shift_end: Option<DateTime<Utc>>,
}

impl ShiftLog {
    /// Length of the logged shift; `None` unless both ends are known and in order.
    pub fn duration(&self) -> Option<ShiftDuration> {
        let (start, end) = (self.shift_start?, self.shift_end?);
        ShiftDuration::between(start, end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl ShiftDuration {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        let seconds = (end - start).num_seconds();
        if seconds < 0 {
            return None;
        }
        Some(Self {
            hours: seconds / 3600,
            minutes: (seconds % 3600) / 60,
        })
    }
}

impl fmt::Display for ShiftDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ч {}м", self.hours, self.minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Master {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The backend emits naive ISO-8601 datetimes; those are read as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`"))),
                None => Ok(None),
            }
        }
    }
}
