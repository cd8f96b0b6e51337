use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// STATUS & VERDICTS
// =============================================================================

/// Review status reported by the homework API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the user
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = LookupError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == code)
            .ok_or_else(|| LookupError::UnknownStatus(code.to_string()))
    }
}

// =============================================================================
// TRACKED HOMEWORK
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Homework record has no 'homework_name'")]
    MissingName,
    #[error("Homework record has no 'status'")]
    MissingStatus,
    #[error("Unknown homework status: {0:?}")]
    UnknownStatus(String),
}

/// The homework submission being tracked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    pub name: String,
    pub status: HomeworkStatus,
}

impl Homework {
    /// Extract name and status from a raw API record.
    ///
    /// Both fields are required; a record without them is rejected rather
    /// than rendered as a partial message.
    pub fn from_record(record: &Value) -> Result<Self, LookupError> {
        let name = record
            .get("homework_name")
            .and_then(Value::as_str)
            .ok_or(LookupError::MissingName)?;
        let status = record
            .get("status")
            .and_then(Value::as_str)
            .ok_or(LookupError::MissingStatus)?
            .parse::<HomeworkStatus>()?;

        Ok(Self {
            name: name.to_string(),
            status,
        })
    }

    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Format the notification text for a raw homework record
pub fn parse_status(record: &Value) -> Result<String, LookupError> {
    Homework::from_record(record).map(|hw| hw.message())
}
