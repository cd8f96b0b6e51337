use serde_json::Value;

// Shape of GET /homework_statuses/:
// { "homeworks": [ { "homework_name": ..., "status": ..., ... } ], "current_date": 1581604970 }

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API response is not a JSON object")]
    NotAnObject,
    #[error("API response has no 'homeworks' key")]
    MissingHomeworks,
    #[error("'homeworks' is not a list")]
    HomeworksNotAList,
    #[error("'current_date' is not a unix timestamp")]
    InvalidCursor,
}

/// Validated status payload
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Newest record first; empty while nothing has been submitted
    pub homeworks: Vec<Value>,
    /// Cursor for the next request's `from_date`
    pub current_date: Option<i64>,
}

impl PollResponse {
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}

/// Check the top-level shape of an API response
pub fn check_response(body: &Value) -> Result<PollResponse, ValidationError> {
    let object = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let homeworks = object
        .get("homeworks")
        .ok_or(ValidationError::MissingHomeworks)?
        .as_array()
        .ok_or(ValidationError::HomeworksNotAList)?
        .clone();

    let current_date = match object.get("current_date") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_i64().ok_or(ValidationError::InvalidCursor)?),
    };

    Ok(PollResponse {
        homeworks,
        current_date,
    })
}
