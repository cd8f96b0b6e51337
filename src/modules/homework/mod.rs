pub mod model;
pub mod schema;

pub use model::{parse_status, Homework, HomeworkStatus, LookupError};
pub use schema::{check_response, PollResponse, ValidationError};
