//! Persona tools

mod unknown_question;
mod user_details;

pub use unknown_question::{RECORD_UNKNOWN_QUESTION, RecordUnknownQuestionTool};
pub use user_details::{RECORD_USER_DETAILS, RecordUserDetailsTool};
