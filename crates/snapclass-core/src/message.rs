//! User-facing text for classification outcomes.

use std::fmt;

use serde::Serialize;

use crate::models::classification::Classification;

/// Title shown above a classification notice.
pub const NOTIFICATION_TITLE: &str = "Image Classification";

/// Text a presentation layer shows for one classification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultMessage {
    pub title: String,
    pub body: String,
    /// Whether a label was produced.
    pub success: bool,
}

impl ResultMessage {
    /// Message for a successful classification.
    pub fn classified(result: &Classification) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("Classification Result: {}", result),
            success: true,
        }
    }

    /// Message for a failed classification.
    pub fn unavailable(reason: &dyn fmt::Display) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("Classification unavailable: {}", reason),
            success: false,
        }
    }

    /// Message for either outcome of a classification call.
    pub fn from_outcome<E: fmt::Display>(outcome: &Result<Classification, E>) -> Self {
        match outcome {
            Ok(result) => Self::classified(result),
            Err(e) => Self::unavailable(e),
        }
    }
}

impl fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
