use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_FAREWELL_MESSAGE_LENGTH;
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarewellMessage {
    pub id: String,
    pub message: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFarewellMessage {
    pub message: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarewellMessageUpdate {
    pub message: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_message(message: &str) -> Result<String> {
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "message".to_string(),
        )));
    }
    if message.chars().count() > MAX_FAREWELL_MESSAGE_LENGTH {
        return Err(Error::Validation(ValidationError::field(
            "message",
            format!("must be at most {} characters", MAX_FAREWELL_MESSAGE_LENGTH),
        )));
    }
    Ok(message.to_string())
}

impl NewFarewellMessage {
    pub fn validate(&mut self) -> Result<()> {
        self.message = validate_message(&self.message)?;
        Ok(())
    }
}

impl FarewellMessageUpdate {
    pub fn validate(&mut self) -> Result<()> {
        if let Some(message) = &self.message {
            self.message = Some(validate_message(message)?);
        }
        Ok(())
    }
}
