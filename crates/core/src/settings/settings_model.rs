use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_STORE_NAME};
use crate::errors::{Error, Result, ValidationError};

pub const STORE_NAME_KEY: &str = "store_name";
pub const STORE_ADDRESS_KEY: &str = "store_address";
pub const STORE_PHONE_KEY: &str = "store_phone";
pub const CURRENCY_KEY: &str = "currency";
pub const RECEIPT_FOOTER_KEY: &str = "receipt_footer";

/// Store-wide settings printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub store_name: String,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    pub currency: String,
    pub receipt_footer: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            store_address: None,
            store_phone: None,
            currency: DEFAULT_CURRENCY.to_string(),
            receipt_footer: None,
        }
    }
}

impl Settings {
    /// Applies a stored key/value pair, ignoring unknown keys.
    pub fn apply(&mut self, key: &str, value: String) {
        let optional = || Some(value.clone()).filter(|v| !v.is_empty());
        match key {
            STORE_NAME_KEY => self.store_name = value,
            STORE_ADDRESS_KEY => self.store_address = optional(),
            STORE_PHONE_KEY => self.store_phone = optional(),
            CURRENCY_KEY => self.currency = value,
            RECEIPT_FOOTER_KEY => self.receipt_footer = optional(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    pub currency: Option<String>,
    pub receipt_footer: Option<String>,
}

impl SettingsUpdate {
    pub fn validate(&mut self) -> Result<()> {
        if let Some(name) = &self.store_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Validation(ValidationError::field(
                    "storeName",
                    "must not be empty",
                )));
            }
            self.store_name = Some(name);
        }
        if let Some(currency) = &self.currency {
            let currency = currency.trim().to_uppercase();
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::Validation(ValidationError::field(
                    "currency",
                    "must be a three letter ISO code",
                )));
            }
            self.currency = Some(currency);
        }
        Ok(())
    }

    /// Key/value pairs to persist. Empty optional fields clear the value.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let fields = [
            (STORE_NAME_KEY, &self.store_name),
            (STORE_ADDRESS_KEY, &self.store_address),
            (STORE_PHONE_KEY, &self.store_phone),
            (CURRENCY_KEY, &self.currency),
            (RECEIPT_FOOTER_KEY, &self.receipt_footer),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.trim().to_string())))
            .collect()
    }
}
