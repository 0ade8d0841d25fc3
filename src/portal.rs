//! Carrier web-portal profiles.
//!
//! A profile describes the login and send forms of one carrier's web-text
//! portal. Nothing about a particular portal is built in; every URL comes
//! from configuration and the remaining fields fall back to generic defaults.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::domain::{PhoneFormat, ValidationError};

pub const DEFAULT_MAX_MESSAGE_LEN: usize = 160;
pub const DEFAULT_MAX_RECIPIENTS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortalProfile {
    pub login_url: String,
    pub send_url: String,
    #[serde(default = "default_username_field")]
    pub username_field: String,
    #[serde(default = "default_password_field")]
    pub password_field: String,
    #[serde(default = "default_recipient_field")]
    pub recipient_field: String,
    #[serde(default = "default_message_field")]
    pub message_field: String,
    #[serde(default = "default_recipient_separator")]
    pub recipient_separator: String,
    #[serde(default)]
    pub recipient_format: PhoneFormat,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
    #[serde(default = "default_max_recipients")]
    pub max_recipients: usize,
    /// Text that must appear in the send response for it to count as sent.
    #[serde(default)]
    pub success_marker: Option<String>,
    /// Text whose presence in the send response means the portal refused it.
    #[serde(default)]
    pub failure_marker: Option<String>,
    /// Text whose presence in the login response means the credentials were refused.
    #[serde(default)]
    pub login_failure_marker: Option<String>,
    /// Fixed fields appended to both forms.
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,
}

fn default_username_field() -> String {
    "username".to_owned()
}

fn default_password_field() -> String {
    "password".to_owned()
}

fn default_recipient_field() -> String {
    "recipients".to_owned()
}

fn default_message_field() -> String {
    "message".to_owned()
}

fn default_recipient_separator() -> String {
    ",".to_owned()
}

fn default_max_message_len() -> usize {
    DEFAULT_MAX_MESSAGE_LEN
}

fn default_max_recipients() -> usize {
    DEFAULT_MAX_RECIPIENTS
}

impl PortalProfile {
    /// Profile with the given URLs and default form layout.
    pub fn new(login_url: impl Into<String>, send_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
            send_url: send_url.into(),
            username_field: default_username_field(),
            password_field: default_password_field(),
            recipient_field: default_recipient_field(),
            message_field: default_message_field(),
            recipient_separator: default_recipient_separator(),
            recipient_format: PhoneFormat::default(),
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            max_recipients: DEFAULT_MAX_RECIPIENTS,
            success_marker: None,
            failure_marker: None,
            login_failure_marker: None,
            extra_fields: BTreeMap::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_url("login_url", &self.login_url)?;
        check_url("send_url", &self.send_url)?;

        for (field, value) in [
            ("username_field", &self.username_field),
            ("password_field", &self.password_field),
            ("recipient_field", &self.recipient_field),
            ("message_field", &self.message_field),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Empty { field });
            }
        }

        if self.max_message_len == 0 {
            return Err(ValidationError::ZeroLimit {
                field: "max_message_len",
            });
        }
        if self.max_recipients == 0 {
            return Err(ValidationError::ZeroLimit {
                field: "max_recipients",
            });
        }
        Ok(())
    }
}

fn check_url(field: &'static str, input: &str) -> Result<(), ValidationError> {
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl {
            field,
            input: input.to_owned(),
        }),
    }
}
