use std::fmt;
use std::str::FromStr;

use phonenumber::country;
use serde::de::Error as DeError;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Irish mobile carrier whose web portal sends the text.
pub enum Carrier {
    Three,
    O2,
    Vodafone,
}

impl Carrier {
    /// Every supported carrier, in display order.
    pub const ALL: [Carrier; 3] = [Self::Three, Self::O2, Self::Vodafone];

    /// Lowercase identifier used on the command line and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Three => "three",
            Self::O2 => "o2",
            Self::Vodafone => "vodafone",
        }
    }

    /// Human-readable carrier name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Three => "Three",
            Self::O2 => "O2",
            Self::Vodafone => "Vodafone",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Carrier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

impl FromStr for Carrier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "three" => Ok(Self::Three),
            "o2" => Ok(Self::O2),
            "vodafone" | "vf" => Ok(Self::Vodafone),
            _ => Err(ValidationError::UnknownCarrier {
                input: s.trim().to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Portal account user name.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Portal account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// How recipients are written into the send form.
pub enum PhoneFormat {
    /// `+353871234567`
    E164,
    /// `0871234567`
    #[default]
    National,
}

#[derive(Debug, Clone)]
/// Recipient phone number, parsed with Ireland as the default region.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct Recipient {
    raw: String,
    e164: String,
    national: String,
}

impl Recipient {
    pub const FIELD: &'static str = "recipient";

    /// Parse and normalize a phone number. Numbers without a country prefix are
    /// read as Irish numbers.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(Some(country::Id::IE), &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;
        if !phonenumber::is_valid(&parsed) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        let national = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::National)
            .to_string()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        Ok(Self {
            raw,
            e164,
            national,
        })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// National number, digits only.
    pub fn national(&self) -> &str {
        &self.national
    }

    pub fn render(&self, format: PhoneFormat) -> &str {
        match format {
            PhoneFormat::E164 => self.e164(),
            PhoneFormat::National => self.national(),
        }
    }
}

impl PartialEq for Recipient {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for Recipient {}

impl std::hash::Hash for Recipient {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for Recipient {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Recipient {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Text of the web text.
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, which is what portals count against their limit.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Chunk the text into consecutive parts of at most `max_len` characters.
    pub fn chunks(&self, max_len: usize) -> Vec<String> {
        let max_len = max_len.max(1);
        let chars = self.0.chars().collect::<Vec<_>>();
        chars
            .chunks(max_len)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}
