use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooManyRecipients { max: usize, actual: usize },
    InvalidPhoneNumber { input: String },
    MessageTooLong { max: usize, actual: usize },
    UnknownCarrier { input: String },
    InvalidUrl { field: &'static str, input: String },
    ZeroLimit { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::MessageTooLong { max, actual } => {
                write!(
                    f,
                    "message too long: {actual} characters (max {max}, use --split to send in parts)"
                )
            }
            Self::UnknownCarrier { input } => {
                write!(f, "unknown carrier: {input} (expected three, o2 or vodafone)")
            }
            Self::InvalidUrl { field, input } => write!(f, "invalid {field}: {input}"),
            Self::ZeroLimit { field } => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl std::error::Error for ValidationError {}
