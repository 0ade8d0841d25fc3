use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, Recipient};

#[derive(Debug, Clone)]
/// One web text addressed to one or more recipients.
pub struct SendWebText {
    recipients: Vec<Recipient>,
    message: MessageText,
}

impl SendWebText {
    /// Build a request. Duplicate recipients (by E.164) are dropped, keeping the first.
    pub fn new(
        recipients: Vec<Recipient>,
        message: MessageText,
        max_recipients: usize,
    ) -> Result<Self, ValidationError> {
        let mut unique = Vec::<Recipient>::with_capacity(recipients.len());
        for recipient in recipients {
            if !unique.contains(&recipient) {
                unique.push(recipient);
            }
        }

        if unique.is_empty() {
            return Err(ValidationError::Empty {
                field: Recipient::FIELD,
            });
        }
        if unique.len() > max_recipients {
            return Err(ValidationError::TooManyRecipients {
                max: max_recipients,
                actual: unique.len(),
            });
        }
        Ok(Self {
            recipients: unique,
            message,
        })
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    /// Message parts to post, in order.
    ///
    /// A message longer than `max_len` is an error unless `split` is set.
    pub fn parts(&self, max_len: usize, split: bool) -> Result<Vec<String>, ValidationError> {
        let actual = self.message.char_len();
        if actual <= max_len {
            return Ok(vec![self.message.as_str().to_owned()]);
        }
        if !split {
            return Err(ValidationError::MessageTooLong {
                max: max_len,
                actual,
            });
        }
        Ok(self.message.chunks(max_len))
    }
}
