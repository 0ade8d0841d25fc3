//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::SendWebText;
pub use response::SendReport;
pub use validation::ValidationError;
pub use value::{Carrier, MessageText, Password, PhoneFormat, Recipient, Username};
