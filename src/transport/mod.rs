//! Transport layer: portal form encoding and response-body classification.

mod login;
mod send_text;

pub use login::{classify_login_body, encode_login_form};
pub use send_text::{classify_send_body, encode_send_form, render_recipients};

use crate::portal::PortalProfile;

/// How a portal answered a form post that came back with a 2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Accepted,
    Rejected { reason: Option<String> },
}

fn push_extra_fields(params: &mut Vec<(String, String)>, profile: &PortalProfile) {
    params.extend(
        profile
            .extra_fields
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
}
