use crate::domain::{Password, Username};
use crate::portal::PortalProfile;

use super::{FormOutcome, push_extra_fields};

pub fn encode_login_form(
    profile: &PortalProfile,
    username: &Username,
    password: &Password,
) -> Vec<(String, String)> {
    let mut params = vec![
        (profile.username_field.clone(), username.as_str().to_owned()),
        (profile.password_field.clone(), password.as_str().to_owned()),
    ];
    push_extra_fields(&mut params, profile);
    params
}

pub fn classify_login_body(profile: &PortalProfile, body: &str) -> FormOutcome {
    match profile.login_failure_marker.as_deref() {
        Some(marker) if body.contains(marker) => FormOutcome::Rejected {
            reason: Some(marker.to_owned()),
        },
        _ => FormOutcome::Accepted,
    }
}
