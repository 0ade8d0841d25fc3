use crate::domain::Recipient;
use crate::portal::PortalProfile;

use super::{FormOutcome, push_extra_fields};

/// Recipients as they are written into the send form.
pub fn render_recipients(profile: &PortalProfile, recipients: &[Recipient]) -> Vec<String> {
    recipients
        .iter()
        .map(|recipient| recipient.render(profile.recipient_format).to_owned())
        .collect()
}

pub fn encode_send_form(
    profile: &PortalProfile,
    recipients: &[Recipient],
    part: &str,
) -> Vec<(String, String)> {
    let to = render_recipients(profile, recipients).join(&profile.recipient_separator);
    let mut params = vec![
        (profile.recipient_field.clone(), to),
        (profile.message_field.clone(), part.to_owned()),
    ];
    push_extra_fields(&mut params, profile);
    params
}

pub fn classify_send_body(profile: &PortalProfile, body: &str) -> FormOutcome {
    if let Some(marker) = profile.failure_marker.as_deref() {
        if body.contains(marker) {
            return FormOutcome::Rejected {
                reason: Some(marker.to_owned()),
            };
        }
    }
    if let Some(marker) = profile.success_marker.as_deref() {
        if !body.contains(marker) {
            return FormOutcome::Rejected { reason: None };
        }
    }
    FormOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use crate::domain::PhoneFormat;

    use super::*;

    fn profile() -> PortalProfile {
        PortalProfile::new("https://portal.example/login", "https://portal.example/send")
    }

    fn recipients() -> Vec<Recipient> {
        vec![
            Recipient::parse("087 123 4567").unwrap(),
            Recipient::parse("+353861234567").unwrap(),
        ]
    }

    #[test]
    fn encode_national_recipients_joined_by_separator() {
        let params = encode_send_form(&profile(), &recipients(), "hello");

        assert_eq!(
            params,
            vec![
                ("recipients".to_owned(), "0871234567,0861234567".to_owned()),
                ("message".to_owned(), "hello".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_e164_with_custom_layout() {
        let mut profile = profile();
        profile.recipient_field = "to".to_owned();
        profile.message_field = "text".to_owned();
        profile.recipient_separator = ";".to_owned();
        profile.recipient_format = PhoneFormat::E164;
        profile
            .extra_fields
            .insert("action".to_owned(), "send".to_owned());

        let params = encode_send_form(&profile, &recipients(), "hi");

        assert_eq!(
            params,
            vec![
                ("to".to_owned(), "+353871234567;+353861234567".to_owned()),
                ("text".to_owned(), "hi".to_owned()),
                ("action".to_owned(), "send".to_owned()),
            ]
        );
    }

    #[test]
    fn send_is_accepted_without_markers() {
        assert_eq!(classify_send_body(&profile(), ""), FormOutcome::Accepted);
    }

    #[test]
    fn failure_marker_wins_over_success_marker() {
        let mut profile = profile();
        profile.success_marker = Some("Message sent".to_owned());
        profile.failure_marker = Some("limit reached".to_owned());

        assert_eq!(
            classify_send_body(&profile, "Message sent? No: limit reached"),
            FormOutcome::Rejected {
                reason: Some("limit reached".to_owned())
            }
        );
        assert_eq!(
            classify_send_body(&profile, "Message sent"),
            FormOutcome::Accepted
        );
    }

    #[test]
    fn missing_success_marker_rejects() {
        let mut profile = profile();
        profile.success_marker = Some("Message sent".to_owned());

        assert_eq!(
            classify_send_body(&profile, "<html>login</html>"),
            FormOutcome::Rejected { reason: None }
        );
    }
}
