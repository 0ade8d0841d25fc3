//! Client layer: logs into a carrier portal and posts the send form over one session.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::{Carrier, Password, SendReport, SendWebText, Username, ValidationError};
use crate::portal::PortalProfile;
use crate::transport::FormOutcome;

const DEFAULT_USER_AGENT: &str = concat!("cliresms/", env!("CARGO_PKG_VERSION"));

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Portal account credentials.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate that both parts are non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`WebTextClient`].
pub enum WebTextError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the portal.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The portal refused the login form.
    #[error("{} rejected the login", .carrier.display_name())]
    LoginRejected { carrier: Carrier },

    /// The portal refused the send form for one message part (1-based).
    #[error("part {part} was not sent{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    SendRejected { part: usize, reason: Option<String> },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`WebTextClient`].
pub struct WebTextClientBuilder {
    carrier: Carrier,
    credentials: Credentials,
    profile: PortalProfile,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl WebTextClientBuilder {
    pub fn new(carrier: Carrier, credentials: Credentials, profile: PortalProfile) -> Self {
        Self {
            carrier,
            credentials,
            profile,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the portal profile and build a [`WebTextClient`].
    pub fn build(self) -> Result<WebTextClient, WebTextError> {
        self.profile.validate()?;

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            );
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| WebTextError::Transport(Box::new(err)))?;

        Ok(WebTextClient {
            carrier: self.carrier,
            credentials: self.credentials,
            profile: self.profile,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Sends web texts through one carrier's portal.
///
/// Each [`WebTextClient::send`] logs in first and then posts one send form per
/// message part. The session cookie set by the login carries over to the sends.
pub struct WebTextClient {
    carrier: Carrier,
    credentials: Credentials,
    profile: PortalProfile,
    http: Arc<dyn HttpTransport>,
}

impl WebTextClient {
    pub fn builder(
        carrier: Carrier,
        credentials: Credentials,
        profile: PortalProfile,
    ) -> WebTextClientBuilder {
        WebTextClientBuilder::new(carrier, credentials, profile)
    }

    pub fn carrier(&self) -> Carrier {
        self.carrier
    }

    pub fn profile(&self) -> &PortalProfile {
        &self.profile
    }

    /// Log in and send `request`.
    ///
    /// Errors:
    /// - [`WebTextError::Validation`] when the message or recipients do not fit the
    ///   profile; nothing is posted in that case,
    /// - [`WebTextError::HttpStatus`] for non-2xx responses,
    /// - [`WebTextError::LoginRejected`] / [`WebTextError::SendRejected`] when the
    ///   configured response markers say the portal refused a form.
    pub async fn send(
        &self,
        request: &SendWebText,
        split: bool,
    ) -> Result<SendReport, WebTextError> {
        if request.recipients().len() > self.profile.max_recipients {
            return Err(ValidationError::TooManyRecipients {
                max: self.profile.max_recipients,
                actual: request.recipients().len(),
            }
            .into());
        }
        let parts = request.parts(self.profile.max_message_len, split)?;

        info!(
            carrier = %self.carrier,
            username = self.credentials.username.as_str(),
            "logging in"
        );
        let params = crate::transport::encode_login_form(
            &self.profile,
            &self.credentials.username,
            &self.credentials.password,
        );
        let body = self.post(&self.profile.login_url, params).await?;
        if let FormOutcome::Rejected { .. } =
            crate::transport::classify_login_body(&self.profile, &body)
        {
            return Err(WebTextError::LoginRejected {
                carrier: self.carrier,
            });
        }

        let total = parts.len();
        for (idx, part) in parts.iter().enumerate() {
            let part_no = idx + 1;
            debug!(part = part_no, total, chars = part.chars().count(), "posting send form");
            let params =
                crate::transport::encode_send_form(&self.profile, request.recipients(), part);
            let body = self.post(&self.profile.send_url, params).await?;
            if let FormOutcome::Rejected { reason } =
                crate::transport::classify_send_body(&self.profile, &body)
            {
                return Err(WebTextError::SendRejected {
                    part: part_no,
                    reason,
                });
            }
        }

        let recipients = crate::transport::render_recipients(&self.profile, request.recipients());
        info!(carrier = %self.carrier, recipients = ?recipients, parts = total, "web text sent");
        Ok(SendReport {
            carrier: self.carrier,
            recipients,
            parts: total,
        })
    }

    async fn post(
        &self,
        url: &str,
        params: Vec<(String, String)>,
    ) -> Result<String, WebTextError> {
        let response = self
            .http
            .post_form(url, params)
            .await
            .map_err(WebTextError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(WebTextError::HttpStatus {
                status: response.status,
                body,
            });
        }
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::domain::{MessageText, Recipient};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        requests: Vec<(String, Vec<(String, String)>)>,
        responses: VecDeque<(u16, String)>,
    }

    impl FakeTransport {
        fn new(responses: Vec<(u16, &str)>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    responses: responses
                        .into_iter()
                        .map(|(status, body)| (status, body.to_owned()))
                        .collect(),
                })),
            }
        }

        fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.state.lock().unwrap().requests.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.requests.push((url.to_owned(), params));
                    state
                        .responses
                        .pop_front()
                        .unwrap_or((200, String::new()))
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    fn profile() -> PortalProfile {
        PortalProfile::new(
            "https://example.invalid/login",
            "https://example.invalid/send",
        )
    }

    fn make_client(profile: PortalProfile, transport: FakeTransport) -> WebTextClient {
        WebTextClient {
            carrier: Carrier::Three,
            credentials: Credentials::new("0871234567", "secret").unwrap(),
            profile,
            http: Arc::new(transport),
        }
    }

    fn request(message: &str) -> SendWebText {
        SendWebText::new(
            vec![Recipient::parse("0861234567").unwrap()],
            MessageText::new(message).unwrap(),
            1,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn send_logs_in_then_posts_message() {
        let transport = FakeTransport::new(vec![(200, "welcome"), (200, "sent")]);
        let client = make_client(profile(), transport.clone());

        let report = client.send(&request("hello"), false).await.unwrap();
        assert_eq!(
            report,
            SendReport {
                carrier: Carrier::Three,
                recipients: vec!["0861234567".to_owned()],
                parts: 1,
            }
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "https://example.invalid/login");
        assert_param(&requests[0].1, "username", "0871234567");
        assert_param(&requests[0].1, "password", "secret");
        assert_eq!(requests[1].0, "https://example.invalid/send");
        assert_param(&requests[1].1, "recipients", "0861234567");
        assert_param(&requests[1].1, "message", "hello");
    }

    #[tokio::test]
    async fn send_posts_one_form_per_part_when_splitting() {
        let mut profile = profile();
        profile.max_message_len = 4;
        let transport = FakeTransport::new(Vec::new());
        let client = make_client(profile, transport.clone());

        let report = client.send(&request("abcdefghij"), true).await.unwrap();
        assert_eq!(report.parts, 3);

        let messages = transport
            .requests()
            .into_iter()
            .skip(1)
            .filter_map(|(_, params)| {
                params
                    .into_iter()
                    .find(|(k, _)| k == "message")
                    .map(|(_, v)| v)
            })
            .collect::<Vec<_>>();
        assert_eq!(messages, vec!["abcd", "efgh", "ij"]);
    }

    #[tokio::test]
    async fn too_long_message_fails_before_any_request() {
        let mut profile = profile();
        profile.max_message_len = 4;
        let transport = FakeTransport::new(Vec::new());
        let client = make_client(profile, transport.clone());

        let err = client.send(&request("abcdefghij"), false).await.unwrap_err();
        assert!(matches!(
            err,
            WebTextError::Validation(ValidationError::MessageTooLong { max: 4, actual: 10 })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn recipients_over_profile_limit_fail_before_any_request() {
        let transport = FakeTransport::new(Vec::new());
        let client = make_client(profile(), transport.clone());
        let request = SendWebText::new(
            vec![
                Recipient::parse("0861234567").unwrap(),
                Recipient::parse("0871234567").unwrap(),
            ],
            MessageText::new("hi").unwrap(),
            5,
        )
        .unwrap();

        let err = client.send(&request, false).await.unwrap_err();
        assert!(matches!(
            err,
            WebTextError::Validation(ValidationError::TooManyRecipients { max: 1, actual: 2 })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn login_failure_marker_maps_to_login_rejected() {
        let mut profile = profile();
        profile.login_failure_marker = Some("Incorrect password".to_owned());
        let transport = FakeTransport::new(vec![(200, "Incorrect password")]);
        let client = make_client(profile, transport.clone());

        let err = client.send(&request("hello"), false).await.unwrap_err();
        assert!(matches!(
            err,
            WebTextError::LoginRejected {
                carrier: Carrier::Three
            }
        ));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn send_failure_marker_reports_part() {
        let mut profile = profile();
        profile.max_message_len = 2;
        profile.failure_marker = Some("limit".to_owned());
        let transport =
            FakeTransport::new(vec![(200, "ok"), (200, "ok"), (200, "daily limit reached")]);
        let client = make_client(profile, transport);

        let err = client.send(&request("abcdef"), true).await.unwrap_err();
        match err {
            WebTextError::SendRejected { part, reason } => {
                assert_eq!(part, 2);
                assert_eq!(reason.as_deref(), Some("limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_maps_non_success_http_status() {
        let transport = FakeTransport::new(vec![(500, "oops")]);
        let client = make_client(profile(), transport);

        let err = client.send(&request("hello"), false).await.unwrap_err();
        assert!(matches!(
            err,
            WebTextError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));
    }

    #[tokio::test]
    async fn send_maps_empty_http_body_to_none() {
        let transport = FakeTransport::new(vec![(200, "welcome"), (503, "   ")]);
        let client = make_client(profile(), transport);

        let err = client.send(&request("hello"), false).await.unwrap_err();
        assert!(matches!(
            err,
            WebTextError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[test]
    fn credentials_validate_inputs() {
        assert!(Credentials::new("", "pass").is_err());
        assert!(Credentials::new("user", "").is_err());
        assert!(Credentials::new("user", "pass").is_ok());
    }

    #[test]
    fn builder_rejects_invalid_profile() {
        let err = WebTextClient::builder(
            Carrier::O2,
            Credentials::new("user", "pass").unwrap(),
            PortalProfile::new("not a url", "https://example.invalid/send"),
        )
        .build()
        .err()
        .unwrap();
        assert!(matches!(
            err,
            WebTextError::Validation(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn error_messages_name_the_failure() {
        let err = WebTextError::LoginRejected {
            carrier: Carrier::Vodafone,
        };
        assert_eq!(err.to_string(), "Vodafone rejected the login");

        let err = WebTextError::SendRejected {
            part: 2,
            reason: Some("limit".to_owned()),
        };
        assert_eq!(err.to_string(), "part 2 was not sent: limit");

        let err = WebTextError::SendRejected {
            part: 1,
            reason: None,
        };
        assert_eq!(err.to_string(), "part 1 was not sent");
    }
}
