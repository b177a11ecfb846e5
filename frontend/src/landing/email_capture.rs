use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::runtime::storage::OrderBumpFlags;

pub const DISCOUNT_ENDPOINT: &str = "/api/send-discount-code";
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

const FAILED_TO_SEND: &str = "Failed to send code. Please try again.";
const COULD_NOT_SEND: &str = "Could not send the code. Please try again.";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Sending,
    Sent,
    Error,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DiscountCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryResponse {
    pub status: u16,
    pub body: String,
}

impl DeliveryResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("The request timed out. Please try again.")]
    TimedOut,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Enter a valid email to receive your 10% code.")]
    InvalidEmail,
    #[error("The code is already on its way.")]
    AlreadySending,
    #[error("The code was already sent.")]
    AlreadySent,
    #[error("{0}")]
    Delivery(String),
}

#[allow(async_fn_in_trait)]
pub trait DiscountCodeClient {
    async fn send(&self, request: &DiscountCodeRequest) -> Result<DeliveryResponse, TransportError>;
}

/// Posts to the discount-code endpoint, giving up after `timeout_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpDiscountClient {
    endpoint: String,
    timeout_ms: u32,
}

impl Default for HttpDiscountClient {
    fn default() -> Self {
        Self {
            endpoint: format!("{}{}", config::get_backend_url(), DISCOUNT_ENDPOINT),
            timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }
}

impl DiscountCodeClient for HttpDiscountClient {
    async fn send(&self, request: &DiscountCodeRequest) -> Result<DeliveryResponse, TransportError> {
        let call = async {
            let response = Request::post(&self.endpoint)
                .json(request)
                .map_err(|e| TransportError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok::<_, TransportError>(DeliveryResponse { status, body })
        };
        let timeout = TimeoutFuture::new(self.timeout_ms);
        futures::pin_mut!(call, timeout);

        match select(call, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(TransportError::TimedOut),
        }
    }
}

#[derive(Deserialize)]
struct DeliveryBody {
    success: Option<bool>,
    error: Option<String>,
}

/// Turns the endpoint's answer into success or the most specific message we have.
pub fn interpret_response(response: &DeliveryResponse) -> Result<(), String> {
    let parsed = serde_json::from_str::<DeliveryBody>(&response.body);
    if response.ok() {
        return match parsed {
            Ok(DeliveryBody {
                success: Some(false),
                ..
            }) => Err(FAILED_TO_SEND.to_string()),
            _ => Ok(()),
        };
    }

    let message = match parsed {
        Ok(body) => body.error.filter(|e| !e.trim().is_empty()),
        Err(_) => Some(response.body.trim().to_string()).filter(|t| !t.is_empty()),
    };
    Err(message.unwrap_or_else(|| FAILED_TO_SEND.to_string()))
}

pub fn transport_message(error: &TransportError) -> String {
    match error {
        TransportError::Network(message) if message.trim().is_empty() => COULD_NOT_SEND.to_string(),
        other => other.to_string(),
    }
}

pub async fn deliver<C: DiscountCodeClient>(client: &C, request: &DiscountCodeRequest) -> Result<(), String> {
    match client.send(request).await {
        Ok(response) => interpret_response(&response),
        Err(e) => Err(transport_message(&e)),
    }
}

/// Form state behind the order bump popup.
pub struct EmailCaptureFlow {
    status: SubmissionStatus,
    email: String,
    error: Option<String>,
    code: String,
    flags: OrderBumpFlags,
}

impl EmailCaptureFlow {
    pub fn new(code: impl Into<String>, flags: OrderBumpFlags) -> Self {
        Self {
            status: SubmissionStatus::Idle,
            email: String::new(),
            error: None,
            code: code.into(),
            flags,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_sending(&self) -> bool {
        self.status == SubmissionStatus::Sending
    }

    /// A sent code keeps its success view; anything else starts over blank.
    /// An in-flight request is left alone.
    pub fn on_open(&mut self) {
        if matches!(self.status, SubmissionStatus::Idle | SubmissionStatus::Error) {
            self.email.clear();
            self.error = None;
            self.status = SubmissionStatus::Idle;
        }
    }

    pub fn set_email(&mut self, email: String) {
        if !self.is_sending() {
            self.email = email;
        }
    }

    pub fn begin_submit(&mut self) -> Result<DiscountCodeRequest, CaptureError> {
        match self.status {
            SubmissionStatus::Sending => return Err(CaptureError::AlreadySending),
            SubmissionStatus::Sent => return Err(CaptureError::AlreadySent),
            SubmissionStatus::Idle | SubmissionStatus::Error => {}
        }

        self.error = None;
        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            let error = CaptureError::InvalidEmail;
            self.error = Some(error.to_string());
            return Err(error);
        }

        self.status = SubmissionStatus::Sending;
        Ok(DiscountCodeRequest {
            email,
            code: self.code.clone(),
        })
    }

    pub fn finish(&mut self, outcome: Result<(), String>) -> Result<(), CaptureError> {
        if !self.is_sending() {
            debug!("Ignoring delivery result in state {:?}", self.status);
            return Ok(());
        }
        match outcome {
            Ok(()) => {
                self.flags.mark_email_submitted();
                self.status = SubmissionStatus::Sent;
                info!("order_bump_email_submitted source=scroll_popup");
                Ok(())
            }
            Err(message) => {
                warn!("Failed to send discount code: {}", message);
                self.error = Some(message.clone());
                self.status = SubmissionStatus::Error;
                Err(CaptureError::Delivery(message))
            }
        }
    }

    pub async fn submit<C: DiscountCodeClient>(&mut self, email: &str, client: &C) -> Result<(), CaptureError> {
        self.set_email(email.to_string());
        let request = self.begin_submit()?;
        let outcome = deliver(client, &request).await;
        self.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::storage::MemoryStore;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeClient {
        reply: Result<DeliveryResponse, TransportError>,
        calls: RefCell<Vec<DiscountCodeRequest>>,
    }

    impl FakeClient {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(DeliveryResponse {
                    status,
                    body: body.to_string(),
                }),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(error: TransportError) -> Self {
            Self {
                reply: Err(error),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl DiscountCodeClient for FakeClient {
        async fn send(&self, request: &DiscountCodeRequest) -> Result<DeliveryResponse, TransportError> {
            self.calls.borrow_mut().push(request.clone());
            self.reply.clone()
        }
    }

    fn flow() -> (EmailCaptureFlow, OrderBumpFlags) {
        let flags = OrderBumpFlags::new(Rc::new(MemoryStore::default()));
        (EmailCaptureFlow::new("JOBWIN10", flags.clone()), flags)
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn successful_capture_is_remembered() {
        let (mut flow, flags) = flow();
        let client = FakeClient::replying(200, r#"{"success":true}"#);

        flow.on_open();
        assert_eq!(flow.status(), SubmissionStatus::Idle);
        let result = block_on(flow.submit("  jane@example.com ", &client));

        assert_eq!(result, Ok(()));
        assert_eq!(flow.status(), SubmissionStatus::Sent);
        assert!(flags.email_submitted());
        assert_eq!(
            *client.calls.borrow(),
            vec![DiscountCodeRequest {
                email: "jane@example.com".to_string(),
                code: "JOBWIN10".to_string(),
            }]
        );

        flow.on_open();
        assert_eq!(flow.status(), SubmissionStatus::Sent);
        assert_eq!(
            block_on(flow.submit("jane@example.com", &client)),
            Err(CaptureError::AlreadySent)
        );
        assert_eq!(client.calls.borrow().len(), 1);
    }

    #[test]
    fn upstream_failure_leaves_the_form_editable() {
        let (mut flow, flags) = flow();
        let client = FakeClient::replying(502, r#"{"error":"Resend rejected the request"}"#);

        let result = block_on(flow.submit("jane@example.com", &client));

        assert_eq!(
            result,
            Err(CaptureError::Delivery("Resend rejected the request".to_string()))
        );
        assert_eq!(flow.status(), SubmissionStatus::Error);
        assert_eq!(flow.error(), Some("Resend rejected the request"));
        assert!(!flags.email_submitted());

        flow.set_email("other@example.com".to_string());
        assert_eq!(flow.email(), "other@example.com");
        assert!(flow.begin_submit().is_ok());
    }

    #[test]
    fn invalid_email_never_reaches_the_network() {
        let (mut flow, _flags) = flow();
        let client = FakeClient::replying(200, "{}");

        let result = block_on(flow.submit("not-an-email", &client));

        assert_eq!(result, Err(CaptureError::InvalidEmail));
        assert_eq!(flow.error(), Some("Enter a valid email to receive your 10% code."));
        assert_eq!(flow.status(), SubmissionStatus::Idle);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn double_submit_is_rejected_while_sending() {
        let (mut flow, _flags) = flow();
        flow.set_email("jane@example.com".to_string());
        assert!(flow.begin_submit().is_ok());

        flow.set_email("changed@example.com".to_string());
        assert_eq!(flow.email(), "jane@example.com");
        assert_eq!(flow.begin_submit(), Err(CaptureError::AlreadySending));

        flow.on_open();
        assert!(flow.is_sending());
    }

    #[test]
    fn reopening_after_an_error_clears_the_form() {
        let (mut flow, _flags) = flow();
        let client = FakeClient::failing(TransportError::TimedOut);
        let _ = block_on(flow.submit("jane@example.com", &client));
        assert_eq!(flow.error(), Some("The request timed out. Please try again."));

        flow.on_open();
        assert_eq!(flow.status(), SubmissionStatus::Idle);
        assert_eq!(flow.email(), "");
        assert_eq!(flow.error(), None);
    }

    #[test]
    fn response_messages_prefer_the_most_specific() {
        let reply = |status: u16, body: &str| {
            interpret_response(&DeliveryResponse {
                status,
                body: body.to_string(),
            })
        };

        assert_eq!(reply(200, r#"{"success":true}"#), Ok(()));
        assert_eq!(reply(200, "not json"), Ok(()));
        assert_eq!(reply(200, "{}"), Ok(()));
        assert_eq!(reply(200, r#"{"success":false}"#), Err(FAILED_TO_SEND.to_string()));
        assert_eq!(reply(400, r#"{"error":"A valid email is required."}"#), Err("A valid email is required.".to_string()));
        assert_eq!(reply(502, "upstream exploded"), Err("upstream exploded".to_string()));
        assert_eq!(reply(500, ""), Err(FAILED_TO_SEND.to_string()));
        assert_eq!(reply(500, r#"{"detail":"x"}"#), Err(FAILED_TO_SEND.to_string()));
    }

    #[test]
    fn empty_transport_errors_get_a_generic_message() {
        assert_eq!(transport_message(&TransportError::Network(String::new())), COULD_NOT_SEND);
        assert_eq!(transport_message(&TransportError::Network("offline".into())), "offline");
    }
}
