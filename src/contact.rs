use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;

use crate::logging::{log_event, LogLevel};
use crate::overlay::ToastKind;

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";
const SENT_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
const FAILED_MESSAGE: &str = "Failed to send message. Please try again or contact me directly.";
const SENT_SETTLE_DELAY: Duration = Duration::from_millis(2_000);
const FAILED_SETTLE_DELAY: Duration = Duration::from_millis(3_000);

/// Values read from the contact form at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl ValidationError {
    pub fn toast_message(&self) -> &'static str {
        MISSING_FIELDS_MESSAGE
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing contact fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    pub to_email: String,
}

impl TemplateParams {
    fn from_fields(fields: &ContactFields, recipient: &str) -> Self {
        Self {
            from_name: fields.name.clone(),
            from_email: fields.email.clone(),
            subject: fields.subject.clone(),
            message: fields.message.clone(),
            to_email: recipient.to_string(),
        }
    }
}

/// Body of an EmailJS `email/send` call.
#[derive(Serialize)]
pub struct EmailJsRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: &'a TemplateParams,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryError {
    Network(String),
    Rejected { status: u16, body: String },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(reason) => write!(f, "email delivery request failed: {reason}"),
            Self::Rejected { status, body } => {
                write!(f, "email delivery rejected with status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Something that can hand a filled-in template to the email service.
#[allow(async_fn_in_trait)]
pub trait EmailDelivery {
    async fn send(&self, params: &TemplateParams) -> Result<(), DeliveryError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
    Submitting,
    Sent,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonFace {
    Idle,
    Pending,
    Sent,
    Failed,
}

impl ButtonFace {
    /// Markup for the submit control; `None` means the label captured before
    /// submitting.
    pub fn markup(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Pending => {
                Some(r#"<i class="fas fa-spinner fa-spin"></i> <span>Sending...</span>"#)
            }
            Self::Sent => Some(r#"<i class="fas fa-check"></i> <span>Message Sent!</span>"#),
            Self::Failed => {
                Some(r#"<i class="fas fa-exclamation-triangle"></i> <span>Failed to Send</span>"#)
            }
        }
    }

    pub fn disabled(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
}

/// What the page shows once the delivery call returns, and when it settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: DeliveryOutcome,
    pub face: ButtonFace,
    pub toast: ToastKind,
    pub message: &'static str,
    pub settle_after: Duration,
}

/// Follow-up work once a resolution's delay has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub close_modal: bool,
    pub reset_form: bool,
    pub face: ButtonFace,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitRejected {
    Invalid(ValidationError),
    InFlight,
}

#[derive(Debug)]
pub struct ContactModal {
    state: ModalState,
}

impl Default for ContactModal {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }
}

impl ContactModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn open(&mut self) {
        if self.state == ModalState::Closed {
            self.state = ModalState::Open;
        }
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    pub fn begin_submit(
        &mut self,
        fields: &ContactFields,
        recipient: &str,
    ) -> Result<TemplateParams, SubmitRejected> {
        if matches!(self.state, ModalState::Submitting | ModalState::Sent) {
            return Err(SubmitRejected::InFlight);
        }
        fields.validate().map_err(SubmitRejected::Invalid)?;

        self.state = ModalState::Submitting;
        Ok(TemplateParams::from_fields(fields, recipient))
    }

    pub fn finish_delivery(&mut self, result: &Result<(), DeliveryError>) -> Resolution {
        let resolution = match result {
            Ok(()) => Resolution {
                outcome: DeliveryOutcome::Delivered,
                face: ButtonFace::Sent,
                toast: ToastKind::Success,
                message: SENT_MESSAGE,
                settle_after: SENT_SETTLE_DELAY,
            },
            Err(_) => Resolution {
                outcome: DeliveryOutcome::Failed,
                face: ButtonFace::Failed,
                toast: ToastKind::Error,
                message: FAILED_MESSAGE,
                settle_after: FAILED_SETTLE_DELAY,
            },
        };

        if self.state == ModalState::Submitting {
            self.state = match resolution.outcome {
                DeliveryOutcome::Delivered => ModalState::Sent,
                DeliveryOutcome::Failed => ModalState::Failed,
            };
        }

        resolution
    }

    pub fn settle(&mut self, outcome: DeliveryOutcome) -> Settlement {
        match outcome {
            DeliveryOutcome::Delivered => {
                self.state = ModalState::Closed;
                Settlement {
                    close_modal: true,
                    reset_form: true,
                    face: ButtonFace::Idle,
                }
            }
            DeliveryOutcome::Failed => {
                if self.state == ModalState::Failed {
                    self.state = ModalState::Open;
                }
                Settlement {
                    close_modal: false,
                    reset_form: false,
                    face: ButtonFace::Idle,
                }
            }
        }
    }
}

/// Validates `fields`, runs the delivery call, and records its outcome on
/// `modal`. `on_pending` runs once the fields are accepted, before the call
/// goes out. No borrow of `modal` is held across the delivery await.
pub async fn submit_contact<D, P>(
    modal: &RefCell<ContactModal>,
    fields: &ContactFields,
    recipient: &str,
    delivery: &D,
    log_level: LogLevel,
    on_pending: P,
) -> Result<Resolution, SubmitRejected>
where
    D: EmailDelivery,
    P: FnOnce(ButtonFace),
{
    let params = match modal.borrow_mut().begin_submit(fields, recipient) {
        Ok(params) => params,
        Err(rejected) => {
            if let SubmitRejected::Invalid(error) = &rejected {
                log_event(
                    log_level,
                    LogLevel::Info,
                    "contact_submit_invalid",
                    json!({ "missing": error.missing }),
                );
            }
            return Err(rejected);
        }
    };

    on_pending(ButtonFace::Pending);
    let result = delivery.send(&params).await;
    match &result {
        Ok(()) => log_event(
            log_level,
            LogLevel::Info,
            "contact_delivery_sent",
            json!({ "to_email": params.to_email.as_str() }),
        ),
        Err(error) => log_event(
            log_level,
            LogLevel::Warn,
            "contact_delivery_failed",
            json!({ "error": error.to_string() }),
        ),
    }

    Ok(modal.borrow_mut().finish_delivery(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeDelivery {
        calls: Cell<usize>,
        last: RefCell<Option<TemplateParams>>,
        result: Result<(), DeliveryError>,
    }

    impl FakeDelivery {
        fn succeeding() -> Self {
            Self::with_result(Ok(()))
        }

        fn failing() -> Self {
            Self::with_result(Err(DeliveryError::Rejected {
                status: 400,
                body: "The template ID is invalid".to_string(),
            }))
        }

        fn with_result(result: Result<(), DeliveryError>) -> Self {
            Self {
                calls: Cell::new(0),
                last: RefCell::new(None),
                result,
            }
        }
    }

    impl EmailDelivery for FakeDelivery {
        async fn send(&self, params: &TemplateParams) -> Result<(), DeliveryError> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some(params.clone());
            self.result.clone()
        }
    }

    fn filled_fields() -> ContactFields {
        ContactFields {
            name: "Sita".to_string(),
            email: "sita@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Loved the portfolio.".to_string(),
        }
    }

    fn open_modal() -> RefCell<ContactModal> {
        let modal = ContactModal::new();
        let modal = RefCell::new(modal);
        modal.borrow_mut().open();
        modal
    }

    #[test]
    fn whitespace_only_fields_still_count_as_filled() {
        let fields = ContactFields {
            name: " ".to_string(),
            email: "a@b.c".to_string(),
            subject: "\t".to_string(),
            message: "m".to_string(),
        };

        assert!(fields.validate().is_ok());
    }

    #[tokio::test]
    async fn empty_field_is_rejected_without_delivery_call() {
        let modal = open_modal();
        let delivery = FakeDelivery::succeeding();

        for blank in ["name", "email", "subject", "message"] {
            let mut fields = filled_fields();
            match blank {
                "name" => fields.name.clear(),
                "email" => fields.email.clear(),
                "subject" => fields.subject.clear(),
                _ => fields.message.clear(),
            }

            let rejected = submit_contact(
                &modal,
                &fields,
                "me@example.com",
                &delivery,
                LogLevel::Warn,
                |_| {},
            )
            .await
            .expect_err("blank field must be rejected");
            let SubmitRejected::Invalid(error) = rejected else {
                panic!("expected a validation error");
            };
            assert_eq!(error.missing, vec![blank]);
            assert_eq!(error.toast_message(), "Please fill in all fields");
        }

        assert_eq!(delivery.calls.get(), 0);
        assert_eq!(modal.borrow().state(), ModalState::Open);
    }

    #[tokio::test]
    async fn successful_delivery_resets_and_closes_after_two_seconds() {
        let modal = open_modal();
        let delivery = FakeDelivery::succeeding();

        let resolution = submit_contact(
            &modal,
            &filled_fields(),
            "bajgainankit@gmail.com",
            &delivery,
            LogLevel::Warn,
            |face| assert_eq!(face, ButtonFace::Pending),
        )
        .await
        .expect("filled form is accepted");

        assert_eq!(delivery.calls.get(), 1);
        let sent = delivery.last.borrow().clone().expect("params recorded");
        assert_eq!(sent.from_name, "Sita");
        assert_eq!(sent.to_email, "bajgainankit@gmail.com");

        assert_eq!(resolution.outcome, DeliveryOutcome::Delivered);
        assert_eq!(resolution.face, ButtonFace::Sent);
        assert_eq!(resolution.toast, ToastKind::Success);
        assert_eq!(resolution.settle_after, Duration::from_millis(2_000));
        assert_eq!(modal.borrow().state(), ModalState::Sent);

        let settlement = modal.borrow_mut().settle(resolution.outcome);
        assert!(settlement.close_modal);
        assert!(settlement.reset_form);
        assert_eq!(settlement.face, ButtonFace::Idle);
        assert!(!settlement.face.disabled());
        assert_eq!(modal.borrow().state(), ModalState::Closed);
    }

    #[tokio::test]
    async fn failed_delivery_restores_button_after_three_seconds_and_keeps_modal() {
        let modal = open_modal();
        let delivery = FakeDelivery::failing();
        let fields = filled_fields();

        let resolution = submit_contact(
            &modal,
            &fields,
            "me@example.com",
            &delivery,
            LogLevel::Warn,
            |_| {},
        )
        .await
        .expect("filled form is accepted");

        assert_eq!(resolution.outcome, DeliveryOutcome::Failed);
        assert_eq!(resolution.face, ButtonFace::Failed);
        assert_eq!(resolution.toast, ToastKind::Error);
        assert_eq!(resolution.settle_after, Duration::from_millis(3_000));
        assert_eq!(modal.borrow().state(), ModalState::Failed);

        let settlement = modal.borrow_mut().settle(resolution.outcome);
        assert!(!settlement.close_modal);
        assert!(!settlement.reset_form);
        assert_eq!(settlement.face, ButtonFace::Idle);
        assert_eq!(modal.borrow().state(), ModalState::Open);
        assert_eq!(fields, filled_fields());
    }

    #[tokio::test]
    async fn manual_resubmit_after_failure_calls_delivery_again() {
        let modal = open_modal();
        let delivery = FakeDelivery::failing();

        let first = submit_contact(
            &modal,
            &filled_fields(),
            "me@example.com",
            &delivery,
            LogLevel::Warn,
            |_| {},
        )
        .await
        .expect("accepted");
        modal.borrow_mut().settle(first.outcome);
        submit_contact(
            &modal,
            &filled_fields(),
            "me@example.com",
            &delivery,
            LogLevel::Warn,
            |_| {},
        )
        .await
        .expect("accepted again");

        assert_eq!(delivery.calls.get(), 2);
    }

    #[test]
    fn submit_is_refused_while_a_delivery_is_pending() {
        let mut modal = ContactModal::new();
        modal.open();

        modal
            .begin_submit(&filled_fields(), "me@example.com")
            .expect("first submit accepted");
        let second = modal.begin_submit(&filled_fields(), "me@example.com");

        assert_eq!(second, Err(SubmitRejected::InFlight));
        assert_eq!(modal.state(), ModalState::Submitting);
    }

    #[test]
    fn closing_mid_flight_keeps_modal_closed_after_failure() {
        let mut modal = ContactModal::new();
        modal.open();
        modal
            .begin_submit(&filled_fields(), "me@example.com")
            .expect("accepted");
        modal.close();

        let resolution = modal.finish_delivery(&Err(DeliveryError::Network("offline".to_string())));
        modal.settle(resolution.outcome);

        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn button_faces() {
        assert_eq!(ButtonFace::Idle.markup(), None);
        assert!(ButtonFace::Pending
            .markup()
            .is_some_and(|markup| markup.contains("Sending...")));
        assert!(ButtonFace::Pending.disabled());
        assert!(ButtonFace::Sent.disabled());
        assert!(!ButtonFace::Idle.disabled());
    }

    #[test]
    fn emailjs_request_body_shape() {
        let params = TemplateParams::from_fields(&filled_fields(), "me@example.com");
        let body = EmailJsRequest {
            service_id: "service_pb5qpuq",
            template_id: "template_dgbye78",
            user_id: "public-key",
            template_params: &params,
        };

        let value = serde_json::to_value(&body).expect("serializable");
        assert_eq!(value["service_id"], "service_pb5qpuq");
        assert_eq!(value["user_id"], "public-key");
        assert_eq!(value["template_params"]["from_email"], "sita@example.com");
        assert_eq!(value["template_params"]["to_email"], "me@example.com");
    }

    #[test]
    fn delivery_errors_render_readably() {
        let error = DeliveryError::Rejected {
            status: 412,
            body: "quota".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "email delivery rejected with status 412: quota"
        );
    }
}
