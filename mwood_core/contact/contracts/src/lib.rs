use std::future::Future;

use mwood_models::contact::{InquiryPayload, InvalidInquiry};
use thiserror::Error;

/// Confirmation shown to the submitter once the inquiry email went out.
pub const SEND_INQUIRY_CONFIRMATION: &str =
    "Thank you for your inquiry! We will get back to you soon.";

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validate a contact form submission and email it to the operator
    /// mailbox.
    fn send_inquiry(
        &self,
        payload: InquiryPayload,
    ) -> impl Future<Output = Result<(), SendInquiryError>> + Send;
}

/// Failures of [`ContactService::send_inquiry`]. The display texts are shown
/// to the submitter as-is, so they must never carry relay details.
#[derive(Debug, Error)]
pub enum SendInquiryError {
    #[error("Missing required fields")]
    IncompleteInquiry,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Email service is not configured. Please contact us directly.")]
    NotConfigured,
    #[error("Failed to send message. Please try again or contact us directly.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<InvalidInquiry> for SendInquiryError {
    fn from(err: InvalidInquiry) -> Self {
        match err {
            InvalidInquiry::MissingFields => Self::IncompleteInquiry,
            InvalidInquiry::InvalidEmail => Self::InvalidEmail,
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_inquiry(
        mut self,
        payload: InquiryPayload,
        result: Result<(), SendInquiryError>,
    ) -> Self {
        self.expect_send_inquiry()
            .once()
            .with(mockall::predicate::eq(payload))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
