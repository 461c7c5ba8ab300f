use mwood_models::contact::InquiryPayload;
use serde::{Deserialize, Serialize};

/// Inquiry submitted through the contact form.
///
/// Absent required fields deserialize to empty strings so that they are
/// rejected by inquiry validation instead of body parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInquiryPayload {
    /// Full name of the submitter
    #[serde(default)]
    pub name: String,
    /// Phone number of the submitter
    #[serde(default)]
    pub phone: String,
    /// Email address for written replies
    pub email: Option<String>,
    /// Requested service code, e.g. `sofa`
    #[serde(default)]
    pub service: String,
    /// Free text describing the request
    pub message: Option<String>,
}

impl From<ApiInquiryPayload> for InquiryPayload {
    fn from(value: ApiInquiryPayload) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            email: value.email,
            service: value.service,
            message: value.message,
        }
    }
}

/// Outcome of an inquiry dispatch as reported to the submitter.
#[derive(Debug, Serialize)]
pub struct ApiDispatchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
