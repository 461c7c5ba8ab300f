use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email_address::EmailAddress;

/// The closed set of services advertised on the website. Booking links, the
/// contact form and the dispatch service all refer to services through this
/// catalog so the three cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Sofa,
    Carpet,
    Curtain,
    Other,
}

impl ServiceCategory {
    pub const ALL: [Self; 4] = [Self::Sofa, Self::Carpet, Self::Curtain, Self::Other];

    /// Stable identifier used in booking links and submission payloads.
    pub fn code(self) -> &'static str {
        match self {
            Self::Sofa => "sofa",
            Self::Carpet => "carpet",
            Self::Curtain => "curtain",
            Self::Other => "other",
        }
    }

    /// Human readable label used in email subjects and bodies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sofa => "Sofa Cleaning",
            Self::Carpet => "Carpet Cleaning",
            Self::Curtain => "Curtain Cleaning",
            Self::Other => "Other Service",
        }
    }

    /// Resolves a wire code to its category. Codes match exactly, so `"deep"`
    /// or `"Sofa"` resolve to [`None`].
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.code() == code)
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct InquiryName(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct InquiryPhone(String);

/// Service identifier as submitted by a client. Usually one of the
/// [`ServiceCategory`] codes, but unknown codes are kept verbatim and fall
/// back to labeling themselves.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ServiceCode(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 4096),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct InquiryMessage(String);

impl ServiceCode {
    pub fn category(&self) -> Option<ServiceCategory> {
        ServiceCategory::from_code(self)
    }

    /// Labels resolve through the catalog and fall back to the raw code, so
    /// every inquiry can be rendered even if the catalog changes under it.
    pub fn label(&self) -> &str {
        self.category().map(ServiceCategory::label).unwrap_or(self)
    }
}

/// A contact form submission as it arrives over the wire. Field values are
/// unchecked, [`Inquiry`] is the validated counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryPayload {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A validated inquiry. Name, phone and service are always present, email and
/// message are omitted when the submitter left them blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    pub name: InquiryName,
    pub phone: InquiryPhone,
    pub email: Option<EmailAddress>,
    pub service: ServiceCode,
    pub message: Option<InquiryMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInquiry {
    #[error("missing required fields")]
    MissingFields,
    #[error("invalid email address")]
    InvalidEmail,
}

impl TryFrom<InquiryPayload> for Inquiry {
    type Error = InvalidInquiry;

    fn try_from(payload: InquiryPayload) -> Result<Self, Self::Error> {
        let name =
            InquiryName::try_from(payload.name).map_err(|_| InvalidInquiry::MissingFields)?;
        let phone =
            InquiryPhone::try_from(payload.phone).map_err(|_| InvalidInquiry::MissingFields)?;
        let service =
            ServiceCode::try_from(payload.service).map_err(|_| InvalidInquiry::MissingFields)?;

        let email = payload
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(|email| email.parse().map_err(|_| InvalidInquiry::InvalidEmail))
            .transpose()?;

        let message = payload
            .message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(|message| {
                InquiryMessage::try_from(message.to_owned())
                    .map_err(|_| InvalidInquiry::MissingFields)
            })
            .transpose()?;

        Ok(Self {
            name,
            phone,
            email,
            service,
            message,
        })
    }
}
