use mwood_core_contact_contracts::{ContactService, SendInquiryError, SEND_INQUIRY_CONFIRMATION};
use mwood_models::contact::{InquiryPayload, ServiceCategory};
use tokio::sync::RwLock;
use tracing::debug;
use url::form_urlencoded;

/// State machine behind the quote form. Tracks the selected service and the
/// submission status and hands validated submissions to the dispatcher.
///
/// All state lives behind a lock, so a shared reference is enough to drive
/// the form from ui callbacks.
pub struct ContactForm<C> {
    contact: C,
    state: RwLock<FormState>,
}

#[derive(Debug, Default)]
struct FormState {
    service: Option<ServiceCategory>,
    status: FormStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    /// Confirmation text to show to the submitter.
    Succeeded(String),
    /// Error text to show to the submitter.
    Failed(String),
}

/// Side effect the ui has to apply after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEffect {
    /// Bring the form into view, e.g. after following a booking link.
    ScrollIntoView,
}

/// Raw values of the form fields at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

impl<C: ContactService> ContactForm<C> {
    pub fn new(contact: C) -> Self {
        Self {
            contact,
            state: Default::default(),
        }
    }

    pub async fn selected_service(&self) -> Option<ServiceCategory> {
        self.state.read().await.service
    }

    pub async fn status(&self) -> FormStatus {
        self.state.read().await.status.clone()
    }

    pub async fn select_service(&self, service: Option<ServiceCategory>) {
        self.state.write().await.service = service;
    }

    /// Applies the `service` parameter of a booking link to the form. Known
    /// codes preselect the service and scroll the form into view, anything
    /// else leaves the current selection untouched.
    pub async fn sync_query(&self, query: &str) -> Option<FormEffect> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let service = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "service")
            .map(|(_, value)| value.into_owned())?;

        let Some(category) = ServiceCategory::from_code(&service) else {
            debug!(%service, "ignoring unknown service in booking link");
            return None;
        };

        self.state.write().await.service = Some(category);
        Some(FormEffect::ScrollIntoView)
    }

    /// Submits the form. Incomplete submissions fail locally without
    /// reaching the dispatcher, and while a submission is in flight any
    /// further ones are rejected.
    pub async fn submit(&self, fields: FieldValues) -> FormStatus {
        let mut state = self.state.write().await;
        if state.status == FormStatus::Submitting {
            return FormStatus::Submitting;
        }

        let service = state
            .service
            .filter(|_| !fields.name.trim().is_empty() && !fields.phone.trim().is_empty());
        let Some(service) = service else {
            let status = FormStatus::Failed(SendInquiryError::IncompleteInquiry.to_string());
            state.status = status.clone();
            return status;
        };
        state.status = FormStatus::Submitting;
        drop(state);

        let payload = InquiryPayload {
            name: fields.name,
            phone: fields.phone,
            email: Some(fields.email).filter(|email| !email.trim().is_empty()),
            service: service.code().into(),
            message: Some(fields.message).filter(|message| !message.trim().is_empty()),
        };

        let status = match self.contact.send_inquiry(payload).await {
            Ok(()) => FormStatus::Succeeded(SEND_INQUIRY_CONFIRMATION.into()),
            Err(err) => FormStatus::Failed(err.to_string()),
        };

        self.state.write().await.status = status.clone();
        status
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mwood_core_contact_contracts::MockContactService;
    use mwood_utils::assert_matches;
    use tokio::sync::Notify;

    use super::*;

    #[tokio::test]
    async fn starts_idle_and_unselected() {
        // Arrange
        let form = ContactForm::new(MockContactService::new());

        // Act + Assert
        assert_eq!(form.selected_service().await, None);
        assert_eq!(form.status().await, FormStatus::Idle);
    }

    #[tokio::test]
    async fn booking_link_preselects_service() {
        // Arrange
        let form = ContactForm::new(MockContactService::new());

        // Act
        let effect = form.sync_query("?service=carpet").await;

        // Assert
        assert_eq!(effect, Some(FormEffect::ScrollIntoView));
        assert_eq!(form.selected_service().await, Some(ServiceCategory::Carpet));

        // revisiting the same link scrolls again
        let effect = form.sync_query("service=carpet&utm=ad").await;
        assert_eq!(effect, Some(FormEffect::ScrollIntoView));
    }

    #[tokio::test]
    async fn unknown_booking_link_is_ignored() {
        // Arrange
        let form = ContactForm::new(MockContactService::new());
        form.select_service(Some(ServiceCategory::Sofa)).await;

        // Act + Assert
        for query in ["?service=deep", "?service=Sofa", "?foo=bar", ""] {
            assert_eq!(form.sync_query(query).await, None);
            assert_eq!(form.selected_service().await, Some(ServiceCategory::Sofa));
        }
    }

    #[tokio::test]
    async fn submit_full_form() {
        // Arrange
        let contact = MockContactService::new().with_send_inquiry(
            InquiryPayload {
                name: "Jane Doe".into(),
                phone: "+971501234567".into(),
                email: Some("jane.doe@example.com".into()),
                service: "carpet".into(),
                message: Some("Two carpets, one rug.".into()),
            },
            Ok(()),
        );
        let form = ContactForm::new(contact);
        form.select_service(Some(ServiceCategory::Carpet)).await;

        // Act
        let status = form.submit(fields()).await;

        // Assert
        assert_eq!(
            status,
            FormStatus::Succeeded("Thank you for your inquiry! We will get back to you soon.".into())
        );
        assert_eq!(form.status().await, status);
    }

    #[tokio::test]
    async fn blank_optional_fields_are_omitted() {
        // Arrange
        let contact = MockContactService::new().with_send_inquiry(
            InquiryPayload {
                name: "Jane Doe".into(),
                phone: "+971501234567".into(),
                email: None,
                service: "sofa".into(),
                message: None,
            },
            Ok(()),
        );
        let form = ContactForm::new(contact);
        form.select_service(Some(ServiceCategory::Sofa)).await;

        // Act
        let status = form
            .submit(FieldValues {
                email: "".into(),
                message: "   ".into(),
                ..fields()
            })
            .await;

        // Assert
        assert_matches!(status, FormStatus::Succeeded(_));
    }

    #[tokio::test]
    async fn incomplete_form_fails_locally() {
        for (service, broken) in [
            (None, fields()),
            (
                Some(ServiceCategory::Sofa),
                FieldValues {
                    name: "   ".into(),
                    ..fields()
                },
            ),
            (
                Some(ServiceCategory::Sofa),
                FieldValues {
                    phone: "".into(),
                    ..fields()
                },
            ),
        ] {
            // Arrange
            let form = ContactForm::new(MockContactService::new());
            form.select_service(service).await;

            // Act
            let status = form.submit(broken).await;

            // Assert
            assert_eq!(status, FormStatus::Failed("Missing required fields".into()));
            assert_eq!(form.status().await, status);
        }
    }

    #[tokio::test]
    async fn dispatch_failure_is_shown() {
        // Arrange
        let contact = MockContactService::new().with_send_inquiry(
            InquiryPayload {
                name: "Jane Doe".into(),
                phone: "+971501234567".into(),
                email: Some("jane.doe@example.com".into()),
                service: "sofa".into(),
                message: Some("Two carpets, one rug.".into()),
            },
            Err(SendInquiryError::NotConfigured),
        );
        let form = ContactForm::new(contact);
        form.select_service(Some(ServiceCategory::Sofa)).await;

        // Act
        let status = form.submit(fields()).await;

        // Assert
        assert_eq!(
            status,
            FormStatus::Failed("Email service is not configured. Please contact us directly.".into())
        );
    }

    #[tokio::test]
    async fn overlapping_submit_is_rejected() {
        // Arrange
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());

        let mut contact = MockContactService::new();
        contact.expect_send_inquiry().once().return_once({
            let started = Arc::clone(&started);
            let release = Arc::clone(&release);
            move |_| {
                Box::pin(async move {
                    started.notify_one();
                    release.notified().await;
                    Ok(())
                })
            }
        });

        let form = Arc::new(ContactForm::new(contact));
        form.select_service(Some(ServiceCategory::Sofa)).await;

        // Act
        let first = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit(fields()).await }
        });
        started.notified().await;

        let second = form.submit(fields()).await;
        release.notify_one();
        let first = first.await.unwrap();

        // Assert
        assert_eq!(second, FormStatus::Submitting);
        assert_matches!(first, FormStatus::Succeeded(_));
        assert_matches!(form.status().await, FormStatus::Succeeded(_));
    }

    fn fields() -> FieldValues {
        FieldValues {
            name: "Jane Doe".into(),
            phone: "+971501234567".into(),
            email: "jane.doe@example.com".into(),
            message: "Two carpets, one rug.".into(),
        }
    }
}
