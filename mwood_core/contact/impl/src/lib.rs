use mwood_core_contact_contracts::{ContactService, SendInquiryError};
use mwood_email_contracts::{Email, EmailBody, EmailService};
use mwood_models::{
    contact::{Inquiry, InquiryMessage, InquiryPayload},
    email_address::EmailAddressWithName,
};
use mwood_templates_contracts::{InquiryTemplate, TemplateService};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template> {
    email: Option<Email>,
    template: Template,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Operator mailbox inquiry emails are delivered to.
    pub recipient: EmailAddressWithName,
}

impl<Email, Template> ContactServiceImpl<Email, Template> {
    /// `email` is [`None`] when no smtp relay is configured, in which case
    /// every inquiry is rejected with [`SendInquiryError::NotConfigured`].
    pub fn new(email: Option<Email>, template: Template, config: ContactServiceConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, TemplateS> ContactService for ContactServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn send_inquiry(&self, payload: InquiryPayload) -> Result<(), SendInquiryError> {
        let inquiry = Inquiry::try_from(payload)?;

        let Some(email_service) = &self.email else {
            warn!("dropping inquiry, no smtp relay configured");
            return Err(SendInquiryError::NotConfigured);
        };

        let service = inquiry.service.label().to_owned();
        let subject = format!("New Contact Form Submission - {service}");

        let rendered = self.template.render(&InquiryTemplate {
            name: (*inquiry.name).clone(),
            phone: inquiry.phone.into_inner(),
            email: inquiry
                .email
                .as_ref()
                .map(|email| email.as_str().to_owned()),
            service,
            message: inquiry.message.map(InquiryMessage::into_inner),
        })?;

        let email = Email {
            recipient: self.config.recipient.clone(),
            subject,
            body: EmailBody::Alternative {
                text: rendered.text,
                html: rendered.html,
            },
            reply_to: inquiry
                .email
                .map(|email| email.with_name(inquiry.name.into_inner())),
        };

        let accepted = email_service.send(email).await.map_err(|err| {
            error!("Failed to send inquiry email: {err:#}");
            SendInquiryError::Send
        })?;
        if !accepted {
            return Err(SendInquiryError::Send);
        }

        Ok(())
    }
}
