use anyhow::anyhow;
use lettre::{
    message::{header, MessageBuilder, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use mwood_config::EmailConfig;
use mwood_email_contracts::{Email, EmailBody, EmailService};
use mwood_models::email_address::EmailAddressWithName;
use mwood_utils::Apply;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailServiceImpl {
    /// Creates a pooled transport for the relay described by `config`.
    /// Port 465 wraps the connection in tls immediately, any other port
    /// starts in cleartext and upgrades via starttls if the relay offers it.
    pub fn new(config: &EmailConfig, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let tls_parameters = TlsParameters::new(config.host.clone())?;
        let tls = match config.port {
            465 => Tls::Wrapper(tls_parameters),
            _ => Tls::Opportunistic(tls_parameters),
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(
                config.username.as_str().into(),
                config.password.0.clone(),
            ))
            .build();

        Ok(Self { from, transport })
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let builder = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(
                email.reply_to.map(|reply_to| reply_to.0),
                MessageBuilder::reply_to,
            )
            .subject(email.subject);

        let message = match email.body {
            EmailBody::Text(text) => builder.header(header::ContentType::TEXT_PLAIN).body(text)?,
            EmailBody::Html(html) => builder.header(header::ContentType::TEXT_HTML).body(html)?,
            EmailBody::Alternative { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))?
            }
        };

        let response = self.transport.send(message).await?;
        debug!(
            code = %response.code(),
            message = %response.message().collect::<Vec<_>>().join(" "),
            "smtp relay response"
        );
        Ok(response.is_positive())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp relay"))
    }
}
