use anyhow::Context;
use mwood_config::EmailConfig;
use mwood_email_impl::EmailServiceImpl;

/// Display name on outgoing emails.
const SENDER_NAME: &str = "MWood Website";

/// Set up the transport for the configured SMTP relay
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let from = config.username.clone().with_name(SENDER_NAME.into());
    EmailServiceImpl::new(config, from).context("Failed to connect to SMTP relay")
}
