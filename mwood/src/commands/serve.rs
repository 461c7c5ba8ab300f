use mwood_api_rest::{RealIpConfig, RestServer, RestServerConfig};
use mwood_config::Config;
use mwood_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use mwood_core_health_impl::{HealthServiceConfig, HealthServiceImpl};
use mwood_email_contracts::EmailService;
use mwood_templates_impl::TemplateServiceImpl;
use tracing::{info, warn};

use crate::email;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email_service = match &config.email {
        Some(email_config) => {
            info!("Connecting to SMTP relay");
            let email_service = email::connect(email_config)?;
            if let Err(err) = email_service.ping().await {
                warn!("Failed to ping SMTP relay: {err:#}");
            }
            Some(email_service)
        }
        None => {
            warn!("No SMTP relay configured, inquiries will be rejected");
            None
        }
    };

    let template_service = TemplateServiceImpl::default();

    let contact_service = ContactServiceImpl::new(
        email_service.clone(),
        template_service,
        ContactServiceConfig {
            recipient: config.contact.email.clone().into(),
        },
    );

    let health_service = HealthServiceImpl::new(
        email_service,
        HealthServiceConfig {
            cache_ttl: *config.health.cache_ttl,
        },
    );

    let server = RestServer::new(
        health_service,
        contact_service,
        RestServerConfig {
            real_ip: config.http.real_ip.as_ref().map(|real_ip| RealIpConfig {
                header: real_ip.header.clone(),
                set_from: real_ip.set_from,
            }),
        },
    );

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
