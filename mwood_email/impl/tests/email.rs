use std::time::{Duration, Instant};

use anyhow::Context;
use mwood_config::EmailConfig;
use mwood_email_contracts::{Email, EmailBody, EmailService};
use mwood_email_impl::EmailServiceImpl;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a local smtp4dev instance"]
async fn send_email() {
    let client = setup().await;

    // multipart inquiry email with reply-to
    let result = client
        .email
        .send(Email {
            recipient: "inbox@example.com".parse().unwrap(),
            subject: "New Contact Form Submission - Sofa Cleaning".into(),
            body: EmailBody::Alternative {
                text: "Name: Jane Doe".into(),
                html: "<p><strong>Name:</strong> Jane Doe</p>".into(),
            },
            reply_to: Some("Jane Doe <jane.doe@example.com>".parse().unwrap()),
        })
        .await
        .unwrap();

    assert!(result);

    let mail = client.wait_for_mail().await;
    assert_eq!(mail.from, "mwood@example.com");
    assert_eq!(mail.to, "inbox@example.com");
    assert_eq!(mail.subject, "New Contact Form Submission - Sofa Cleaning");

    let details = client.fetch_email_details(mail.id).await;
    assert!(details.plain_text);
    let reply_to = details
        .headers
        .iter()
        .find(|header| header.name == "Reply-To")
        .unwrap();
    assert!(reply_to.value.contains("jane.doe@example.com"));

    let source = client.fetch_email_source(mail.id).await;
    assert!(source.contains("Name: Jane Doe"));
    assert!(source.contains("<p><strong>Name:</strong> Jane Doe</p>"));

    client.reset().await;

    // plain text email without reply-to
    let result = client
        .email
        .send(Email {
            recipient: "inbox@example.com".parse().unwrap(),
            subject: "The Subject".into(),
            body: EmailBody::Text("Hello World!".into()),
            reply_to: None,
        })
        .await
        .unwrap();

    assert!(result);

    let mail = client.wait_for_mail().await;
    let details = client.fetch_email_details(mail.id).await;
    assert!(details.plain_text);
    assert!(details.headers.iter().all(|header| header.name != "Reply-To"));

    let source = client.fetch_email_source(mail.id).await;
    assert!(source.contains("Hello World!"));
}

struct TestClient {
    email: EmailServiceImpl,
    smtp4dev_url: Url,
}

impl TestClient {
    async fn reset(&self) {
        reqwest::Client::new()
            .delete(self.smtp4dev_url.join("api/Messages/*").unwrap())
            .send()
            .await
            .unwrap()
            .error_for_status()
            .unwrap();
    }

    async fn wait_for_mail(&self) -> EmailSummary {
        let now = Instant::now();
        while now.elapsed() < Duration::from_secs(2) {
            let mut mailbox = self.fetch_mailbox().await;
            if let Some(mail) = mailbox.pop() {
                return mail;
            }
        }
        panic!("No email received");
    }

    async fn fetch_mailbox(&self) -> Vec<EmailSummary> {
        reqwest::Client::new()
            .get(self.smtp4dev_url.join("api/Messages").unwrap())
            .send()
            .await
            .unwrap()
            .error_for_status()
            .unwrap()
            .json::<PaginationResponse<_>>()
            .await
            .unwrap()
            .results
    }

    async fn fetch_email_details(&self, id: Uuid) -> EmailDetails {
        reqwest::Client::new()
            .get(
                self.smtp4dev_url
                    .join(&format!("api/Messages/{id}"))
                    .unwrap(),
            )
            .send()
            .await
            .unwrap()
            .error_for_status()
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn fetch_email_source(&self, id: Uuid) -> String {
        reqwest::Client::new()
            .get(
                self.smtp4dev_url
                    .join(&format!("api/Messages/{id}/source"))
                    .unwrap(),
            )
            .send()
            .await
            .unwrap()
            .error_for_status()
            .unwrap()
            .text()
            .await
            .unwrap()
    }
}

async fn setup() -> TestClient {
    let config = EmailConfig {
        host: std::env::var("SMTP4DEV_SMTP_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
        port: std::env::var("SMTP4DEV_SMTP_PORT")
            .ok()
            .map(|port| port.parse().unwrap())
            .unwrap_or(2525),
        username: "mwood@example.com".parse().unwrap(),
        password: "hunter2".to_owned().into(),
    };

    let email = EmailServiceImpl::new(&config, "MWood Website <mwood@example.com>".parse().unwrap())
        .unwrap();

    let smtp4dev_url = std::env::var("SMTP4DEV_URL")
        .context("Failed to read SMTP4DEV_URL environment variable")
        .unwrap()
        .parse()
        .context("Failed to parse SMTP4DEV_URL environment variable")
        .unwrap();

    let client = TestClient { email, smtp4dev_url };

    client.reset().await;

    client
}

#[derive(Debug, Deserialize)]
struct PaginationResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct EmailSummary {
    id: Uuid,
    from: String,
    to: String,
    subject: String,
}

#[derive(Debug, Deserialize)]
struct EmailDetails {
    headers: Vec<EmailHeader>,
    #[serde(rename = "hasPlainTextBody")]
    plain_text: bool,
}

#[derive(Debug, Deserialize)]
struct EmailHeader {
    name: String,
    value: String,
}
