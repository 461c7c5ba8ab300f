use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use mwood_core_health_contracts::{HealthService, HealthStatus};
use mwood_email_contracts::EmailService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthServiceImpl<Email> {
    email: Option<Email>,
    config: HealthServiceConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthServiceConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: Instant,
}

impl<Email> HealthServiceImpl<Email> {
    pub fn new(email: Option<Email>, config: HealthServiceConfig) -> Self {
        Self {
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Email> HealthService for HealthServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = Instant::now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|cached| now < cached.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|cached| now < cached.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }

        let email = match &self.email {
            Some(email) => email
                .ping()
                .await
                .inspect_err(|err| error!("Failed to ping smtp relay: {err}"))
                .is_ok(),
            None => false,
        };

        let status = HealthStatus { email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use mwood_email_contracts::MockEmailService;

    use super::*;

    #[tokio::test]
    async fn reachable_relay() {
        // Arrange
        let sut = HealthServiceImpl::new(Some(pinging_email(Ok(()))), config(Duration::ZERO));

        // Act
        let status = sut.get_status().await;

        // Assert
        assert_eq!(status, HealthStatus { email: true });
    }

    #[tokio::test]
    async fn unreachable_relay() {
        // Arrange
        let email = pinging_email(Err(anyhow::anyhow!("connection refused")));
        let sut = HealthServiceImpl::new(Some(email), config(Duration::ZERO));

        // Act
        let status = sut.get_status().await;

        // Assert
        assert_eq!(status, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn unconfigured_relay() {
        // Arrange
        let sut = HealthServiceImpl::<MockEmailService>::new(None, config(Duration::ZERO));

        // Act
        let status = sut.get_status().await;

        // Assert
        assert_eq!(status, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn cached_status_is_reused_within_ttl() {
        // Arrange
        // the mock panics if it is pinged more than once
        let email = pinging_email(Ok(()));
        let sut = HealthServiceImpl::new(Some(email), config(Duration::from_secs(3600)));

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn expired_status_is_checked_again() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_ping()
            .times(2)
            .returning(|| Box::pin(std::future::ready(Ok(()))));
        let sut = HealthServiceImpl::new(Some(email), config(Duration::ZERO));

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    fn config(cache_ttl: Duration) -> HealthServiceConfig {
        HealthServiceConfig { cache_ttl }
    }

    fn pinging_email(result: anyhow::Result<()>) -> MockEmailService {
        let mut email = MockEmailService::new();
        email
            .expect_ping()
            .once()
            .return_once(move || Box::pin(std::future::ready(result)));
        email
    }
}
