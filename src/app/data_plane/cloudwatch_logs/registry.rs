//! Per-region CloudWatch Logs client registry.
//!
//! Clients are built lazily on first use of a region and then reused for the
//! lifetime of the registry. Each region owns a once-cell: concurrent first use
//! of one region builds exactly one client, while lookups for other regions
//! proceed without waiting on that construction.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_types::region::Region;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use super::client::{CloudWatchLogsClient, LogsProvider};
use crate::app::datasource::error::DatasourceError;

/// Builds a provider scoped to one region
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn create(&self, region: &str) -> Result<Arc<dyn LogsProvider>>;
}

/// Factory using the AWS default credential provider chain
#[derive(Debug, Default, Clone)]
pub struct AwsClientFactory;

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn create(&self, region: &str) -> Result<Arc<dyn LogsProvider>> {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        log_debug!("Created CloudWatch Logs client for region: {}", region);
        Ok(Arc::new(CloudWatchLogsClient::new(&aws_config, region)))
    }
}

/// Memoizes one provider client per region
pub struct ClientRegistry<F> {
    factory: F,
    default_region: Option<String>,
    clients: Mutex<HashMap<String, Arc<OnceCell<Arc<dyn LogsProvider>>>>>,
}

impl<F: ClientFactory> ClientRegistry<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            default_region: None,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Region used for targets that leave the region empty
    pub fn with_default_region(mut self, region: Option<String>) -> Self {
        self.default_region = region.filter(|r| !r.is_empty());
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Get the client for `region`, building it on first use
    pub async fn get_client(
        &self,
        region: &str,
    ) -> Result<Arc<dyn LogsProvider>, DatasourceError> {
        let region = self.resolve_region(region)?;

        // The map lock only covers the slot lookup, never client construction
        let slot = {
            let mut clients = self.clients.lock().await;
            Arc::clone(clients.entry(region.to_string()).or_default())
        };

        if let Some(client) = slot.get() {
            trace_debug!("Client cache hit for region: {}", region);
            return Ok(Arc::clone(client));
        }

        let client = slot
            .get_or_try_init(|| async move {
                trace_debug!("Client cache miss for region: {}", region);
                self.factory
                    .create(region)
                    .await
                    .map_err(DatasourceError::Client)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Number of regions with a cached client
    pub async fn len(&self) -> usize {
        self.clients
            .lock()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn resolve_region<'a>(&'a self, region: &'a str) -> Result<&'a str, DatasourceError> {
        if !region.is_empty() {
            return Ok(region);
        }
        self.default_region
            .as_deref()
            .ok_or(DatasourceError::MissingRegion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data_plane::cloudwatch_logs::fake::{FakeClientFactory, FakeLogsProvider};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Factory whose construction for `us-gated-1` waits until released
    struct GatedFactory {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ClientFactory for GatedFactory {
        async fn create(&self, region: &str) -> Result<Arc<dyn LogsProvider>> {
            if region == "us-gated-1" {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(Arc::new(FakeLogsProvider::new(region)))
        }
    }

    #[tokio::test]
    async fn test_same_region_returns_cached_client() {
        let registry = ClientRegistry::new(FakeClientFactory::new());

        let first = registry.get_client("us-east-1").await.unwrap();
        let second = registry.get_client("us-east-1").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.factory().created(), 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_regions_get_distinct_clients() {
        let registry = ClientRegistry::new(FakeClientFactory::new());

        let east = registry.get_client("us-east-1").await.unwrap();
        let west = registry.get_client("us-west-2").await.unwrap();

        assert!(!Arc::ptr_eq(&east, &west));
        assert_eq!(east.region(), "us-east-1");
        assert_eq!(west.region(), "us-west-2");
        assert_eq!(registry.factory().created(), 2);
    }

    #[tokio::test]
    async fn test_factory_failure_is_surfaced_and_not_cached() {
        let registry =
            ClientRegistry::new(FakeClientFactory::new().failing_with("no credentials found"));

        let err = registry.get_client("us-east-1").await.err().unwrap();

        assert!(matches!(err, DatasourceError::Client(_)));
        assert!(err.to_string().contains("no credentials found"));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_region_uses_default_or_fails() {
        let registry = ClientRegistry::new(FakeClientFactory::new());
        let err = registry.get_client("").await.err().unwrap();
        assert!(matches!(err, DatasourceError::MissingRegion));

        let registry = ClientRegistry::new(FakeClientFactory::new())
            .with_default_region(Some("ap-southeast-2".to_string()));
        let client = registry.get_client("").await.unwrap();
        assert_eq!(client.region(), "ap-southeast-2");
    }

    #[tokio::test]
    async fn test_concurrent_first_use_builds_one_client() {
        let registry = Arc::new(ClientRegistry::new(FakeClientFactory::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.get_client("eu-central-1").await.is_ok() })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(registry.factory().created(), 1);
    }

    #[tokio::test]
    async fn test_slow_construction_does_not_block_other_regions() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let registry = Arc::new(ClientRegistry::new(GatedFactory {
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        }));

        let gated = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .get_client("us-gated-1")
                    .await
                    .map(|client| client.region().to_string())
                    .ok()
            })
        };
        entered.notified().await;

        let other = tokio::time::timeout(Duration::from_secs(5), registry.get_client("us-west-2"))
            .await
            .expect("lookup for another region waited on a pending construction")
            .unwrap();
        assert_eq!(other.region(), "us-west-2");
        assert_eq!(registry.len().await, 1);

        release.notify_one();
        assert_eq!(gated.await.unwrap().as_deref(), Some("us-gated-1"));
        assert_eq!(registry.len().await, 2);
    }
}
