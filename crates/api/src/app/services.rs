//! Shared application state: store, notification bus, external gateway.

use std::path::Path;
use std::sync::Arc;

use bibloteka_catalog::CatalogStore;
use bibloteka_gateway::MetadataGateway;
use bibloteka_notify::NotificationBus;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the handlers need, shared as one `Arc<AppServices>` extension.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogStore,
    pub bus: NotificationBus,
    pub gateway: MetadataGateway,
}

impl AppServices {
    /// Open the catalog database at `path` and wire the bus to it.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        let catalog = CatalogStore::open(path).await?;
        Ok(Self::with_store(catalog, MetadataGateway::new()))
    }

    /// In-memory variant for tests.
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        let catalog = CatalogStore::open_in_memory().await?;
        Ok(Self::with_store(catalog, MetadataGateway::new()))
    }

    pub fn with_store(catalog: CatalogStore, gateway: MetadataGateway) -> Self {
        let bus = NotificationBus::new(Arc::new(catalog.clone()));
        Self { catalog, bus, gateway }
    }

    /// Push a ticker notification: persisted (best-effort) and fanned out to
    /// every open live-stream connection.
    pub async fn notify(&self, message: String) {
        self.bus.publish(&message).await;
    }
}
