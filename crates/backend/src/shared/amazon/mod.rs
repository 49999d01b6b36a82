pub mod catalog;
pub mod error;
pub mod paapi;
pub mod signer;

use once_cell::sync::OnceCell;
use std::sync::Arc;

pub use catalog::{CatalogItem, CatalogProvider, Marketplace, UnconfiguredCatalog};
pub use error::CatalogError;
pub use paapi::PaapiClient;

use crate::shared::config::AmazonConfig;

static CATALOG: OnceCell<Arc<dyn CatalogProvider>> = OnceCell::new();

/// Выбор каталога по наличию ключей PA-API
pub fn initialize(config: &AmazonConfig) -> anyhow::Result<()> {
    let provider: Arc<dyn CatalogProvider> = if config.is_configured() {
        tracing::info!("Amazon PA-API catalog enabled");
        Arc::new(PaapiClient::new(config)?)
    } else {
        tracing::warn!("Amazon PA-API credentials missing, catalog lookups disabled");
        Arc::new(UnconfiguredCatalog::default())
    };
    CATALOG
        .set(provider)
        .map_err(|_| anyhow::anyhow!("Catalog provider already initialized"))
}

/// Текущий каталог. До `initialize` - каталог без ключей.
pub fn provider() -> Arc<dyn CatalogProvider> {
    CATALOG
        .get_or_init(|| Arc::new(UnconfiguredCatalog::default()))
        .clone()
}
