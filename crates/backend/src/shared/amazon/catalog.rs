use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Площадка Amazon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marketplace {
    Jp,
    Us,
}

impl Marketplace {
    pub fn host(&self) -> &'static str {
        match self {
            Marketplace::Jp => "webservices.amazon.co.jp",
            Marketplace::Us => "webservices.amazon.com",
        }
    }

    pub fn region(&self) -> &'static str {
        match self {
            Marketplace::Jp => "us-west-2",
            Marketplace::Us => "us-east-1",
        }
    }

    pub fn domain(&self) -> &'static str {
        match self {
            Marketplace::Jp => "www.amazon.co.jp",
            Marketplace::Us => "www.amazon.com",
        }
    }

    pub fn currency(&self) -> &'static str {
        match self {
            Marketplace::Jp => "JPY",
            Marketplace::Us => "USD",
        }
    }
}

/// Карточка товара из каталога
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogItem {
    pub asin: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub availability: bool,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// Источник данных о товарах Amazon
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// `Ok(None)` - товар не найден
    async fn lookup(&self, marketplace: Marketplace, asin: &str) -> anyhow::Result<Option<CatalogItem>>;
}

/// Каталог без ключей PA-API: любой товар "не найден"
#[derive(Debug, Default)]
pub struct UnconfiguredCatalog {
    warned: AtomicBool,
}

#[async_trait]
impl CatalogProvider for UnconfiguredCatalog {
    async fn lookup(&self, marketplace: Marketplace, asin: &str) -> anyhow::Result<Option<CatalogItem>> {
        if !self.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "Amazon credentials are not configured, catalog lookups return nothing"
            );
        }
        tracing::debug!("Skipping {} lookup for {}", marketplace.domain(), asin);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_catalog_finds_nothing() {
        let catalog = UnconfiguredCatalog::default();
        assert!(catalog.lookup(Marketplace::Jp, "B000000001").await.unwrap().is_none());
        assert!(catalog.lookup(Marketplace::Us, "B000000001").await.unwrap().is_none());
        assert!(catalog.warned.load(Ordering::Relaxed));
    }

    #[test]
    fn test_marketplace_endpoints() {
        assert_eq!(Marketplace::Jp.host(), "webservices.amazon.co.jp");
        assert_eq!(Marketplace::Jp.region(), "us-west-2");
        assert_eq!(Marketplace::Us.region(), "us-east-1");
        assert_eq!(Marketplace::Us.currency(), "USD");
    }
}
