use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request signing failed: {0}")]
    Signing(String),
}

impl CatalogError {
    /// Превышение лимита, сбой сервера или сети; такой запрос стоит повторить
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Http(e) => e.is_timeout() || e.is_connect(),
            CatalogError::Api { status, .. } => *status == 429 || *status >= 500,
            CatalogError::Signing(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> CatalogError {
        CatalogError::Api {
            status,
            message: "TooManyRequests".to_string(),
        }
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retried() {
        assert!(api(429).is_retryable());
        assert!(api(500).is_retryable());
        assert!(api(503).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(!api(401).is_retryable());
        assert!(!CatalogError::Signing("bad key".to_string()).is_retryable());
    }
}
