//! AWS Signature Version 4 для запросов PA-API

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::error::CatalogError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

pub struct Credentials<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
}

/// Данные запроса для подписи. Заголовки передаются в нижнем регистре.
pub struct SignatureInput<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    pub headers: &'a [(&'a str, String)],
    pub payload: &'a str,
    pub timestamp: DateTime<Utc>,
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CatalogError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| CatalogError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Производный ключ: kSecret -> kDate -> kRegion -> kService -> kSigning
pub fn signing_key(
    secret_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, CatalogError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Каноничный запрос и список подписанных заголовков
pub fn canonical_request(input: &SignatureInput<'_>) -> (String, String) {
    let mut headers: Vec<(String, String)> = input
        .headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
        .collect();
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical = format!(
        "{}\n{}\n\n{}\n{}\n{}",
        input.method,
        input.path,
        canonical_headers,
        signed_headers,
        sha256_hex(input.payload.as_bytes())
    );
    (canonical, signed_headers)
}

/// Значение заголовка Authorization
pub fn authorization_header(
    credentials: &Credentials<'_>,
    input: &SignatureInput<'_>,
) -> Result<String, CatalogError> {
    let amz_date = input.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date = input.timestamp.format("%Y%m%d").to_string();
    let scope = format!("{}/{}/{}/aws4_request", date, input.region, input.service);

    let (canonical, signed_headers) = canonical_request(input);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical.as_bytes())
    );

    let key = signing_key(credentials.secret_key, &date, input.region, input.service)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.access_key, scope, signed_headers, signature
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_signing_key_matches_aws_reference() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    fn input<'a>(headers: &'a [(&'a str, String)]) -> SignatureInput<'a> {
        SignatureInput {
            method: "POST",
            path: "/paapi5/getitems",
            region: "us-west-2",
            service: "ProductAdvertisingAPI",
            headers,
            payload: "",
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_canonical_request_sorts_and_lowercases_headers() {
        let headers = [
            ("X-Amz-Date", "20240301T123000Z".to_string()),
            ("host", " webservices.amazon.co.jp ".to_string()),
        ];
        let (canonical, signed) = canonical_request(&input(&headers));
        assert_eq!(signed, "host;x-amz-date");
        assert_eq!(
            canonical,
            "POST\n/paapi5/getitems\n\nhost:webservices.amazon.co.jp\nx-amz-date:20240301T123000Z\n\nhost;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_authorization_header_layout() {
        let headers = [("host", "webservices.amazon.co.jp".to_string())];
        let credentials = Credentials {
            access_key: "AKID",
            secret_key: "secret",
        };
        let header = authorization_header(&credentials, &input(&headers)).unwrap();
        assert!(header.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKID/20240301/us-west-2/ProductAdvertisingAPI/aws4_request, SignedHeaders=host, Signature="
        ));
        let signature = header.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
    }
}
