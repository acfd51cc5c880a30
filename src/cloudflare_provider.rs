use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dns_provider::{DnsProvider, DnsRecord, UpdateRequest, Zone};
use crate::error::{Error, Result};

const CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 50;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ZoneListResponse {
    result: Option<Vec<Zone>>,
    success: bool,
    errors: Vec<Value>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DnsListResponse {
    result: Option<Vec<DnsRecord>>,
    success: bool,
    errors: Vec<Value>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UpdateResponse {
    success: bool,
    errors: Vec<Value>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ResultInfo {
    page: u32,
    total_pages: u32,
}

pub struct CloudflareProvider {
    client: Client,
    api_token: String,
    base_url: String,
}

impl CloudflareProvider {
    pub fn new(api_token: String) -> Result<CloudflareProvider> {
        Ok(CloudflareProvider {
            client: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            api_token,
            base_url: CLOUDFLARE_API_URL.to_string(),
        })
    }

    /// Point the provider at a different API base, for tests against a
    /// local mock server.
    #[cfg(test)]
    pub fn with_base_url(api_token: String, base_url: String) -> Result<CloudflareProvider> {
        Ok(CloudflareProvider {
            client: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            api_token,
            base_url,
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, page: u32) -> Result<T> {
        let url = format!(
            "{}/{}?page={}&per_page={}",
            self.base_url, path, page, PAGE_SIZE
        );
        debug!(%url, "listing {path}");
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_token),
            )
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api(format!(
                "{path} listing failed with HTTP {status}: {body}"
            )));
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::Api(format!("could not decode {path} listing: {e}")))
    }
}

impl DnsProvider for CloudflareProvider {
    async fn find_zone(&self, apex: &str) -> Result<Zone> {
        let mut page = 1;
        loop {
            let response: ZoneListResponse = self.get_page("zones", page).await?;
            if !response.success {
                return Err(Error::Api(format!(
                    "zone listing rejected: {}",
                    format_errors(&response.errors)
                )));
            }
            let zones = response.result.unwrap_or_default();
            if let Some(zone) = zones.into_iter().find(|zone| zone.name == apex) {
                debug!(zone = %zone.name, id = %zone.id, "matched zone");
                return Ok(zone);
            }
            match response.result_info {
                Some(info) if info.page < info.total_pages => page += 1,
                _ => break,
            }
        }
        Err(Error::NotFound(format!("domain '{apex}' in zone listing")))
    }

    async fn find_record(&self, zone_id: &str, name: &str) -> Result<DnsRecord> {
        let path = format!("zones/{zone_id}/dns_records");
        let mut page = 1;
        loop {
            let response: DnsListResponse = self.get_page(&path, page).await?;
            if !response.success {
                return Err(Error::Api(format!(
                    "record listing rejected: {}",
                    format_errors(&response.errors)
                )));
            }
            let records = response.result.unwrap_or_default();
            if let Some(record) = records.into_iter().find(|record| record.name == name) {
                debug!(record = %record.name, id = %record.id, "matched record");
                return Ok(record);
            }
            match response.result_info {
                Some(info) if info.page < info.total_pages => page += 1,
                _ => break,
            }
        }
        Err(Error::NotFound(format!("subdomain '{name}' in zone")))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &UpdateRequest,
    ) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, zone_id, record_id
        );
        let response = self
            .client
            .put(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_token),
            )
            .json(update)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        // A 200 can still carry success: false, so the envelope is checked
        // before the status line.
        let parsed: UpdateResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Api(format!("could not decode update response (HTTP {status}): {e}")))?;
        if !parsed.success {
            return Err(Error::Api(format!(
                "record update rejected: {}",
                format_errors(&parsed.errors)
            )));
        }
        if !status.is_success() {
            return Err(Error::Api(format!("record update failed with HTTP {status}")));
        }
        Ok(())
    }
}

fn format_errors(errors: &[Value]) -> String {
    if errors.is_empty() {
        "no error details given".to_string()
    } else {
        errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> CloudflareProvider {
        CloudflareProvider::with_base_url("test-token".to_string(), server.uri()).unwrap()
    }

    fn listing(result: Value, page: u32, total_pages: u32) -> Value {
        json!({
            "result": result,
            "success": true,
            "errors": [],
            "result_info": { "page": page, "total_pages": total_pages }
        })
    }

    #[tokio::test]
    async fn find_zone_returns_matching_zone_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(
                json!([
                    { "id": "Z0", "name": "other.net" },
                    { "id": "Z1", "name": "example.com" }
                ]),
                1,
                1,
            )))
            .mount(&server)
            .await;

        let zone = provider(&server).find_zone("example.com").await.unwrap();
        assert_eq!(zone.id, "Z1");
        assert_eq!(zone.name, "example.com");
    }

    #[tokio::test]
    async fn find_zone_reports_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing(json!([{ "id": "Z0", "name": "other.net" }]), 1, 1)),
            )
            .mount(&server)
            .await;

        let err = provider(&server).find_zone("example.com").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn find_zone_follows_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing(json!([{ "id": "Z0", "name": "other.net" }]), 1, 2)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing(json!([{ "id": "Z1", "name": "example.com" }]), 2, 2)),
            )
            .mount(&server)
            .await;

        let zone = provider(&server).find_zone("example.com").await.unwrap();
        assert_eq!(zone.id, "Z1");
    }

    #[tokio::test]
    async fn find_zone_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": null,
                "success": false,
                "errors": [{ "code": 9109, "message": "Invalid access token" }]
            })))
            .mount(&server)
            .await;

        let err = provider(&server).find_zone("example.com").await.unwrap_err();
        match err {
            Error::Api(message) => assert!(message.contains("Invalid access token")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_record_returns_content_and_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(
                json!([
                    { "id": "R0", "name": "example.com", "content": "9.9.9.9" },
                    { "id": "R1", "name": "home.example.com", "content": "1.2.3.4" }
                ]),
                1,
                1,
            )))
            .mount(&server)
            .await;

        let record = provider(&server)
            .find_record("Z1", "home.example.com")
            .await
            .unwrap();
        assert_eq!(record.id, "R1");
        assert_eq!(record.content, "1.2.3.4");
    }

    #[tokio::test]
    async fn find_record_reports_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 1, 1)))
            .mount(&server)
            .await;

        let err = provider(&server)
            .find_record("Z1", "home.example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn update_record_puts_expected_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/zones/Z1/dns_records/R1"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(json!({
                "type": "A",
                "name": "home.example.com",
                "content": "5.6.7.8",
                "ttl": 3600
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "errors": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let update = UpdateRequest::a_record("home.example.com", "5.6.7.8");
        provider(&server)
            .update_record("Z1", "R1", &update)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_record_surfaces_api_level_failure() {
        let server = MockServer::start().await;
        // Transport succeeded, but the provider rejected the change.
        Mock::given(method("PUT"))
            .and(path("/zones/Z1/dns_records/R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 1004, "message": "DNS Validation Error" }]
            })))
            .mount(&server)
            .await;

        let update = UpdateRequest::a_record("home.example.com", "5.6.7.8");
        let err = provider(&server)
            .update_record("Z1", "R1", &update)
            .await
            .unwrap_err();
        match err {
            Error::Api(message) => assert!(message.contains("DNS Validation Error")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_record_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/zones/Z1/dns_records/R1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 9109, "message": "Invalid access token" }]
            })))
            .mount(&server)
            .await;

        let update = UpdateRequest::a_record("home.example.com", "5.6.7.8");
        let err = provider(&server)
            .update_record("Z1", "R1", &update)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(_)), "got {err:?}");
    }
}
