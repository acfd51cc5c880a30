use std::time::Duration;

use reqwest::Client;

use crate::error::Result;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch the caller's public IP from an endpoint that returns it as the
/// whole plain-text body. Endpoints tend to append a trailing newline, so
/// the body is trimmed.
pub async fn get_current_ip(endpoint: &str) -> Result<String> {
    let body = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()?
        .get(endpoint)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body.trim().to_string())
}
