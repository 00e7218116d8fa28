use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = "Mozilla/5.0 (program-advisor-bot/1.0)";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by all ingestion fetches: fixed user agent, bounded
/// per-request timeout, limited redirects.
pub fn http_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Fetch a page body as text. Non-success statuses are errors.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().await?.error_for_status()?;
    Ok(resp.text().await?)
}

/// Fetch a raw document body. Non-success statuses are errors.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url).send().await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
