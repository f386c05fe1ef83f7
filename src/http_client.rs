use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

// Report generation runs an LLM pipeline server-side; give it room.
const REQUEST_TIMEOUT_SECS: u64 = 60;

const DEFAULT_API_BASE: &str = "http://localhost:8002/api/v1";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

pub fn api_base() -> String {
    env::var("SCOUT_API_BASE")
        .ok()
        .map(|val| val.trim().trim_end_matches('/').to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

pub fn api_url(path: &str) -> String {
    format!("{}{path}", api_base())
}

/// GET with one retry on transport errors. Retrying is safe here: every GET
/// on this API is idempotent. Non-2xx responses are not retried.
pub fn get_text(path: &str, params: &[(&str, String)]) -> Result<String> {
    let client = http_client()?;
    let url = api_url(path);

    let send = || client.get(&url).query(params).send();
    let resp = match send() {
        Ok(resp) => resp,
        Err(_) => send().with_context(|| format!("GET {url} failed"))?,
    };

    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}: {body}"));
    }
    Ok(body)
}

/// POST is fire-once; the backend may have side effects (report generation).
pub fn post_text(path: &str, body: &serde_json::Value) -> Result<String> {
    let client = http_client()?;
    let url = api_url(path);
    let resp = client
        .post(&url)
        .json(body)
        .send()
        .with_context(|| format!("POST {url} failed"))?;

    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}: {body}"));
    }
    Ok(body)
}

pub fn delete(path: &str) -> Result<()> {
    let client = http_client()?;
    let url = api_url(path);
    let resp = client
        .delete(&url)
        .send()
        .with_context(|| format!("DELETE {url} failed"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(anyhow::anyhow!("http {status}: {body}"));
    }
    Ok(())
}
