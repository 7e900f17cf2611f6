use crate::error::QuestError;
use crate::models::config::HttpConfig;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use reqwest::header::CONTENT_TYPE;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// How far into the body a `<meta charset>` is looked for
const META_SNIFF_BYTES: usize = 2048;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*charset\s*=\s*["']?([A-Za-z0-9_.:\-]+)"#).expect("meta charset pattern")
});

/// A downloaded page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub body: String,
}

/// GETs pages with a browser-like identity
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Non-success status is `Network`; running past `timeout` is `Timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, QuestError>;
}

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, QuestError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| QuestError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, QuestError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        let final_url = response.url().to_string();
        let header_charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);
        let bytes = response.bytes().await?;
        let body = decode_body(&bytes, header_charset.as_deref());
        debug!(url = %final_url, bytes = bytes.len(), "Fetched");

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

/// `charset` parameter of a Content-Type value
fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let label = META_CHARSET.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

/// Decode a page body: BOM, then header charset, then `<meta charset>`, else UTF-8
pub fn decode_body(bytes: &[u8], header_charset: Option<&str>) -> String {
    let encoding = header_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| meta_charset(bytes))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "Body had undecodable bytes");
    }
    text.into_owned()
}
