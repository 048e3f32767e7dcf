//! Search clients for the two catalogs.
//!
//! A client only knows how to build its request URL; fetching, decoding and
//! parsing are shared by [`search`].

use engine_logging::{engine_debug, engine_trace, engine_warn};
use metafetch_core::raw::{parse_response, RawRecord};
use metafetch_core::SourceId;
use url::Url;

use crate::decode::{decode_body, strip_jsonp};
use crate::fetch::Fetcher;
use crate::{FailureKind, FetchError};

pub const GOOGLE_BASE_URL: &str = "https://www.googleapis.com";
pub const DOUBAN_BASE_URL: &str = "https://api.douban.com";
pub const DOUBAN_DEFAULT_COUNT: u32 = 10;

pub trait SourceClient: Send + Sync {
    fn source(&self) -> SourceId;
    fn search_url(&self, keyword: &str) -> Result<Url, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleBooksClient {
    pub base_url: String,
    pub jsonp_callback: Option<String>,
}

impl Default for GoogleBooksClient {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_BASE_URL.to_string(),
            jsonp_callback: None,
        }
    }
}

impl SourceClient for GoogleBooksClient {
    fn source(&self) -> SourceId {
        SourceId::Google
    }

    fn search_url(&self, keyword: &str) -> Result<Url, FetchError> {
        let mut url = endpoint(&self.base_url, "books/v1/volumes")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", &collapse_whitespace(keyword));
            if let Some(callback) = &self.jsonp_callback {
                query.append_pair("callback", callback);
            }
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubanClient {
    pub base_url: String,
    pub api_key: Option<String>,
    pub count: u32,
    pub jsonp_callback: Option<String>,
}

impl Default for DoubanClient {
    fn default() -> Self {
        Self {
            base_url: DOUBAN_BASE_URL.to_string(),
            api_key: None,
            count: DOUBAN_DEFAULT_COUNT,
            jsonp_callback: None,
        }
    }
}

impl SourceClient for DoubanClient {
    fn source(&self) -> SourceId {
        SourceId::Douban
    }

    fn search_url(&self, keyword: &str) -> Result<Url, FetchError> {
        let mut url = endpoint(&self.base_url, "v2/book/search")?;
        {
            let mut query = url.query_pairs_mut();
            match self.api_key.as_deref().filter(|key| !key.is_empty()) {
                Some(key) => {
                    query.append_pair("apikey", key);
                }
                None => engine_warn!("douban api key not configured, sending request without it"),
            }
            query.append_pair("q", keyword.trim());
            query.append_pair("fields", "all");
            query.append_pair("count", &self.count.to_string());
            if let Some(callback) = &self.jsonp_callback {
                query.append_pair("callback", callback);
            }
        }
        Ok(url)
    }
}

/// Runs one search against one catalog and returns its raw records.
///
/// A response without a result list yields an empty vector. Any transport,
/// decoding or top-level JSON failure is an `Err`.
pub async fn search(
    client: &dyn SourceClient,
    fetcher: &dyn Fetcher,
    keyword: &str,
) -> Result<Vec<RawRecord>, FetchError> {
    let source = client.source();
    let url = client.search_url(keyword)?;
    engine_debug!("{source}: GET {url}");

    let output = fetcher.fetch(url.as_str()).await?;
    let decoded = decode_body(&output.bytes, output.content_type.as_deref())
        .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()))?;
    engine_trace!("{source}: body decoded as {}", decoded.encoding_label);
    let json = strip_jsonp(&decoded.text);

    let records = parse_response(source, json)
        .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()))?;
    engine_debug!("{source}: {} records", records.len());
    Ok(records)
}

fn endpoint(base_url: &str, path: &str) -> Result<Url, FetchError> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn collapse_whitespace(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join(" ")
}
