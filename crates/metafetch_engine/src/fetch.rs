use std::time::Duration;

use engine_logging::engine_trace;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;

use crate::{FailureKind, FetchError, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types (without parameters) a catalog response may carry.
    pub accepted_media_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 2 * 1024 * 1024,
            accepted_media_types: [
                "application/json",
                "application/javascript",
                "text/javascript",
                "text/plain",
            ]
            .map(String::from)
            .to_vec(),
            user_agent: concat!("metafetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// GETs one catalog URL and returns the body once it is known to be a
/// successful, size-bounded API response.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(Policy::limited(self.settings.redirect_limit))
            .user_agent(self.settings.user_agent.as_str())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn check_media_type(&self, content_type: &str) -> Result<(), FetchError> {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        let accepted = self
            .settings
            .accepted_media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type));
        if accepted {
            Ok(())
        } else {
            Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: content_type.to_string(),
                },
                "not an API response",
            ))
        }
    }

    fn check_size(&self, len: u64) -> Result<(), FetchError> {
        if len <= self.settings.max_bytes {
            return Ok(());
        }
        Err(FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(len),
            },
            "response too large",
        ))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .client()?
            .get(url)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = content_type.as_deref() {
            self.check_media_type(content_type)?;
        }

        let mut bytes = Vec::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(classify)?;
            self.check_size((bytes.len() + chunk.len()) as u64)?;
            bytes.extend_from_slice(&chunk);
        }
        engine_trace!("received {} bytes ({:?})", bytes.len(), content_type);

        Ok(FetchOutput {
            bytes,
            content_type,
        })
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
