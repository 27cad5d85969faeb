use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("a URL is required")]
    EmptyUrl,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Validated input for a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub url: String,
    pub memo: Option<String>,
}

impl SubmissionRequest {
    /// Trims both fields; a blank memo is dropped.
    pub fn parse(url: &str, memo: Option<&str>) -> Result<Self, InputError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(InputError::EmptyUrl);
        }
        let parsed = Url::parse(url).map_err(|err| InputError::InvalidUrl(err.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(InputError::UnsupportedScheme(other.to_string())),
        }
        if parsed.host_str().is_none() {
            return Err(InputError::InvalidUrl("missing host".to_string()));
        }

        let memo = memo
            .map(str::trim)
            .filter(|memo| !memo.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            url: url.to_string(),
            memo,
        })
    }
}
