pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("no valid data received: {0}")]
    Extraction(String),

    #[error("unexpected profile state: {0}")]
    Schema(String),

    #[error("artwork unavailable: {0}")]
    Artwork(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl Error {
    pub fn fetch(url: impl ToString, source: impl Into<BoxError>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            source: source.into(),
        }
    }

    /// Transient errors leave the last known state in place.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Extraction(_))
    }
}
