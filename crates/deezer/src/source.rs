use crate::{Error, Result};
use async_trait::async_trait;
use deezer_overlay_core::{urls, EndpointsConfig};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Transport for the two remote resources a fetch needs.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile_page(&self, profile_id: u64) -> Result<String>;
    async fn artwork(&self, artwork_ref: &str) -> Result<Vec<u8>>;
}

pub struct HttpSource {
    client: reqwest::Client,
    profile_base: Url,
    cdn_base: Url,
}

impl HttpSource {
    pub fn new(cfg: &EndpointsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            profile_base: Url::parse(&cfg.profile_base_url)?,
            cdn_base: Url::parse(&cfg.cdn_base_url)?,
        })
    }

    async fn get(&self, url: &Url) -> reqwest::Result<reqwest::Response> {
        debug!(%url, "GET");
        self.client.get(url.clone()).send().await?.error_for_status()
    }
}

#[async_trait]
impl ProfileSource for HttpSource {
    async fn profile_page(&self, profile_id: u64) -> Result<String> {
        let url = urls::profile_url(&self.profile_base, profile_id)?;
        let resp = self.get(&url).await.map_err(|e| Error::fetch(&url, e))?;
        resp.text().await.map_err(|e| Error::fetch(&url, e))
    }

    async fn artwork(&self, artwork_ref: &str) -> Result<Vec<u8>> {
        let url = urls::artwork_url(&self.cdn_base, artwork_ref)?;
        let resp = self
            .get(&url)
            .await
            .map_err(|e| Error::Artwork(format!("{url}: {e}")))?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Artwork(format!("{url}: {e}")))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpSource, ProfileSource};
    use crate::Error;
    use deezer_overlay_core::EndpointsConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `responses` in order, one per connection, and returns the base url.
    async fn serve(responses: Vec<(&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let reply = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    fn endpoints(base: &str) -> EndpointsConfig {
        EndpointsConfig {
            profile_base_url: base.to_string(),
            cdn_base_url: base.to_string(),
            request_timeout_ms: 5_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn reads_profile_page_body() {
        let base = serve(vec![("200 OK", "<html>ok</html>")]).await;
        let source = HttpSource::new(&endpoints(&base)).unwrap();

        assert_eq!(source.profile_page(5).await.unwrap(), "<html>ok</html>");
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let base = serve(vec![("503 Service Unavailable", "")]).await;
        let source = HttpSource::new(&endpoints(&base)).unwrap();

        let err = source.profile_page(5).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn missing_cover_is_artwork_error() {
        let base = serve(vec![("404 Not Found", "")]).await;
        let source = HttpSource::new(&endpoints(&base)).unwrap();

        assert!(matches!(
            source.artwork("abc").await,
            Err(Error::Artwork(_))
        ));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            HttpSource::new(&endpoints("not a url")),
            Err(Error::InvalidUrl(_))
        ));
    }
}
