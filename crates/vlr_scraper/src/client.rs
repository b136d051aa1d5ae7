use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Rate-limited page fetcher. One instance paces all of its requests
/// with a shared minimum interval, regardless of target URL, so a
/// scrape pass never hammers the site. No retries here; a failed fetch
/// is reported to the caller and the pass moves on.
pub struct PageClient {
    client: reqwest::Client,
    last_request: Instant,
    min_request_interval: Duration,
}

impl PageClient {
    pub fn new(min_request_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .gzip(true)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            // Backdated so the first request goes out immediately
            last_request: Instant::now() - Duration::from_secs(60),
            min_request_interval,
        }
    }

    pub async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        self.wait_for_rate_limit().await;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }

    async fn wait_for_rate_limit(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_request_interval {
            let wait_time = self.min_request_interval - elapsed;
            debug!("rate limit: sleeping {}ms", wait_time.as_millis());
            sleep(wait_time).await;
        }
        self.last_request = Instant::now();
    }
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
