use url::Url;

const USER_AGENT: &str = "pagescope-api/0.1";

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("{0}")]
    Request(String),
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),
    #[cfg(feature = "rendering")]
    #[error("browser rendering failed: {0}")]
    Render(String),
}

/// Which fetcher variant serves a request. The static variant sees only the
/// initial server response; the rendered variant executes the page's own
/// scripts first. They are not expected to agree on script-heavy pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Static,
    #[cfg(feature = "rendering")]
    Rendered,
}

impl FetchStrategy {
    pub fn from_env() -> Self {
        match std::env::var("PAGESCOPE_FETCHER").as_deref() {
            #[cfg(feature = "rendering")]
            Ok("rendered") => FetchStrategy::Rendered,
            #[cfg(not(feature = "rendering"))]
            Ok("rendered") => {
                tracing::warn!(
                    "PAGESCOPE_FETCHER=rendered but the rendering feature is disabled; \
                     falling back to static fetch"
                );
                FetchStrategy::Static
            }
            _ => FetchStrategy::Static,
        }
    }
}

pub async fn fetch_html(strategy: FetchStrategy, url: &str) -> Result<String, ScrapeError> {
    // Malformed URLs fail here, uniformly for both variants.
    let parsed =
        Url::parse(url).map_err(|e| ScrapeError::Request(format!("invalid URL: {}", e)))?;

    match strategy {
        FetchStrategy::Static => fetch_static(parsed).await,
        #[cfg(feature = "rendering")]
        FetchStrategy::Rendered => fetch_rendered(parsed).await,
    }
}

// ── Static fetch: direct GET, raw response body ──────────────────────────────

async fn fetch_static(url: Url) -> Result<String, ScrapeError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
            .parse()
            .map_err(|_| ScrapeError::Request("invalid Accept header".to_string()))?,
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        "en-US,en;q=0.9"
            .parse()
            .map_err(|_| ScrapeError::Request("invalid Accept-Language header".to_string()))?,
    );

    let client = reqwest::ClientBuilder::new()
        .connect_timeout(std::time::Duration::from_secs(5))
        .timeout(std::time::Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| ScrapeError::Request(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::Request(format!("TimeoutError: {}", e))
        } else if e.is_connect() {
            ScrapeError::Request(format!("ConnectError: {}", e))
        } else {
            ScrapeError::Request(format!("RequestError: {}", e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::UpstreamStatus(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| ScrapeError::Request(e.to_string()))
}

// ── Rendered fetch: headless browser, scripts executed ───────────────────────

#[cfg(feature = "rendering")]
async fn fetch_rendered(url: Url) -> Result<String, ScrapeError> {
    use headless_chrome::{Browser, LaunchOptions};

    // headless_chrome is a blocking CDP client; keep it off the async runtime.
    tokio::task::spawn_blocking(move || {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        // Dropping `browser` closes the instance on every exit path below.
        let browser = Browser::new(options).map_err(|e| ScrapeError::Render(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        tab.navigate_to(url.as_str())
            .map_err(|e| ScrapeError::Render(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        tab.get_content()
            .map_err(|e| ScrapeError::Render(e.to_string()))
    })
    .await
    .map_err(|e| ScrapeError::Render(format!("render task failed: {}", e)))?
}
