// HTTP plumbing shared by the projection scraper and the headshot fetcher,
// plus the page sources that feed projection parsing.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::data::directory::Position;
use crate::data::projections::{ProjectionError, ProjectionPages};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

// The projection site serves a bot-detection page to the default reqwest
// user agent; a browser string gets the real table.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ---------------------------------------------------------------------------
// Client construction
// ---------------------------------------------------------------------------

/// Shared HTTP client. The timeout bounds every fetch, connect included;
/// there is no retry layer on top.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

// ---------------------------------------------------------------------------
// Page sources
// ---------------------------------------------------------------------------

/// Live page source: one GET per position page against the projection site.
pub struct HttpPages {
    client: Client,
    base_url: String,
    week: String,
}

impl HttpPages {
    pub fn new(client: Client, base_url: impl Into<String>, week: impl Into<String>) -> Self {
        HttpPages {
            client,
            base_url: base_url.into(),
            week: week.into(),
        }
    }

    fn url_for(&self, position: Position) -> String {
        format!(
            "{}/{}.php?week={}",
            self.base_url.trim_end_matches('/'),
            position.slug(),
            self.week
        )
    }
}

#[async_trait]
impl ProjectionPages for HttpPages {
    async fn page_for(&self, position: Position) -> Result<String, ProjectionError> {
        let url = self.url_for(position);
        debug!("fetching {} projections from {}", position, url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProjectionError::Fetch(format!("GET {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProjectionError::Fetch(format!(
                "GET {url} returned status {status}"
            )));
        }
        response
            .text()
            .await
            .map_err(|e| ProjectionError::Fetch(format!("reading body of {url}: {e}")))
    }
}

/// Offline page source reading pre-downloaded pages from a directory, one
/// `<position slug>.html` file each. Used when the config points at saved
/// pages instead of the live site.
pub struct DirPages {
    dir: PathBuf,
}

impl DirPages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirPages { dir: dir.into() }
    }
}

#[async_trait]
impl ProjectionPages for DirPages {
    async fn page_for(&self, position: Position) -> Result<String, ProjectionError> {
        let path = self.dir.join(format!("{}.html", position.slug()));
        debug!("reading {} projections from {}", position, path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ProjectionError::Fetch(format!("reading {}: {}", path.display(), e)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
