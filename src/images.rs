// Headshot retrieval.
//
// Fetches player headshots over HTTP and, for records without a headshot
// URL, falls back to scraping the player's league profile page for its
// `og:image` meta tag. Fetched bytes are decoded once so the UI can show
// what actually came back instead of trusting the content type.

use scraper::{Html, Selector};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PLAYER_PAGE_BASE: &str = "https://www.nfl.com/players";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Raw bytes of a fetched headshot, still undecoded.
#[derive(Debug, Clone)]
pub struct Headshot {
    pub url: String,
    pub bytes: Vec<u8>,
}

/// What a decoded headshot turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum HeadshotError {
    /// The request never produced a response: connect failure, timeout,
    /// or a broken body read.
    #[error("request failed: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("status code {status}")]
    NonSuccessStatus { status: u16 },
}

// ---------------------------------------------------------------------------
// HeadshotClient
// ---------------------------------------------------------------------------

pub struct HeadshotClient {
    client: reqwest::Client,
    page_fallback: bool,
}

impl HeadshotClient {
    pub fn new(client: reqwest::Client, page_fallback: bool) -> Self {
        HeadshotClient {
            client,
            page_fallback,
        }
    }

    /// Fetch headshot bytes from a known URL. The shared client's timeout
    /// bounds the whole request; timeouts surface as `Unreachable`.
    pub async fn fetch(&self, url: &str) -> Result<Headshot, HeadshotError> {
        debug!("fetching headshot from {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HeadshotError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(Headshot {
            url: url.to_string(),
            bytes: bytes.to_vec(),
        })
    }

    /// Resolve a headshot URL by scraping the player's profile page for its
    /// `og:image` tag. Returns `None` when the fallback is disabled or when
    /// anything along the way fails; page lookup is strictly best effort.
    pub async fn page_headshot_url(&self, display_name: &str) -> Option<String> {
        if !self.page_fallback {
            return None;
        }
        let url = player_page_url(display_name);
        debug!("looking up headshot via profile page {}", url);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("profile page fetch failed for {}: {}", display_name, e);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(
                "profile page for {} returned status {}",
                display_name,
                response.status()
            );
            return None;
        }
        let html = match response.text().await {
            Ok(h) => h,
            Err(e) => {
                warn!("reading profile page for {} failed: {}", display_name, e);
                return None;
            }
        };
        let found = extract_og_image(&html);
        if found.is_none() {
            warn!("no og:image tag on the profile page for {}", display_name);
        }
        found
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Profile page URL for a display name: lowercased, spaces to hyphens.
pub fn player_page_url(display_name: &str) -> String {
    let slug = display_name.to_lowercase().replace(' ', "-");
    format!("{PLAYER_PAGE_BASE}/{slug}")
}

/// Pull the `content` attribute of the `og:image` meta tag, if present.
fn extract_og_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    document
        .select(&sel)
        .next()?
        .value()
        .attr("content")
        .map(|s| s.to_string())
}

/// Decode fetched bytes to learn their format and dimensions. A decode
/// failure is not a fetch failure: the bytes arrived, the panel just shows
/// less about them.
pub fn inspect(bytes: &[u8]) -> Option<ImageInfo> {
    let format = image::guess_format(bytes).ok()?;
    let decoded = image::load_from_memory(bytes).ok()?;
    Some(ImageInfo {
        format: format_label(format),
        width: decoded.width(),
        height: decoded.height(),
    })
}

fn format_label(format: image::ImageFormat) -> &'static str {
    match format {
        image::ImageFormat::Png => "PNG",
        image::ImageFormat::Jpeg => "JPEG",
        image::ImageFormat::Gif => "GIF",
        image::ImageFormat::WebP => "WebP",
        _ => "image",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
