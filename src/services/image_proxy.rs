// src/services/image_proxy.rs
// DOCUMENTATION: Same-origin image proxy client
// PURPOSE: Fetch allow-listed remote images server side so browsers never hit hotlink/CORS blocks

use crate::services::cache::{CachedImage, ImageCache};
use actix_web::web::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, Response, Url};
use std::sync::Arc;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const AVATAR_USER_AGENT: &str = "Mozilla/5.0 (compatible; KimGetirdi/1.0)";
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// Upstream bodies larger than this are abandoned
pub const MAX_UPSTREAM_BYTES: usize = 5 * 1024 * 1024;

/// Hosts the proxy is allowed to fetch from (SSRF guard)
static ALLOWED_HOSTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^scontent[.-][a-z0-9-]+\.cdninstagram\.com$",
        r"(?i)^[a-z0-9-]+\.cdninstagram\.com$",
        r"(?i)\.fbcdn\.net$",
        r"(?i)^wsrv\.nl$",
        r"(?i)^placehold\.co$",
        r"(?i)^unavatar\.io$",
        r"(?i)^i\.pravatar\.cc$",
        r"(?i)^ui-avatars\.com$",
        r"(?i)^firebasestorage\.googleapis\.com$",
        r"(?i)^[a-z0-9-]+\.googleapis\.com$",
        r"(?i)^images\.unsplash\.com$",
        r"(?i)^picsum\.photos$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid host pattern"))
    .collect()
});

static INSTAGRAM_CDN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\.fbcdn\.net|cdninstagram\.com)$").expect("valid cdn regex"));

/// Value of the `url` query parameter exactly as sent
/// When `url=` leads the query string everything after it is kept, so an
/// unencoded `&` inside the target URL does not truncate it.
pub fn extract_url_param(query_string: &str) -> Option<String> {
    let raw = match query_string.strip_prefix("url=") {
        Some(rest) => rest,
        None => query_string
            .split('&')
            .find_map(|pair| pair.strip_prefix("url="))?,
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.to_string()),
    )
}

/// https only, host on the allow-list
pub fn is_url_allowed(target: &str) -> bool {
    let Ok(url) = Url::parse(target) else {
        return false;
    };
    if url.scheme() != "https" {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('.');
    ALLOWED_HOSTS.iter().any(|re| re.is_match(host))
}

pub fn is_instagram_cdn(host: &str) -> bool {
    INSTAGRAM_CDN.is_match(host)
}

/// Cleaned avatar username, `None` when it must not be forwarded upstream
pub fn sanitize_avatar_username(raw: Option<&str>) -> Option<String> {
    let clean = raw.unwrap_or("").trim().trim_start_matches('@');
    let len = clean.chars().count();
    if len == 0 || len > 50 || clean.contains(|c: char| matches!(c, '<' | '>' | '"' | '\'')) {
        return None;
    }
    Some(clean.to_string())
}

pub fn wsrv_url(target: &str) -> String {
    format!("https://wsrv.nl/?url={}&n=-1", urlencoding::encode(target))
}

/// Read the body chunk by chunk, giving up once it grows past `limit`
async fn read_limited(mut response: Response, limit: usize, url: &str) -> Option<Bytes> {
    if let Some(declared) = response.content_length() {
        if declared > limit as u64 {
            log::debug!("Image body for {} declared {} bytes, over limit", url, declared);
            return None;
        }
    }

    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if body.len() + chunk.len() > limit {
                    log::debug!("Image body for {} exceeded {} bytes, abandoned", url, limit);
                    return None;
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => return Some(Bytes::from(body)),
            Err(e) => {
                log::debug!("Image body read failed for {}: {}", url, e);
                return None;
            }
        }
    }
}

/// HTTP client used by the /api/image and /api/avatar routes
pub struct ImageProxyClient {
    client: Client,
    cache: Option<Arc<ImageCache>>,
    max_body_bytes: usize,
}

impl ImageProxyClient {
    pub fn new(timeout_seconds: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            cache: None,
            max_body_bytes: MAX_UPSTREAM_BYTES,
        })
    }

    pub fn with_cache(mut self, cache: Arc<ImageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetch an image, `None` for anything that is not a usable image
    /// Bodies must be longer than `min_bytes`.
    async fn fetch_image(
        &self,
        url: &str,
        user_agent: &str,
        instagram_headers: bool,
        min_bytes: usize,
    ) -> Option<CachedImage> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(url).await {
                return Some(hit);
            }
        }

        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, IMAGE_ACCEPT);
        if instagram_headers {
            request = request
                .header(REFERER, "https://www.instagram.com/")
                .header(ORIGIN, "https://www.instagram.com");
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Image fetch failed for {}: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        if !status.is_success() || !content_type.starts_with("image/") {
            log::debug!(
                "Image fetch rejected for {}: status {}, content type '{}'",
                url,
                status,
                content_type
            );
            return None;
        }

        let body = read_limited(response, self.max_body_bytes, url).await?;
        if body.len() <= min_bytes {
            return None;
        }

        let image = CachedImage { content_type, body };
        if let Some(cache) = &self.cache {
            cache.set(url.to_string(), image.clone()).await;
        }
        Some(image)
    }

    /// Direct fetch first (Instagram CDNs get an Instagram referer), then through wsrv.nl
    pub async fn proxy_image(&self, target: &str) -> Option<CachedImage> {
        let instagram = Url::parse(target)
            .ok()
            .and_then(|u| u.host_str().map(is_instagram_cdn))
            .unwrap_or(false);

        if let Some(image) = self
            .fetch_image(target, BROWSER_USER_AGENT, instagram, 0)
            .await
        {
            return Some(image);
        }

        log::debug!("Direct fetch failed for {}, retrying through wsrv.nl", target);
        self.fetch_image(&wsrv_url(target), BROWSER_USER_AGENT, false, 0)
            .await
    }

    /// unavatar.io picture for an Instagram username
    /// Tiny bodies are unavatar's fallback pixel and are treated as missing.
    pub async fn avatar(&self, username: &str) -> Option<CachedImage> {
        let url = format!(
            "https://unavatar.io/instagram/{}",
            urlencoding::encode(username)
        );
        self.fetch_image(&url, AVATAR_USER_AGENT, false, 100).await
    }
}
