// src/services/image_url.rs
// DOCUMENTATION: Image and profile URL builders
// PURPOSE: Derive avatar, profile and proxied image URLs from Instagram handles

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

pub const PLACEHOLDER_AVATAR: &str = "https://placehold.co/96/e2e8f0/64748b?text=?";
pub const PLACEHOLDER_THUMB: &str = "https://placehold.co/400x300/e2e8f0/64748b?text=G%C3%B6rsel";

static INSTAGRAM_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)instagram\.com|instagr\.am").expect("valid instagram regex"));

fn username_from_link(raw: &str) -> Option<String> {
    let url = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw.trim_start_matches('/'))
    };
    let parsed = Url::parse(&url).ok()?;
    let first = parsed.path().trim_matches('/').split('/').next()?.to_string();
    let lower = first.to_lowercase();
    if first.is_empty() || lower.starts_with("reel") || lower == "p" {
        return None;
    }
    Some(
        urlencoding::decode(&first)
            .map(|s| s.into_owned())
            .unwrap_or(first),
    )
}

/// Username only, from an Instagram URL or an `@handle`
pub fn normalize_instagram_username(input: Option<&str>) -> String {
    let raw = input.unwrap_or("").trim();
    if raw.is_empty() {
        return String::new();
    }

    if INSTAGRAM_LINK.is_match(raw) {
        if let Some(username) = username_from_link(raw) {
            return username;
        }
    }

    raw.trim_start_matches('@').trim().to_string()
}

/// Profile page link for the review "Instagram" button, `#` when no handle
pub fn instagram_profile_url(handle: Option<&str>) -> String {
    let username = normalize_instagram_username(handle);
    if username.is_empty() {
        return "#".to_string();
    }
    format!("https://www.instagram.com/{}/", urlencoding::encode(&username))
}

/// unavatar.io profile picture for a handle, `None` when no handle
pub fn unavatar_url(handle: Option<&str>) -> Option<String> {
    let username = normalize_instagram_username(handle);
    if username.is_empty() {
        return None;
    }
    Some(format!(
        "https://unavatar.io/instagram/{}",
        urlencoding::encode(&username)
    ))
}

/// Same-origin avatar route for reviewer pictures
pub fn reviewer_avatar_api_url(handle: Option<&str>) -> String {
    let username = normalize_instagram_username(handle);
    if username.is_empty() {
        return PLACEHOLDER_AVATAR.to_string();
    }
    format!("/api/avatar?username={}", urlencoding::encode(&username))
}

/// Initial-letter avatar used when unavatar has nothing
pub fn initials_avatar_url(name_or_username: Option<&str>, size: u32) -> String {
    let raw = name_or_username.unwrap_or("").trim();
    if raw.is_empty() {
        return PLACEHOLDER_AVATAR.to_string();
    }
    let initial: String = raw
        .trim_start_matches('@')
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "https://ui-avatars.com/api/?name={}&size={}&background=e2e8f0&color=64748b&bold=true",
        urlencoding::encode(&initial),
        size
    )
}

/// Route hotlink-protected images through wsrv.nl
/// data: URLs, placehold.co and same-origin paths are returned untouched.
pub fn proxy_image_url(url: Option<&str>) -> String {
    let url = match url {
        Some(u) if !u.is_empty() => u,
        _ => return PLACEHOLDER_AVATAR.to_string(),
    };
    if url.starts_with("data:") || url.contains("placehold.co") || url.starts_with('/') {
        return url.to_string();
    }
    format!("https://wsrv.nl/?url={}&n=-1", urlencoding::encode(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_handles() {
        assert_eq!(normalize_instagram_username(Some("  @@kahvedurak ")), "kahvedurak");
        assert_eq!(normalize_instagram_username(Some("plain")), "plain");
        assert_eq!(normalize_instagram_username(None), "");
        assert_eq!(normalize_instagram_username(Some("   ")), "");
    }

    #[test]
    fn test_normalize_links() {
        assert_eq!(
            normalize_instagram_username(Some("https://www.instagram.com/ayse.cooks/?hl=tr")),
            "ayse.cooks"
        );
        assert_eq!(
            normalize_instagram_username(Some("instagram.com/mehmet_foto")),
            "mehmet_foto"
        );
        assert_eq!(
            normalize_instagram_username(Some("//instagr.am/zeynep")),
            "zeynep"
        );
    }

    #[test]
    fn test_normalize_reel_link_is_not_a_username() {
        let link = "https://www.instagram.com/reel/C1a2b3c4d5/";
        assert_eq!(normalize_instagram_username(Some(link)), link);
    }

    #[test]
    fn test_profile_and_avatar_urls() {
        assert_eq!(
            instagram_profile_url(Some("@ayse")),
            "https://www.instagram.com/ayse/"
        );
        assert_eq!(instagram_profile_url(None), "#");
        assert_eq!(
            unavatar_url(Some("ayse")).as_deref(),
            Some("https://unavatar.io/instagram/ayse")
        );
        assert_eq!(unavatar_url(Some("")), None);
        assert_eq!(
            reviewer_avatar_api_url(Some("@kahve durak")),
            "/api/avatar?username=kahve%20durak"
        );
    }

    #[test]
    fn test_initials_avatar() {
        assert_eq!(
            initials_avatar_url(Some("@zeynep"), 64),
            "https://ui-avatars.com/api/?name=Z&size=64&background=e2e8f0&color=64748b&bold=true"
        );
        assert_eq!(initials_avatar_url(Some(" "), 96), PLACEHOLDER_AVATAR);
    }

    #[test]
    fn test_proxy_image_url() {
        assert_eq!(proxy_image_url(None), PLACEHOLDER_AVATAR);
        assert_eq!(proxy_image_url(Some("/api/avatar?username=a")), "/api/avatar?username=a");
        assert_eq!(proxy_image_url(Some("data:image/png;base64,AA")), "data:image/png;base64,AA");
        assert_eq!(
            proxy_image_url(Some("https://scontent.cdninstagram.com/a.jpg?x=1&y=2")),
            "https://wsrv.nl/?url=https%3A%2F%2Fscontent.cdninstagram.com%2Fa.jpg%3Fx%3D1%26y%3D2&n=-1"
        );
    }
}
