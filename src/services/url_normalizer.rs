//! Rewrites Google Drive share links into directly embeddable image URLs.

/// Hosts that already serve raw image bytes.
const DIRECT_IMAGE_HOSTS: &[&str] = &["googleusercontent.com", "googleapis.com"];

const DIRECT_IMAGE_BASE: &str = "https://lh3.googleusercontent.com/d/";

/// Normalize one image URL.
///
/// Drive links (`...?id=<id>` or `.../file/d/<id>/view`) become
/// `https://lh3.googleusercontent.com/d/<id>`. Anything else, including
/// direct-image hosts and `data:` URIs, is returned unchanged. Applying
/// this twice gives the same result as applying it once.
pub fn normalize_image_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("data:") || DIRECT_IMAGE_HOSTS.iter().any(|h| trimmed.contains(h)) {
        return trimmed.to_string();
    }

    match extract_file_id(trimmed) {
        Some(id) => format!("{}{}", DIRECT_IMAGE_BASE, id),
        None => trimmed.to_string(),
    }
}

/// Normalize a comma-joined list, dropping blank entries.
pub fn normalize_image_urls(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_image_url)
        .collect()
}

fn extract_file_id(url: &str) -> Option<&str> {
    let from_query = ["?id=", "&id="]
        .iter()
        .find_map(|marker| url.find(marker).map(|pos| &url[pos + marker.len()..]));

    let tail = from_query.or_else(|| {
        url.find("/file/d/")
            .map(|pos| &url[pos + "/file/d/".len()..])
    })?;

    let end = tail.find(['?', '&', '#', '/']).unwrap_or(tail.len());
    let id = &tail[..end];
    (!id.is_empty()).then_some(id)
}
