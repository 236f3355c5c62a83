//! URL canonicalization and classification.
//!
//! Every URL stored by the crawler passes through [`canonicalize`] (or
//! [`resolve`] for hrefs found in a page) so that equality on the resulting
//! strings is equality of pages.

use url::Url;

/// Extensions that never point at an HTML page.
pub const BINARY_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "svg", "ico", "webp", "bmp",
    // stylesheets and scripts
    "css", "js", "mjs",
    // fonts
    "woff", "woff2", "ttf", "eot", "otf",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
];

/// Normalize a raw absolute URL. Returns `None` when it cannot be parsed.
pub fn canonicalize(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    Some(canonical_url(url).into())
}

/// Resolve `href` against the page it was found on and normalize the result.
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    Some(canonical_url(resolved))
}

/// Apply the normalization rules to an already parsed URL.
pub fn canonical_url(mut url: Url) -> Url {
    if let Some(host) = url.host_str() {
        let lower = host.to_ascii_lowercase();
        if lower != host {
            // Only fails for hosts the parser would not have produced.
            let _ = url.set_host(Some(&lower));
        }
    }

    if !url.cannot_be_a_base() {
        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
            url.set_path(&trimmed);
        }
    }

    url.set_fragment(None);
    url
}

/// True when the URL path ends in a known non-HTML extension.
pub fn is_binary(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Scheme, host and port all match.
pub fn is_same_origin(url: &Url, origin: &Url) -> bool {
    url.origin() == origin.origin()
}
