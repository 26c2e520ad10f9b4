use url::Url;

/// Resolves an `href`/`src` attribute to an absolute http(s) URL
///
/// Returns None if the attribute is empty, cannot be joined onto `base`, or
/// resolves to a non-HTTP scheme (`mailto:`, `javascript:`, `data:` ...).
///
/// # Examples
///
/// ```
/// use sumi_corpus::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let resolved = resolve_href("guide.pdf", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/docs/guide.pdf");
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

/// Returns the URL without its `#fragment`
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Returns the last path segment of `url`, or `fallback` when it is empty
pub fn media_name(url: &Url, fallback: &str) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
