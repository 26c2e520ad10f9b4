use url::Url;

/// Substrings that mark a URL as a login or account page
const LOGIN_MARKERS: &[&str] = &["login", "signin", "auth", "account"];

/// Substrings that mark a URL as carrying tracking parameters
const TRACKING_MARKERS: &[&str] = &["utm_", "ref=", "tracking", "gclid", "fbclid"];

/// Returns true if `link`, resolved against `base`, lives on the same host
///
/// Hostnames are compared exactly: `www.example.com` and `example.com` are
/// different hosts. A link that cannot be resolved is never internal, and a
/// link with whitespace inside it counts as unresolvable.
///
/// # Examples
///
/// ```
/// use sumi_corpus::url::is_internal;
///
/// assert!(is_internal("https://a.com", "https://a.com/x"));
/// assert!(is_internal("https://a.com/docs/", "../about"));
/// assert!(!is_internal("https://a.com", "https://b.com/x"));
/// assert!(!is_internal("https://a.com", "not a url"));
/// ```
pub fn is_internal(base: &str, link: &str) -> bool {
    let link = link.trim();
    if link.chars().any(char::is_whitespace) {
        return false;
    }

    let Ok(base) = Url::parse(base) else {
        return false;
    };

    match base.join(link) {
        Ok(resolved) => match (base.host_str(), resolved.host_str()) {
            (Some(base_host), Some(link_host)) => base_host == link_host,
            _ => false,
        },
        Err(_) => false,
    }
}

/// Returns true if the URL looks like a login/auth page (case-insensitive)
pub fn is_login_page(url: &str) -> bool {
    contains_any(url, LOGIN_MARKERS)
}

/// Returns true if the URL looks like a tracking link (case-insensitive)
pub fn is_tracking_url(url: &str) -> bool {
    contains_any(url, TRACKING_MARKERS)
}

fn contains_any(url: &str, markers: &[&str]) -> bool {
    let lowered = url.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}
