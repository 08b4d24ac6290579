use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_analyzer::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the identity used to decide whether two URLs share a site
///
/// The key is the lowercase host plus the port only when one is written.
/// The scheme plays no part, so `http://example.com/` and
/// `https://example.com/` share a site while `:8080` and `:9090` do not.
/// A written default port (`:443` on https) is normalized away by the parser
/// and matches the bare host.
pub fn host_key(url: &Url) -> Option<(String, Option<u16>)> {
    extract_domain(url).map(|host| (host, url.port()))
}
