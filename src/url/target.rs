use crate::UrlError;
use url::{Host, Url};

/// Parses a user-submitted analysis target into an absolute URL
///
/// # Rules
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prefix `https://` when the input carries no `scheme://`
/// 3. Parse; reject anything that is not `http` or `https`
/// 4. Require a host that is an IP literal, `localhost`, or a dotted domain
///
/// No network access happens here, so malformed targets fail fast.
///
/// # Examples
///
/// ```
/// use page_analyzer::url::parse_target;
///
/// let url = parse_target("example.com/about").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
///
/// assert!(parse_target("ftp://example.com/").is_err());
/// assert!(parse_target("invalid-url").is_err());
/// ```
pub fn parse_target(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse {
        input: trimmed.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host() {
        None => return Err(UrlError::MissingHost(trimmed.to_string())),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            if domain.is_empty() {
                return Err(UrlError::MissingHost(trimmed.to_string()));
            }
            if domain != "localhost" && !domain.contains('.') {
                return Err(UrlError::UnqualifiedHost(domain.to_string()));
            }
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {}
    }

    Ok(url)
}
