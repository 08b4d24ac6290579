use crate::url::domain::host_key;
use serde::Serialize;
use url::Url;

/// Whether a link stays on the analyzed site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkScope {
    Internal,
    External,
}

/// A hyperlink resolved to an absolute http(s) URL and tagged with its scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    pub url: Url,
    pub scope: LinkScope,
}

impl ClassifiedLink {
    pub fn is_internal(&self) -> bool {
        self.scope == LinkScope::Internal
    }
}

/// Internal/external tallies over a classified link list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

impl LinkCounts {
    pub fn total(&self) -> usize {
        self.internal + self.external
    }
}

/// Resolves raw hrefs against the page URL and tags each as internal or external
///
/// # Rules
///
/// - Each href is resolved with standard relative-URL resolution, so
///   scheme-relative (`//host/x`), path-relative and fragment-only hrefs all
///   become absolute URLs
/// - Empty hrefs, hrefs that fail to resolve, and anything whose resolved
///   scheme is not http/https (`mailto:`, `tel:`, `javascript:`, `data:`) are
///   dropped silently
/// - A link is [`LinkScope::Internal`] iff its host, and its port when one is
///   written, match the base URL's; the scheme is ignored
/// - No deduplication: an href repeated in the markup appears once per
///   occurrence, in document order
///
/// # Example
///
/// ```
/// use page_analyzer::url::{classify, LinkScope};
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let raw = vec![
///     "intro".to_string(),
///     "https://other.org/".to_string(),
///     "mailto:team@example.com".to_string(),
/// ];
/// let links = classify(&raw, &base);
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].url.as_str(), "https://example.com/docs/intro");
/// assert_eq!(links[0].scope, LinkScope::Internal);
/// assert_eq!(links[1].scope, LinkScope::External);
/// ```
pub fn classify(raw_links: &[String], base: &Url) -> Vec<ClassifiedLink> {
    let base_key = host_key(base);

    raw_links
        .iter()
        .filter_map(|href| resolve_href(href, base))
        .map(|url| {
            let scope = if base_key.is_some() && host_key(&url) == base_key {
                LinkScope::Internal
            } else {
                LinkScope::External
            };
            ClassifiedLink { url, scope }
        })
        .collect()
}

/// Counts internal and external links
pub fn count_links(links: &[ClassifiedLink]) -> LinkCounts {
    links.iter().fold(LinkCounts::default(), |mut counts, link| {
        match link.scope {
            LinkScope::Internal => counts.internal += 1,
            LinkScope::External => counts.external += 1,
        }
        counts
    })
}

fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match base.join(href) {
        Ok(resolved) if matches!(resolved.scheme(), "http" | "https") => Some(resolved),
        Ok(resolved) => {
            tracing::trace!("Dropping non-HTTP link {} ({})", href, resolved.scheme());
            None
        }
        Err(e) => {
            tracing::trace!("Dropping unresolvable link {}: {}", href, e);
            None
        }
    }
}
