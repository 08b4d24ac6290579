//! HTML parser for extracting page structure and raw links
//!
//! This module handles parsing HTML content to extract:
//! - Page title
//! - h1/h2/h3 heading counts
//! - Doctype-derived HTML version
//! - Login form presence
//! - Every anchor's href, verbatim and in document order

use crate::analyzer::doctype::HtmlVersion;
use scraper::{Html, Selector};
use serde::Serialize;

/// Structural summary of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStructure {
    /// Text of the first `<title>`, trimmed; empty when absent
    pub title: String,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub html_version: HtmlVersion,
    /// True iff some `<form>` contains a password input
    pub has_login_form: bool,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub structure: PageStructure,

    /// Anchor hrefs exactly as written, unfiltered
    pub raw_links: Vec<String>,
}

/// Parses HTML content and extracts structure and links
///
/// Parsing is as permissive as a browser: unclosed tags, stray end tags and
/// misnested markup are all recovered from. The only rejected input is a
/// body that is not text at all (it carries NUL bytes, as images and other
/// binary payloads served under the wrong content type do).
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(String)` - The body is not parseable as HTML
///
/// # Example
///
/// ```
/// use page_analyzer::analyzer::parse_page;
///
/// let html = r#"<!DOCTYPE html><html><head><title> Test </title></head>
///     <body><h1>A</h1><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_page(html).unwrap();
/// assert_eq!(parsed.structure.title, "Test");
/// assert_eq!(parsed.structure.h1_count, 1);
/// assert_eq!(parsed.raw_links, vec!["/page".to_string()]);
/// ```
pub fn parse_page(html: &str) -> Result<ParsedPage, String> {
    if let Some(offset) = html.find('\0') {
        return Err(format!(
            "body contains binary data (NUL byte at offset {})",
            offset
        ));
    }

    let document = Html::parse_document(html);

    let structure = PageStructure {
        title: extract_title(&document),
        h1_count: count_elements(&document, "h1"),
        h2_count: count_elements(&document, "h2"),
        h3_count: count_elements(&document, "h3"),
        html_version: HtmlVersion::detect(&document),
        has_login_form: has_login_form(&document),
    };

    let raw_links = extract_hrefs(&document);

    Ok(ParsedPage {
        structure,
        raw_links,
    })
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Counts every element with the given tag name, wherever it is nested
fn count_elements(document: &Html, tag: &str) -> usize {
    Selector::parse(tag)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}

/// Checks for an `<input type="password">` inside any `<form>`
fn has_login_form(document: &Html) -> bool {
    let Ok(input_selector) = Selector::parse("form input") else {
        return false;
    };

    document.select(&input_selector).any(|input| {
        input
            .value()
            .attr("type")
            .map(|kind| kind.trim().eq_ignore_ascii_case("password"))
            .unwrap_or(false)
    })
}

/// Collects the href of every `<a>` element
fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
