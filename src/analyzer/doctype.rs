//! HTML version detection from the document type declaration

use scraper::node::Node;
use scraper::Html;
use serde::{Serialize, Serializer};
use std::fmt;

/// HTML version as declared by a page's doctype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlVersion {
    Html5,
    Html401Strict,
    Html401Transitional,
    Html401Frameset,
    Html40Strict,
    Html40Transitional,
    Html40Frameset,
    Html32,
    Html20,
    Xhtml10Strict,
    Xhtml10Transitional,
    Xhtml10Frameset,
    Xhtml11,
    /// No doctype, or one we do not recognize
    Unknown,
}

/// Public identifier fragments, most specific first
const PUBLIC_ID_TABLE: &[(&str, HtmlVersion)] = &[
    ("XHTML 1.0 STRICT", HtmlVersion::Xhtml10Strict),
    ("XHTML 1.0 TRANSITIONAL", HtmlVersion::Xhtml10Transitional),
    ("XHTML 1.0 FRAMESET", HtmlVersion::Xhtml10Frameset),
    ("XHTML 1.1", HtmlVersion::Xhtml11),
    ("HTML 4.01 TRANSITIONAL", HtmlVersion::Html401Transitional),
    ("HTML 4.01 FRAMESET", HtmlVersion::Html401Frameset),
    ("HTML 4.01", HtmlVersion::Html401Strict),
    ("HTML 4.0 TRANSITIONAL", HtmlVersion::Html40Transitional),
    ("HTML 4.0 FRAMESET", HtmlVersion::Html40Frameset),
    ("HTML 4.0", HtmlVersion::Html40Strict),
    ("HTML 3.2", HtmlVersion::Html32),
    ("HTML 2.0", HtmlVersion::Html20),
];

impl HtmlVersion {
    /// Returns the label stored alongside analysis results
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html5 => "HTML5",
            Self::Html401Strict => "HTML 4.01 Strict",
            Self::Html401Transitional => "HTML 4.01 Transitional",
            Self::Html401Frameset => "HTML 4.01 Frameset",
            Self::Html40Strict => "HTML 4.0 Strict",
            Self::Html40Transitional => "HTML 4.0 Transitional",
            Self::Html40Frameset => "HTML 4.0 Frameset",
            Self::Html32 => "HTML 3.2",
            Self::Html20 => "HTML 2.0",
            Self::Xhtml10Strict => "XHTML 1.0 Strict",
            Self::Xhtml10Transitional => "XHTML 1.0 Transitional",
            Self::Xhtml10Frameset => "XHTML 1.0 Frameset",
            Self::Xhtml11 => "XHTML 1.1",
            Self::Unknown => "Unknown",
        }
    }

    /// Classifies a doctype from its name and identifiers
    ///
    /// `<!doctype html>` (optionally with the `about:legacy-compat` system
    /// identifier) is HTML5; legacy DTDs are recognized by their public
    /// identifier. Anything else is [`HtmlVersion::Unknown`].
    pub fn from_doctype(name: &str, public_id: &str, system_id: &str) -> Self {
        if !name.eq_ignore_ascii_case("html") {
            return Self::Unknown;
        }

        let public_id = public_id.split_whitespace().collect::<Vec<_>>().join(" ");
        if public_id.is_empty() {
            let system_id = system_id.trim();
            return if system_id.is_empty() || system_id.eq_ignore_ascii_case("about:legacy-compat")
            {
                Self::Html5
            } else {
                Self::Unknown
            };
        }

        let public_id = public_id.to_ascii_uppercase();
        PUBLIC_ID_TABLE
            .iter()
            .find(|(fragment, _)| public_id.contains(fragment))
            .map(|(_, version)| *version)
            .unwrap_or(Self::Unknown)
    }

    /// Detects the version of a parsed document
    ///
    /// A document without a doctype is `Unknown`, never HTML5.
    pub fn detect(document: &Html) -> Self {
        document
            .tree
            .root()
            .children()
            .find_map(|child| match child.value() {
                Node::Doctype(doctype) => Some(Self::from_doctype(
                    doctype.name(),
                    doctype.public_id(),
                    doctype.system_id(),
                )),
                _ => None,
            })
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HtmlVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
