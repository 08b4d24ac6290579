//! Markdown report generation
//!
//! One section per job: structure summary, link counts and a broken-link
//! table for completed jobs, or the error detail for failed ones.

use crate::analyzer::{CrawlResult, LinkCheckResult};
use crate::queue::JobRecord;
use crate::state::JobStatus;
use crate::url::LinkScope;

/// Formats job records as a markdown report
///
/// # Arguments
///
/// * `records` - Job records in the order they should appear
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(records: &[JobRecord]) -> String {
    let mut md = String::new();

    md.push_str("# Page Analysis Report\n\n");

    let completed = records
        .iter()
        .filter(|r| r.status == JobStatus::Completed)
        .count();
    md.push_str(&format!(
        "- **Pages**: {} ({} completed, {} failed)\n\n",
        records.len(),
        completed,
        records.len() - completed
    ));

    for record in records {
        md.push_str(&format!("## {}\n\n", escape_cell(&record.url)));
        md.push_str(&format!("- **Status**: {}\n", record.status));

        match (&record.result, &record.error_message) {
            (Some(result), _) => push_result(&mut md, result),
            (None, Some(message)) => {
                match record.error_kind {
                    Some(kind) => md.push_str(&format!("- **Error** ({}): {}\n\n", kind, message)),
                    None => md.push_str(&format!("- **Error**: {}\n\n", message)),
                }
            }
            (None, None) => md.push('\n'),
        }
    }

    md
}

fn push_result(md: &mut String, result: &CrawlResult) {
    let structure = &result.structure;
    let title = if structure.title.is_empty() {
        "(none)"
    } else {
        structure.title.as_str()
    };

    md.push_str(&format!("- **Final URL**: {}\n", result.url));
    md.push_str(&format!("- **Title**: {}\n", title));
    md.push_str(&format!("- **HTML Version**: {}\n", structure.html_version));
    md.push_str(&format!(
        "- **Headings**: h1 {}, h2 {}, h3 {}\n",
        structure.h1_count, structure.h2_count, structure.h3_count
    ));
    md.push_str(&format!(
        "- **Links**: {} internal, {} external\n",
        result.internal_links, result.external_links
    ));
    md.push_str(&format!(
        "- **Login Form**: {}\n\n",
        if structure.has_login_form { "yes" } else { "no" }
    ));

    if result.broken_links.is_empty() {
        md.push_str("No broken links found.\n\n");
        return;
    }

    md.push_str(&format!("### Broken Links ({})\n\n", result.broken_links.len()));
    md.push_str("| URL | Scope | Status | Error |\n");
    md.push_str("|-----|-------|--------|-------|\n");
    for link in &result.broken_links {
        push_broken_link(md, link);
    }
    md.push('\n');
}

fn push_broken_link(md: &mut String, link: &LinkCheckResult) {
    let status = link
        .status_code()
        .map(|code| code.to_string())
        .unwrap_or_else(|| "-".to_string());
    let scope = match link.scope {
        LinkScope::Internal => "internal",
        LinkScope::External => "external",
    };

    md.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        escape_cell(&link.url),
        scope,
        status,
        escape_cell(link.error().unwrap_or(""))
    ));
}

/// Keeps pipes in URLs and messages from breaking table rows
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
