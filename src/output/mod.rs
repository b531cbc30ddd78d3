//! Output module for rendering analysis results
//!
//! This module handles:
//! - JSON rendering (compact or pretty) of an [`AnalyzeResult`]
//! - A human-readable text report for terminals

use crate::analyzer::AnalyzeResult;
use std::fmt::Write;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable JSON
    #[default]
    Json,
    /// Human-readable report
    Text,
}

/// Renders a result in the requested format
///
/// `pretty` only affects JSON output.
pub fn render(
    result: &AnalyzeResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(result),
        OutputFormat::Json => serde_json::to_string(result),
        OutputFormat::Text => Ok(render_text(result)),
    }
}

/// Formats a result as a plain-text report
pub fn render_text(result: &AnalyzeResult) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Page Analysis ===\n");
    let _ = writeln!(out, "HTML version: {}", result.html_version);
    let title = if result.title.is_empty() {
        "(none)"
    } else {
        result.title.as_str()
    };
    let _ = writeln!(out, "Title: {}", title);
    let _ = writeln!(
        out,
        "Login form: {}",
        if result.login_form { "yes" } else { "no" }
    );

    let _ = writeln!(out, "\nHeadings:");
    for heading in &result.headings {
        let _ = writeln!(out, "  h{}: {}", heading.level, heading.count);
    }

    let _ = writeln!(out, "\nLinks ({} total):", result.links.total());
    let _ = writeln!(out, "  Internal: {}", result.links.internal);
    let _ = writeln!(out, "  External: {}", result.links.external);
    let _ = writeln!(out, "  Inaccessible: {}", result.links.inaccessible);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{HeadingCount, LinkStats};

    fn sample() -> AnalyzeResult {
        AnalyzeResult {
            html_version: "HTML5".to_string(),
            title: "Example".to_string(),
            headings: (1..=6)
                .map(|level| HeadingCount {
                    level,
                    count: usize::from(level == 1),
                })
                .collect(),
            links: LinkStats {
                internal: 3,
                external: 2,
                inaccessible: 1,
            },
            login_form: true,
        }
    }

    #[test]
    fn test_render_json_compact() {
        let json = render(&sample(), OutputFormat::Json, false).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Example");
        assert_eq!(value["headings"].as_array().unwrap().len(), 6);
        assert_eq!(value["links"]["internal"], 3);
        assert_eq!(value["login_form"], true);
    }

    #[test]
    fn test_render_json_pretty() {
        let json = render(&sample(), OutputFormat::Json, true).unwrap();
        assert!(json.contains("\n  \"html_version\": \"HTML5\""));
    }

    #[test]
    fn test_render_text() {
        let text = render(&sample(), OutputFormat::Text, false).unwrap();
        assert!(text.contains("HTML version: HTML5"));
        assert!(text.contains("Login form: yes"));
        assert!(text.contains("  h1: 1"));
        assert!(text.contains("  h6: 0"));
        assert!(text.contains("Links (6 total):"));
        assert!(text.contains("  Inaccessible: 1"));
    }

    #[test]
    fn test_render_text_without_title() {
        let text = render_text(&AnalyzeResult::default());
        assert!(text.contains("Title: (none)"));
        assert!(text.contains("Login form: no"));
    }
}
