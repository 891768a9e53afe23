//! CLI output formatting for the build stages.
//!
//! Output is information-first: every entity leads with its positional index
//! and title, with sources and details as indented context lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Navigation
//!     001 Home → /
//!     002 About → /about.html
//!
//! Pages
//!     001 About Top Flooring Services
//!     002 Warranty (hidden)
//!
//! Gallery
//!     Source: content/gallery-config.xml
//!     001 All Projects (5 projects)
//!     002 Hardwood (3 projects)
//!         001 Oak Living Room
//!             Source: /images/gallery/oak-living-room.png
//!
//! Services
//!     001 Hardwood Installation (hardwood)
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Top Flooring Services → index.html
//! 002 About Top Flooring Services → about.html
//! 003 Gallery: Hardwood (3 projects) → gallery/hardwood/index.html
//!
//! Generated 8 pages, 10 viewer pages, 4 assets
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::filter::{filter, filter_tabs};
use crate::generate::GenerateReport;
use crate::scan::{ASSETS_DIR, Manifest};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional count.
///
/// ```text
/// 002 Hardwood (3 projects)
/// 001 About
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(1) => format!("{} {} (1 project)", format_index(index), title),
        Some(n) => format!("{} {} ({} projects)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan stage output showing the discovered site structure.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Navigation".to_string());
    for (i, item) in manifest.navigation.iter().enumerate() {
        lines.push(format!(
            "{}{} \u{2192} {}",
            indent(1),
            entity_header(i + 1, &item.title, None),
            item.href
        ));
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            let hidden = if page.in_nav { "" } else { " (hidden)" };
            lines.push(format!(
                "{}{}{}",
                indent(1),
                entity_header(i + 1, &page.title, None),
                hidden
            ));
        }
    }

    lines.push(String::new());
    lines.push("Gallery".to_string());
    lines.push(format!("{}Source: {}", indent(1), manifest.catalog_source));
    match manifest.gallery.data() {
        Some(catalog) => {
            let tabs = filter_tabs(catalog, &manifest.config.gallery.all_label);
            for (i, tab) in tabs.iter().enumerate() {
                let items = filter(catalog, &tab.id);
                lines.push(format!(
                    "{}{}",
                    indent(1),
                    entity_header(i + 1, &tab.name, Some(items.len()))
                ));
                // The "all" tab repeats every item; list items per category only.
                if tab.is_all() {
                    continue;
                }
                for (j, item) in items.iter().enumerate() {
                    lines.push(format!("{}{}", indent(2), entity_header(j + 1, &item.title, None)));
                    lines.push(format!("{}Source: {}", indent(3), item.src));
                    let desc = truncate_desc(item.description.trim(), 60);
                    if !desc.is_empty() {
                        lines.push(format!("{}{}", indent(3), desc));
                    }
                }
            }
            let orphans = catalog.orphans().count();
            if orphans > 0 {
                lines.push(format!(
                    "{}Uncategorized: {} (shown under the all tab only)",
                    indent(1),
                    orphans
                ));
            }
        }
        None => {
            let reason = manifest.gallery.error().unwrap_or("not loaded");
            lines.push(format!("{}Unavailable: {}", indent(1), reason));
        }
    }

    if !manifest.config.services.is_empty() {
        lines.push(String::new());
        lines.push("Services".to_string());
        for (i, service) in manifest.config.services.iter().enumerate() {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                entity_header(i + 1, &service.title, None),
                service.id
            ));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if manifest.has_assets {
        lines.push(format!("{}{}/", indent(1), ASSETS_DIR));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format generate stage output: each written page and a summary line.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} \u{2192} {}",
            entity_header(i + 1, &page.title, page.items),
            page.path
        ));
    }

    if let Some(error) = &report.gallery_error {
        lines.push(String::new());
        lines.push(format!("Gallery unavailable: {}", error));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages, {} viewer pages, {} assets",
        report.pages.len(),
        report.viewer_pages,
        report.assets_copied
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GeneratedPage;
    use crate::scan::scan;
    use crate::test_helpers::*;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_four_spaces_per_level() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_counts() {
        assert_eq!(entity_header(2, "Hardwood", Some(3)), "002 Hardwood (3 projects)");
        assert_eq!(entity_header(1, "Tile", Some(1)), "001 Tile (1 project)");
        assert_eq!(entity_header(1, "About", None), "001 About");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("short", 10), "short");
    }

    #[test]
    fn truncate_desc_long() {
        assert_eq!(truncate_desc("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("café au lait", 4), "café...");
    }

    // =========================================================================
    // Scan
    // =========================================================================

    #[tokio::test]
    async fn scan_output_lists_structure() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).await.unwrap();
        let lines = format_scan_output(&manifest, tmp.path());

        assert!(lines.contains(&"    002 About \u{2192} /about.html".to_string()));
        assert!(lines.contains(&"    003 Warranty (hidden)".to_string()));
        assert!(lines.contains(&"    002 Hardwood (3 projects)".to_string()));
        assert!(lines.contains(&"        001 Oak Living Room".to_string()));
        assert!(lines.contains(&"    005 Demolition (0 projects)".to_string()));
        assert!(lines.contains(&"    config.toml".to_string()));
        assert!(lines.contains(&"    assets/".to_string()));
    }

    #[tokio::test]
    async fn scan_output_reports_unavailable_gallery() {
        let tmp = tempfile::TempDir::new().unwrap();
        let manifest = scan(tmp.path()).await.unwrap();
        let lines = format_scan_output(&manifest, tmp.path());
        assert!(lines.iter().any(|l| l.starts_with("    Unavailable: ")));
        assert!(!lines.contains(&"    config.toml".to_string()));
    }

    // =========================================================================
    // Generate
    // =========================================================================

    #[test]
    fn generate_output_lists_pages_and_summary() {
        let report = GenerateReport {
            pages: vec![
                GeneratedPage {
                    title: "Home".to_string(),
                    path: "index.html".to_string(),
                    items: None,
                },
                GeneratedPage {
                    title: "Gallery: Tile".to_string(),
                    path: "gallery/tile/index.html".to_string(),
                    items: Some(1),
                },
            ],
            viewer_pages: 1,
            assets_copied: 3,
            gallery_error: None,
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "001 Home \u{2192} index.html");
        assert_eq!(lines[1], "002 Gallery: Tile (1 project) \u{2192} gallery/tile/index.html");
        assert_eq!(
            lines.last().unwrap(),
            "Generated 2 pages, 1 viewer pages, 3 assets"
        );
    }

    #[test]
    fn generate_output_mentions_gallery_error() {
        let report = GenerateReport {
            gallery_error: Some("Failed to read catalog".to_string()),
            ..GenerateReport::default()
        };
        let lines = format_generate_output(&report);
        assert!(lines.contains(&"Gallery unavailable: Failed to read catalog".to_string()));
    }
}
