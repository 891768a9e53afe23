//! Types shared by the scan and generate stages.
//!
//! They are serialized into `manifest.json` between stages and must stay
//! identical on both sides.

use serde::{Deserialize, Serialize};

/// A page generated from a markdown file in the content root.
///
/// Numbered files (`NNN-name.md`) appear in the navigation bar, sorted by
/// number; unnumbered files are generated but left out of the nav.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from the first `# heading`, or the link title as fallback.
    pub title: String,
    /// Label in the navigation bar (title-cased name).
    pub link_title: String,
    /// Output file stem: the page is written to `{slug}.html`.
    pub slug: String,
    /// Raw markdown body.
    pub body: String,
    /// Whether the page appears in the navigation bar.
    pub in_nav: bool,
    /// Sort key from the number prefix.
    pub sort_key: u32,
}

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    /// Site-absolute link target (`/`, `/about.html`, `/gallery/`).
    pub href: String,
}
