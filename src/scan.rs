//! Content scanning and manifest generation.
//!
//! Stage 1 of the build. Reads the content directory and produces a
//! [`Manifest`] that the generate stage renders.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml          # Site configuration (optional)
//! ├── gallery-config.xml   # Gallery catalog
//! ├── index.md             # Home page introduction (optional)
//! ├── 010-about.md         # Page (numbered = appears in nav)
//! ├── 020-services.md
//! ├── draft-notes.md       # Unnumbered = generated, hidden from nav
//! └── assets/              # Copied verbatim to the output root
//!     └── images/gallery/…
//! ```
//!
//! ## Navigation
//!
//! The navigation bar is fixed at both ends: Home first, then numbered
//! pages by number, then Gallery and Contact.
//!
//! ## Gallery
//!
//! The catalog is loaded once per scan. A failed load does not fail the
//! scan: the manifest records the failure and the gallery page shows it.
//!
//! ## Validation
//!
//! - Page slugs must be unique.
//! - `gallery` and `contact` are reserved slugs; `index.md` is the home page.

use crate::config::{self, SiteConfig};
use crate::loader::{CatalogSource, LoadState};
use crate::naming::parse_entry_name;
use crate::types::{NavItem, Page};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Page slug '{0}' is reserved: {1}")]
    ReservedSlug(String, PathBuf),
    #[error("Duplicate page slug '{0}': {1}")]
    DuplicateSlug(String, PathBuf),
}

/// Directory under the content root copied verbatim into the output.
pub const ASSETS_DIR: &str = "assets";

const RESERVED_SLUGS: &[&str] = &["gallery", "contact"];

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub navigation: Vec<NavItem>,
    /// Introduction on the home page, from `index.md`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Page>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    /// Where the catalog was read from, for display.
    pub catalog_source: String,
    pub gallery: LoadState,
    pub has_assets: bool,
    pub config: SiteConfig,
}

pub async fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let config = config::load_config(root)?;
    let (home, pages) = parse_pages(root)?;
    let navigation = build_navigation(&pages);

    let source = CatalogSource::resolve(root, &config.gallery.catalog);
    let gallery = LoadState::resolve(&source).await;

    Ok(Manifest {
        navigation,
        home,
        pages,
        catalog_source: source.to_string(),
        gallery,
        has_assets: root.join(ASSETS_DIR).is_dir(),
        config,
    })
}

/// Parse markdown files in the content root.
///
/// Returns the home introduction (`index.md`) separately from the pages.
fn parse_pages(root: &Path) -> Result<(Option<Page>, Vec<Page>), ScanError> {
    let mut md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    md_files.sort();

    let mut home = None;
    let mut pages: Vec<Page> = Vec::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let body = fs::read_to_string(md_path)?;

        if stem.eq_ignore_ascii_case("index") {
            home = Some(build_page(&stem, body));
            continue;
        }

        let page = build_page(&stem, body);
        if page.slug.is_empty() || page.slug == "index" || RESERVED_SLUGS.contains(&page.slug.as_str()) {
            return Err(ScanError::ReservedSlug(page.slug, md_path.clone()));
        }
        if pages.iter().any(|p| p.slug == page.slug) {
            return Err(ScanError::DuplicateSlug(page.slug, md_path.clone()));
        }
        pages.push(page);
    }

    pages.sort_by_key(|p| p.sort_key);
    Ok((home, pages))
}

fn build_page(stem: &str, body: String) -> Page {
    let parsed = parse_entry_name(stem);
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| parsed.display_title.clone());
    Page {
        title,
        link_title: parsed.display_title,
        slug: parsed.slug,
        body,
        in_nav: parsed.number.is_some(),
        sort_key: parsed.number.unwrap_or(u32::MAX),
    }
}

/// Home, numbered pages in order, Gallery, Contact.
fn build_navigation(pages: &[Page]) -> Vec<NavItem> {
    let item = |title: &str, href: String| NavItem {
        title: title.to_string(),
        href,
    };
    std::iter::once(item("Home", "/".to_string()))
        .chain(
            pages
                .iter()
                .filter(|p| p.in_nav)
                .map(|p| item(&p.link_title, format!("/{}.html", p.slug))),
        )
        .chain([
            item("Gallery", "/gallery/".to_string()),
            item("Contact", "/contact.html".to_string()),
        ])
        .collect()
}
