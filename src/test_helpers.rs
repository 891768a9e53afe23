//! Shared test utilities.
//!
//! Fixture setup plus lookups over the scan manifest that panic with a
//! useful message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).await.unwrap();
//!
//! let about = find_page(&manifest, "about");
//! let catalog = gallery_catalog(&manifest);
//! ```

use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use crate::catalog::{Catalog, GalleryItem};
use crate::relay::{Email, Mailer, RelayError};
use crate::scan::Manifest;
use crate::types::Page;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a solid PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::from_pixel(width, height, image::Rgb([180, 140, 90]))
        .save(path)
        .unwrap();
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a Page {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// The loaded catalog. Panics if the gallery failed to load.
pub fn gallery_catalog(manifest: &Manifest) -> &Catalog {
    manifest.gallery.data().unwrap_or_else(|| {
        panic!(
            "gallery did not load: {}",
            manifest.gallery.error().unwrap_or("still loading")
        )
    })
}

/// Find a catalog item by id. Panics if not found.
pub fn find_item<'a>(catalog: &'a Catalog, id: &str) -> &'a GalleryItem {
    catalog
        .items
        .iter()
        .find(|i| i.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();
            panic!("item '{id}' not found. Available: {ids:?}")
        })
}

/// Navigation titles in order.
pub fn nav_titles(manifest: &Manifest) -> Vec<&str> {
    manifest
        .navigation
        .iter()
        .map(|n| n.title.as_str())
        .collect()
}

// =========================================================================
// Mail
// =========================================================================

/// Mailer that records what it sends instead of delivering it.
///
/// Ids are `msg-1`, `msg-2`, ... in send order. With `failing_after(n)` the
/// first `n` sends succeed and every later one fails with a provider error.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    fail_after: Option<usize>,
}

impl RecordingMailer {
    pub fn failing_after(successes: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_after: Some(successes),
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<String, RelayError> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_after.is_some_and(|n| sent.len() >= n) {
            return Err(RelayError::Provider {
                status: 500,
                message: "mailbox unavailable".to_string(),
            });
        }
        sent.push(email.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}
