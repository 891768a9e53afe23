//! HTML site generation.
//!
//! Stage 2 of the build. Takes the scan manifest and writes the static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, `index.md` introduction, service cards
//! - **Pages** (`/{slug}.html`): one per markdown file
//! - **Gallery** (`/gallery/index.html`): every project, with category tabs
//! - **Category grids** (`/gallery/{category}/index.html`)
//! - **Viewer pages** (`/gallery/{category}/{n}.html`): lightbox on item `n`
//! - **Contact** (`/contact.html`): quote request form
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── about.html
//! ├── contact.html
//! ├── gallery/
//! │   ├── index.html          # "all" grid
//! │   ├── all/1.html …        # viewer over every item
//! │   └── hardwood/
//! │       ├── index.html
//! │       └── 1.html …
//! └── images/…                # copied from content/assets/
//! ```
//!
//! ## Viewer pages
//!
//! Each category snapshot is opened once in a [`Viewer`] and walked item by
//! item; every page is a render of the viewer state at that item. Previous
//! and next targets come from the configured [`NavigationPolicy`](crate::viewer::NavigationPolicy),
//! so clamped navigation renders disabled controls at the ends. The
//! orientation class is measured from the image file when it is available
//! locally and re-checked by `viewer.js` once the image loads.
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time:
//! - `static/style.css`: base styles (theme variables injected from config)
//! - `static/viewer.js`: keyboard, click, and swipe handling for the viewer
//! - `static/contact.js`: quote form submission and toast display

use crate::catalog::{ALL_CATEGORY, Catalog, Category, GalleryItem};
use crate::config::{self, Service, SiteConfig};
use crate::filter::{filter, filter_tabs};
use crate::loader::LoadState;
use crate::naming::slugify;
use crate::notice::Notice;
use crate::scan::{ASSETS_DIR, Manifest};
use crate::types::{NavItem, Page};
use crate::viewer::{NavigationError, Viewer};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset copy failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Viewer error: {0}")]
    Navigation(#[from] NavigationError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const VIEWER_JS: &str = include_str!("../static/viewer.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// One written index-style page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub title: String,
    /// Path relative to the output directory.
    pub path: String,
    /// Number of projects shown, for gallery grids.
    pub items: Option<usize>,
}

/// What a generate run wrote.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    pub viewer_pages: usize,
    pub assets_copied: usize,
    /// Set when the catalog failed to load and the gallery shows an error.
    pub gallery_error: Option<String>,
}

/// Read `manifest.json` and generate the site.
pub fn generate(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    render_site(&manifest, source_root, output_dir)
}

/// Generate the site from an in-memory manifest.
pub fn render_site(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    let theme_css = config::generate_theme_css(&config.colors, &config.theme);
    let css = format!("{}\n\n{}", theme_css, CSS_STATIC);

    fs::create_dir_all(output_dir)?;
    let mut report = GenerateReport::default();

    let assets = source_root.join(ASSETS_DIR);
    if manifest.has_assets {
        report.assets_copied = copy_assets(&assets, output_dir)?;
    }

    let shell = Shell {
        config,
        navigation: &manifest.navigation,
        css: &css,
        logo: assets.join("logo.svg").is_file().then_some("/logo.svg"),
    };

    write_page(
        output_dir,
        page_entry(&config.business.name, "index.html"),
        render_home(&shell, manifest.home.as_ref()),
        &mut report,
    )?;

    for page in &manifest.pages {
        let path = format!("{}.html", page.slug);
        write_page(
            output_dir,
            page_entry(&page.title, &path),
            render_page(&shell, page),
            &mut report,
        )?;
    }

    match manifest.gallery.data() {
        Some(catalog) => generate_gallery(&shell, catalog, source_root, output_dir, &mut report)?,
        None => {
            report.gallery_error = manifest.gallery.error().map(str::to_string);
            write_page(
                output_dir,
                page_entry("Gallery", "gallery/index.html"),
                render_gallery_unavailable(&shell, &manifest.gallery),
                &mut report,
            )?;
        }
    }

    write_page(
        output_dir,
        page_entry("Contact", "contact.html"),
        render_contact(&shell),
        &mut report,
    )?;

    tracing::info!(
        pages = report.pages.len(),
        viewer_pages = report.viewer_pages,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn page_entry(title: &str, path: &str) -> GeneratedPage {
    GeneratedPage {
        title: title.to_string(),
        path: path.to_string(),
        items: None,
    }
}

fn write_page(
    output_dir: &Path,
    entry: GeneratedPage,
    markup: Markup,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    write_file(output_dir, &entry.path, markup)?;
    report.pages.push(entry);
    Ok(())
}

fn write_file(output_dir: &Path, rel: &str, markup: Markup) -> Result<(), GenerateError> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string())?;
    tracing::debug!(path = rel, "wrote page");
    Ok(())
}

/// Copy the assets directory into the output root. Returns the file count.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Gallery
// ============================================================================

/// A filter tab and the directory its pages are written to.
#[derive(Debug, Clone)]
struct GalleryTab {
    category: Category,
    dir: String,
}

impl GalleryTab {
    /// Grid page link. The "all" grid is the gallery landing page.
    fn href(&self) -> String {
        if self.category.is_all() {
            "/gallery/".to_string()
        } else {
            format!("/gallery/{}/", self.dir)
        }
    }

    fn index_path(&self) -> String {
        if self.category.is_all() {
            "gallery/index.html".to_string()
        } else {
            format!("gallery/{}/index.html", self.dir)
        }
    }

    fn viewer_href(&self, index: usize) -> String {
        format!("/{}", self.viewer_path(index))
    }

    /// Viewer pages are numbered from 1.
    fn viewer_path(&self, index: usize) -> String {
        format!("gallery/{}/{}.html", self.dir, index + 1)
    }
}

/// Filter tabs with unique, URL-safe directory names.
fn gallery_tabs(catalog: &Catalog, all_label: &str) -> Vec<GalleryTab> {
    let mut used: Vec<String> = Vec::new();
    filter_tabs(catalog, all_label)
        .into_iter()
        .map(|category| {
            let base = if category.is_all() {
                ALL_CATEGORY.to_string()
            } else {
                Some(slugify(&category.id))
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "category".to_string())
            };
            let mut dir = base.clone();
            let mut n = 2;
            while used.contains(&dir) {
                dir = format!("{base}-{n}");
                n += 1;
            }
            used.push(dir.clone());
            GalleryTab { category, dir }
        })
        .collect()
}

fn generate_gallery(
    shell: &Shell,
    catalog: &Catalog,
    source_root: &Path,
    output_dir: &Path,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let tabs = gallery_tabs(catalog, &shell.config.gallery.all_label);
    for tab in &tabs {
        let items = filter(catalog, &tab.category.id);
        let entry = GeneratedPage {
            title: format!("Gallery: {}", tab.category.name),
            path: tab.index_path(),
            items: Some(items.len()),
        };
        write_page(
            output_dir,
            entry,
            render_gallery_grid(shell, &tabs, tab, &items),
            report,
        )?;
        report.viewer_pages += write_viewer_pages(shell, tab, &items, source_root, output_dir)?;
    }
    Ok(())
}

/// Walk a viewer across one category snapshot, writing a page per item.
fn write_viewer_pages(
    shell: &Shell,
    tab: &GalleryTab,
    items: &[&GalleryItem],
    source_root: &Path,
    output_dir: &Path,
) -> Result<usize, GenerateError> {
    if items.is_empty() {
        return Ok(0);
    }

    let mut viewer = Viewer::new(shell.config.gallery.navigation);
    viewer.open(items.iter().map(|&item| item.clone()).collect(), 0)?;
    for (index, item) in items.iter().enumerate() {
        viewer.jump_to(index)?;
        if let Some((width, height)) = probe_dimensions(source_root, &item.src) {
            viewer.image_loaded(width, height)?;
        }
        let markup = render_viewer_page(shell, tab, &viewer)?;
        write_file(output_dir, &tab.viewer_path(index), markup)?;
    }
    viewer.close();
    Ok(items.len())
}

/// Pixel size of a locally hosted gallery image, if it can be read.
///
/// `src` is site-absolute (`/images/…`) and resolves under `assets/`.
/// Remote images and paths escaping the assets directory are not measured.
fn probe_dimensions(source_root: &Path, src: &str) -> Option<(u32, u32)> {
    let rel = src.trim_start_matches('/');
    if rel.is_empty() || src.contains("://") || rel.split('/').any(|c| c == "..") {
        return None;
    }
    let path = source_root.join(ASSETS_DIR).join(rel);
    match image::image_dimensions(&path) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not measure image");
            None
        }
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Everything every page shares.
struct Shell<'a> {
    config: &'a SiteConfig,
    navigation: &'a [NavItem],
    css: &'a str,
    logo: Option<&'a str>,
}

impl Shell<'_> {
    /// Wrap page content in header, footer, and the base document.
    fn document(
        &self,
        title: &str,
        current_path: &str,
        body_class: Option<&str>,
        content: Markup,
    ) -> Markup {
        let name = &self.config.business.name;
        let full_title = if title == name {
            name.clone()
        } else {
            format!("{title} | {name}")
        };
        let body = html! {
            (site_header(self.config, self.logo, render_nav(self.navigation, current_path)))
            main { (content) }
            (site_footer(self.config, self.navigation))
        };
        base_document(&full_title, self.css, body_class, body)
    }
}

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

fn site_header(config: &SiteConfig, logo: Option<&str>, nav: Markup) -> Markup {
    html! {
        header.site-header {
            div.container {
                a.brand href="/" {
                    @if let Some(logo) = logo {
                        img src=(logo) alt="";
                    }
                    (config.business.name)
                }
                (nav)
            }
        }
    }
}

/// Renders the navigation bar (collapses to a hamburger on small screens)
pub fn render_nav(items: &[NavItem], current_path: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" aria-label="Menu" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        nav.site-nav {
            ul {
                @for item in items {
                    li class=[is_current(item, current_path).then_some("current")] {
                        a href=(item.href) { (item.title) }
                    }
                }
                li.nav-cta {
                    a.button href="/contact.html" { "Get Quote" }
                }
            }
        }
    }
}

/// Home matches only itself; section links also match pages below them.
fn is_current(item: &NavItem, current_path: &str) -> bool {
    if item.href == "/" {
        return current_path == "/";
    }
    current_path == item.href || (item.href.ends_with('/') && current_path.starts_with(&item.href))
}

fn site_footer(config: &SiteConfig, navigation: &[NavItem]) -> Markup {
    let business = &config.business;
    html! {
        footer.site-footer {
            div.container {
                div {
                    h3 { (business.name) }
                    p { (business.blurb) }
                }
                div {
                    h3 { "Quick Links" }
                    ul {
                        @for item in navigation {
                            li { a href=(item.href) { (item.title) } }
                        }
                    }
                }
                div {
                    h3 { "Contact" }
                    ul {
                        li { a href=(business.phone_href()) { (business.phone) } }
                        li { a href={ "mailto:" (business.email) } { (business.email) } }
                        @if !business.address.is_empty() {
                            li { (business.address) }
                        }
                    }
                }
                p.copyright { "© " (business.name) ". All rights reserved." }
            }
        }
    }
}

fn markdown(body: &str) -> Markup {
    let parser = Parser::new(body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    PreEscaped(body_html)
}

fn service_card(service: &Service) -> Markup {
    html! {
        div.service-card {
            h3 { (service.title) }
            @if !service.description.is_empty() {
                p { (service.description) }
            }
            @if !service.features.is_empty() {
                ul {
                    @for feature in &service.features {
                        li { (feature) }
                    }
                }
            }
        }
    }
}

fn quote_cta(config: &SiteConfig, heading: &str) -> Markup {
    let business = &config.business;
    html! {
        section.section.cta {
            div.container {
                h2 { (heading) }
                p { "Contact us today for a free consultation and estimate." }
                div.hero-actions {
                    a.button href="/contact.html" { "Get Free Quote" }
                    a.button.outline href=(business.phone_href()) { "Call " (business.phone) }
                }
            }
        }
    }
}

fn gallery_hero() -> Markup {
    html! {
        section.hero {
            div.container {
                h1 { "Our Work Gallery" }
                p { "Browse our recent flooring projects and see the quality we deliver." }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(shell: &Shell, home: Option<&Page>) -> Markup {
    let config = shell.config;
    let business = &config.business;
    let content = html! {
        section.hero {
            div.container {
                h1 { (business.tagline) }
                p { (business.blurb) }
                div.hero-actions {
                    a.button href="/contact.html" { "Get Free Quote" }
                    a.button.outline href="/gallery/" { "View Our Work" }
                }
            }
        }
        @if let Some(page) = home {
            section.section {
                div.container.page-intro { (markdown(&page.body)) }
            }
        }
        @if !config.services.is_empty() {
            section.section.alt {
                div.container {
                    h2 { "Our Services" }
                    div.service-grid {
                        @for service in &config.services {
                            (service_card(service))
                        }
                    }
                }
            }
        }
        (quote_cta(config, "Ready to Transform Your Floors?"))
    };
    shell.document(&business.name, "/", None, content)
}

fn render_page(shell: &Shell, page: &Page) -> Markup {
    let content = html! {
        article.page-content { (markdown(&page.body)) }
        (quote_cta(shell.config, "Ready to Transform Your Floors?"))
    };
    let current = format!("/{}.html", page.slug);
    shell.document(&page.title, &current, None, content)
}

fn render_gallery_grid(
    shell: &Shell,
    tabs: &[GalleryTab],
    active: &GalleryTab,
    items: &[&GalleryItem],
) -> Markup {
    let content = html! {
        (gallery_hero())
        section.section {
            div.container {
                nav.filter-tabs aria-label="Project categories" {
                    @for tab in tabs {
                        a.filter-tab.active[tab.dir == active.dir] href=(tab.href()) {
                            (tab.category.name)
                        }
                    }
                }
                @if items.is_empty() {
                    p.empty-state { "No projects in this category yet." }
                } @else {
                    div.gallery-grid {
                        @for (index, item) in items.iter().enumerate() {
                            a.gallery-card href=(active.viewer_href(index)) {
                                img src=(item.src) alt=(item.title) loading="lazy";
                                div.caption {
                                    h3 { (item.title) }
                                    @if !item.description.is_empty() {
                                        p { (item.description) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        (quote_cta(shell.config, "Love What You See?"))
    };
    let title = format!("Gallery: {}", active.category.name);
    shell.document(&title, &active.href(), None, content)
}

/// Gallery landing page when the catalog is not available.
fn render_gallery_unavailable(shell: &Shell, state: &LoadState) -> Markup {
    let content = html! {
        (gallery_hero())
        section.section {
            div.container {
                @if let Some(notice) = state.notice() {
                    div.load-state.failed role="alert" {
                        p { strong { (notice.title) } }
                        p { (notice.message) }
                        button.button type="button" onclick="window.location.reload()" { "Try Again" }
                    }
                } @else {
                    div.load-state { p { "Loading gallery..." } }
                }
            }
        }
        (quote_cta(shell.config, "Love What You See?"))
    };
    shell.document("Gallery", "/gallery/", None, content)
}

fn step_control(class: &str, symbol: &str, label: &str, href: Option<&str>) -> Markup {
    html! {
        @if let Some(href) = href {
            a class={ "viewer-step " (class) } href=(href) aria-label=(label) { (symbol) }
        } @else {
            span class={ "viewer-step disabled " (class) } aria-hidden="true" { (symbol) }
        }
    }
}

/// Lightbox on the viewer's current item.
fn render_viewer_page(
    shell: &Shell,
    tab: &GalleryTab,
    viewer: &Viewer<GalleryItem>,
) -> Result<Markup, NavigationError> {
    let session = viewer.session().ok_or(NavigationError::Closed)?;
    let index = session.current_index();
    let item = session.current();
    let len = session.items().len();
    let policy = viewer.policy();

    let prev = viewer
        .has_previous()
        .then(|| tab.viewer_href(policy.step_back(index, len)));
    let next = viewer
        .has_next()
        .then(|| tab.viewer_href(policy.step_forward(index, len)));
    let close = tab.href();
    let counter = viewer.counter().unwrap_or_default();
    let title = if item.title.is_empty() {
        "Project"
    } else {
        item.title.as_str()
    };

    let content = html! {
        div.viewer-backdrop data-close=(close) data-prev=[prev.as_deref()] data-next=[next.as_deref()] {
            div class={ "viewer-panel " (session.orientation().as_str()) }
                role="dialog" aria-modal="true" aria-label=(title) {
                div.viewer-header {
                    h2 { (title) }
                    a.viewer-close href=(close) aria-label="Close" { "×" }
                }
                div.viewer-stage {
                    img.viewer-image src=(item.src) alt=(title);
                    @if len > 1 {
                        (step_control("prev", "‹", "Previous image", prev.as_deref()))
                        (step_control("next", "›", "Next image", next.as_deref()))
                    }
                    div.viewer-counter { (counter) }
                }
                @if !item.description.is_empty() {
                    p.viewer-description { (item.description) }
                }
                @if len > 1 {
                    nav.thumb-strip aria-label="Thumbnails" {
                        @for (i, thumb) in session.items().iter().enumerate() {
                            a.current[i == index] href=(tab.viewer_href(i)) aria-label=(thumb.title) {
                                img src=(thumb.src) alt="" loading="lazy";
                            }
                        }
                    }
                }
            }
        }
        script { (PreEscaped(VIEWER_JS)) }
    };

    let page_title = format!("{} ({})", title, counter);
    Ok(shell.document(&page_title, &close, Some("viewer-open"), content))
}

fn render_contact(shell: &Shell) -> Markup {
    let config = shell.config;
    let business = &config.business;
    let sent = Notice::quote_sent();
    let failed = Notice::quote_failed();
    let endpoint = &config.relay.endpoint;

    let content = html! {
        section.hero {
            div.container {
                h1 { "Get Your Free Quote" }
                p { "Tell us about your project and we'll get back to you within 24 hours." }
            }
        }
        section.section {
            div.container.contact-layout {
                form id="quote-form" class="quote-form" method="post" action=(endpoint)
                    data-endpoint=(endpoint)
                    data-success-title=(sent.title) data-success-message=(sent.message)
                    data-error-title=(failed.title) data-error-message=(failed.message) {
                    label {
                        "Full Name *"
                        input type="text" name="name" required autocomplete="name";
                    }
                    label {
                        "Phone Number *"
                        input type="tel" name="phone" required autocomplete="tel";
                    }
                    label {
                        "Email Address *"
                        input type="email" name="email" required autocomplete="email";
                    }
                    label {
                        "Service Needed"
                        select name="service" {
                            option value="" { "Select a service" }
                            @for service in &config.services {
                                option value=(service.id) { (service.title) }
                            }
                        }
                    }
                    label {
                        "Project Details"
                        textarea name="message" rows="5"
                            placeholder="Tell us about your project: room sizes, current flooring, timeline..." {}
                    }
                    button.button type="submit" { "Send Quote Request" }
                }
                aside.contact-info {
                    h2 { "Contact Information" }
                    dl {
                        dt { "Phone" }
                        dd { a href=(business.phone_href()) { (business.phone) } }
                        dt { "Email" }
                        dd { a href={ "mailto:" (business.email) } { (business.email) } }
                        @if !business.address.is_empty() {
                            dt { "Service Area" }
                            dd { (business.address) }
                        }
                    }
                }
            }
        }
        div id="toast" class="toast" role="status" aria-live="polite" {
            strong.toast-title {}
            span.toast-message {}
        }
        script { (PreEscaped(CONTACT_JS)) }
    };
    shell.document("Contact", "/contact.html", None, content)
}

// ============================================================================
// Tests
// ============================================================================
