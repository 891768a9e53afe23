//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! [business]
//! name = "Top Flooring Services"
//! tagline = "Premium Flooring Solutions"
//! phone = "(689) 255-7378"
//! email = "info@topflooringservices.com"
//! address = "Orlando, FL"
//! blurb = "Licensed, family-owned flooring company."
//!
//! [gallery]
//! catalog = "gallery-config.xml"  # path under content/, or an http(s) URL
//! navigation = "circular"         # or "clamped"
//! all_label = "All Projects"
//!
//! [relay]
//! endpoint = "/api/send-quote-request"
//! from = "Top Flooring Services <no-reply@topflooringservices.com>"
//! business_recipient = "owner@topflooringservices.com"
//! api_url = "https://api.resend.com/emails"
//! api_key_env = "RESEND_API_KEY"
//!
//! [[services]]
//! id = "hardwood"
//! title = "Hardwood Installation"
//! description = "Solid and engineered hardwood floors."
//! features = ["Subfloor preparation"]
//!
//! [colors]
//! background = "#ffffff"
//! ...
//!
//! [theme]
//! content_width = "72rem"
//! ...
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::loader::CATALOG_FILE;
use crate::viewer::NavigationPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Business identity shown in the header, footer, and emails.
    pub business: BusinessConfig,
    /// Gallery catalog location and viewer behavior.
    pub gallery: GalleryConfig,
    /// Quote request relay settings.
    pub relay: RelayConfig,
    /// Services offered. Drive the home page cards and the contact form.
    pub services: Vec<Service>,
    /// Color scheme.
    pub colors: ColorConfig,
    /// Layout settings.
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            business: BusinessConfig::default(),
            gallery: GalleryConfig::default(),
            relay: RelayConfig::default(),
            services: default_services(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "business.name must not be empty".into(),
            ));
        }
        if !self.relay.endpoint.starts_with('/') {
            return Err(ConfigError::Validation(
                "relay.endpoint must start with '/'".into(),
            ));
        }
        if !self.relay.from.contains('@') {
            return Err(ConfigError::Validation(
                "relay.from must contain an email address".into(),
            ));
        }
        if !self.relay.business_recipient.contains('@') {
            return Err(ConfigError::Validation(
                "relay.business_recipient must be an email address".into(),
            ));
        }
        if self.gallery.catalog.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.catalog must not be empty".into(),
            ));
        }
        for (i, service) in self.services.iter().enumerate() {
            if service.id.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "services[{i}].id must not be empty"
                )));
            }
            if self.services[..i].iter().any(|s| s.id == service.id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate service id '{}'",
                    service.id
                )));
            }
        }
        Ok(())
    }

    /// Display name of a service id, if it is one we offer.
    pub fn service_title(&self, id: &str) -> Option<&str> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.title.as_str())
    }
}

/// Business identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusinessConfig {
    /// Trading name.
    pub name: String,
    /// Short headline for the home page hero.
    pub tagline: String,
    /// Phone number as displayed.
    pub phone: String,
    /// Public contact address.
    pub email: String,
    /// Street address or service area.
    pub address: String,
    /// One-paragraph description for the footer.
    pub blurb: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "Top Flooring Services".to_string(),
            tagline: "Premium Flooring Solutions".to_string(),
            phone: "(689) 255-7378".to_string(),
            email: "info@topflooringservices.com".to_string(),
            address: String::new(),
            blurb: "Licensed, family-owned flooring company. We specialize in hardwood, \
                    laminate, vinyl, and tile installation."
                .to_string(),
        }
    }
}

impl BusinessConfig {
    /// `tel:` link target for the phone number.
    pub fn phone_href(&self) -> String {
        let digits: String = self
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        format!("tel:{digits}")
    }
}

/// Gallery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Catalog location: a path relative to the content root, or an
    /// `http(s)://` URL.
    pub catalog: String,
    /// Viewer behavior at the ends of a category.
    pub navigation: NavigationPolicy,
    /// Label of the "all" tab when the catalog does not declare one.
    pub all_label: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            catalog: CATALOG_FILE.to_string(),
            navigation: NavigationPolicy::Circular,
            all_label: "All Projects".to_string(),
        }
    }
}

/// Quote request relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Path the contact form posts to.
    pub endpoint: String,
    /// Sender for both outgoing messages.
    pub from: String,
    /// Where new quote requests are delivered.
    pub business_recipient: String,
    /// Email provider send endpoint.
    pub api_url: String,
    /// Environment variable holding the provider API key.
    pub api_key_env: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/send-quote-request".to_string(),
            from: "Top Flooring Services <no-reply@topflooringservices.com>".to_string(),
            business_recipient: "info@topflooringservices.com".to_string(),
            api_url: "https://api.resend.com/emails".to_string(),
            api_key_env: "RESEND_API_KEY".to_string(),
        }
    }
}

/// A service offered by the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    /// Value submitted by the contact form.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_services() -> Vec<Service> {
    let service = |id: &str, title: &str, description: &str| Service {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        features: Vec::new(),
    };
    vec![
        service(
            "hardwood",
            "Hardwood Installation",
            "Expert installation of solid and engineered hardwood floors with premium finishes.",
        ),
        service(
            "vinyl",
            "Vinyl & Laminate",
            "Durable and beautiful vinyl and laminate flooring solutions for any space.",
        ),
        service(
            "tile",
            "Tile & Stone",
            "Professional tile and stone installation for kitchens, bathrooms, and more.",
        ),
        service(
            "demolition",
            "Demolition Services",
            "Professional demolition and removal services to prepare your space for new flooring.",
        ),
    ]
}

/// Site color scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (descriptions, footer copy).
    pub text_muted: String,
    /// Brand accent (buttons, active nav item, hero).
    pub accent: String,
    /// Accent on hover.
    pub accent_hover: String,
    /// Footer background.
    pub footer: String,
    /// Border color.
    pub border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
            text_muted: "#4b5563".to_string(),
            accent: "#b45309".to_string(),
            accent_hover: "#92400e".to_string(),
            footer: "#1f2937".to_string(),
            border: "#e5e7eb".to_string(),
        }
    }
}

/// A responsive CSS size expressed as `clamp(min, size, max)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    /// Preferred/fluid value, typically viewport-relative (e.g. `"4vw"`).
    pub size: String,
    /// Minimum bound.
    pub min: String,
    /// Maximum bound.
    pub max: String,
}

impl ClampSize {
    /// Render as a CSS `clamp()` expression.
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

/// Layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Maximum width of page content.
    pub content_width: String,
    /// Gap between gallery cards.
    pub grid_gap: String,
    /// Padding between the viewer panel and the screen edge.
    pub viewer_padding: ClampSize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            content_width: "72rem".to_string(),
            grid_gap: "2rem".to_string(),
            viewer_padding: ClampSize {
                size: "4vw".to_string(),
                min: "0.5rem".to_string(),
                max: "2rem".to_string(),
            },
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value (arrays included)
/// replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# floorsite configuration
# =======================
# All settings are optional. Values shown are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Business identity (header, footer, emails)
# ---------------------------------------------------------------------------
[business]
name = "Top Flooring Services"
tagline = "Premium Flooring Solutions"
phone = "(689) 255-7378"
email = "info@topflooringservices.com"
address = ""
blurb = "Licensed, family-owned flooring company. We specialize in hardwood, laminate, vinyl, and tile installation."

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# Catalog document: a path relative to the content directory, or an
# http(s) URL fetched at build time.
catalog = "gallery-config.xml"

# Viewer behavior at the ends of a category:
#   "circular" wraps around, "clamped" stops at the first/last image.
navigation = "circular"

# Label of the "all" tab when the catalog does not declare one.
all_label = "All Projects"

# ---------------------------------------------------------------------------
# Quote request relay (used by `floorsite serve`)
# ---------------------------------------------------------------------------
[relay]
endpoint = "/api/send-quote-request"
from = "Top Flooring Services <no-reply@topflooringservices.com>"
business_recipient = "info@topflooringservices.com"
api_url = "https://api.resend.com/emails"
# Name of the environment variable holding the provider API key.
api_key_env = "RESEND_API_KEY"

# ---------------------------------------------------------------------------
# Services (home page cards, contact form choices)
# Declaring any [[services]] replaces the whole default list.
# ---------------------------------------------------------------------------
[[services]]
id = "hardwood"
title = "Hardwood Installation"
description = "Expert installation of solid and engineered hardwood floors with premium finishes."

[[services]]
id = "vinyl"
title = "Vinyl & Laminate"
description = "Durable and beautiful vinyl and laminate flooring solutions for any space."

[[services]]
id = "tile"
title = "Tile & Stone"
description = "Professional tile and stone installation for kitchens, bathrooms, and more."

[[services]]
id = "demolition"
title = "Demolition Services"
description = "Professional demolition and removal services to prepare your space for new flooring."

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
text = "#111827"
text_muted = "#4b5563"
accent = "#b45309"
accent_hover = "#92400e"
footer = "#1f2937"
border = "#e5e7eb"

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[theme]
content_width = "72rem"
grid_gap = "2rem"

# Space around the viewer panel, as CSS clamp(min, size, max).
[theme.viewer_padding]
size = "4vw"
min = "0.5rem"
max = "2rem"
"##
}

/// Generate CSS custom properties from the color and theme config.
pub fn generate_theme_css(colors: &ColorConfig, theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
    --color-accent-hover: {accent_hover};
    --color-footer: {footer};
    --color-border: {border};
    --content-width: {content_width};
    --grid-gap: {grid_gap};
    --viewer-padding: {viewer_padding};
}}"#,
        background = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        accent = colors.accent,
        accent_hover = colors.accent_hover,
        footer = colors.footer,
        border = colors.border,
        content_width = theme.content_width,
        grid_gap = theme.grid_gap,
        viewer_padding = theme.viewer_padding.to_css(),
    )
}
