//! # floorsite
//!
//! Website tooling for a flooring business: a static site builder with a
//! filterable project gallery and lightbox viewer, plus a small HTTP relay
//! that turns contact form submissions into emails.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (pages, config, gallery catalog)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so each stage can be inspected and
//! tested on its own. `serve` hosts `dist/` and the quote relay endpoint.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Gallery catalog model and XML parser |
//! | [`loader`] | Fetches the catalog from a file or URL into a [`loader::LoadState`] |
//! | [`filter`] | Category filtering and filter tabs |
//! | [`viewer`] | Lightbox state machine: open, step, jump, close, orientation |
//! | [`scan`] | Stage 1: reads the content directory into a manifest |
//! | [`generate`] | Stage 2: renders the site with Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Types shared between stages (`Page`, `NavItem`) |
//! | [`naming`] | `NNN-name` filename convention parser |
//! | [`relay`] | Quote request validation, email composition, provider client |
//! | [`server`] | Axum router: relay endpoint plus static file serving |
//! | [`notice`] | Toast notifications passed from boundaries to the page |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pure Core, Thin Boundaries
//!
//! Parsing, filtering, and viewer navigation are plain functions and values
//! with no I/O. The loader, the generator, and the relay are the only places
//! that touch files, the network, or the email provider. Viewer pages are
//! rendered by walking a real [`viewer::Viewer`] through each category, so
//! the generated prev/next links follow exactly the rules the state machine
//! enforces.
//!
//! ## Static Output
//!
//! The generated site is plain HTML with inline CSS and two small scripts.
//! It can be dropped on any file server; only the contact form needs the
//! relay endpoint.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod generate;
pub mod loader;
pub mod naming;
pub mod notice;
pub mod output;
pub mod relay;
pub mod scan;
pub mod server;
pub mod types;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
