//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! with no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Data API
  pub api_base: String,
  pub max_results: u32,
  pub primary_domain: String,
  pub short_link_domain: String,
  pub embed_base: String,

  // Key-value storage
  pub api_key_storage_key: String,
  pub feed_storage_key: String,
  pub feed_time_storage_key: String,
  pub storage_file: String,

  // Home feed cache
  pub feed_ttl_ms: i64,

  // Rendering
  pub untitled_placeholder: String,
  pub home_page: String,
  pub search_page: String,
  pub watch_page: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
