//! URL handling module for Sumi-Corpus
//!
//! This module provides the advisory URL filters applied before a fetch is
//! attempted, plus link resolution and media naming helpers shared by the
//! extractors.

mod classify;
mod resolve;

// Re-export main functions
pub use classify::{is_internal, is_login_page, is_tracking_url};
pub use resolve::{media_name, resolve_href, strip_fragment};
