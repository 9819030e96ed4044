//! Utility functions and helpers.

pub mod http;
pub mod text;

pub use text::{collapse_whitespace, format_amount, html_to_text, truncate_for_debug};
