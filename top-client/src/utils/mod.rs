//! Utility modules.

/// Gateway timestamp formatting and parsing.
pub mod datetime;

/// Serde helpers for JSON-encoded-as-string fields.
pub mod embedded_json;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
