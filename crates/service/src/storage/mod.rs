//! Storage helpers for the service layer
//!
//! Whole-file JSON read/write used by the file-backed catalog.

pub mod json_file;
