//! Utility functions for code allocation, URL processing, and visitor identity.
//!
//! - [`code_generator`] - Short code candidate generation
//! - [`slug_validator`] - Short code validation rules
//! - [`url_normalizer`] - URL normalization and title derivation
//! - [`visitor_hash`] - Keyed hashing of visitor IP addresses
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod slug_validator;
pub mod url_normalizer;
pub mod visitor_hash;
