//! Utility functions for code generation and input validation.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Long URL validation
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
