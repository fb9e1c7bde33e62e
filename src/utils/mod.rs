//! Utility functions used across the application.
//!
//! - [`domain_guard`] - Self-referential target protection and scheme enforcement
//! - [`url_validator`] - Target URL validation
//! - [`code_generator`] - Short code generation and validation
//! - [`client_ip`] - Client key extraction for rate limiting

pub mod client_ip;
pub mod code_generator;
pub mod domain_guard;
pub mod url_validator;
