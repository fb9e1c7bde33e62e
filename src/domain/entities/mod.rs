//! Core domain entities.
//!
//! - [`ShortLink`] - A code bound to a target URL until its TTL runs out
//! - [`QuotaDecision`] - What the store reports after a quota reservation
//! - [`QuotaOutcome`] - The rate limiter's verdict for a client

pub mod quota;
pub mod short_link;

pub use quota::{QuotaDecision, QuotaOutcome, QuotaSnapshot, whole_minutes};
pub use short_link::ShortLink;
