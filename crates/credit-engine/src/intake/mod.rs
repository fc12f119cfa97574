//! Request gatekeeping that runs before an application reaches the scorer.

pub mod rate_limit;
pub mod validation;

pub use rate_limit::{
    InMemoryRateLimitStore, RateLimitDecision, RateLimitDenial, RateLimitPolicy, RateLimitStore,
    RateLimiter,
};
pub use validation::{IssueKind, RequestValidator, ValidationIssue, ValidationReport};
