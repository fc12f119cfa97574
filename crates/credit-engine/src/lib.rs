//! Credit risk scoring and decision engine.
//!
//! The [`scoring`] module holds the pure, synchronous core: an applicant record goes in and a
//! bounded score, decision, loan limits, and ranked explanation come out. Everything around it
//! (request validation, rate limiting, the decision envelope, and the HTTP router) consumes the
//! core through the [`scoring::CreditScorer`] seam.

pub mod config;
pub mod error;
pub mod intake;
pub mod router;
pub mod scoring;
pub mod service;
pub mod telemetry;

pub use router::credit_router;
pub use scoring::{CreditScorer, ScoringEngine, ScoringResult};
pub use service::{CreditDecision, CreditDecisionService, DecisionServiceError};
