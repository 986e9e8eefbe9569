//! Remote-voting ballot eligibility checks.
//!
//! A raw passport series is normalised and validated ([`model::passport`]),
//! hashed to a lookup digest, checked against the roll store ([`store`]), and
//! classified into a tri-state outcome ([`verification`]). The input and
//! output surfaces are capability traits in [`view`], so the pipeline is
//! testable without a console or a live database.

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod verification;
pub mod view;
