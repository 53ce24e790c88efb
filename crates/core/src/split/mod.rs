//! Expense split calculation.
//!
//! Every call runs one synchronous pipeline:
//! - validate the request into a [`ValidatedSplit`]
//! - run the policy's algorithm (equal, exact or percentage)
//! - verify that the shares add up to the total
//!
//! Nothing is kept between calls, so a [`SplitService`] can be shared freely
//! across threads.

pub mod equal;
pub mod error;
pub mod exact;
pub mod percentage;
pub mod service;
pub mod summary;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use equal::split_equal;
pub use error::{ErrorCategory, SplitError};
pub use exact::split_exact;
pub use percentage::split_percentage;
pub use service::{SplitService, SplitSettings, calculate_splits, verify_conservation};
pub use summary::{Debt, SplitSummary};
pub use types::{
    Share, ShareBasis, SplitPolicy, SplitRequest, SplitResult, SplitSpecification, ValidatedSplit,
};
pub use validation::validate_request;
