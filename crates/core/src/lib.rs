//! Core business logic for Divvy.
//!
//! This crate contains the expense split engine with ZERO I/O dependencies.
//! Given a total, an ordered participant list, a payer and a split policy it
//! computes each participant's share so that the shares always add up to
//! the total exactly.
//!
//! # Modules
//!
//! - `split` - Validation, the equal/exact/percentage algorithms and the dispatcher

pub mod split;

pub use split::{
    ErrorCategory, Share, ShareBasis, SplitError, SplitPolicy, SplitRequest, SplitResult,
    SplitService, SplitSettings, SplitSummary, calculate_splits,
};
