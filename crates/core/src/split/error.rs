//! Split error types.
//!
//! Every rejection is returned to the caller as a typed value. No partial
//! result is ever produced alongside an error.

use divvy_shared::AppError;
use divvy_shared::types::{Money, ParticipantId};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::types::SplitPolicy;

/// Broad classification of a [`SplitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Participants, payer or total are unusable.
    Input,
    /// Per-participant data is missing, extraneous or out of range.
    PolicyData,
    /// Amounts or percentages do not add up.
    Conservation,
    /// The policy tag is not recognised.
    UnknownPolicy,
    /// The engine broke one of its own invariants.
    Internal,
}

/// Errors that can occur while splitting an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    // ========== Input Errors ==========
    /// The participant list is empty.
    #[error("At least one participant is required")]
    EmptyParticipants,

    /// The participant list names someone twice.
    #[error("Duplicate participants not allowed: {0}")]
    DuplicateParticipant(ParticipantId),

    /// The payer does not appear in the participant list.
    #[error("Payer {0} must be included in participants list")]
    PayerNotParticipant(ParticipantId),

    /// The total is zero or negative.
    #[error("Total amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    /// An intermediate amount does not fit the decimal representation.
    #[error("Amount is outside the representable range")]
    AmountOutOfRange,

    // ========== Policy Errors ==========
    /// The policy tag is not one of `equal`, `exact` or `percentage`.
    #[error("Unknown split policy: {0}. Must be 'equal', 'exact', or 'percentage'")]
    UnknownPolicy(String),

    // ========== Policy Data Errors ==========
    /// The policy needs a per-participant map and none was supplied.
    #[error("{0} split requires per-participant share data")]
    MissingPolicyData(SplitPolicy),

    /// A participant has no entry in the per-participant map.
    #[error("Missing share data for participant {0}")]
    MissingShareData(ParticipantId),

    /// The per-participant map names someone outside the participant list.
    #[error("Share data specified for non-participant {0}")]
    UnexpectedShareData(ParticipantId),

    /// An exact amount is below zero.
    #[error("Amount for {participant} cannot be negative: {amount}")]
    NegativeShare {
        /// The participant with the negative amount.
        participant: ParticipantId,
        /// The amount as supplied.
        amount: Decimal,
    },

    /// A percentage lies outside `[0, 100]`.
    #[error("Invalid percentage for {participant}: {percentage}%")]
    InvalidPercentage {
        /// The participant with the invalid percentage.
        participant: ParticipantId,
        /// The percentage as supplied.
        percentage: Decimal,
    },

    // ========== Conservation Errors ==========
    /// Exact amounts do not add up to the total.
    #[error(
        "Split amounts ({actual}) don't match total expense ({expected}). Difference: {difference}"
    )]
    ConservationMismatch {
        /// The expense total.
        expected: Money,
        /// The sum of the supplied amounts after rounding to the cent.
        actual: Money,
        /// `expected - actual`.
        difference: Money,
    },

    /// Percentages do not add up to 100 within tolerance.
    #[error("Percentages must sum to 100% (got {sum}%)")]
    PercentageSumMismatch {
        /// The sum of the supplied percentages.
        sum: Decimal,
    },

    /// The remainder holder of a percentage split would owe a negative amount.
    #[error("Remainder for participant {participant} would be negative: {remainder}")]
    NegativeRemainder {
        /// The participant absorbing the remainder.
        participant: ParticipantId,
        /// The remainder that would have been assigned.
        remainder: Money,
    },

    // ========== Internal Errors ==========
    /// Computed shares do not add up to the total.
    #[error("Split total {actual} != expense total {expected}")]
    ConservationViolated {
        /// The expense total.
        expected: Money,
        /// The sum of the computed shares.
        actual: Money,
    },
}

impl SplitError {
    /// Returns the broad category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyParticipants
            | Self::DuplicateParticipant(_)
            | Self::PayerNotParticipant(_)
            | Self::NonPositiveAmount(_)
            | Self::AmountOutOfRange => ErrorCategory::Input,
            Self::UnknownPolicy(_) => ErrorCategory::UnknownPolicy,
            Self::MissingPolicyData(_)
            | Self::MissingShareData(_)
            | Self::UnexpectedShareData(_)
            | Self::NegativeShare { .. }
            | Self::InvalidPercentage { .. } => ErrorCategory::PolicyData,
            Self::ConservationMismatch { .. }
            | Self::PercentageSumMismatch { .. }
            | Self::NegativeRemainder { .. } => ErrorCategory::Conservation,
            Self::ConservationViolated { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyParticipants => "EMPTY_PARTICIPANTS",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::PayerNotParticipant(_) => "PAYER_NOT_PARTICIPANT",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::UnknownPolicy(_) => "UNKNOWN_POLICY",
            Self::MissingPolicyData(_) => "MISSING_POLICY_DATA",
            Self::MissingShareData(_) => "MISSING_SHARE_DATA",
            Self::UnexpectedShareData(_) => "UNEXPECTED_SHARE_DATA",
            Self::NegativeShare { .. } => "NEGATIVE_SHARE",
            Self::InvalidPercentage { .. } => "INVALID_PERCENTAGE",
            Self::ConservationMismatch { .. } => "CONSERVATION_MISMATCH",
            Self::PercentageSumMismatch { .. } => "PERCENTAGE_SUM_MISMATCH",
            Self::NegativeRemainder { .. } => "NEGATIVE_REMAINDER",
            Self::ConservationViolated { .. } => "CONSERVATION_VIOLATED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.category() {
            // 400 Bad Request - malformed input
            ErrorCategory::Input | ErrorCategory::PolicyData | ErrorCategory::UnknownPolicy => 400,
            // 422 Unprocessable Entity - well-formed but does not add up
            ErrorCategory::Conservation => 422,
            // 500 Internal Server Error
            ErrorCategory::Internal => 500,
        }
    }

    /// Returns true if the participant list itself was rejected
    /// (empty or containing duplicates).
    #[must_use]
    pub fn is_duplicate_or_empty_participants(&self) -> bool {
        matches!(self, Self::EmptyParticipants | Self::DuplicateParticipant(_))
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        match err.category() {
            ErrorCategory::Input | ErrorCategory::PolicyData | ErrorCategory::UnknownPolicy => {
                Self::Validation(err.to_string())
            }
            ErrorCategory::Conservation => Self::BusinessRule(err.to_string()),
            ErrorCategory::Internal => Self::Internal(err.to_string()),
        }
    }
}
