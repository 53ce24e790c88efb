//! Split service: the dispatcher in front of the split algorithms.
//!
//! This module provides the main entry point for splitting an expense. It
//! validates the request, routes it to the policy's algorithm and verifies
//! the conservation invariant before returning.

use divvy_shared::EqualRemainder;
use divvy_shared::config::SplitConfig;
use divvy_shared::types::Money;
use rust_decimal::Decimal;
use tracing::{debug, error};

use super::equal::split_equal;
use super::error::SplitError;
use super::exact::split_exact;
use super::percentage::split_percentage;
use super::types::{Share, SplitRequest, SplitResult, SplitSpecification, ValidatedSplit};
use super::validation::validate_request;

/// Tunable engine behaviour. The defaults reproduce the standard rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSettings {
    /// Allowed distance between the percentage sum and 100.
    pub percentage_tolerance: Decimal,
    /// Who absorbs the leftover cents of an equal split.
    pub equal_remainder: EqualRemainder,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            percentage_tolerance: Decimal::new(1, 2),
            equal_remainder: EqualRemainder::FirstParticipant,
        }
    }
}

impl From<&SplitConfig> for SplitSettings {
    fn from(config: &SplitConfig) -> Self {
        Self {
            percentage_tolerance: config.percentage_tolerance,
            equal_remainder: config.equal_remainder,
        }
    }
}

/// Split service.
///
/// Holds only settings, so one instance can serve any number of callers
/// concurrently. Identical requests always produce identical results.
#[derive(Debug, Clone, Default)]
pub struct SplitService {
    settings: SplitSettings,
}

impl SplitService {
    /// Creates a service with the given settings.
    #[must_use]
    pub const fn new(settings: SplitSettings) -> Self {
        Self { settings }
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &SplitSettings {
        &self.settings
    }

    /// Validate a request and compute its split.
    ///
    /// This function performs all steps:
    /// 1. Validates participants, payer and total
    /// 2. Resolves the policy and its per-participant data
    /// 3. Runs the policy's algorithm
    /// 4. Verifies that the shares add up to the total
    ///
    /// # Errors
    ///
    /// Returns `SplitError` if validation or calculation fails.
    ///
    /// # Example
    ///
    /// ```
    /// use divvy_core::{SplitRequest, SplitService};
    /// use divvy_shared::types::Money;
    ///
    /// let request = SplitRequest::equal(Money::from_cents(10000), ["A", "B", "C"], "A");
    /// let result = SplitService::default().calculate(&request).unwrap();
    /// assert_eq!(result.get("A"), Some(Money::from_cents(3334)));
    /// assert_eq!(result.sum(), result.total());
    /// ```
    pub fn calculate(&self, request: &SplitRequest) -> Result<SplitResult, SplitError> {
        let validated = validate_request(request).inspect_err(|err| {
            debug!(
                policy = %request.policy,
                participants = request.participants.len(),
                code = err.error_code(),
                %err,
                "split request rejected"
            );
        })?;
        self.calculate_validated(&validated)
    }

    /// Compute the split for an already validated request.
    ///
    /// # Errors
    ///
    /// Returns `SplitError` if the policy's algorithm rejects the data or the
    /// computed shares break conservation.
    pub fn calculate_validated(&self, split: &ValidatedSplit) -> Result<SplitResult, SplitError> {
        let total = split.total();
        let shares = match split.specification() {
            SplitSpecification::Equal => {
                split_equal(total, split.participants(), self.settings.equal_remainder)
            }
            SplitSpecification::Exact(amounts) => split_exact(total, amounts),
            SplitSpecification::Percentage(percentages) => {
                split_percentage(total, percentages, self.settings.percentage_tolerance)
            }
        }
        .inspect_err(|err| {
            debug!(code = err.error_code(), %err, "split calculation rejected");
        })?;

        verify_conservation(total, &shares).inspect_err(|err| {
            error!(%err, "split broke conservation");
        })?;

        debug!(policy = %split.policy(), shares = shares.len(), "split calculated");
        Ok(SplitResult::new(
            split.policy(),
            total,
            split.payer().clone(),
            shares,
        ))
    }
}

/// Checks that `shares` add up to `total` exactly.
///
/// # Errors
///
/// Returns `ConservationViolated` with both sums otherwise.
pub fn verify_conservation(total: Money, shares: &[Share]) -> Result<(), SplitError> {
    let actual: Money = shares.iter().map(|share| share.amount).sum();
    if actual != total {
        return Err(SplitError::ConservationViolated {
            expected: total,
            actual,
        });
    }
    Ok(())
}

/// Splits an expense with default settings.
///
/// # Errors
///
/// See [`SplitService::calculate`].
pub fn calculate_splits(request: &SplitRequest) -> Result<SplitResult, SplitError> {
    SplitService::default().calculate(request)
}
