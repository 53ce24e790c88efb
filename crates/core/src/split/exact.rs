//! Exact split.
//!
//! No shares are computed here. Each requested amount is rounded half up to
//! the cent and the rounded amounts must add up to the total with zero
//! tolerance.

use divvy_shared::types::{Money, ParticipantId};
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{Share, ShareBasis};

/// Checks explicit per-participant amounts against `total`.
///
/// # Errors
///
/// - `NegativeShare` for the first amount below zero
/// - `ConservationMismatch` if the rounded amounts do not sum to `total`
/// - `AmountOutOfRange` if the sum overflows
pub fn split_exact(
    total: Money,
    amounts: &[(ParticipantId, Decimal)],
) -> Result<Vec<Share>, SplitError> {
    let mut shares = Vec::with_capacity(amounts.len());
    let mut sum = Money::ZERO;

    for (participant, requested) in amounts {
        if *requested < Decimal::ZERO {
            return Err(SplitError::NegativeShare {
                participant: participant.clone(),
                amount: *requested,
            });
        }

        let amount = Money::from_decimal_rounded(*requested);
        sum = sum
            .checked_add(amount)
            .ok_or(SplitError::AmountOutOfRange)?;
        shares.push(Share::new(
            participant.clone(),
            amount,
            ShareBasis::Exact {
                requested: *requested,
            },
        ));
    }

    if sum != total {
        return Err(SplitError::ConservationMismatch {
            expected: total,
            actual: sum,
            difference: total - sum,
        });
    }

    Ok(shares)
}
