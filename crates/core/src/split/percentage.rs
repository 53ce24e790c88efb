//! Percentage split.
//!
//! Participants are ordered by percentage, largest first. Ties keep their
//! participant-list order. Everyone except the last in that order gets
//! `total * percentage / 100` rounded half up to the cent; the last one gets
//! whatever is left, so the shares always add up to the total.
//!
//! Each rounded share can be up to half a cent over its exact value, so on
//! small totals the rounded shares can exceed the total before the holder is
//! reached. That split is rejected rather than given a negative share, even
//! when the percentages sum to exactly 100.

use divvy_shared::types::{Money, ParticipantId};
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{Share, ShareBasis};

/// Splits `total` by per-participant percentages.
///
/// `tolerance` is the largest allowed distance between the percentage sum
/// and 100.
///
/// # Errors
///
/// - `InvalidPercentage` for the first percentage outside `[0, 100]`
/// - `PercentageSumMismatch` if the sum is further than `tolerance` from 100
/// - `NegativeRemainder` if the rounded shares of the others exceed `total`
///   and the remainder holder would end up below zero
/// - `AmountOutOfRange` if the arithmetic overflows
pub fn split_percentage(
    total: Money,
    percentages: &[(ParticipantId, Decimal)],
    tolerance: Decimal,
) -> Result<Vec<Share>, SplitError> {
    for (participant, percentage) in percentages {
        if *percentage < Decimal::ZERO || *percentage > Decimal::ONE_HUNDRED {
            return Err(SplitError::InvalidPercentage {
                participant: participant.clone(),
                percentage: *percentage,
            });
        }
    }

    let sum: Decimal = percentages.iter().map(|(_, percentage)| *percentage).sum();
    if (sum - Decimal::ONE_HUNDRED).abs() > tolerance {
        return Err(SplitError::PercentageSumMismatch { sum });
    }

    let order = remainder_order(percentages);
    let Some((&holder, computed)) = order.split_last() else {
        return Ok(Vec::new());
    };

    let mut amounts = vec![Money::ZERO; percentages.len()];
    let mut running = Money::ZERO;
    for &index in computed {
        let amount = total
            .checked_percentage(percentages[index].1)
            .ok_or(SplitError::AmountOutOfRange)?;
        amounts[index] = amount;
        running = running
            .checked_add(amount)
            .ok_or(SplitError::AmountOutOfRange)?;
    }

    let remainder = total
        .checked_sub(running)
        .ok_or(SplitError::AmountOutOfRange)?;
    let holder_id = &percentages[holder].0;
    if remainder.is_negative() {
        return Err(SplitError::NegativeRemainder {
            participant: holder_id.clone(),
            remainder,
        });
    }
    amounts[holder] = remainder;

    tracing::debug!(
        remainder_holder = %holder_id,
        remainder = %remainder,
        "percentage split computed"
    );

    Ok(percentages
        .iter()
        .zip(amounts)
        .map(|((participant, percentage), amount)| {
            Share::new(
                participant.clone(),
                amount,
                ShareBasis::Percentage {
                    percentage: *percentage,
                },
            )
        })
        .collect())
}

/// Returns indices into `percentages`, largest percentage first.
///
/// The sort is stable, so equal percentages stay in participant order and
/// the last index is the participant who absorbs the rounding remainder.
pub fn remainder_order(percentages: &[(ParticipantId, Decimal)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..percentages.len()).collect();
    order.sort_by(|&a, &b| percentages[b].1.cmp(&percentages[a].1));
    order
}
