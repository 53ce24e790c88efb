//! Equal split.
//!
//! Each participant gets `floor(total / n)` to the cent. The leftover cents
//! (always fewer than `n`) are assigned by list position:
//! - [`EqualRemainder::FirstParticipant`]: the first participant takes all of them
//! - [`EqualRemainder::Spread`]: the first `k` participants take one cent each
//!
//! Reordering the participant list changes who absorbs the remainder.

use divvy_shared::EqualRemainder;
use divvy_shared::types::{Money, ParticipantId};

use super::error::SplitError;
use super::types::{Share, ShareBasis};

/// Divides `total` evenly among `participants`.
///
/// Returns an empty vector for an empty participant list.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if the arithmetic overflows.
///
/// # Example
///
/// ```
/// use divvy_core::split::split_equal;
/// use divvy_shared::EqualRemainder;
/// use divvy_shared::types::{Money, ParticipantId};
///
/// let people: Vec<ParticipantId> = ["A", "B", "C"].into_iter().map(Into::into).collect();
/// let shares = split_equal(Money::from_cents(10000), &people, EqualRemainder::FirstParticipant).unwrap();
/// let amounts: Vec<String> = shares.iter().map(|s| s.amount.to_string()).collect();
/// assert_eq!(amounts, ["33.34", "33.33", "33.33"]);
/// ```
pub fn split_equal(
    total: Money,
    participants: &[ParticipantId],
    remainder_rule: EqualRemainder,
) -> Result<Vec<Share>, SplitError> {
    let count = participants.len();
    if count == 0 {
        return Ok(Vec::new());
    }
    if count == 1 {
        return Ok(vec![Share::new(
            participants[0].clone(),
            total,
            ShareBasis::Equal,
        )]);
    }

    let base = total
        .checked_div_floor(count)
        .ok_or(SplitError::AmountOutOfRange)?;
    let allocated = base
        .checked_mul_count(count)
        .ok_or(SplitError::AmountOutOfRange)?;
    let remainder = total
        .checked_sub(allocated)
        .ok_or(SplitError::AmountOutOfRange)?;

    let amounts: Vec<Money> = match remainder_rule {
        EqualRemainder::FirstParticipant => (0..count)
            .map(|i| if i == 0 { base + remainder } else { base })
            .collect(),
        EqualRemainder::Spread => {
            let extra = remainder
                .cents()
                .and_then(|cents| usize::try_from(cents).ok())
                .ok_or(SplitError::AmountOutOfRange)?;
            (0..count)
                .map(|i| if i < extra { base + Money::cent() } else { base })
                .collect()
        }
    };

    tracing::debug!(
        participants = count,
        base = %base,
        remainder = %remainder,
        ?remainder_rule,
        "equal split computed"
    );

    Ok(participants
        .iter()
        .zip(amounts)
        .map(|(participant, amount)| Share::new(participant.clone(), amount, ShareBasis::Equal))
        .collect())
}
