//! Request validation for split operations.
//!
//! Validation runs before any arithmetic and either rejects the request or
//! produces a [`ValidatedSplit`]. Checks run in a fixed order so the same
//! bad input always yields the same error:
//! 1. participants non-empty and unique
//! 2. payer is a participant
//! 3. total is positive
//! 4. policy tag is known and its per-participant data matches the participants

use std::collections::{BTreeMap, HashSet};

use divvy_shared::types::{Money, ParticipantId};
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{SplitPolicy, SplitRequest, SplitSpecification, ValidatedSplit};

/// Validates a split request.
///
/// # Errors
///
/// Returns the first rule the request breaks, in the order listed in the
/// module documentation.
pub fn validate_request(request: &SplitRequest) -> Result<ValidatedSplit, SplitError> {
    validate_participants(&request.participants, &request.payer)?;
    validate_total(request.total)?;

    let policy: SplitPolicy = request.policy.parse()?;
    let specification = match policy {
        SplitPolicy::Equal => SplitSpecification::Equal,
        SplitPolicy::Exact => {
            let amounts = request
                .exact_amounts
                .as_ref()
                .ok_or(SplitError::MissingPolicyData(policy))?;
            SplitSpecification::Exact(align_share_data(&request.participants, amounts)?)
        }
        SplitPolicy::Percentage => {
            let percentages = request
                .percentages
                .as_ref()
                .ok_or(SplitError::MissingPolicyData(policy))?;
            SplitSpecification::Percentage(align_share_data(&request.participants, percentages)?)
        }
    };

    Ok(ValidatedSplit {
        total: request.total,
        participants: request.participants.clone(),
        payer: request.payer.clone(),
        specification,
    })
}

/// Validates the participant list and the payer.
///
/// # Errors
///
/// Returns `EmptyParticipants`, `DuplicateParticipant` (naming the first
/// repeated identifier) or `PayerNotParticipant`.
pub fn validate_participants(
    participants: &[ParticipantId],
    payer: &ParticipantId,
) -> Result<(), SplitError> {
    if participants.is_empty() {
        return Err(SplitError::EmptyParticipants);
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant) {
            return Err(SplitError::DuplicateParticipant(participant.clone()));
        }
    }

    if !seen.contains(payer) {
        return Err(SplitError::PayerNotParticipant(payer.clone()));
    }

    Ok(())
}

/// Validates that the total is strictly positive.
///
/// # Errors
///
/// Returns `NonPositiveAmount` for zero or negative totals.
pub fn validate_total(total: Money) -> Result<(), SplitError> {
    if !total.is_positive() {
        return Err(SplitError::NonPositiveAmount(total));
    }
    Ok(())
}

/// Checks that `data` has exactly one entry per participant and returns the
/// entries in participant order.
///
/// Missing entries are reported before extraneous ones.
///
/// # Errors
///
/// Returns `MissingShareData` for the first participant without an entry, or
/// `UnexpectedShareData` for the first key that is not a participant.
pub fn align_share_data(
    participants: &[ParticipantId],
    data: &BTreeMap<ParticipantId, Decimal>,
) -> Result<Vec<(ParticipantId, Decimal)>, SplitError> {
    let mut aligned = Vec::with_capacity(participants.len());
    for participant in participants {
        let value = data
            .get(participant)
            .ok_or_else(|| SplitError::MissingShareData(participant.clone()))?;
        aligned.push((participant.clone(), *value));
    }

    if data.len() != aligned.len() {
        let known: HashSet<&ParticipantId> = participants.iter().collect();
        if let Some(extra) = data.keys().find(|key| !known.contains(key)) {
            return Err(SplitError::UnexpectedShareData(extra.clone()));
        }
    }

    Ok(aligned)
}
