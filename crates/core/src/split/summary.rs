//! Payer-centric view of a split.

use divvy_shared::types::{Money, ParticipantId};
use serde::Serialize;

use super::types::SplitResult;

/// What one non-paying participant owes the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Debt {
    /// The participant who owes.
    pub participant: ParticipantId,
    /// Their share of the expense.
    pub amount: Money,
}

/// Who paid, how much of it was their own share, and who owes what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    /// The payer.
    pub paid_by: ParticipantId,
    /// The full amount the payer laid out.
    pub paid_total: Money,
    /// The payer's own share.
    pub payer_share: Money,
    /// Everyone else, in participant order. Zero shares are kept.
    pub owes: Vec<Debt>,
}

impl SplitSummary {
    /// Builds the summary of a split result.
    #[must_use]
    pub fn from_result(result: &SplitResult) -> Self {
        let payer = result.payer();
        let payer_share = result.get(payer.as_str()).unwrap_or(Money::ZERO);
        let owes = result
            .shares()
            .iter()
            .filter(|share| &share.participant != payer)
            .map(|share| Debt {
                participant: share.participant.clone(),
                amount: share.amount,
            })
            .collect();

        Self {
            paid_by: payer.clone(),
            paid_total: result.total(),
            payer_share,
            owes,
        }
    }

    /// Total the payer is owed by everyone else.
    #[must_use]
    pub fn total_owed(&self) -> Money {
        self.owes.iter().map(|debt| debt.amount).sum()
    }
}

impl SplitResult {
    /// Returns the payer-centric summary of this split.
    #[must_use]
    pub fn summary(&self) -> SplitSummary {
        SplitSummary::from_result(self)
    }
}
