//! Split domain types.
//!
//! A [`SplitRequest`] is what callers hand in. The validator turns it into a
//! [`ValidatedSplit`], whose [`SplitSpecification`] already carries the
//! per-participant data in participant order. Algorithms consume that and
//! produce [`Share`]s, which are wrapped into a [`SplitResult`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use divvy_shared::types::{Money, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SplitError;

/// How a total is divided among participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Everyone pays the same, to the cent.
    Equal,
    /// Each participant's amount is given explicitly.
    Exact,
    /// Each participant pays a percentage of the total.
    Percentage,
}

impl SplitPolicy {
    /// Returns the wire tag for this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitPolicy {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" => Ok(Self::Percentage),
            _ => Err(SplitError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Input for splitting one expense.
///
/// The policy is kept as a raw tag so that an unrecognised value surfaces as
/// [`SplitError::UnknownPolicy`] instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRequest {
    /// The amount being shared. Must be positive.
    pub total: Money,
    /// `"equal"`, `"exact"` or `"percentage"`.
    pub policy: String,
    /// Ordered, unique participants. Order decides who absorbs rounding.
    pub participants: Vec<ParticipantId>,
    /// Who paid. Must be one of the participants.
    pub payer: ParticipantId,
    /// Required for the exact policy. Also accepted as `exactAmounts`.
    #[serde(default, alias = "exactAmounts", skip_serializing_if = "Option::is_none")]
    pub exact_amounts: Option<BTreeMap<ParticipantId, Decimal>>,
    /// Required for the percentage policy, each value in `[0, 100]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentages: Option<BTreeMap<ParticipantId, Decimal>>,
}

impl SplitRequest {
    /// Builds an equal split request.
    pub fn equal<I, P>(total: Money, participants: I, payer: impl Into<ParticipantId>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            total,
            policy: SplitPolicy::Equal.as_str().to_string(),
            participants: participants.into_iter().map(Into::into).collect(),
            payer: payer.into(),
            exact_amounts: None,
            percentages: None,
        }
    }

    /// Builds an exact split request. Participants follow the order of `amounts`.
    pub fn exact<I, P>(total: Money, amounts: I, payer: impl Into<ParticipantId>) -> Self
    where
        I: IntoIterator<Item = (P, Decimal)>,
        P: Into<ParticipantId>,
    {
        let (participants, data) = ordered_with_data(amounts);
        Self {
            total,
            policy: SplitPolicy::Exact.as_str().to_string(),
            participants,
            payer: payer.into(),
            exact_amounts: Some(data),
            percentages: None,
        }
    }

    /// Builds a percentage split request. Participants follow the order of
    /// `percentages`.
    pub fn percentage<I, P>(total: Money, percentages: I, payer: impl Into<ParticipantId>) -> Self
    where
        I: IntoIterator<Item = (P, Decimal)>,
        P: Into<ParticipantId>,
    {
        let (participants, data) = ordered_with_data(percentages);
        Self {
            total,
            policy: SplitPolicy::Percentage.as_str().to_string(),
            participants,
            payer: payer.into(),
            exact_amounts: None,
            percentages: Some(data),
        }
    }
}

fn ordered_with_data<I, P>(entries: I) -> (Vec<ParticipantId>, BTreeMap<ParticipantId, Decimal>)
where
    I: IntoIterator<Item = (P, Decimal)>,
    P: Into<ParticipantId>,
{
    let mut participants = Vec::new();
    let mut data = BTreeMap::new();
    for (participant, value) in entries {
        let participant = participant.into();
        participants.push(participant.clone());
        data.insert(participant, value);
    }
    (participants, data)
}

/// Policy plus the per-participant data it needs, ordered by participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitSpecification {
    /// No extra data.
    Equal,
    /// Requested amount per participant.
    Exact(Vec<(ParticipantId, Decimal)>),
    /// Percentage per participant.
    Percentage(Vec<(ParticipantId, Decimal)>),
}

impl SplitSpecification {
    /// Returns the policy this specification belongs to.
    #[must_use]
    pub const fn policy(&self) -> SplitPolicy {
        match self {
            Self::Equal => SplitPolicy::Equal,
            Self::Exact(_) => SplitPolicy::Exact,
            Self::Percentage(_) => SplitPolicy::Percentage,
        }
    }
}

/// A request that passed validation.
///
/// Only the validator constructs this, so holders can rely on: a non-empty
/// duplicate-free participant list, a payer inside it, a positive total, and
/// per-participant data whose keys match the participant list exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSplit {
    pub(crate) total: Money,
    pub(crate) participants: Vec<ParticipantId>,
    pub(crate) payer: ParticipantId,
    pub(crate) specification: SplitSpecification,
}

impl ValidatedSplit {
    /// The amount being shared.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Participants in request order.
    #[must_use]
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Who paid.
    #[must_use]
    pub const fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    /// The typed policy data.
    #[must_use]
    pub const fn specification(&self) -> &SplitSpecification {
        &self.specification
    }

    /// The policy of this split.
    #[must_use]
    pub const fn policy(&self) -> SplitPolicy {
        self.specification.policy()
    }
}

/// What a share was derived from, kept for auditing next to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ShareBasis {
    /// Equal division.
    Equal,
    /// The amount the caller asked for, before rounding to the cent.
    Exact {
        /// Requested amount.
        requested: Decimal,
    },
    /// The caller's percentage.
    Percentage {
        /// Requested percentage.
        percentage: Decimal,
    },
}

/// One participant's portion of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    /// Who owes this share.
    pub participant: ParticipantId,
    /// The share, rounded to the cent.
    pub amount: Money,
    /// Policy metadata for the share.
    pub basis: ShareBasis,
}

impl Share {
    /// Creates a share.
    #[must_use]
    pub fn new(participant: ParticipantId, amount: Money, basis: ShareBasis) -> Self {
        Self {
            participant,
            amount,
            basis,
        }
    }
}

/// The outcome of a split: one share per participant, in participant order.
///
/// The shares always add up to `total` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitResult {
    policy: SplitPolicy,
    total: Money,
    payer: ParticipantId,
    shares: Vec<Share>,
}

impl SplitResult {
    pub(crate) fn new(
        policy: SplitPolicy,
        total: Money,
        payer: ParticipantId,
        shares: Vec<Share>,
    ) -> Self {
        Self {
            policy,
            total,
            payer,
            shares,
        }
    }

    /// The policy used.
    #[must_use]
    pub const fn policy(&self) -> SplitPolicy {
        self.policy
    }

    /// The amount that was shared.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Who paid.
    #[must_use]
    pub const fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    /// All shares in participant order.
    #[must_use]
    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Looks up one participant's share.
    #[must_use]
    pub fn get(&self, participant: &str) -> Option<Money> {
        self.shares
            .iter()
            .find(|share| share.participant.as_str() == participant)
            .map(|share| share.amount)
    }

    /// Iterates `(participant, amount)` pairs in participant order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Money)> {
        self.shares.iter().map(|share| (&share.participant, share.amount))
    }

    /// Number of shares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Returns true if there are no shares.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all shares.
    #[must_use]
    pub fn sum(&self) -> Money {
        self.shares.iter().map(|share| share.amount).sum()
    }

    /// Participant to amount map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<ParticipantId, Money> {
        self.shares
            .iter()
            .map(|share| (share.participant.clone(), share.amount))
            .collect()
    }

    /// Consumes the result, returning the shares.
    #[must_use]
    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }
}
