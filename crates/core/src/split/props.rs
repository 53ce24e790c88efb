//! Property-based tests for split calculation.
//!
//! - Conservation: shares always add up to the total
//! - Equal split remainder placement
//! - Exact and percentage acceptance boundaries
//! - Participant validation under every policy
//! - Determinism

use divvy_shared::EqualRemainder;
use divvy_shared::types::{Money, ParticipantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::SplitError;
use super::percentage::remainder_order;
use super::service::{SplitService, SplitSettings, calculate_splits};
use super::types::{SplitPolicy, SplitRequest};

/// Strategy to generate totals from 0.01 to 1,000,000.00.
fn total_cents() -> impl Strategy<Value = i64> {
    1i64..100_000_000
}

/// Strategy to generate participant counts.
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..20
}

/// Strategy to generate 1-10 percentages (two decimals) that sum to exactly 100.
fn percentages_summing_to_100() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1i64..100, 1..10).prop_map(|weights| {
        let sum: i64 = weights.iter().sum();
        let mut basis_points: Vec<i64> = weights.iter().map(|w| w * 10_000 / sum).collect();
        let assigned: i64 = basis_points.iter().sum();
        if let Some(last) = basis_points.last_mut() {
            *last += 10_000 - assigned;
        }
        basis_points
            .into_iter()
            .map(|bp| Decimal::new(bp, 2))
            .collect()
    })
}

fn ids(count: usize) -> Vec<ParticipantId> {
    (0..count).map(|i| ParticipantId::new(format!("p{i}"))).collect()
}

fn request_for(policy: SplitPolicy, total: Money, participants: &[ParticipantId]) -> SplitRequest {
    let count = Decimal::from(participants.len());
    let mut request = SplitRequest::equal(total, participants.iter().cloned(), participants[0].clone());
    request.policy = policy.as_str().to_string();
    match policy {
        SplitPolicy::Equal => {}
        SplitPolicy::Exact => {
            request.exact_amounts = Some(
                participants
                    .iter()
                    .map(|id| (id.clone(), total.amount() / count))
                    .collect(),
            );
        }
        SplitPolicy::Percentage => {
            request.percentages = Some(
                participants
                    .iter()
                    .map(|id| (id.clone(), Decimal::ONE_HUNDRED / count))
                    .collect(),
            );
        }
    }
    request
}

fn any_policy() -> impl Strategy<Value = SplitPolicy> {
    prop_oneof![
        Just(SplitPolicy::Equal),
        Just(SplitPolicy::Exact),
        Just(SplitPolicy::Percentage),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Conservation
    // =========================================================================

    /// *For any* total and participant list, equal shares sum to the total
    /// under both remainder rules.
    #[test]
    fn prop_equal_split_conserves_total(
        cents in total_cents(),
        count in participant_count(),
        spread in any::<bool>(),
    ) {
        let total = Money::from_cents(cents);
        let rule = if spread { EqualRemainder::Spread } else { EqualRemainder::FirstParticipant };
        let service = SplitService::new(SplitSettings { equal_remainder: rule, ..SplitSettings::default() });
        let participants = ids(count);
        let request = SplitRequest::equal(total, participants.iter().cloned(), participants[0].clone());

        let result = service.calculate(&request).unwrap();
        prop_assert_eq!(result.sum(), total);
        prop_assert_eq!(result.len(), count);
    }

    /// *For any* total and percentages summing to 100, the split either
    /// conserves the total with no negative share, or is rejected because
    /// rounding left the remainder holder below zero. Nothing else.
    #[test]
    fn prop_percentage_split_conserves_total(
        cents in total_cents(),
        percentages in percentages_summing_to_100(),
    ) {
        let total = Money::from_cents(cents);
        let participants = ids(percentages.len());
        let request = SplitRequest::percentage(
            total,
            participants.iter().cloned().zip(percentages.iter().copied()),
            participants[0].clone(),
        );

        match calculate_splits(&request) {
            Ok(result) => {
                prop_assert_eq!(result.sum(), total);
                prop_assert!(result.shares().iter().all(|share| !share.amount.is_negative()));
            }
            Err(err) => {
                prop_assert!(
                    matches!(err, SplitError::NegativeRemainder { ref remainder, .. } if remainder.is_negative()),
                    "unexpected rejection: {:?}",
                    err
                );
            }
        }
    }

    /// From 100.00 upward with at most ten participants, every percentage is
    /// at least 0.10%, which outweighs the rounding of the other shares, so
    /// the split is never rejected.
    #[test]
    fn prop_percentage_split_large_totals_accepted(
        cents in 10_000i64..100_000_000,
        percentages in percentages_summing_to_100(),
    ) {
        let total = Money::from_cents(cents);
        let participants = ids(percentages.len());
        let request = SplitRequest::percentage(
            total,
            participants.iter().cloned().zip(percentages.iter().copied()),
            participants[0].clone(),
        );

        let result = calculate_splits(&request).unwrap();
        prop_assert_eq!(result.sum(), total);
    }

    // =========================================================================
    // Equal split remainder placement
    // =========================================================================

    /// By default the first participant absorbs every leftover cent, so it
    /// holds the largest share and everyone else holds the same base.
    #[test]
    fn prop_equal_split_first_participant_absorbs_remainder(
        cents in total_cents(),
        count in 2usize..20,
    ) {
        let total = Money::from_cents(cents);
        let participants = ids(count);
        let request = SplitRequest::equal(total, participants.iter().cloned(), participants[0].clone());
        let result = calculate_splits(&request).unwrap();

        let amounts: Vec<i64> = result.shares().iter().map(|s| s.amount.cents().unwrap()).collect();
        let base = cents / i64::try_from(count).unwrap();
        prop_assert!(amounts[1..].iter().all(|&a| a == base));
        prop_assert_eq!(amounts[0], *amounts.iter().max().unwrap());
        let spread = amounts[0] - base;
        prop_assert!(spread < i64::try_from(count).unwrap());
    }

    /// With the spread rule no two shares differ by more than one cent.
    #[test]
    fn prop_equal_split_spread_within_one_cent(
        cents in total_cents(),
        count in participant_count(),
    ) {
        let total = Money::from_cents(cents);
        let participants = ids(count);
        let request = SplitRequest::equal(total, participants.iter().cloned(), participants[0].clone());
        let service = SplitService::new(SplitSettings {
            equal_remainder: EqualRemainder::Spread,
            ..SplitSettings::default()
        });
        let result = service.calculate(&request).unwrap();

        let amounts: Vec<i64> = result.shares().iter().map(|s| s.amount.cents().unwrap()).collect();
        let max = amounts.iter().max().unwrap();
        let min = amounts.iter().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    // =========================================================================
    // Acceptance boundaries
    // =========================================================================

    /// Exact amounts are accepted exactly when they sum to the total.
    #[test]
    fn prop_exact_split_accepted_iff_sum_matches(
        amounts in prop::collection::vec(0i64..1_000_000, 1..10),
        offset in -100i64..100,
    ) {
        let sum: i64 = amounts.iter().sum();
        let total_cents = sum + offset;
        prop_assume!(total_cents > 0);

        let total = Money::from_cents(total_cents);
        let participants = ids(amounts.len());
        let request = SplitRequest::exact(
            total,
            participants
                .iter()
                .cloned()
                .zip(amounts.iter().map(|&a| Decimal::new(a, 2))),
            participants[0].clone(),
        );
        let result = calculate_splits(&request);

        if offset == 0 {
            let result = result.unwrap();
            prop_assert_eq!(result.sum(), total);
            for (share, &a) in result.shares().iter().zip(&amounts) {
                prop_assert_eq!(share.amount, Money::from_cents(a));
            }
        } else {
            prop_assert_eq!(
                result,
                Err(SplitError::ConservationMismatch {
                    expected: total,
                    actual: Money::from_cents(sum),
                    difference: Money::from_cents(offset),
                })
            );
        }
    }

    /// Percentages are accepted exactly when their sum is within 0.01 of 100.
    #[test]
    fn prop_percentage_split_accepted_iff_within_tolerance(
        cents in total_cents(),
        deviation in -500i64..500,
    ) {
        let total = Money::from_cents(cents);
        let first = Decimal::new(5000 + deviation, 2);
        let request = SplitRequest::percentage(
            total,
            [("a", first), ("b", Decimal::from(50))],
            "a",
        );
        let result = calculate_splits(&request);

        if deviation.abs() <= 1 {
            prop_assert_eq!(result.unwrap().sum(), total);
        } else {
            let sum = first + Decimal::from(50);
            prop_assert_eq!(result, Err(SplitError::PercentageSumMismatch { sum }));
        }
    }

    /// Every share except the remainder holder's is the rounded percentage of
    /// the total; the holder is the last of the smallest percentages.
    #[test]
    fn prop_percentage_remainder_goes_to_smallest(
        cents in total_cents(),
        percentages in percentages_summing_to_100(),
    ) {
        let total = Money::from_cents(cents);
        let participants = ids(percentages.len());
        let entries: Vec<(ParticipantId, Decimal)> =
            participants.iter().cloned().zip(percentages.iter().copied()).collect();

        let min = percentages.iter().min().unwrap();
        let expected_holder = percentages.iter().rposition(|p| p == min).unwrap();
        let order = remainder_order(&entries);
        prop_assert_eq!(order.last().copied(), Some(expected_holder));

        let request = SplitRequest::percentage(total, entries.clone(), participants[0].clone());
        let result = match calculate_splits(&request) {
            Ok(result) => result,
            Err(SplitError::NegativeRemainder { participant, .. }) => {
                prop_assert_eq!(&participant, &participants[expected_holder]);
                return Ok(());
            }
            Err(err) => return Err(TestCaseError::fail(format!("unexpected rejection: {err:?}"))),
        };

        for (index, share) in result.shares().iter().enumerate() {
            if index != expected_holder {
                prop_assert_eq!(
                    Some(share.amount),
                    total.checked_percentage(percentages[index])
                );
            }
        }
    }

    // =========================================================================
    // Participant validation
    // =========================================================================

    /// A repeated participant is rejected whatever the policy.
    #[test]
    fn prop_duplicate_participant_rejected(
        policy in any_policy(),
        cents in total_cents(),
        count in participant_count(),
        repeat in any::<prop::sample::Index>(),
    ) {
        let participants = ids(count);
        let duplicate = participants[repeat.index(count)].clone();
        let mut request = request_for(policy, Money::from_cents(cents), &participants);
        request.participants.push(duplicate.clone());

        prop_assert_eq!(
            calculate_splits(&request),
            Err(SplitError::DuplicateParticipant(duplicate))
        );
    }

    /// A payer outside the participant list is rejected whatever the policy.
    #[test]
    fn prop_payer_outside_participants_rejected(
        policy in any_policy(),
        cents in total_cents(),
        count in participant_count(),
    ) {
        let mut request = request_for(policy, Money::from_cents(cents), &ids(count));
        request.payer = ParticipantId::from("outsider");

        prop_assert_eq!(
            calculate_splits(&request),
            Err(SplitError::PayerNotParticipant(ParticipantId::from("outsider")))
        );
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    /// Identical requests produce identical results.
    #[test]
    fn prop_calculation_is_deterministic(
        cents in total_cents(),
        percentages in percentages_summing_to_100(),
    ) {
        let participants = ids(percentages.len());
        let request = SplitRequest::percentage(
            Money::from_cents(cents),
            participants.iter().cloned().zip(percentages.iter().copied()),
            participants[0].clone(),
        );

        prop_assert_eq!(calculate_splits(&request), calculate_splits(&request));

        let equal = SplitRequest::equal(Money::from_cents(cents), participants.iter().cloned(), participants[0].clone());
        prop_assert_eq!(calculate_splits(&equal), calculate_splits(&equal));
    }
}
