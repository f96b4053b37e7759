//! Property-based tests for subtrack-core
//!
//! These tests use proptest to verify store and statistics invariants across
//! a wide range of inputs.

#[cfg(test)]
mod statistics_properties {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use subtrack_core::{
        breakdown_by_category, total_monthly, Amount, BillingCycle, Category, NewSubscription,
        Subscription,
    };

    fn cycle() -> impl Strategy<Value = BillingCycle> {
        prop_oneof![
            Just(BillingCycle::Monthly),
            Just(BillingCycle::Yearly),
            Just(BillingCycle::Quarterly),
        ]
    }

    fn category() -> impl Strategy<Value = Category> {
        prop_oneof![
            Just(Category::Streaming),
            Just(Category::Music),
            Just(Category::Cloud),
            Just(Category::Other),
            "[a-z]{3,8}".prop_map(Category::from),
        ]
    }

    fn subscription() -> impl Strategy<Value = Subscription> {
        // Prices between 0.01 and 999.99
        (1i64..100_000i64, cycle(), category()).prop_map(|(cents, cycle, category)| {
            let price = Amount::new(Decimal::new(cents, 2));
            let now = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
            Subscription::create(NewSubscription::new("Service", price, cycle, category), now)
                .unwrap()
        })
    }

    proptest! {
        /// Category shares round to a total within one point per category of 100
        #[test]
        fn percentages_sum_to_about_100(subs in prop::collection::vec(subscription(), 1..30)) {
            let shares = breakdown_by_category(&subs);
            prop_assert!(!shares.is_empty());

            let sum: u32 = shares.iter().map(|s| s.percentage).sum();
            let slack = shares.len() as u32;
            prop_assert!(sum + slack >= 100 && sum <= 100 + slack, "sum was {}", sum);
        }

        /// Category totals add back up to the overall monthly total
        #[test]
        fn category_totals_match_overall(subs in prop::collection::vec(subscription(), 0..30)) {
            let overall = total_monthly(&subs);
            let by_category: Amount = breakdown_by_category(&subs)
                .into_iter()
                .map(|s| s.monthly)
                .sum();

            if subs.is_empty() {
                prop_assert!(overall.is_zero());
                prop_assert!(by_category.is_zero());
            } else {
                // Grouping changes summation order; allow for the last digit of
                // 28-digit precision on repeating yearly/quarterly fractions.
                let diff = (overall.as_decimal() - by_category.as_decimal()).abs();
                prop_assert!(diff < Decimal::new(1, 18), "diff was {}", diff);
            }
        }

        /// Monthly equivalent times the cycle length gives back the price
        #[test]
        fn monthly_equivalent_scales_back(cents in 1i64..1_000_000i64, cycle in cycle()) {
            let price = Decimal::new(cents, 2);
            let monthly = cycle.monthly_equivalent(&Amount::new(price)).as_decimal();
            let back = monthly * Decimal::from(cycle.months());
            prop_assert!((back - price).abs() < Decimal::new(1, 20));
        }

        /// Next payment is always a valid date strictly after creation
        #[test]
        fn next_payment_after_creation(days in 0i64..3650, cycle in cycle()) {
            let created = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(days);
            let next = cycle.next_date(created.date_naive()).unwrap();
            prop_assert!(next > created.date_naive());
            let gap = (next - created.date_naive()).num_days();
            prop_assert!(gap >= 28 && gap <= 366);
        }
    }
}

#[cfg(test)]
mod store_properties {
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use subtrack_core::{
        Amount, BillingCycle, Category, InMemoryStorage, NewSubscription, SubscriptionStore,
    };

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        /// Remove the n-th live entry (modulo the current size)
        RemoveExisting(usize),
        RemoveUnknown,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Add),
            2 => any::<usize>().prop_map(Op::RemoveExisting),
            1 => Just(Op::RemoveUnknown),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Size equals adds minus removals of existing ids; ids stay distinct
        #[test]
        fn size_tracks_operations(ops in prop::collection::vec(op(), 0..40)) {
            tokio_test::block_on(async {
                let store = SubscriptionStore::new(Arc::new(InMemoryStorage::new()));
                store.load_subscriptions().await;

                let mut expected = 0usize;
                for op in ops {
                    match op {
                        Op::Add => {
                            store
                                .add_subscription(NewSubscription::new(
                                    "Service",
                                    Amount::from_units(5),
                                    BillingCycle::Monthly,
                                    Category::Other,
                                ))
                                .await
                                .unwrap();
                            expected += 1;
                        }
                        Op::RemoveExisting(n) => {
                            let snapshot = store.subscriptions();
                            if !snapshot.is_empty() {
                                let id = snapshot[n % snapshot.len()].id.clone();
                                assert!(store.remove_subscription(&id).await.unwrap().is_some());
                                expected -= 1;
                            }
                        }
                        Op::RemoveUnknown => {
                            assert!(store.remove_subscription("unknown").await.unwrap().is_none());
                        }
                    }
                }

                assert_eq!(store.len(), expected);
                let ids: HashSet<String> =
                    store.subscriptions().iter().map(|s| s.id.clone()).collect();
                assert_eq!(ids.len(), expected);
            });
        }
    }
}
