//! Property-based tests for the synthetic contract generator
//!
//! Arithmetic invariants must hold exactly for every seed.

use proptest::prelude::*;
use synth_data::{generate, reconcile, ReconcileOptions};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generation_is_deterministic(seed in any::<i32>()) {
        prop_assert_eq!(generate(seed as i64), generate(seed as i64));
    }

    #[test]
    fn total_equals_item_sum(seed in any::<i32>()) {
        let data = generate(seed as i64);
        prop_assert_eq!(data.total_amount, data.items_total());
        for item in &data.items {
            prop_assert_eq!(item.total, item.qty * item.rate);
        }
    }

    #[test]
    fn phases_sum_to_total(seed in any::<i32>()) {
        let data = generate(seed as i64);
        prop_assert_eq!(data.phases_total(), data.total_amount);
        prop_assert!(data.payment_phases.iter().all(|p| p.amount >= 0));
    }

    #[test]
    fn generated_values_stay_in_range(seed in any::<i32>()) {
        let data = generate(seed as i64);
        prop_assert!((2..=4).contains(&data.items.len()));
        prop_assert!((2..=4).contains(&data.payment_phases.len()));
        prop_assert!(data.vat_rate == 8 || data.vat_rate == 10);
        for item in &data.items {
            prop_assert!((1..=10).contains(&item.qty));
            prop_assert!((1_000_000..=50_000_000).contains(&item.rate));
        }
    }

    #[test]
    fn parties_never_collide(seed in any::<i32>()) {
        let data = generate(seed as i64);
        prop_assert_ne!(&data.party_a.name, &data.party_b.name);
        prop_assert_ne!(&data.party_a.tax_id, &data.party_b.tax_id);
        prop_assert_ne!(&data.party_a.address, &data.party_b.address);
        prop_assert_ne!(&data.party_a.bank_account, &data.party_b.bank_account);
    }

    #[test]
    fn reconcile_keeps_generated_data(seed in any::<i32>()) {
        let data = generate(seed as i64);
        prop_assert_eq!(reconcile(data.clone(), &ReconcileOptions::default()), data);
    }

    #[test]
    fn reconcile_restores_phase_sum(seed in any::<i32>(), drift in 1001i64..10_000_000) {
        let mut data = generate(seed as i64);
        data.payment_phases[0].amount += drift;
        data.total_amount = 0;
        let fixed = reconcile(data, &ReconcileOptions::default());
        prop_assert_eq!(fixed.total_amount, fixed.items_total());
        prop_assert_eq!(fixed.phases_total(), fixed.total_amount);
    }
}
