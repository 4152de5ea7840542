use super::common::*;
use crate::policy::config::PolicyConfig;
use crate::policy::domain::ReceiptPath;
use crate::policy::efficiency::efficiency_bonus;
use crate::policy::mileage::mileage_total;
use crate::policy::per_diem::{long_trip_per_diem, per_diem_total};
use crate::policy::receipts::{long_trip_receipts, standard_receipts, vacation_receipts};

#[test]
fn per_diem_follows_duration_tiers() {
    let config = PolicyConfig::default();
    assert_close(per_diem_total(&trip(9, 0.0, 0.0), &config), 900.0);
    assert_close(per_diem_total(&trip(10, 0.0, 0.0), &config), 700.0);
    assert_close(per_diem_total(&trip(13, 0.0, 0.0), &config), 910.0);
    assert_close(per_diem_total(&trip(14, 0.0, 0.0), &config), 770.0);
}

#[test]
fn per_diem_floor_guarantees_minimum_daily_rate() {
    let config = PolicyConfig::default();
    assert_close(per_diem_total(&trip(16, 0.0, 0.0), &config), 960.0);

    let generous = config
        .with("per_diem_rate_14_plus_days", 65.0)
        .expect("known parameter");
    assert_close(per_diem_total(&trip(16, 0.0, 0.0), &generous), 1040.0);
}

#[test]
fn long_trip_per_diem_ignores_tiers_and_floor() {
    let config = PolicyConfig::default();
    assert_close(long_trip_per_diem(&trip(22, 0.0, 0.0), &config), 1100.0);
}

#[test]
fn mileage_is_a_progressive_tariff() {
    let config = PolicyConfig::default();
    assert_close(mileage_total(0.0, &config), 0.0);
    assert_close(mileage_total(50.0, &config), 29.0);
    assert_close(mileage_total(100.0, &config), 58.0);
    assert_close(mileage_total(650.0, &config), 58.0 + 550.0 * 0.45);
    assert_close(mileage_total(795.0, &config), 363.5);
    assert_close(mileage_total(1000.0, &config), 445.5);
}

#[test]
fn mileage_is_continuous_and_non_decreasing() {
    let config = PolicyConfig::default()
        .with("mileage_rate_tier_3", 0.1)
        .expect("known parameter");
    for breakpoint in [100.0, 650.0, 800.0] {
        let below = mileage_total(breakpoint - 1e-6, &config);
        let at = mileage_total(breakpoint, &config);
        let above = mileage_total(breakpoint + 1e-6, &config);
        assert!((at - below).abs() < 1e-5, "jump below {breakpoint}");
        assert!((above - at).abs() < 1e-5, "jump above {breakpoint}");
    }

    let mut previous = 0.0;
    for step in 0..=2000 {
        let total = mileage_total(f64::from(step), &config);
        assert!(total >= previous, "mileage decreased at {step} miles");
        previous = total;
    }
}

#[test]
fn efficiency_bonus_bands() {
    let config = PolicyConfig::default();
    assert_close(efficiency_bonus(&trip(0, 500.0, 0.0), &config), 0.0);
    assert_close(efficiency_bonus(&trip(2, 150.0, 0.0), &config), -50.0);
    assert_close(efficiency_bonus(&trip(2, 200.0, 0.0), &config), 0.0);
    assert_close(efficiency_bonus(&trip(2, 300.0, 0.0), &config), 0.0);
    assert_close(efficiency_bonus(&trip(2, 400.0, 0.0), &config), 20.0);
    assert_close(efficiency_bonus(&trip(2, 500.0, 0.0), &config), 40.0);
    assert_close(efficiency_bonus(&trip(2, 540.0, 0.0), &config), 0.0);
    assert_close(efficiency_bonus(&trip(2, 600.0, 0.0), &config), 0.0);
    assert_close(efficiency_bonus(&trip(2, 602.0, 0.0), &config), -50.0);
}

#[test]
fn short_trip_with_large_receipts_uses_flat_percentage() {
    let config = PolicyConfig::default();
    let outcome = standard_receipts(&trip(4, 500.0, 1200.0), &config);
    assert_eq!(outcome.path, ReceiptPath::ShortTripHighReceipt);
    assert_close(outcome.amount, 600.0);
    assert_close(outcome.penalty, 0.0);
}

#[test]
fn one_and_two_day_overrides_pick_multiplier_tier() {
    let config = PolicyConfig::default();

    let outcome = standard_receipts(&trip(1, 200.0, 700.0), &config);
    assert_eq!(outcome.path, ReceiptPath::OneDayHighReceipt);
    assert_close(outcome.amount, 350.0);

    let outcome = standard_receipts(&trip(1, 200.0, 900.0), &config);
    assert_eq!(outcome.path, ReceiptPath::OneDayUpperTier);
    assert_close(outcome.amount, 540.0);

    let outcome = standard_receipts(&trip(2, 300.0, 600.0), &config);
    assert_eq!(outcome.path, ReceiptPath::TwoDayHighReceipt);
    assert_close(outcome.amount, 300.0);

    let outcome = standard_receipts(&trip(2, 300.0, 900.0), &config);
    assert_eq!(outcome.path, ReceiptPath::TwoDayUpperTier);
    assert_close(outcome.amount, 630.0);
}

#[test]
fn daily_cap_clamps_reimbursable_base() {
    let config = PolicyConfig::default();

    // 6 days at 250/day caps the base at 1500.
    let outcome = standard_receipts(&trip(6, 1200.0, 2400.0), &config);
    assert_eq!(outcome.path, ReceiptPath::DailyCapApplied);
    assert_close(outcome.amount, 580.0 * 0.6 + 250.0 * 0.95 + 650.0 * 0.25);

    // 3 days at the fixed 75/day ceiling.
    let outcome = standard_receipts(&trip(3, 120.0, 400.0), &config);
    assert_eq!(outcome.path, ReceiptPath::DailyCapApplied);
    assert_close(outcome.amount, 205.0 * 0.55);

    // No cap beyond six days.
    let outcome = standard_receipts(&trip(9, 1400.0, 900.0), &config);
    assert_eq!(outcome.path, ReceiptPath::Tiered);
    assert_close(outcome.amount, 482.0);
}

#[test]
fn receipt_schedule_is_marginal_across_segments() {
    let config = PolicyConfig::default();
    let outcome = standard_receipts(&trip(10, 2000.0, 700.0), &config);
    assert_close(outcome.amount, 580.0 * 0.4 + 100.0 * 0.95);

    let outcome = standard_receipts(&trip(14, 100.0, 100.0), &config);
    assert_close(outcome.amount, 32.0);
}

#[test]
fn small_receipts_are_penalized() {
    let config = PolicyConfig::default();

    let outcome = standard_receipts(&trip(3, 93.0, 1.42), &config);
    assert_close(outcome.amount, 0.0);
    assert_close(outcome.penalty, -50.0);

    let outcome = standard_receipts(&trip(3, 93.0, 0.0), &config);
    assert_close(outcome.penalty, 0.0);

    let outcome = standard_receipts(&trip(3, 93.0, 20.01), &config);
    assert_close(outcome.penalty, 0.0);
}

#[test]
fn small_receipt_limit_is_inclusive() {
    let config = PolicyConfig::default();
    let outcome = standard_receipts(&trip(3, 93.0, 20.0), &config);
    assert_close(outcome.amount, 0.0);
    assert_close(outcome.penalty, -50.0);
}

#[test]
fn short_trip_override_needs_receipts_above_one_thousand() {
    let config = PolicyConfig::default();

    let outcome = standard_receipts(&trip(4, 100.0, 1000.0), &config);
    assert_eq!(outcome.path, ReceiptPath::Tiered);
    assert_close(outcome.amount, 623.0);

    let outcome = standard_receipts(&trip(4, 100.0, 1000.01), &config);
    assert_eq!(outcome.path, ReceiptPath::ShortTripHighReceipt);
    assert_close(outcome.amount, 500.005);
}

#[test]
fn one_and_two_day_overrides_need_receipts_above_five_hundred() {
    let config = PolicyConfig::default();

    let outcome = standard_receipts(&trip(1, 100.0, 500.0), &config);
    assert_eq!(outcome.path, ReceiptPath::DailyCapApplied);
    assert_close(outcome.amount, 30.25);

    let outcome = standard_receipts(&trip(1, 100.0, 500.01), &config);
    assert_eq!(outcome.path, ReceiptPath::OneDayHighReceipt);

    let outcome = standard_receipts(&trip(2, 100.0, 500.0), &config);
    assert_eq!(outcome.path, ReceiptPath::DailyCapApplied);
    assert_close(outcome.amount, 71.5);

    let outcome = standard_receipts(&trip(2, 100.0, 500.01), &config);
    assert_eq!(outcome.path, ReceiptPath::TwoDayHighReceipt);
}

#[test]
fn long_trip_receipts_cap_by_daily_spend() {
    let config = PolicyConfig::default();

    let outcome = long_trip_receipts(&trip(22, 1500.0, 1000.0), &config);
    assert_eq!(outcome.path, ReceiptPath::LongTripTiered);
    assert_close(outcome.amount, 627.5);

    // 136/day stays under the high-spend threshold, so the low cap (120/day) applies.
    let outcome = long_trip_receipts(&trip(22, 1500.0, 3000.0), &config);
    assert_eq!(outcome.path, ReceiptPath::LongTripCapApplied);
    assert_close(outcome.amount, 955.5);

    let outcome = long_trip_receipts(&trip(22, 1500.0, 3500.0), &config);
    assert_eq!(outcome.path, ReceiptPath::LongTripCapApplied);
    assert_close(outcome.amount, 600.0 * 0.6 + 250.0 * 0.95 + (2860.0 - 850.0) * 0.2);
    assert_close(outcome.penalty, 0.0);
}

#[test]
fn vacation_receipts_are_a_flat_fraction() {
    let config = PolicyConfig::default();
    let outcome = vacation_receipts(&trip(8, 795.0, 1645.99), &config);
    assert_eq!(outcome.path, ReceiptPath::VacationFlat);
    assert_close(outcome.amount, 1645.99 * 0.45);
    assert_close(outcome.penalty, 0.0);
}
