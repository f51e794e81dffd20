//! Tests for admin premium management

mod support;

use chrono::Duration;
use quizgate_core::premium::DEFAULT_GRANT_DAYS;
use quizgate_core::store::RemoteStore;
use quizgate_core::{ContentError, PremiumAdmin, StoreError, TrialStatus};
use support::{harness, t0};

#[test]
fn test_grant_creates_membership_without_payment() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());

    let membership = admin
        .grant(" Ravi ", " device_abc_123 ", DEFAULT_GRANT_DAYS)
        .unwrap();
    assert_eq!(membership.name, "Ravi");
    assert_eq!(membership.device_id, "device_abc_123");
    assert!(membership.payment_id.is_none());
    assert_eq!(membership.purchased_at, t0());
    assert_eq!(membership.expires_at, t0() + Duration::days(30));
}

#[test]
fn test_grant_gives_device_premium_status() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());

    admin.grant("Ravi", &h.device_id(), 7).unwrap();
    assert_eq!(h.entitlements.check_status(), TrialStatus::Premium);
}

#[test]
fn test_grant_requires_name_and_device() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());

    assert!(matches!(
        admin.grant("", "device_x", 30).unwrap_err(),
        ContentError::MissingInformation(_)
    ));
    assert!(matches!(
        admin.grant("Ravi", "  ", 30).unwrap_err(),
        ContentError::MissingInformation(_)
    ));
    assert!(matches!(
        admin.grant("Ravi", "device_x", 0).unwrap_err(),
        ContentError::MissingInformation(_)
    ));
    assert!(admin.list().unwrap().is_empty());
}

#[test]
fn test_extend_active_membership_from_expiry() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());
    let granted = admin.grant("Ravi", "device_x", 30).unwrap();

    h.clock.advance(Duration::days(10));
    let extended = admin.extend(granted.id, 15).unwrap();
    assert_eq!(extended.expires_at, t0() + Duration::days(45));
    assert_eq!(extended.purchased_at, granted.purchased_at);
}

#[test]
fn test_extend_lapsed_membership_from_now() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());
    let granted = admin.grant("Ravi", "device_x", 30).unwrap();

    h.clock.advance(Duration::days(50));
    let extended = admin.extend(granted.id, 30).unwrap();
    assert_eq!(extended.expires_at, t0() + Duration::days(80));
    assert!(!extended.is_expired_at(admin.now()));
}

#[test]
fn test_day_counts_past_calendar_range_are_rejected() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());

    for days in [1_000_000_000, i64::MAX] {
        assert!(matches!(
            admin.grant("Ravi", "device_x", days).unwrap_err(),
            ContentError::MissingInformation("days out of range")
        ));
    }
    assert!(admin.list().unwrap().is_empty());

    let granted = admin.grant("Ravi", "device_x", 30).unwrap();
    assert!(matches!(
        admin.extend(granted.id, i64::MAX).unwrap_err(),
        ContentError::MissingInformation("days out of range")
    ));
    assert_eq!(
        h.store.premium(granted.id).unwrap().expires_at,
        granted.expires_at
    );
}

#[test]
fn test_extend_unknown_membership() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());

    assert!(matches!(
        admin.extend(404, 30).unwrap_err(),
        ContentError::Store(StoreError::NotFound)
    ));
}

#[test]
fn test_list_newest_purchase_first() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());
    admin.grant("Old", "device_1", 30).unwrap();
    h.clock.advance(Duration::days(1));
    admin.grant("New", "device_2", 30).unwrap();

    let names: Vec<String> = admin.list().unwrap().into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["New", "Old"]);
}

#[test]
fn test_expired_flag() {
    let h = harness();
    let admin = PremiumAdmin::new(h.store_dyn(), h.clock.clone());
    let m = admin.grant("Ravi", "device_x", 1).unwrap();

    assert!(!m.is_expired_at(t0() + Duration::days(1)));
    assert!(m.is_expired_at(t0() + Duration::days(1) + Duration::seconds(1)));
    assert!(h.store.inner().active_premium("device_x", t0()).is_ok());
}
