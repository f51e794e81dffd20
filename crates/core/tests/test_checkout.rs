//! Tests for the payment checkout bridge

mod support;

use std::sync::Arc;

use quizgate_core::config::CheckoutConfig;
use quizgate_core::store::RemoteStore;
use quizgate_core::{
    process_payment, run_payment, CheckoutError, CheckoutEvent, CheckoutOptions, CheckoutProvider, Clock,
    PaymentBridge, PaymentOutcome, TestCheckout, TrialStatus,
};
use support::{harness, Op};

/// Provider that replays a fixed result and records what it was given.
struct ScriptedCheckout {
    load_error: Option<CheckoutError>,
    result: Result<CheckoutEvent, CheckoutError>,
    loads: usize,
    opened_with: Option<CheckoutOptions>,
}

impl ScriptedCheckout {
    fn returning(event: CheckoutEvent) -> Self {
        Self {
            load_error: None,
            result: Ok(event),
            loads: 0,
            opened_with: None,
        }
    }

    fn failing_to_load(reason: &str) -> Self {
        Self {
            load_error: Some(CheckoutError::ScriptLoad(reason.to_string())),
            result: Ok(CheckoutEvent::Dismissed),
            loads: 0,
            opened_with: None,
        }
    }
}

impl CheckoutProvider for ScriptedCheckout {
    fn load(&mut self) -> Result<(), CheckoutError> {
        self.loads += 1;
        match &self.load_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn open(&mut self, options: &CheckoutOptions) -> Result<CheckoutEvent, CheckoutError> {
        self.opened_with = Some(options.clone());
        self.result.clone()
    }
}

#[test]
fn test_options_from_config() {
    let options = CheckoutOptions::from_config(&CheckoutConfig::default(), "Asha");
    assert_eq!(options.key, "rzp_test_9999999999");
    assert_eq!(options.amount, 29900);
    assert_eq!(options.currency, "INR");
    assert_eq!(options.description, "Premium Access - 30 Days");
    assert_eq!(options.prefill.name, "Asha");
    assert_eq!(options.theme.color, "#3B82F6");

    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(json["prefill"]["name"], "Asha");
    assert_eq!(json["theme"]["color"], "#3B82F6");
}

#[test]
fn test_success_provisions_premium() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut provider = ScriptedCheckout::returning(CheckoutEvent::Success {
        payment_id: "pay_live_1".to_string(),
    });

    let outcome = PaymentBridge::new(&h.entitlements, &config).checkout(&mut provider, "Asha");
    assert_eq!(
        outcome,
        PaymentOutcome::Activated {
            payment_id: "pay_live_1".to_string()
        }
    );
    assert!(outcome.is_success());
    assert_eq!(provider.opened_with.unwrap().prefill.name, "Asha");
    assert_eq!(h.entitlements.check_status(), TrialStatus::Premium);
}

#[test]
fn test_success_with_failed_activation() {
    let h = harness();
    h.store.fail(Op::InsertPremium);
    let config = CheckoutConfig::default();
    let mut provider = ScriptedCheckout::returning(CheckoutEvent::Success {
        payment_id: "pay_live_2".to_string(),
    });

    let outcome = PaymentBridge::new(&h.entitlements, &config).checkout(&mut provider, "Asha");
    assert!(matches!(outcome, PaymentOutcome::ActivationFailed { .. }));
    assert!(!outcome.is_success());
    assert!(outcome.message().contains("pay_live_2"));
}

#[test]
fn test_dismissed_is_cancelled() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut provider = ScriptedCheckout::returning(CheckoutEvent::Dismissed);

    let outcome = PaymentBridge::new(&h.entitlements, &config).checkout(&mut provider, "Asha");
    assert_eq!(outcome, PaymentOutcome::Cancelled);
    assert_eq!(outcome.message(), "Payment cancelled.");
    assert_eq!(h.store.inner().premium_count(&h.device_id()), 0);
}

#[test]
fn test_payment_failure() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut provider = ScriptedCheckout::returning(CheckoutEvent::Failed {
        code: Some("BAD_REQUEST_ERROR".to_string()),
        description: "card declined".to_string(),
    });

    let outcome = PaymentBridge::new(&h.entitlements, &config).checkout(&mut provider, "Asha");
    assert_eq!(
        outcome,
        PaymentOutcome::Failed {
            reason: "card declined".to_string()
        }
    );
    assert_eq!(h.store.inner().premium_count(&h.device_id()), 0);
}

#[test]
fn test_provider_error_is_failure() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut provider = ScriptedCheckout::returning(CheckoutEvent::Dismissed);
    provider.result = Err(CheckoutError::Provider("closed unexpectedly".to_string()));

    let outcome = PaymentBridge::new(&h.entitlements, &config).checkout(&mut provider, "Asha");
    assert!(matches!(outcome, PaymentOutcome::Failed { .. }));
}

#[test]
fn test_load_failure_never_opens() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut provider = ScriptedCheckout::failing_to_load("offline");

    let outcome = PaymentBridge::new(&h.entitlements, &config).checkout(&mut provider, "Asha");
    assert!(matches!(outcome, PaymentOutcome::Unavailable { .. }));
    assert!(outcome.message().starts_with("Checkout failed to load"));
    assert!(provider.opened_with.is_none());
}

#[test]
fn test_test_checkout_requires_load() {
    let h = harness();
    let mut checkout = TestCheckout::new(h.clock.clone());
    let options = CheckoutOptions::from_config(&CheckoutConfig::default(), "Asha");

    assert!(checkout.open(&options).is_err());
    checkout.load().unwrap();
    assert!(checkout.is_loaded());

    match checkout.open(&options).unwrap() {
        CheckoutEvent::Success { payment_id } => {
            assert!(payment_id.starts_with("pay_test_"), "{payment_id}");
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_process_payment_test_mode_skips_live_provider() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut live = ScriptedCheckout::returning(CheckoutEvent::Dismissed);
    let clock: Arc<dyn Clock> = h.clock.clone();

    assert!(process_payment(&h.entitlements, &config, clock, &mut live, "Asha", true));
    assert_eq!(live.loads, 0);
    assert_eq!(h.entitlements.check_status(), TrialStatus::Premium);

    let membership = &h.store.inner().list_premium().unwrap()[0];
    assert!(membership.payment_id.as_deref().unwrap().starts_with("pay_test_"));
}

#[test]
fn test_process_payment_live_cancel() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut live = ScriptedCheckout::returning(CheckoutEvent::Dismissed);
    let clock: Arc<dyn Clock> = h.clock.clone();

    assert!(!process_payment(&h.entitlements, &config, clock, &mut live, "Asha", false));
    assert_eq!(live.loads, 1);
    assert_eq!(h.entitlements.check_status(), TrialStatus::Active);
}

#[test]
fn test_run_payment_reports_live_outcome() {
    let h = harness();
    let config = CheckoutConfig::default();
    let mut live = ScriptedCheckout::returning(CheckoutEvent::Success {
        payment_id: "pay_live1".to_string(),
    });
    let clock: Arc<dyn Clock> = h.clock.clone();

    let outcome = run_payment(&h.entitlements, &config, clock, &mut live, "Asha", false);
    assert_eq!(
        outcome,
        PaymentOutcome::Activated {
            payment_id: "pay_live1".to_string()
        }
    );
    assert_eq!(live.loads, 1);
    assert_eq!(h.entitlements.check_status(), TrialStatus::Premium);
}
