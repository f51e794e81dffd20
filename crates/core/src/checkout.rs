//! Payment checkout bridge
//!
//! Drives a third-party checkout to completion or cancellation and hands a
//! successful payment over to premium provisioning. The provider itself is an
//! external system behind [`CheckoutProvider`].

use serde::Serialize;
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::CheckoutConfig;
use crate::device::to_base36;
use crate::entitlement::Entitlements;

/// Options handed to the provider when a checkout session opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    /// Minor currency units
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

impl CheckoutOptions {
    pub fn from_config(config: &CheckoutConfig, holder_name: &str) -> Self {
        Self {
            key: config.key_id.clone(),
            amount: config.amount,
            currency: config.currency.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            prefill: Prefill {
                name: holder_name.to_string(),
            },
            theme: Theme {
                color: config.theme_color.clone(),
            },
        }
    }
}

/// What the provider reported when the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    Success { payment_id: String },
    /// The buyer closed the checkout
    Dismissed,
    /// `payment.failed`
    Failed {
        code: Option<String>,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout script failed to load: {0}")]
    ScriptLoad(String),
    #[error("checkout provider error: {0}")]
    Provider(String),
}

pub trait CheckoutProvider {
    /// Makes the provider ready. Must be a no-op once loaded.
    fn load(&mut self) -> Result<(), CheckoutError>;

    /// Runs one checkout session to its end.
    fn open(&mut self, options: &CheckoutOptions) -> Result<CheckoutEvent, CheckoutError>;
}

/// Provider used in test mode: always succeeds with a `pay_test_…` reference.
pub struct TestCheckout {
    clock: Arc<dyn Clock>,
    loaded: bool,
}

impl TestCheckout {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl CheckoutProvider for TestCheckout {
    fn load(&mut self) -> Result<(), CheckoutError> {
        self.loaded = true;
        Ok(())
    }

    fn open(&mut self, _options: &CheckoutOptions) -> Result<CheckoutEvent, CheckoutError> {
        if !self.loaded {
            return Err(CheckoutError::Provider("checkout not loaded".to_string()));
        }
        let millis = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default();
        Ok(CheckoutEvent::Success {
            payment_id: format!("pay_test_{}", to_base36(millis)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Paid and membership recorded
    Activated { payment_id: String },
    /// Paid, but the membership row could not be written
    ActivationFailed { payment_id: String },
    Cancelled,
    Failed { reason: String },
    /// The provider could not be loaded
    Unavailable { reason: String },
}

impl PaymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Activated { .. })
    }

    /// User-facing message for the outcome.
    pub fn message(&self) -> String {
        match self {
            PaymentOutcome::Activated { .. } => {
                "Payment successful! You now have premium access.".to_string()
            }
            PaymentOutcome::ActivationFailed { payment_id } => format!(
                "Payment successful but failed to activate premium. Please contact support (payment {payment_id})."
            ),
            PaymentOutcome::Cancelled => "Payment cancelled.".to_string(),
            PaymentOutcome::Failed { reason } => {
                format!("Payment failed. Please try again. ({reason})")
            }
            PaymentOutcome::Unavailable { reason } => format!(
                "Checkout failed to load. Please check your internet connection. ({reason})"
            ),
        }
    }
}

/// Connects a checkout provider to premium provisioning.
pub struct PaymentBridge<'a> {
    entitlements: &'a Entitlements,
    config: &'a CheckoutConfig,
}

impl<'a> PaymentBridge<'a> {
    pub fn new(entitlements: &'a Entitlements, config: &'a CheckoutConfig) -> Self {
        Self {
            entitlements,
            config,
        }
    }

    /// Loads the provider, runs checkout, and provisions premium on success.
    pub fn checkout(&self, provider: &mut dyn CheckoutProvider, holder_name: &str) -> PaymentOutcome {
        if let Err(e) = provider.load() {
            tracing::error!(error = %e, "checkout unavailable");
            return PaymentOutcome::Unavailable {
                reason: e.to_string(),
            };
        }

        let options = CheckoutOptions::from_config(self.config, holder_name);
        match provider.open(&options) {
            Ok(CheckoutEvent::Success { payment_id }) => {
                tracing::info!(%payment_id, "payment successful");
                if self.entitlements.provision_premium(holder_name, &payment_id) {
                    PaymentOutcome::Activated { payment_id }
                } else {
                    PaymentOutcome::ActivationFailed { payment_id }
                }
            }
            Ok(CheckoutEvent::Dismissed) => {
                tracing::info!("payment cancelled by user");
                PaymentOutcome::Cancelled
            }
            Ok(CheckoutEvent::Failed { code, description }) => {
                tracing::error!(code = ?code, %description, "payment failed");
                PaymentOutcome::Failed {
                    reason: description,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "payment failed");
                PaymentOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Runs a checkout for `holder_name` through `live`, or through
/// [`TestCheckout`] when `test_mode` is set.
pub fn run_payment(
    entitlements: &Entitlements,
    config: &CheckoutConfig,
    clock: Arc<dyn Clock>,
    live: &mut dyn CheckoutProvider,
    holder_name: &str,
    test_mode: bool,
) -> PaymentOutcome {
    let bridge = PaymentBridge::new(entitlements, config);
    if test_mode {
        tracing::debug!("test mode checkout");
        bridge.checkout(&mut TestCheckout::new(clock), holder_name)
    } else {
        bridge.checkout(live, holder_name)
    }
}

/// [`run_payment`], reduced to whether premium is now active.
pub fn process_payment(
    entitlements: &Entitlements,
    config: &CheckoutConfig,
    clock: Arc<dyn Clock>,
    live: &mut dyn CheckoutProvider,
    holder_name: &str,
    test_mode: bool,
) -> bool {
    run_payment(entitlements, config, clock, live, holder_name, test_mode).is_success()
}
