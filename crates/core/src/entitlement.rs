//! Trial / premium entitlement evaluation
//!
//! The check is evaluated client-side and fails closed: whenever the state
//! cannot be determined the device is treated as `Expired`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::device::DeviceIdProvider;
use crate::models::{NewPremiumMembership, NewTrial, PremiumMembership, PREMIUM_DAYS};
use crate::store::{RemoteStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrialStatus {
    /// Placeholder before the first check completes; never returned by a check
    #[default]
    Loading,
    Active,
    Expired,
    Premium,
}

impl TrialStatus {
    /// Whether quiz content may be opened.
    pub fn has_access(&self) -> bool {
        matches!(self, TrialStatus::Active | TrialStatus::Premium)
    }

    /// Badge text shown next to the status.
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            TrialStatus::Loading => None,
            TrialStatus::Active => Some("3-Day Trial Active"),
            TrialStatus::Expired => Some("Trial Expired - Upgrade to Premium"),
            TrialStatus::Premium => Some("Premium Member"),
        }
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialStatus::Loading => write!(f, "loading"),
            TrialStatus::Active => write!(f, "active"),
            TrialStatus::Expired => write!(f, "expired"),
            TrialStatus::Premium => write!(f, "premium"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EntitlementError {
    #[error("device identifier unavailable: {0}")]
    Device(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Entitlement service: status checks and premium provisioning for the
/// current device.
pub struct Entitlements {
    store: Arc<dyn RemoteStore>,
    device: DeviceIdProvider,
    clock: Arc<dyn Clock>,
}

impl Entitlements {
    pub fn new(store: Arc<dyn RemoteStore>, device: DeviceIdProvider, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            device,
            clock,
        }
    }

    pub fn device_id(&self) -> Result<String, EntitlementError> {
        self.device
            .get_or_create()
            .map_err(|e| EntitlementError::Device(e.to_string()))
    }

    /// Evaluates the current device. Never returns `Loading`; every failure
    /// collapses to `Expired`.
    pub fn check_status(&self) -> TrialStatus {
        match self.evaluate() {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(error = %e, "entitlement check failed");
                TrialStatus::Expired
            }
        }
    }

    fn evaluate(&self) -> Result<TrialStatus, EntitlementError> {
        let device_id = self.device_id()?;
        let now = self.clock.now();

        match self.store.active_premium(&device_id, now) {
            Ok(membership) => {
                tracing::debug!(%device_id, expires_at = %membership.expires_at, "premium member");
                return Ok(TrialStatus::Premium);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => {
                // Lookup trouble here does not end the check; the trial path decides.
                tracing::error!(%device_id, error = %e, "error checking premium status");
            }
        }

        let trial = match self.store.trial(&device_id) {
            Ok(trial) => trial,
            Err(StoreError::NotFound) => {
                let row = NewTrial {
                    device_id: device_id.clone(),
                    trial_start: now,
                };
                return match self.store.insert_trial(&row) {
                    Ok(_) => {
                        tracing::info!(%device_id, "started trial");
                        Ok(TrialStatus::Active)
                    }
                    Err(e) => {
                        tracing::error!(%device_id, error = %e, "error creating trial");
                        Ok(TrialStatus::Expired)
                    }
                };
            }
            Err(e) => {
                tracing::error!(%device_id, error = %e, "error checking trial status");
                return Ok(TrialStatus::Expired);
            }
        };

        if trial.is_active_at(now) {
            Ok(TrialStatus::Active)
        } else {
            Ok(TrialStatus::Expired)
        }
    }

    /// Records a paid 30-day membership for this device. Returns `false` on
    /// any failure (logged). Not idempotent: repeated calls add rows.
    pub fn provision_premium(&self, holder_name: &str, payment_reference: &str) -> bool {
        match self.try_provision(holder_name, payment_reference) {
            Ok(membership) => {
                tracing::info!(
                    device_id = %membership.device_id,
                    payment_id = payment_reference,
                    expires_at = %membership.expires_at,
                    "premium activated"
                );
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "error creating premium user");
                false
            }
        }
    }

    fn try_provision(
        &self,
        holder_name: &str,
        payment_reference: &str,
    ) -> Result<PremiumMembership, EntitlementError> {
        let device_id = self.device_id()?;
        let purchased_at = self.clock.now();
        let row = NewPremiumMembership {
            name: holder_name.to_string(),
            device_id,
            payment_id: Some(payment_reference.to_string()),
            purchased_at,
            expires_at: purchased_at + Duration::days(PREMIUM_DAYS),
        };
        Ok(self.store.insert_premium(&row)?)
    }
}
