//! Admin-side premium membership management

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::catalog::ContentError;
use crate::clock::Clock;
use crate::models::{NewPremiumMembership, PremiumMembership, RowId, PREMIUM_DAYS};
use crate::store::RemoteStore;

/// Days granted when an admin does not say otherwise.
pub const DEFAULT_GRANT_DAYS: i64 = PREMIUM_DAYS;

pub struct PremiumAdmin {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
}

impl PremiumAdmin {
    pub fn new(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All memberships, newest purchase first.
    pub fn list(&self) -> Result<Vec<PremiumMembership>, ContentError> {
        Ok(self.store.list_premium()?)
    }

    /// Grants `days` of premium to a device without a payment.
    pub fn grant(
        &self,
        name: &str,
        device_id: &str,
        days: i64,
    ) -> Result<PremiumMembership, ContentError> {
        let name = name.trim();
        let device_id = device_id.trim();
        if name.is_empty() || device_id.is_empty() {
            return Err(ContentError::MissingInformation(
                "both name and device are required",
            ));
        }
        if days < 1 {
            return Err(ContentError::MissingInformation(
                "days must be at least 1",
            ));
        }

        let now = self.clock.now();
        let expires_at = add_days(now, days)?;
        let membership = self.store.insert_premium(&NewPremiumMembership {
            name: name.to_string(),
            device_id: device_id.to_string(),
            payment_id: None,
            purchased_at: now,
            expires_at,
        })?;
        tracing::info!(device_id, days, "premium granted");
        Ok(membership)
    }

    /// Pushes the expiry out by `days`, counting from now when the
    /// membership has already lapsed.
    pub fn extend(&self, id: RowId, days: i64) -> Result<PremiumMembership, ContentError> {
        if days < 1 {
            return Err(ContentError::MissingInformation(
                "days must be at least 1",
            ));
        }

        let current = self.store.premium(id)?;
        let base = current.expires_at.max(self.clock.now());
        let membership = self
            .store
            .update_premium_expiry(id, add_days(base, days)?)?;
        tracing::info!(id, days, expires_at = %membership.expires_at, "premium extended");
        Ok(membership)
    }
}

/// `base + days`, rejecting counts chrono cannot represent.
fn add_days(base: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, ContentError> {
    Duration::try_days(days)
        .and_then(|span| base.checked_add_signed(span))
        .ok_or(ContentError::MissingInformation("days out of range"))
}
