//! Pseudo-unique device identifier for trial and premium lookups
//!
//! The identifier is a best-effort pseudo-identity derived from environment
//! signals. It is not an auth credential: anyone who copies `local.json` or
//! reproduces the signals gets the same entitlements.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::clock::Clock;
use crate::local::LocalStorage;

/// Local-storage key holding the cached identifier.
pub const DEVICE_ID_KEY: &str = "quizgate_device_id";

const SURFACE_TEXT: &str = "Device fingerprint";
const SURFACE_FONT: &str = "14px Arial";
const SURFACE_FALLBACK: &str = "surface:unavailable";

/// Environment signals folded into the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSignals {
    pub user_agent: String,
    pub locale: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Minutes *behind* UTC (positive west of Greenwich)
    pub timezone_offset_minutes: i32,
    /// Encoded rendering of the fixed surface text
    pub surface: String,
}

impl DeviceSignals {
    /// Collects signals from the running process.
    pub fn from_env() -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_default();

        Self {
            user_agent: format!(
                "quizgate/{} ({}; {})",
                crate::VERSION,
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            locale: detect_locale(),
            screen_width: env_dimension("COLUMNS"),
            screen_height: env_dimension("LINES"),
            timezone_offset_minutes: -(Local::now().offset().local_minus_utc() / 60),
            surface: render_surface(&host),
        }
    }

    /// The `|`-joined string that gets hashed.
    pub fn fingerprint(&self) -> String {
        [
            self.user_agent.clone(),
            self.locale.clone(),
            format!("{}x{}", self.screen_width, self.screen_height),
            self.timezone_offset_minutes.to_string(),
            self.surface.clone(),
        ]
        .join("|")
    }
}

/// Deterministic stand-in for drawing fixed text on an offscreen surface and
/// exporting it. An empty host yields the constant fallback.
pub fn render_surface(host: &str) -> String {
    if host.is_empty() {
        return SURFACE_FALLBACK.to_string();
    }
    let scene = format!("{SURFACE_FONT};top;2,2;{SURFACE_TEXT};{host}");
    let digest = Sha256::digest(scene.as_bytes());
    format!("data:image/png;sha256,{}", hex_encode(&digest))
}

/// Rolling `hash * 31 + unit` over UTF-16 code units, 32-bit wraparound.
pub fn fingerprint_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Lowercase base-36 rendering.
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Builds `device_<|hash| base-36>_<millis base-36>`.
pub fn generate_device_id(signals: &DeviceSignals, now: DateTime<Utc>) -> String {
    let hash = fingerprint_hash(&signals.fingerprint());
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    format!(
        "device_{}_{}",
        to_base36(u64::from(hash.unsigned_abs())),
        to_base36(millis)
    )
}

/// Reads the cached identifier or mints and persists a new one.
pub struct DeviceIdProvider {
    storage: Arc<dyn LocalStorage>,
    clock: Arc<dyn Clock>,
    signals: DeviceSignals,
}

impl DeviceIdProvider {
    pub fn new(storage: Arc<dyn LocalStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::with_signals(storage, clock, DeviceSignals::from_env())
    }

    pub fn with_signals(
        storage: Arc<dyn LocalStorage>,
        clock: Arc<dyn Clock>,
        signals: DeviceSignals,
    ) -> Self {
        Self {
            storage,
            clock,
            signals,
        }
    }

    /// Returns the stored identifier, generating and persisting one on first use.
    pub fn get_or_create(&self) -> Result<String> {
        if let Some(existing) = self.peek() {
            return Ok(existing);
        }

        let device_id = generate_device_id(&self.signals, self.clock.now());
        self.storage.set(DEVICE_ID_KEY, &device_id)?;
        tracing::debug!(%device_id, "minted new device identifier");
        Ok(device_id)
    }

    /// The stored identifier, without creating one.
    pub fn peek(&self) -> Option<String> {
        self.storage
            .get(DEVICE_ID_KEY)
            .filter(|id| !id.trim().is_empty())
    }
}

fn detect_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty())
        .and_then(|raw| normalize_locale(&raw))
        .unwrap_or_else(|| "en-US".to_string())
}

/// `en_US.UTF-8` → `en-US`; `C` and `POSIX` carry no locale.
fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

fn env_dimension(var: &str) -> u32 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
