//! PostgREST-style remote store
//!
//! Talks to `<url>/rest/v1/<table>` with the project's anon key. Reads are
//! plain filtered `GET`s; single-row lookups ask for `limit=1` and map an empty
//! result to `StoreError::NotFound`.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::BackendConfig;
use crate::models::{
    NewPremiumMembership, NewQuestion, NewTest, NewTrial, PremiumMembership, Question, RowId,
    Test, TrialRecord,
};

use super::{
    RemoteStore, StoreError, NOT_FOUND_CODE, PREMIUM_TABLE, QUESTIONS_TABLE, TESTS_TABLE,
    TRIALS_TABLE,
};

type Query = Vec<(&'static str, String)>;

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

pub struct RestStore {
    base_url: String,
    api_key: String,
    client: Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::Transport(
                "backend url is not configured".to_string(),
            ));
        }
        Self::new(
            &config.url,
            &config.anon_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let resp = self
            .authorized(builder)
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let text = resp.text().unwrap_or_default();
        Err(decode_error(status, &text))
    }

    fn select<T: DeserializeOwned>(&self, table: &str, query: Query) -> Result<Vec<T>, StoreError> {
        let mut query = query;
        query.push(("select", "*".to_string()));
        let resp = self.send(self.client.get(self.table_url(table)).query(&query))?;
        resp.json()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn select_one<T: DeserializeOwned>(&self, table: &str, query: Query) -> Result<T, StoreError> {
        let mut query = query;
        query.push(("limit", "1".to_string()));
        self.select(table, query)?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<Vec<T>, StoreError> {
        let builder = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body);
        self.send(builder)?
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn insert_one<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        self.insert::<T, B>(table, body)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    fn delete(&self, table: &str, query: Query) -> Result<(), StoreError> {
        self.send(self.client.delete(self.table_url(table)).query(&query))?;
        Ok(())
    }
}

impl RemoteStore for RestStore {
    fn active_premium(
        &self,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError> {
        self.select_one(
            PREMIUM_TABLE,
            vec![
                ("device_id", format!("eq.{device_id}")),
                ("expires_at", format!("gte.{}", timestamp(now))),
                ("order", "expires_at.desc".to_string()),
            ],
        )
    }

    fn list_premium(&self) -> Result<Vec<PremiumMembership>, StoreError> {
        self.select(
            PREMIUM_TABLE,
            vec![("order", "purchased_at.desc".to_string())],
        )
    }

    fn premium(&self, id: RowId) -> Result<PremiumMembership, StoreError> {
        self.select_one(PREMIUM_TABLE, vec![("id", format!("eq.{id}"))])
    }

    fn insert_premium(
        &self,
        row: &NewPremiumMembership,
    ) -> Result<PremiumMembership, StoreError> {
        self.insert_one(PREMIUM_TABLE, row)
    }

    fn update_premium_expiry(
        &self,
        id: RowId,
        expires_at: DateTime<Utc>,
    ) -> Result<PremiumMembership, StoreError> {
        let builder = self
            .client
            .patch(self.table_url(PREMIUM_TABLE))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "expires_at": timestamp(expires_at) }));
        let rows: Vec<PremiumMembership> = self
            .send(builder)?
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    fn trial(&self, device_id: &str) -> Result<TrialRecord, StoreError> {
        self.select_one(
            TRIALS_TABLE,
            vec![
                ("device_id", format!("eq.{device_id}")),
                ("order", "trial_start.asc".to_string()),
            ],
        )
    }

    fn insert_trial(&self, row: &NewTrial) -> Result<TrialRecord, StoreError> {
        self.insert_one(TRIALS_TABLE, row)
    }

    fn list_tests(&self) -> Result<Vec<Test>, StoreError> {
        self.select(TESTS_TABLE, vec![("order", "created_at.desc".to_string())])
    }

    fn test(&self, id: RowId) -> Result<Test, StoreError> {
        self.select_one(TESTS_TABLE, vec![("id", format!("eq.{id}"))])
    }

    fn insert_test(&self, row: &NewTest) -> Result<Test, StoreError> {
        self.insert_one(TESTS_TABLE, row)
    }

    fn delete_test(&self, id: RowId) -> Result<(), StoreError> {
        self.delete(TESTS_TABLE, vec![("id", format!("eq.{id}"))])
    }

    fn questions(&self, test_id: RowId) -> Result<Vec<Question>, StoreError> {
        self.select(
            QUESTIONS_TABLE,
            vec![
                ("test_id", format!("eq.{test_id}")),
                ("order", "question_id.asc".to_string()),
            ],
        )
    }

    fn insert_questions(&self, rows: &[NewQuestion]) -> Result<Vec<Question>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.insert(QUESTIONS_TABLE, rows)
    }

    fn delete_questions(&self, test_id: RowId) -> Result<(), StoreError> {
        self.delete(QUESTIONS_TABLE, vec![("test_id", format!("eq.{test_id}"))])
    }
}

/// Maps a non-2xx response to a `StoreError`.
///
/// `PGRST116` ("no rows") becomes `NotFound`; an undecodable body keeps the
/// HTTP status as its code.
pub fn decode_error(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) if err.code.as_deref() == Some(NOT_FOUND_CODE) => StoreError::NotFound,
        Ok(err) => StoreError::Backend {
            code: err.code.unwrap_or_else(|| format!("HTTP {status}")),
            message: match (err.message, err.details) {
                (Some(m), Some(d)) if !d.is_empty() => format!("{m} ({d})"),
                (Some(m), _) => m,
                (None, Some(d)) => d,
                (None, None) => String::new(),
            },
        },
        Err(_) => StoreError::Backend {
            code: format!("HTTP {status}"),
            message: body.trim().to_string(),
        },
    }
}

/// RFC 3339 with millisecond precision, `Z` suffix.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
