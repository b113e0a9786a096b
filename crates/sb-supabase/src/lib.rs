//! # sb-supabase
//!
//! Remote Siteboard store backed by Supabase's PostgREST API.
//!
//! Exposes the same operations as the local store. PostgREST has no
//! multi-table transactions, so the version-guarded `PATCH` on the site row
//! is what claims a site during assign / unassign; the personnel and
//! certificate rows are patched afterwards.

mod error;
pub mod http;
pub mod query;
mod repos;

pub use error::SupabaseError;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use sb_config::SupabaseConfig;

use crate::http::{check_response, parse_content_range_total};

const PREFER: &str = "Prefer";

/// HTTP client for the Siteboard tables in a Supabase project.
pub struct SupabaseStore {
    http: reqwest::Client,
    rest_url: String,
}

impl SupabaseStore {
    /// Build a client that sends the project key on every request.
    ///
    /// # Errors
    ///
    /// [`SupabaseError::NotConfigured`] when URL or key is missing,
    /// [`SupabaseError::Parse`] when the key is not a valid header value.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        if !config.is_configured() {
            return Err(SupabaseError::NotConfigured);
        }

        let key = HeaderValue::from_str(&config.key)
            .map_err(|e| SupabaseError::Parse(format!("invalid supabase key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|e| SupabaseError::Parse(format!("invalid supabase key: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent(concat!("siteboard/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            rest_url: config.rest_url(),
        })
    }

    fn url(&self, table: &str, query: &[(&str, String)]) -> String {
        if query.is_empty() {
            format!("{}/{table}", self.rest_url)
        } else {
            format!("{}/{table}?{}", self.rest_url, query::encode(query))
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError> {
        let resp = check_response(self.http.get(self.url(table, query)).send().await?).await?;
        decode(resp).await
    }

    /// Select with `Prefer: count=exact`; returns rows plus the unpaged total.
    async fn select_counted<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<(Vec<T>, u64), SupabaseError> {
        let resp = check_response(
            self.http
                .get(self.url(table, query))
                .header(PREFER, "count=exact")
                .send()
                .await?,
        )
        .await?;
        let total = parse_content_range_total(&resp);
        let rows: Vec<T> = decode(resp).await?;
        let total = total.unwrap_or_else(|| u64::try_from(rows.len()).unwrap_or(u64::MAX));
        Ok((rows, total))
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<T>, SupabaseError> {
        let mut rows: Vec<T> = self.select(table, &query::by_id(id)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, SupabaseError> {
        let resp = check_response(
            self.http
                .post(self.url(table, &[]))
                .header(PREFER, "return=representation")
                .json(row)
                .send()
                .await?,
        )
        .await?;
        let mut rows: Vec<T> = decode(resp).await?;
        if rows.is_empty() {
            return Err(SupabaseError::Parse(format!(
                "insert into {table} returned no representation"
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// PATCH matching rows and return their new representation. An empty
    /// result means the filter matched nothing.
    async fn patch<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<Vec<T>, SupabaseError> {
        let resp = check_response(
            self.http
                .patch(self.url(table, query))
                .header(PREFER, "return=representation")
                .json(body)
                .send()
                .await?,
        )
        .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, SupabaseError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| SupabaseError::Parse(e.to_string()))
}
