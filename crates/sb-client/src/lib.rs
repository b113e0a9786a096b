//! # sb-client
//!
//! Typed client for the Siteboard HTTP API.
//!
//! Every call unwraps the `{success, data}` envelope. Version-guarded site
//! mutations send the token both as `If-Match` and as a body `version`; a 409
//! surfaces as [`ClientError::Conflict`]. The `*_latest` helpers reload the
//! site and retry on conflict.

mod error;
pub mod query;

pub use error::ClientError;

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, IF_MATCH};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use sb_config::ClientConfig;
use sb_core::entities::{Certificate, NewCertificate, NewPersonnel, NewSite, Personnel, Site};
use sb_core::filters::{CertificateFilter, Page, PersonnelFilter, SiteFilter};
use sb_core::responses::{ApiEnvelope, AssignmentAck, MutationAck, SiteDetail};
use sb_core::stats::DashboardStats;
use sb_core::updates::{CertificateUpdate, PersonnelUpdate, SiteUpdate};
use sb_core::version::etag;

pub struct SiteboardClient {
    http: reqwest::Client,
    api_root: String,
    conflict_retries: u32,
}

impl SiteboardClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Parse`] for an API key that is not a valid
    /// header value, [`ClientError::Http`] if the client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if !config.api_key.is_empty() {
            let key = HeaderValue::from_str(&config.api_key)
                .map_err(|e| ClientError::Parse(format!("invalid API key: {e}")))?;
            headers.insert("x-api-key", key);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("siteboard-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            api_root: config.api_root(),
            conflict_retries: config.conflict_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_root)
    }

    fn site_url(&self, id: &str, suffix: &str) -> String {
        self.url(&format!("/sites/{}{suffix}", urlencoding::encode(id)))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        let envelope: Result<ApiEnvelope<Value>, _> = serde_json::from_slice(&bytes);

        if status == StatusCode::CONFLICT {
            let message = envelope
                .ok()
                .and_then(|e| e.error)
                .map_or_else(|| "version conflict".to_string(), |e| e.message);
            tracing::debug!(%message, "server reported a conflict");
            return Err(ClientError::Conflict { message });
        }

        let envelope = envelope.map_err(|e| {
            if status.is_success() {
                ClientError::Parse(e.to_string())
            } else {
                ClientError::Api {
                    status: status.as_u16(),
                    code: "HTTP_ERROR".into(),
                    message: String::from_utf8_lossy(&bytes).into_owned(),
                }
            }
        })?;

        if !status.is_success() || !envelope.success {
            let (code, message) = envelope.error.map_or_else(
                || ("HTTP_ERROR".to_string(), status.to_string()),
                |e| (e.code, e.message),
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let data = envelope
            .data
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(ApiEnvelope {
            success: envelope.success,
            data,
            count: envelope.count,
            total: envelope.total,
            limit: envelope.limit,
            offset: envelope.offset,
            query: envelope.query,
            message: envelope.message,
            error: None,
            timestamp: envelope.timestamp,
        })
    }

    async fn data<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        self.send(req)
            .await?
            .data
            .ok_or_else(|| ClientError::Parse("response had no data".into()))
    }

    /// Attach `If-Match` and echo the version into the JSON body.
    fn versioned<B: Serialize>(
        req: RequestBuilder,
        body: &B,
        version: Option<i64>,
    ) -> Result<RequestBuilder, ClientError> {
        let mut body = serde_json::to_value(body).map_err(|e| ClientError::Parse(e.to_string()))?;
        let Some(version) = version else {
            return Ok(req.json(&body));
        };
        if let Some(map) = body.as_object_mut() {
            map.insert("version".into(), json!(version));
        }
        Ok(req.header(IF_MATCH, etag(version)).json(&body))
    }

    // ── Meta ───────────────────────────────────────────────────────

    /// `GET /api/health`. Not wrapped in an envelope.
    ///
    /// # Errors
    ///
    /// Transport or parse failures.
    pub async fn health(&self) -> Result<Value, ClientError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: "UNHEALTHY".into(),
                message: status.to_string(),
            });
        }
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }

    // ── Sites ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn list_sites(&self, filter: &SiteFilter) -> Result<Page<Site>, ClientError> {
        let url = format!("{}{}", self.url("/sites"), query::sites(filter));
        let envelope: ApiEnvelope<Vec<Site>> = self.send(self.http.get(url)).await?;
        let items = envelope.data.unwrap_or_default();
        let total = envelope
            .total
            .unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));
        Ok(Page { items, total })
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn search_sites(&self, needle: &str) -> Result<Vec<Site>, ClientError> {
        let url = format!("{}{}", self.url("/sites/search"), query::search(needle));
        self.data(self.http.get(url)).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get_site(&self, id: &str) -> Result<SiteDetail, ClientError> {
        self.data(self.http.get(self.site_url(id, ""))).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn create_site(&self, site: &NewSite) -> Result<Site, ClientError> {
        self.data(self.http.post(self.url("/sites")).json(site)).await
    }

    /// # Errors
    ///
    /// [`ClientError::Conflict`] when `version` is stale.
    pub async fn update_site(
        &self,
        id: &str,
        update: &SiteUpdate,
        version: Option<i64>,
    ) -> Result<MutationAck, ClientError> {
        let req = Self::versioned(self.http.put(self.site_url(id, "")), update, version)?;
        self.data(req).await
    }

    /// # Errors
    ///
    /// [`ClientError::Conflict`] when `version` is stale.
    pub async fn assign_site(
        &self,
        id: &str,
        manager_id: &str,
        certificate_id: &str,
        version: Option<i64>,
    ) -> Result<AssignmentAck, ClientError> {
        let body = json!({"manager_id": manager_id, "certificate_id": certificate_id});
        let req = Self::versioned(self.http.post(self.site_url(id, "/assign")), &body, version)?;
        self.data(req).await
    }

    /// # Errors
    ///
    /// [`ClientError::Conflict`] when `version` is stale.
    pub async fn unassign_site(
        &self,
        id: &str,
        version: Option<i64>,
    ) -> Result<MutationAck, ClientError> {
        let req = Self::versioned(self.http.post(self.site_url(id, "/unassign")), &json!({}), version)?;
        self.data(req).await
    }

    /// Reload the site, then apply `update`; on conflict reload and retry.
    ///
    /// # Errors
    ///
    /// The last conflict once retries are exhausted, or any other error.
    pub async fn update_site_latest(
        &self,
        id: &str,
        update: &SiteUpdate,
    ) -> Result<MutationAck, ClientError> {
        self.with_latest(id, |version| self.update_site(id, update, Some(version)))
            .await
    }

    /// # Errors
    ///
    /// See [`Self::update_site_latest`].
    pub async fn assign_latest(
        &self,
        id: &str,
        manager_id: &str,
        certificate_id: &str,
    ) -> Result<AssignmentAck, ClientError> {
        self.with_latest(id, |version| {
            self.assign_site(id, manager_id, certificate_id, Some(version))
        })
        .await
    }

    /// # Errors
    ///
    /// See [`Self::update_site_latest`].
    pub async fn unassign_latest(&self, id: &str) -> Result<MutationAck, ClientError> {
        self.with_latest(id, |version| self.unassign_site(id, Some(version)))
            .await
    }

    async fn with_latest<T, F, Fut>(&self, id: &str, mut attempt: F) -> Result<T, ClientError>
    where
        F: FnMut(i64) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut tries = 0;
        loop {
            let version = self.get_site(id).await?.site.version;
            match attempt(version).await {
                Err(e) if e.is_conflict() && tries < self.conflict_retries => {
                    tries += 1;
                    tracing::info!(site_id = id, version, tries, "conflict; reloading and retrying");
                }
                other => return other,
            }
        }
    }

    // ── Personnel ──────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn list_personnel(
        &self,
        filter: &PersonnelFilter,
    ) -> Result<Vec<Personnel>, ClientError> {
        let url = format!("{}{}", self.url("/personnel"), query::personnel(filter));
        self.data(self.http.get(url)).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get_personnel(&self, id: &str) -> Result<Personnel, ClientError> {
        let url = self.url(&format!("/personnel/{}", urlencoding::encode(id)));
        self.data(self.http.get(url)).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn create_personnel(&self, person: &NewPersonnel) -> Result<Personnel, ClientError> {
        self.data(self.http.post(self.url("/personnel")).json(person))
            .await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn update_personnel(
        &self,
        id: &str,
        update: &PersonnelUpdate,
    ) -> Result<Personnel, ClientError> {
        let url = self.url(&format!("/personnel/{}", urlencoding::encode(id)));
        self.data(self.http.put(url).json(update)).await
    }

    // ── Certificates ───────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn list_certificates(
        &self,
        filter: &CertificateFilter,
    ) -> Result<Vec<Certificate>, ClientError> {
        let url = format!("{}{}", self.url("/certificates"), query::certificates(filter));
        self.data(self.http.get(url)).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get_certificate(&self, id: &str) -> Result<Certificate, ClientError> {
        let url = self.url(&format!("/certificates/{}", urlencoding::encode(id)));
        self.data(self.http.get(url)).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn create_certificate(
        &self,
        certificate: &NewCertificate,
    ) -> Result<Certificate, ClientError> {
        self.data(self.http.post(self.url("/certificates")).json(certificate))
            .await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn update_certificate(
        &self,
        id: &str,
        update: &CertificateUpdate,
    ) -> Result<Certificate, ClientError> {
        let url = self.url(&format!("/certificates/{}", urlencoding::encode(id)));
        self.data(self.http.put(url).json(update)).await
    }

    // ── Stats ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        self.data(self.http.get(self.url("/stats"))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_urls_escape_ids() {
        let client = SiteboardClient::new(&ClientConfig {
            base_url: "http://localhost:5000/".into(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.site_url("SITE 1", "/assign"),
            "http://localhost:5000/api/sites/SITE%201/assign"
        );
    }

    #[test]
    fn bad_api_key_is_rejected() {
        let err = SiteboardClient::new(&ClientConfig {
            api_key: "two\nlines".into(),
            ..ClientConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
