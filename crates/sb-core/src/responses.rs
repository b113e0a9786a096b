//! Response payloads returned by the HTTP API.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Certificate, Personnel, Site};

/// Summary of the manager linked to a site.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ManagerRef {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
}

impl From<&Personnel> for ManagerRef {
    fn from(p: &Personnel) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            phone: p.phone.clone(),
        }
    }
}

/// Summary of the certificate linked to a site.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CertificateRef {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub phone: Option<String>,
}

impl From<&Certificate> for CertificateRef {
    fn from(c: &Certificate) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            owner: c.owner_name.clone(),
            phone: c.owner_phone.clone(),
        }
    }
}

/// A site with its linked manager and certificate resolved.
///
/// Dangling references (IDs pointing at missing rows) resolve to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SiteDetail {
    #[serde(flatten)]
    pub site: Site,
    pub manager: Option<ManagerRef>,
    pub certificate: Option<CertificateRef>,
}

impl SiteDetail {
    #[must_use]
    pub fn new(site: Site, manager: Option<&Personnel>, certificate: Option<&Certificate>) -> Self {
        Self {
            site,
            manager: manager.map(ManagerRef::from),
            certificate: certificate.map(CertificateRef::from),
        }
    }
}

/// Body returned by mutating site endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MutationAck {
    pub id: String,
    /// The site's version after the mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated_fields: Vec<String>,
}

/// Body returned by a successful assignment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssignmentAck {
    pub site_id: String,
    pub manager_id: String,
    pub certificate_id: String,
    pub version: i64,
}

/// `error` member of a failed response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Stable machine-readable code such as `SITE_NOT_FOUND` or `CONFLICT`.
    pub code: String,
    pub message: String,
}

/// Every `/api` response body: `{success, data, ...}` or `{success, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            total: None,
            limit: None,
            offset: None,
            query: None,
            message: None,
            error: None,
            timestamp: Some(Utc::now()),
        }
    }

    #[must_use]
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            total: None,
            limit: None,
            offset: None,
            query: None,
            message: None,
            error: Some(ApiErrorBody {
                code: code.into(),
                message: message.into(),
            }),
            timestamp: None,
        }
    }

    #[must_use]
    pub const fn with_page(mut self, count: usize, total: u64, limit: Option<u32>, offset: u32) -> Self {
        self.count = Some(count);
        self.total = Some(total);
        self.limit = limit;
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Split into the payload or the reported error.
    ///
    /// # Errors
    ///
    /// Returns the `error` member (or a synthetic one) when `success` is false
    /// or `data` is missing.
    pub fn into_result(self) -> Result<T, ApiErrorBody> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(error),
            (true, None, None) => Err(ApiErrorBody {
                code: "EMPTY_RESPONSE".into(),
                message: "response had no data".into(),
            }),
            (false, _, None) => Err(ApiErrorBody {
                code: "UNKNOWN_ERROR".into(),
                message: "request failed without an error body".into(),
            }),
        }
    }
}
