//! PostgREST query-string construction.
//!
//! Filters become `column=op.value` pairs; values are percent-encoded when the
//! URL is assembled, never here.

use sb_core::enums::CertificateStatus;
use sb_core::filters::{CertificateFilter, PersonnelFilter, SiteFilter};

pub type Query = Vec<(&'static str, String)>;

#[must_use]
pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

/// `?id=eq.X`
#[must_use]
pub fn by_id(id: &str) -> Query {
    vec![("id", eq(id))]
}

/// `?id=eq.X&version=eq.N`: the optimistic-concurrency guard.
#[must_use]
pub fn by_id_and_version(id: &str, version: i64) -> Query {
    vec![("id", eq(id)), ("version", eq(version))]
}

#[must_use]
pub fn sites(filter: &SiteFilter) -> Query {
    let mut query = Vec::new();
    if let Some(ref company) = filter.company {
        query.push(("company", eq(company)));
    }
    if let Some(status) = filter.assignment_status {
        query.push(("assignment_status", eq(status)));
    }
    if let Some(state) = filter.state {
        query.push(("state", eq(state)));
    }
    query.push(("order", "id.asc".to_string()));
    if let Some(limit) = filter.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = filter.offset {
        query.push(("offset", offset.to_string()));
    }
    query
}

/// Case-insensitive substring match on name or address. `%`, `_` and `\`
/// in the needle match literally.
#[must_use]
pub fn site_search(needle: &str) -> Query {
    let quoted = quote(&format!("*{}*", escape_like(needle)));
    vec![
        ("or", format!("(name.ilike.{quoted},address.ilike.{quoted})")),
        ("order", "id.asc".to_string()),
    ]
}

#[must_use]
pub fn personnel(filter: &PersonnelFilter) -> Query {
    let mut query = Vec::new();
    if let Some(status) = filter.status {
        query.push(("status", eq(status)));
    }
    if let Some(ref role) = filter.role {
        query.push(("role", eq(role)));
    }
    query.push(("order", "id.asc".to_string()));
    query
}

#[must_use]
pub fn certificates(filter: &CertificateFilter) -> Query {
    let available = CertificateStatus::Available;
    let mut query = Vec::new();
    match filter.available {
        Some(true) => query.push(("status", eq(available))),
        Some(false) => query.push(("status", format!("neq.{available}"))),
        None => {}
    }
    query.push(("order", "id.asc".to_string()));
    query
}

/// Backslash-escape the `ILIKE` metacharacters.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Double-quote a value for use inside a PostgREST logic tree, where commas
/// and parentheses are reserved.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Render `k=v&...` with percent-encoded values.
#[must_use]
pub fn encode(query: &[(&str, String)]) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
