//! Query strings for the list endpoints.

use sb_core::filters::{CertificateFilter, PersonnelFilter, SiteFilter};

fn join(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let encoded: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    format!("?{}", encoded.join("&"))
}

#[must_use]
pub fn sites(filter: &SiteFilter) -> String {
    let mut pairs = Vec::new();
    if let Some(ref company) = filter.company {
        pairs.push(("company", company.clone()));
    }
    if let Some(status) = filter.assignment_status {
        pairs.push(("status", status.to_string()));
    }
    if let Some(state) = filter.state {
        pairs.push(("state", state.to_string()));
    }
    if let Some(limit) = filter.limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(offset) = filter.offset {
        pairs.push(("offset", offset.to_string()));
    }
    join(&pairs)
}

#[must_use]
pub fn search(needle: &str) -> String {
    join(&[("q", needle.to_string())])
}

#[must_use]
pub fn personnel(filter: &PersonnelFilter) -> String {
    let mut pairs = Vec::new();
    if let Some(status) = filter.status {
        pairs.push(("status", status.to_string()));
    }
    if let Some(ref role) = filter.role {
        pairs.push(("role", role.clone()));
    }
    join(&pairs)
}

#[must_use]
pub fn certificates(filter: &CertificateFilter) -> String {
    filter
        .available
        .map(|available| join(&[("available", available.to_string())]))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::enums::AssignmentStatus;

    #[test]
    fn empty_filters_add_nothing() {
        assert_eq!(sites(&SiteFilter::default()), "");
        assert_eq!(certificates(&CertificateFilter::default()), "");
    }

    #[test]
    fn values_are_encoded() {
        let filter = SiteFilter {
            company: Some("더존 하우징".into()),
            assignment_status: Some(AssignmentStatus::Assigned),
            limit: Some(10),
            ..SiteFilter::default()
        };
        assert_eq!(
            sites(&filter),
            "?company=%EB%8D%94%EC%A1%B4%20%ED%95%98%EC%9A%B0%EC%A7%95&status=assigned&limit=10"
        );
        assert_eq!(search("a&b"), "?q=a%26b");
        assert_eq!(
            certificates(&CertificateFilter {
                available: Some(false)
            }),
            "?available=false"
        );
    }
}
