//! Shared test utilities for sb-db unit tests.

pub(crate) mod helpers {
    use sb_core::entities::{NewCertificate, NewPersonnel, NewSite};

    use crate::service::SiteService;

    /// An in-memory store.
    pub async fn test_service() -> SiteService {
        SiteService::new_local(":memory:").await.unwrap()
    }

    pub fn new_site(name: &str) -> NewSite {
        NewSite {
            name: name.to_string(),
            company: "더존하우징".to_string(),
            address: "Seoul".to_string(),
            ..Default::default()
        }
    }

    pub fn new_manager(name: &str) -> NewPersonnel {
        NewPersonnel {
            name: name.to_string(),
            role: "site manager".to_string(),
            ..Default::default()
        }
    }

    pub fn new_certificate(owner: &str) -> NewCertificate {
        NewCertificate {
            name: "Architect (1st class)".to_string(),
            owner_name: owner.to_string(),
            ..Default::default()
        }
    }
}
