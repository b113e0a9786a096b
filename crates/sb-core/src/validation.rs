//! Input and assignment validation.
//!
//! Every check collects all problems before failing; messages are joined with
//! `"; "`. Enum values and date formats are already enforced by
//! deserialization, so these functions cover required fields, the company
//! allow-list, and assignment preconditions.

use crate::entities::{Certificate, NewCertificate, NewPersonnel, NewSite, Personnel, Site};
use crate::enums::{CertificateStatus, PersonnelStatus};
use crate::errors::CoreError;
use crate::updates::{CertificateUpdate, PersonnelUpdate, SiteUpdate};

#[derive(Default)]
struct Problems {
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl Problems {
    fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.missing.push(format!("{field} is required"));
        }
    }

    fn not_blank(&mut self, field: &str, value: Option<&String>) {
        if value.is_some_and(|v| v.trim().is_empty()) {
            self.invalid.push(format!("{field} cannot be blank"));
        }
    }

    fn company(&mut self, company: &str, allowed: &[String]) {
        let company = company.trim();
        if company.is_empty() || allowed.is_empty() {
            return;
        }
        if !allowed.iter().any(|c| c == company) {
            self.invalid.push(format!(
                "company must be one of: {}",
                allowed.join(", ")
            ));
        }
    }

    /// Missing fields win over other problems so callers see `MissingField`.
    fn finish(self) -> Result<(), CoreError> {
        if !self.missing.is_empty() {
            let all: Vec<String> = self.missing.into_iter().chain(self.invalid).collect();
            return Err(CoreError::MissingField(all.join("; ")));
        }
        if !self.invalid.is_empty() {
            return Err(CoreError::Validation(self.invalid.join("; ")));
        }
        Ok(())
    }
}

/// Validate a site registration against the company allow-list (empty list
/// means any company).
///
/// # Errors
///
/// [`CoreError::MissingField`] when name, company or address is blank,
/// otherwise [`CoreError::Validation`].
pub fn validate_new_site(site: &NewSite, companies: &[String]) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    problems.require("name", &site.name);
    problems.require("company", &site.company);
    problems.require("address", &site.address);
    problems.company(&site.company, companies);
    check_coordinates(&mut problems, site.latitude, site.longitude);
    problems.finish()
}

/// # Errors
///
/// [`CoreError::Validation`] when a provided field is blank or the company is
/// not allowed.
pub fn validate_site_update(update: &SiteUpdate, companies: &[String]) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    problems.not_blank("name", update.name.as_ref());
    problems.not_blank("company", update.company.as_ref());
    problems.not_blank("address", update.address.as_ref());
    if let Some(company) = &update.company {
        problems.company(company, companies);
    }
    check_coordinates(
        &mut problems,
        update.latitude.flatten(),
        update.longitude.flatten(),
    );
    problems.finish()
}

fn check_coordinates(problems: &mut Problems, latitude: Option<f64>, longitude: Option<f64>) {
    if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        problems
            .invalid
            .push("latitude must be between -90 and 90".to_string());
    }
    if longitude.is_some_and(|lon| !(-180.0..=180.0).contains(&lon)) {
        problems
            .invalid
            .push("longitude must be between -180 and 180".to_string());
    }
}

/// # Errors
///
/// [`CoreError::MissingField`] when name or role is blank.
pub fn validate_new_personnel(person: &NewPersonnel) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    problems.require("name", &person.name);
    problems.require("role", &person.role);
    if person.status == PersonnelStatus::Deployed {
        problems
            .invalid
            .push("new personnel cannot start as deployed".to_string());
    }
    problems.finish()
}

/// # Errors
///
/// [`CoreError::Validation`] when a provided required field is blank.
pub fn validate_personnel_update(update: &PersonnelUpdate) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    problems.not_blank("name", update.name.as_ref());
    problems.not_blank("role", update.role.as_ref());
    problems.finish()
}

/// # Errors
///
/// [`CoreError::MissingField`] when name or owner name is blank.
pub fn validate_new_certificate(certificate: &NewCertificate) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    problems.require("name", &certificate.name);
    problems.require("owner_name", &certificate.owner_name);
    if certificate.status == CertificateStatus::InUse {
        problems
            .invalid
            .push("new certificates cannot start as in_use".to_string());
    }
    check_validity(
        &mut problems,
        certificate.acquired_on,
        certificate.valid_until,
    );
    problems.finish()
}

/// # Errors
///
/// [`CoreError::Validation`] when a provided required field is blank.
pub fn validate_certificate_update(update: &CertificateUpdate) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    problems.not_blank("name", update.name.as_ref());
    problems.not_blank("owner_name", update.owner_name.as_ref());
    check_validity(
        &mut problems,
        update.acquired_on.flatten(),
        update.valid_until.flatten(),
    );
    problems.finish()
}

fn check_validity(
    problems: &mut Problems,
    acquired_on: Option<chrono::NaiveDate>,
    valid_until: Option<chrono::NaiveDate>,
) {
    if let (Some(acquired), Some(until)) = (acquired_on, valid_until) {
        if until < acquired {
            problems
                .invalid
                .push("valid_until cannot precede acquired_on".to_string());
        }
    }
}

/// Check that a manager and certificate may be linked to a site.
///
/// # Errors
///
/// [`CoreError::Validation`] listing every violated rule: the site is already
/// assigned, the manager is retired or on leave, or the certificate is not
/// available.
pub fn validate_assignment(
    site: &Site,
    manager: &Personnel,
    certificate: &Certificate,
) -> Result<(), CoreError> {
    let mut problems = Problems::default();
    if site.is_assigned() {
        problems
            .invalid
            .push(format!("site {} already has a manager assigned", site.id));
    }
    match manager.status {
        PersonnelStatus::Retired => problems
            .invalid
            .push(format!("{} has retired and cannot be assigned", manager.name)),
        PersonnelStatus::OnLeave => problems
            .invalid
            .push(format!("{} is on leave and cannot be assigned", manager.name)),
        PersonnelStatus::Available | PersonnelStatus::Deployed => {}
    }
    if !certificate.is_available() {
        problems.invalid.push(format!(
            "certificate {} is {}",
            certificate.id, certificate.status
        ));
    }
    problems.finish()
}
