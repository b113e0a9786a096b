//! Record ID generation.
//!
//! IDs look like `SITE-20250301093000-A1B2C3`: a prefix, the UTC creation
//! timestamp to the second, and random uppercase hex. Owner IDs use four hex
//! digits instead of six.

use chrono::{DateTime, Utc};

pub const SITE_PREFIX: &str = "SITE";
pub const PERSONNEL_PREFIX: &str = "PRS";
pub const CERTIFICATE_PREFIX: &str = "CERT";
pub const OWNER_PREFIX: &str = "O";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[must_use]
pub fn site_id() -> String {
    generate(SITE_PREFIX, 3, Utc::now())
}

#[must_use]
pub fn personnel_id() -> String {
    generate(PERSONNEL_PREFIX, 3, Utc::now())
}

#[must_use]
pub fn certificate_id() -> String {
    generate(CERTIFICATE_PREFIX, 3, Utc::now())
}

#[must_use]
pub fn owner_id() -> String {
    generate(OWNER_PREFIX, 2, Utc::now())
}

/// Build `{prefix}-{timestamp}-{hex}` with `random_bytes * 2` hex digits.
#[must_use]
pub fn generate(prefix: &str, random_bytes: usize, at: DateTime<Utc>) -> String {
    let mut bytes = vec![0u8; random_bytes];
    // Entropy failure only degrades uniqueness; stores still check collisions.
    if getrandom::fill(&mut bytes).is_err() {
        let nanos = at.timestamp_subsec_nanos().to_be_bytes();
        for (dst, src) in bytes.iter_mut().zip(nanos.iter().cycle()) {
            *dst = *src;
        }
    }
    let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
    format!("{prefix}-{}-{hex}", at.format(TIMESTAMP_FORMAT))
}
