//! # sb-core
//!
//! Core types shared by every Siteboard crate.
//!
//! - Entity structs for sites, personnel, and certificates
//! - Status enums with their wire representation
//! - Partial-update builders and list filters
//! - ID generation and optimistic-concurrency version tokens
//! - Field validation and assignment rules
//! - Dashboard statistics and API response bodies
//! - Cross-cutting error types

pub mod dates;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod filters;
pub mod ids;
pub mod responses;
pub mod stats;
pub mod updates;
pub mod validation;
pub mod version;
