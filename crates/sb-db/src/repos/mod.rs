//! Repository methods on [`SiteService`](crate::service::SiteService), one
//! module per entity.

pub mod certificate;
pub mod personnel;
pub mod seed;
pub mod site;
pub mod stats;
