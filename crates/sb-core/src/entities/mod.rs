//! Entity structs for the Siteboard domain.
//!
//! Each entity maps to a table in both the local libSQL store and the Supabase
//! schema. All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod certificate;
mod personnel;
mod site;

pub use certificate::{Certificate, NewCertificate};
pub use personnel::{NewPersonnel, Personnel};
pub use site::{NewSite, Site, deserialize_coordinate};
