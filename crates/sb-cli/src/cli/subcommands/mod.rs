mod cert;
mod personnel;
mod site;

pub use cert::CertCommands;
pub use personnel::PersonnelCommands;
pub use site::SiteCommands;
