use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{CertCommands, PersonnelCommands, SiteCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Load a JSON fixture file into the local store.
    Seed(SeedArgs),
    /// Construction sites.
    Site {
        #[command(subcommand)]
        action: SiteCommands,
    },
    /// Site managers and other personnel.
    Personnel {
        #[command(subcommand)]
        action: PersonnelCommands,
    },
    /// Licenses that back a site assignment.
    Cert {
        #[command(subcommand)]
        action: CertCommands,
    },
    /// Dashboard counters.
    Stats,
    /// Check that the API server is up.
    Health,
    /// Print the JSON Schema of a payload type.
    Schema(SchemaArgs),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum BackendArg {
    Local,
    Memory,
    Supabase,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Bind host, overriding `server.host`.
    #[arg(long)]
    pub host: Option<String>,
    /// Bind port, overriding `server.port`.
    #[arg(long)]
    pub port: Option<u16>,
    /// Store backend, overriding `store.backend`.
    #[arg(long)]
    pub backend: Option<BackendArg>,
    /// Local database path, overriding `store.path`.
    #[arg(long)]
    pub db: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SeedArgs {
    /// Fixture file with `sites`, `personnel` and `certificates` arrays.
    pub file: String,
    /// Local database path, overriding `store.path`.
    #[arg(long)]
    pub db: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Site,
    NewSite,
    SiteUpdate,
    SiteDetail,
    Personnel,
    NewPersonnel,
    PersonnelUpdate,
    Certificate,
    NewCertificate,
    CertificateUpdate,
    Stats,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
