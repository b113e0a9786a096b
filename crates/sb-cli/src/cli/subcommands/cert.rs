use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum CertCommands {
    /// List certificates.
    List {
        /// Only available (true) or only unavailable (false) certificates.
        #[arg(long)]
        available: Option<bool>,
    },
    /// Show one certificate.
    Get { id: String },
    /// Register a certificate. IDs are generated by the server.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        owner_phone: Option<String>,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        acquired_on: Option<String>,
        #[arg(long)]
        valid_until: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a certificate.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        valid_until: Option<String>,
        /// available, in-use or expired.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}
