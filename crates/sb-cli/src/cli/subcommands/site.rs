use clap::Subcommand;

/// Site commands. Dates are `YYYY-MM-DD`; enum values accept `-` or `_`.
#[derive(Clone, Debug, Subcommand)]
pub enum SiteCommands {
    /// List sites.
    List {
        #[arg(long)]
        company: Option<String>,
        /// Assignment status: assigned or unassigned.
        #[arg(long)]
        status: Option<String>,
        /// Construction state.
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Search sites by name or address.
    Search { query: String },
    /// Show a site with its manager and certificate.
    Get { id: String },
    /// Register a site.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        address: String,
        /// Explicit ID; generated when omitted.
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
        #[arg(long)]
        permit_date: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        completion_date: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit site fields. Without --version the latest version is used and
    /// conflicts are retried.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        permit_date: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        completion_date: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        completion_doc_url: Option<String>,
        /// Expected site version; fails with a conflict if stale.
        #[arg(long)]
        version: Option<i64>,
    },
    /// Assign a manager and certificate to a site.
    Assign {
        id: String,
        #[arg(long)]
        manager: String,
        #[arg(long)]
        certificate: String,
        #[arg(long)]
        version: Option<i64>,
    },
    /// Release a site's manager and certificate.
    Unassign {
        id: String,
        #[arg(long)]
        version: Option<i64>,
    },
}
