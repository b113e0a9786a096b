use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum PersonnelCommands {
    /// List personnel.
    List {
        /// available, deployed, on-leave or retired.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Show one person.
    Get { id: String },
    /// Register a person.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        affiliation: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a person.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        affiliation: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}
