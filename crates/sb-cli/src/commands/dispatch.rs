use sb_config::SiteboardConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: SiteboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => commands::serve::handle(&args, config).await,
        Commands::Seed(args) => commands::seed::handle(&args, &config, flags).await,
        Commands::Site { action } => commands::site::handle(&action, &config, flags).await,
        Commands::Personnel { action } => {
            commands::personnel::handle(&action, &config, flags).await
        }
        Commands::Cert { action } => commands::cert::handle(&action, &config, flags).await,
        Commands::Stats => commands::stats::handle(&config, flags).await,
        Commands::Health => commands::health::handle(&config, flags).await,
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
