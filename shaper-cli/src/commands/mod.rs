use anyhow::Result;

use crate::cli::{Cli, Commands};

pub mod containers;
pub mod parse;
pub mod verify;
pub mod veth;

/// Dispatch command to appropriate handler
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = cli.netns_config();

    match cli.command {
        Commands::Veth { container, json } => {
            veth::execute(config, cli.mode, &container, json).await
        }

        Commands::Containers => containers::execute().await,

        Commands::Verify { container } => verify::execute(&container, cli.mode).await,

        Commands::Parse { scope, file } => parse::execute(&scope, file.as_deref()).await,
    }
}
