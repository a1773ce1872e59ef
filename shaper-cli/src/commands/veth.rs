//! Veth command implementation

use anyhow::{Context, Result};
use shaper_core::ExecutionMode;
use shaper_netns::{NetnsConfig, SystemRunner};
use shaper_runtime::DockerRuntime;
use shaper_veth::VethResolver;
use std::sync::Arc;

pub async fn execute(
    config: NetnsConfig,
    mode: ExecutionMode,
    container: &str,
    json: bool,
) -> Result<()> {
    tracing::info!(container, %mode, "Resolving host veth interfaces");

    if !nix::unistd::geteuid().is_root() {
        tracing::warn!("Not running as root; namespace links will likely be refused");
    }

    let runtime = DockerRuntime::connect().context("Failed to connect to Docker")?;
    let resolver = VethResolver::new(Arc::new(runtime), Arc::new(SystemRunner), config)
        .context("Failed to determine host identity")?;

    resolver.inspector().verify(container, mode).await?;

    let table = resolver.create_veth_table(container).await?;

    if json {
        let records: Vec<_> = table.resolve().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for name in table.fetch_names() {
            println!("{name}");
        }
    }

    Ok(())
}
