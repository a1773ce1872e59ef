//! Containers command implementation

use anyhow::{Context, Result};
use shaper_runtime::{ContainerInspector, DockerRuntime};
use std::sync::Arc;

pub async fn execute() -> Result<()> {
    tracing::info!("Listing running containers");

    let runtime = DockerRuntime::connect().context("Failed to connect to Docker")?;
    let inspector = ContainerInspector::new(Arc::new(runtime));

    let names = inspector
        .running_container_names()
        .await
        .context("Failed to list containers")?;

    if names.is_empty() {
        eprintln!("No containers running");
    }

    for name in names {
        println!("{name}");
    }

    Ok(())
}
