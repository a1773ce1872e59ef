//! Verify command implementation

use anyhow::{Context, Result};
use shaper_core::ExecutionMode;
use shaper_runtime::{ContainerInspector, DockerRuntime};
use std::sync::Arc;

pub async fn execute(container: &str, mode: ExecutionMode) -> Result<()> {
    tracing::info!(container, %mode, "Verifying container");

    let runtime = DockerRuntime::connect().context("Failed to connect to Docker")?;
    let inspector = ContainerInspector::new(Arc::new(runtime));

    inspector.verify(container, mode).await?;

    println!("✅ Container '{container}' found");

    Ok(())
}
