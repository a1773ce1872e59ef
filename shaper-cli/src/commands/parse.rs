//! Parse command implementation

use anyhow::{Context, Result};
use shaper_veth::parse_veth_links;
use std::path::Path;
use tokio::io::AsyncReadExt;

pub async fn execute(scope: &str, file: Option<&Path>) -> Result<()> {
    let listing = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
    };

    let records = parse_veth_links(scope, &listing);
    tracing::debug!(scope, count = records.len(), "Parsed listing");

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
