//! Docker Engine backend

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{InspectContainerOptions, ListContainersOptions};
use bollard::errors::Error as BollardError;
use bollard::models::ContainerInspectResponse;
use shaper_core::{
    ContainerRecord, ContainerStatus, ContainerSummary, Error, ProcessId, Result,
    normalize_container_name,
};

use crate::backend::ContainerRuntime;

/// Container runtime backed by the local Docker daemon
pub struct DockerRuntime {
    client: Docker,
}

impl DockerRuntime {
    /// Connect using the platform defaults (`DOCKER_HOST` or the local socket)
    ///
    /// # Errors
    /// Returns error if the client cannot be configured
    pub fn connect() -> Result<Self> {
        let client = Docker::connect_with_local_defaults().map_err(runtime_error)?;
        tracing::debug!("Connected to Docker daemon");
        Ok(Self { client })
    }
}

impl std::fmt::Debug for DockerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerRuntime").finish_non_exhaustive()
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(runtime_error)?;

        Ok(containers
            .into_iter()
            .filter_map(|summary| {
                let name = summary.names?.into_iter().next()?;
                Some(ContainerSummary {
                    name: normalize_container_name(&name).to_string(),
                    state: summary.state.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn inspect(&self, container: &str) -> Result<ContainerRecord> {
        let response = self
            .client
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
            .map_err(|e| match e {
                BollardError::DockerResponseServerError {
                    status_code: 404, ..
                } => Error::ContainerNotFound {
                    target: Some(container.to_string()),
                },
                other => runtime_error(other),
            })?;

        record_from_inspect(container, response)
    }
}

/// Build a [`ContainerRecord`] from an inspect response.
///
/// Only running containers carry an ID, PID and image; anything else keeps
/// just the name so callers skip namespace work.
fn record_from_inspect(
    requested: &str,
    response: ContainerInspectResponse,
) -> Result<ContainerRecord> {
    let name = response
        .name
        .as_deref()
        .map_or(requested, normalize_container_name)
        .to_string();

    let Some(state) = response.state else {
        return Ok(ContainerRecord {
            name,
            status: ContainerStatus::Unknown,
        });
    };

    if !state.running.unwrap_or(false) {
        return Ok(ContainerRecord::not_running(name));
    }

    let raw_pid = state.pid.ok_or_else(|| Error::Runtime {
        message: format!("running container {name} has no pid"),
    })?;
    let pid = i32::try_from(raw_pid).map_err(|_| Error::Runtime {
        message: format!("pid {raw_pid} of container {name} is out of range"),
    })?;

    let image = response
        .config
        .and_then(|config| config.image)
        .unwrap_or_default();

    Ok(ContainerRecord::running(
        name,
        response.id.unwrap_or_default(),
        ProcessId::from_raw(pid),
        image,
    ))
}

fn runtime_error(err: BollardError) -> Error {
    Error::Runtime {
        message: err.to_string(),
    }
}
