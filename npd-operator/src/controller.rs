use npd_operator_controller::start_controller;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{Error, Result, config::ControllerArgs};

/// Runs the controller until `cancel` fires. `ready` is cancelled once the
/// API server has answered and the controller task is spawned; the watches
/// may still be starting at that point.
pub async fn start(
    args: ControllerArgs,
    ready: CancellationToken,
    cancel: CancellationToken,
) -> Result<()> {
    let client = kube::Client::try_default().await?;
    let version = client.apiserver_version().await?;
    info!("connected to kubernetes {}", version.git_version);

    // the controller shuts itself down gracefully on cancellation
    let controller = tokio::spawn(start_controller(client, (&args).into(), cancel));
    ready.cancel();

    controller.await.map_err(|e| Error::Task(e.to_string()))??;
    info!("controller stopped");
    Ok(())
}
