use std::sync::{Arc, PoisonError};

use futures::StreamExt;
use k8s_openapi::api::apps::v1::DaemonSet;
use kube::{
    Api, Client,
    runtime::{Controller, watcher::Config},
};
use npd_operator_crds::v1alpha1::NodeProblemDetector;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    KubeStore, Result,
    context::{Context, Settings},
    controller::{error_policy, reconcile},
    metrics::{ControllerMetrics, REGISTRY},
};

const CONTROLLER_NAME: &str = "node-problem-detector";

pub async fn start_controller(
    client: Client,
    settings: Settings,
    cancel: CancellationToken,
) -> Result<()> {
    let (api, daemon_sets): (Api<NodeProblemDetector>, Api<DaemonSet>) = match &settings.namespace
    {
        Some(ns) => (
            Api::namespaced(client.clone(), ns),
            Api::namespaced(client.clone(), ns),
        ),
        None => (Api::all(client.clone()), Api::all(client.clone())),
    };

    let metrics = {
        let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
        ControllerMetrics::new(CONTROLLER_NAME, &mut registry)
    };
    let context = Arc::new(Context {
        store: KubeStore::new(client),
        settings,
        metrics,
    });

    info!("starting node-problem-detector controller");
    Controller::new(api, Config::default().any_semantic())
        .owns(daemon_sets, Config::default().labels("app=node-problem-detector"))
        .graceful_shutdown_on(shutdown(cancel))
        .run(reconcile, error_policy, context)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!("reconciled {}", obj),
                Err(e) => warn!("reconcile failed: {}", e),
            }
        })
        .await;
    Ok(())
}

async fn shutdown(cancel: CancellationToken) {
    cancel.cancelled().await;
}
