use std::{sync::Arc, time::Duration};

use k8s_openapi::api::apps::v1::DaemonSet;
use kube::{Resource, ResourceExt, runtime::controller::Action};
use npd_operator_crds::v1alpha1::NodeProblemDetector;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    ClusterStore, Error, Result, StoreError, StoreObject,
    config_map::{monitor_config_map, plugin_config_map},
    context::Context,
    daemonset::{DaemonSetParams, daemon_set, sync_image_pull_policy},
    rbac::{cluster_role_binding, service_account, service_account_user},
    scc::ensure_scc_user,
};

pub(crate) const DEFAULT_REQUEUE_DURATION: Duration = Duration::from_secs(300);
const ERROR_REQUEUE_DURATION: Duration = Duration::from_secs(5);

/// One reconciliation pass. Steps run in order and the pass stops at the
/// first step that fails.
#[instrument(skip(npd, ctx), fields(name = %npd.name_any(), namespace = ?npd.namespace()))]
pub(crate) async fn reconcile<S: ClusterStore>(
    npd: Arc<NodeProblemDetector>,
    ctx: Arc<Context<S>>,
) -> Result<Action> {
    let _timer = ctx.metrics.count_and_measure(npd.as_ref());

    if npd.meta().deletion_timestamp.is_some() {
        debug!("NodeProblemDetector is being deleted, skipping");
        return Ok(Action::await_change());
    }

    let name = npd.meta().name.clone().ok_or(Error::InvalidResource)?;
    let namespace = npd.namespace().ok_or(Error::InvalidResource)?;
    let owner = npd.controller_owner_ref(&()).ok_or(Error::InvalidResource)?;
    info!("Started reconciling NodeProblemDetector {}/{}", namespace, name);

    let store = &ctx.store;
    ensure_created(
        store,
        &monitor_config_map(&namespace),
        "create node-problem-detector configmap",
    )
    .await?;
    ensure_created(
        store,
        &plugin_config_map(&namespace),
        "create node-problem-detector-plugins configmap",
    )
    .await?;
    ensure_created(
        store,
        &service_account(&namespace),
        "create node-problem-detector serviceaccount",
    )
    .await?;
    ensure_created(
        store,
        &cluster_role_binding(&namespace),
        "create clusterrolebinding for node-problem-detector serviceaccount",
    )
    .await?;

    ensure_scc_user(
        store,
        &ctx.settings.scc_name,
        &service_account_user(&namespace),
        ctx.settings.scc_update_attempts,
    )
    .await?;

    let desired = daemon_set(DaemonSetParams {
        name: &name,
        namespace: &namespace,
        owner,
        image_pull_policy: npd.spec.image_pull_policy,
        settings: &ctx.settings.workload,
    });
    ensure_created(store, &desired, "create node-problem-detector daemonset").await?;

    let mut live: DaemonSet = store
        .get(Some(&namespace), &name)
        .await
        .map_err(Error::apply("get node-problem-detector daemonset"))?;
    if sync_image_pull_policy(&mut live, npd.spec.image_pull_policy) {
        store
            .update(&live)
            .await
            .map_err(Error::apply("update node-problem-detector daemonset"))?;
        info!(
            "set imagePullPolicy {} on DaemonSet {}/{}",
            npd.spec.image_pull_policy, namespace, name
        );
    }

    Ok(Action::requeue(DEFAULT_REQUEUE_DURATION))
}

/// Creates `obj`, treating an existing object of the same name as success.
async fn ensure_created<S, K>(store: &S, obj: &K, action: &'static str) -> Result<()>
where
    S: ClusterStore,
    K: StoreObject,
{
    match store.create(obj).await {
        Ok(_) => {
            info!("created {} {}", K::kind(&()), obj.name_any());
            Ok(())
        }
        Err(StoreError::AlreadyExists) => {
            debug!("{} {} already exists", K::kind(&()), obj.name_any());
            Ok(())
        }
        Err(source) => Err(Error::Apply { action, source }),
    }
}

pub(crate) fn error_policy<S: ClusterStore>(
    npd: Arc<NodeProblemDetector>,
    error: &Error,
    ctx: Arc<Context<S>>,
) -> Action {
    ctx.metrics.count_failure(npd.as_ref(), error);
    let name = npd.name_any();
    let ns = npd.namespace().unwrap_or_default();
    error!(?error, "reconcile error for {}/{}", ns, name);
    if matches!(error, Error::InvalidResource) {
        warn!("not requeueing invalid NodeProblemDetector {}/{}", ns, name);
        return Action::await_change();
    }
    Action::requeue(ERROR_REQUEUE_DURATION)
}
