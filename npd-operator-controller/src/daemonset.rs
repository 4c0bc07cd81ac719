use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::{DaemonSet, DaemonSetSpec, DaemonSetUpdateStrategy},
        core::v1::{
            ConfigMapVolumeSource, Container, EnvVar, EnvVarSource, HostPathVolumeSource,
            ObjectFieldSelector, PodSecurityContext, PodSpec, PodTemplateSpec,
            ResourceRequirements, SecurityContext, Volume, VolumeMount,
        },
    },
    apimachinery::pkg::apis::meta::v1::{LabelSelector, OwnerReference},
};
use kube::api::ObjectMeta;
use npd_operator_crds::v1alpha1::ImagePullPolicy;

use crate::{
    config_map::{CONFIG_MAP_NAME, PLUGINS_CONFIG_MAP_NAME},
    context::WorkloadSettings,
    rbac::SERVICE_ACCOUNT_NAME,
};

pub const CONTAINER_NAME: &str = "node-problem-detector";
const APP_LABEL: (&str, &str) = ("app", "node-problem-detector");
const TERMINATION_GRACE_PERIOD_SECONDS: i64 = 30;

const COMMAND: [&str; 4] = [
    "/node-problem-detector",
    "--logtostderr",
    "--system-log-monitors=/etc/npd/kernel-monitor.json,/etc/npd/docker-monitor.json",
    "--custom-plugin-monitors=/etc/npd/kubelet-monitor.json,/etc/npd/file-existence-monitor.json",
];

/// Desired DaemonSet for a NodeProblemDetector.
pub struct DaemonSetParams<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    pub owner: OwnerReference,
    pub image_pull_policy: ImagePullPolicy,
    pub settings: &'a WorkloadSettings,
}

pub fn daemon_set(params: DaemonSetParams<'_>) -> DaemonSet {
    let labels = BTreeMap::from([(APP_LABEL.0.to_string(), APP_LABEL.1.to_string())]);

    DaemonSet {
        metadata: ObjectMeta {
            name: Some(params.name.into()),
            namespace: Some(params.namespace.into()),
            owner_references: Some(vec![params.owner]),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DaemonSetSpec {
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(pod_spec(params.image_pull_policy, params.settings)),
            },
            update_strategy: Some(DaemonSetUpdateStrategy {
                type_: Some("RollingUpdate".into()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn pod_spec(image_pull_policy: ImagePullPolicy, settings: &WorkloadSettings) -> PodSpec {
    PodSpec {
        containers: vec![container(image_pull_policy, &settings.image)],
        host_network: Some(true),
        restart_policy: Some("Always".into()),
        security_context: Some(PodSecurityContext::default()),
        service_account_name: Some(SERVICE_ACCOUNT_NAME.into()),
        termination_grace_period_seconds: Some(TERMINATION_GRACE_PERIOD_SECONDS),
        volumes: Some(volumes(settings.plugin_file_mode)),
        ..Default::default()
    }
}

fn container(image_pull_policy: ImagePullPolicy, image: &str) -> Container {
    Container {
        name: CONTAINER_NAME.into(),
        command: Some(COMMAND.iter().map(|s| s.to_string()).collect()),
        env: Some(vec![EnvVar {
            name: "NODE_NAME".into(),
            value_from: Some(EnvVarSource {
                field_ref: Some(ObjectFieldSelector {
                    api_version: Some("v1".into()),
                    field_path: "spec.nodeName".into(),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        image: Some(image.into()),
        image_pull_policy: Some(image_pull_policy.as_str().into()),
        resources: Some(ResourceRequirements::default()),
        security_context: Some(SecurityContext {
            privileged: Some(true),
            ..Default::default()
        }),
        termination_message_path: Some("/dev/termination-log".into()),
        termination_message_policy: Some("File".into()),
        volume_mounts: Some(vec![
            mount("log", "/host/log", true),
            mount("localtime", "/etc/localtime", true),
            mount("config", "/etc/npd", false),
            mount("plugins", "/etc/npd-plugins", false),
            // host root fs, for monitoring files on the node
            mount("rootfs", "/rootfs", false),
        ]),
        ..Default::default()
    }
}

fn mount(name: &str, path: &str, read_only: bool) -> VolumeMount {
    VolumeMount {
        name: name.into(),
        mount_path: path.into(),
        read_only: read_only.then_some(true),
        ..Default::default()
    }
}

fn volumes(plugin_file_mode: i32) -> Vec<Volume> {
    vec![
        host_path_volume("log", "/var/log"),
        host_path_volume("localtime", "/etc/localtime"),
        Volume {
            name: "config".into(),
            config_map: Some(ConfigMapVolumeSource {
                name: CONFIG_MAP_NAME.into(),
                ..Default::default()
            }),
            ..Default::default()
        },
        Volume {
            name: "plugins".into(),
            config_map: Some(ConfigMapVolumeSource {
                name: PLUGINS_CONFIG_MAP_NAME.into(),
                default_mode: Some(plugin_file_mode),
                ..Default::default()
            }),
            ..Default::default()
        },
        host_path_volume("rootfs", "/"),
    ]
}

fn host_path_volume(name: &str, path: &str) -> Volume {
    Volume {
        name: name.into(),
        host_path: Some(HostPathVolumeSource {
            path: path.into(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Sets the pull policy of the node-problem-detector container on a live
/// DaemonSet. Returns whether anything changed.
pub fn sync_image_pull_policy(ds: &mut DaemonSet, policy: ImagePullPolicy) -> bool {
    let Some(pod) = ds.spec.as_mut().and_then(|s| s.template.spec.as_mut()) else {
        return false;
    };
    let Some(container) = pod.containers.iter_mut().find(|c| c.name == CONTAINER_NAME) else {
        return false;
    };
    if container.image_pull_policy.as_deref() == Some(policy.as_str()) {
        return false;
    }
    container.image_pull_policy = Some(policy.as_str().into());
    true
}
