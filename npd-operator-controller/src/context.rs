use npd_operator_crds::security::PRIVILEGED_SCC;

use crate::{ClusterStore, metrics::ControllerMetrics};

pub const DEFAULT_IMAGE: &str = "k8s.gcr.io/node-problem-detector:v0.8.1";
pub const DEFAULT_PLUGIN_FILE_MODE: i32 = 0o766;
pub const DEFAULT_SCC_UPDATE_ATTEMPTS: u32 = 5;

pub struct Context<S: ClusterStore> {
    pub store: S,
    pub settings: Settings,
    pub metrics: ControllerMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Namespace to watch for NodeProblemDetectors, all namespaces if unset
    pub namespace: Option<String>,
    pub workload: WorkloadSettings,
    /// SecurityContextConstraints the daemon's service account is added to
    pub scc_name: String,
    /// Read-modify-write attempts on the SCC before giving up on conflicts
    pub scc_update_attempts: u32,
}

/// Values baked into the DaemonSet that are not part of the custom resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSettings {
    pub image: String,
    /// Mode of the plugin scripts mounted from the plugins ConfigMap
    pub plugin_file_mode: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: None,
            workload: WorkloadSettings::default(),
            scc_name: PRIVILEGED_SCC.into(),
            scc_update_attempts: DEFAULT_SCC_UPDATE_ATTEMPTS,
        }
    }
}

impl Default for WorkloadSettings {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.into(),
            plugin_file_mode: DEFAULT_PLUGIN_FILE_MODE,
        }
    }
}
