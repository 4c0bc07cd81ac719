mod config_map;
mod context;
mod controller;
mod daemonset;
mod error;
pub mod metrics;
mod rbac;
mod runtime;
mod scc;
mod store;
#[cfg(test)]
mod testing;

pub use context::{
    DEFAULT_IMAGE, DEFAULT_PLUGIN_FILE_MODE, DEFAULT_SCC_UPDATE_ATTEMPTS, Settings,
    WorkloadSettings,
};
pub use error::{Error, Result, StoreError};
pub use npd_operator_crds::v1alpha1;
pub use runtime::start_controller;
pub use store::{ClusterStore, KubeStore, StoreObject};
