use std::fmt;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NAME_GROUP_NODE_PROBLEM_DETECTOR: &str =
    "nodeproblemdetectors.node-problem-detector.openshift.io";

/// Desired state of a node-problem-detector deployment in one namespace.
#[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Eq, Clone, Debug, JsonSchema)]
#[kube(
    group = "node-problem-detector.openshift.io",
    version = "v1alpha1",
    kind = "NodeProblemDetector",
    shortname = "npd",
    derive = "Default",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct NodeProblemDetectorSpec {
    /// Pull policy of the node-problem-detector container
    #[serde(default)]
    pub image_pull_policy: ImagePullPolicy,
}

#[derive(Serialize, Deserialize, Default, PartialEq, Eq, Clone, Copy, Debug, JsonSchema)]
pub enum ImagePullPolicy {
    Always,
    #[default]
    IfNotPresent,
    Never,
}

impl ImagePullPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ImagePullPolicy::Always => "Always",
            ImagePullPolicy::IfNotPresent => "IfNotPresent",
            ImagePullPolicy::Never => "Never",
        }
    }
}

impl fmt::Display for ImagePullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
