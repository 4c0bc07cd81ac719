use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

pub const PRIVILEGED_SCC: &str = "privileged";

/// OpenShift `security.openshift.io/v1` SecurityContextConstraints.
///
/// Only `users` is modelled; every other field is carried through untouched
/// in `other` so a read-modify-write does not drop settings owned by the
/// cluster.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContextConstraints {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl SecurityContextConstraints {
    pub fn new(name: &str) -> Self {
        Self {
            api_version: <Self as k8s_openapi::Resource>::API_VERSION.into(),
            kind: <Self as k8s_openapi::Resource>::KIND.into(),
            metadata: ObjectMeta {
                name: Some(name.into()),
                ..Default::default()
            },
            users: None,
            other: BTreeMap::new(),
        }
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.users
            .as_ref()
            .is_some_and(|users| users.iter().any(|u| u == user))
    }

    /// Appends `user` unless already present. Returns whether the list changed.
    pub fn add_user(&mut self, user: &str) -> bool {
        if self.has_user(user) {
            return false;
        }
        self.users.get_or_insert_with(Vec::new).push(user.into());
        true
    }
}

impl k8s_openapi::Resource for SecurityContextConstraints {
    const API_VERSION: &'static str = "security.openshift.io/v1";
    const GROUP: &'static str = "security.openshift.io";
    const KIND: &'static str = "SecurityContextConstraints";
    const VERSION: &'static str = "v1";
    const URL_PATH_SEGMENT: &'static str = "securitycontextconstraints";
    type Scope = k8s_openapi::ClusterResourceScope;
}

impl k8s_openapi::Metadata for SecurityContextConstraints {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
